use crate::game::{Board, Cell, Player, COLS, ROWS};
use crate::session::{Mode, Phase, Session};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, session: &Session, selected_column: usize) {
    match session.phase() {
        Phase::Setup => render_setup(frame, session),
        Phase::Playing | Phase::Over => render_game(frame, session, selected_column),
    }
}

/// Parse a `#rrggbb` display color. Colors are caller-supplied and never
/// validated, so anything unparseable just falls back to white.
fn hex_color(hex: &str) -> Color {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&digits[0..2], 16),
            u8::from_str_radix(&digits[2..4], 16),
            u8::from_str_radix(&digits[4..6], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }
    Color::White
}

fn render_setup(frame: &mut Frame, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),   // Options
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    let header = Paragraph::new("Choose your game mode and colors to start!")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));
    frame.render_widget(header, chunks[0]);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Mode: "),
            Span::styled(
                session.mode().label(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        color_line("Player 1", session.player_color(Player::One)),
    ];
    match session.mode() {
        Mode::Pvp => lines.push(color_line("Player 2", session.player_color(Player::Two))),
        Mode::Pvc => lines.push(color_line("Computer", session.player_color(Player::Two))),
    }

    let options = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(options, chunks[1]);

    let controls = Paragraph::new(vec![
        Line::from("M: Switch mode  |  1/2: Change color"),
        Line::from("Enter: Start  |  Q: Quit"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Controls"));
    frame.render_widget(controls, chunks[2]);
}

fn color_line<'a>(label: &'a str, color: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(format!("{}: ", label)),
        Span::styled("██ ", Style::default().fg(hex_color(color))),
        Span::raw(color),
    ])
}

fn render_game(frame: &mut Frame, session: &Session, selected_column: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),  // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);
    render_board(frame, session, selected_column, chunks[1]);
    render_message(frame, session.message(), chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, session: &Session, area: ratatui::layout::Rect) {
    let current = session.state().current_player();

    let (status, color) = if session.phase() == Phase::Over {
        (
            format!("Game Over  |  {}", session.mode().label()),
            Color::White,
        )
    } else if session.mode() == Mode::Pvc && current == Player::Two {
        (
            format!("Computer is thinking...  |  {}", session.mode().label()),
            hex_color(session.player_color(Player::Two)),
        )
    } else {
        (
            format!("Current Player: {}  |  {}", current.name(), session.mode().label()),
            hex_color(session.player_color(current)),
        )
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    session: &Session,
    selected_column: usize,
    area: ratatui::layout::Rect,
) {
    let board: &Board = session.state().board();
    let p1 = hex_color(session.player_color(Player::One));
    let p2 = hex_color(session.player_color(Player::Two));

    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..COLS {
            let (symbol, style) = match board.get(row, col) {
                Cell::Empty => (" . ", Style::default().fg(Color::DarkGray)),
                Cell::One => (" ● ", Style::default().fg(p1)),
                Cell::Two => (" ● ", Style::default().fg(p2)),
            };
            // The freshest piece is bolded in place of a drop animation.
            let style = if session.last_drop() == Some((row, col)) {
                style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                style
            };
            row_spans.push(Span::styled(symbol, style));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: ratatui::layout::Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let controls = Paragraph::new("←/→: Move  |  Enter: Drop  |  R: Reset  |  Q: Quit")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
