use crate::config::AppConfig;
use crate::game::{Player, CENTER_COLUMN, COLS};
use crate::session::{Mode, Phase, Session};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};

/// Settings for the terminal UI loop.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How often the event loop wakes to poll input and apply a due
    /// computer move.
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig { tick_rate_ms: 100 }
    }
}

/// Colors offered on the setup screen. The session stores whatever string it
/// is handed; this palette only drives the 1/2 cycling keys.
const COLOR_CHOICES: [&str; 6] = [
    "#e74c3c", "#f1c40f", "#3498db", "#2ecc71", "#9b59b6", "#e67e22",
];

pub struct App {
    session: Session,
    selected_column: usize,
    tick_rate: Duration,
    should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        App {
            session: Session::new(&config.game),
            selected_column: CENTER_COLUMN,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            should_quit: false,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.session.tick(Instant::now());

            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') => {
                self.session.reset();
                self.selected_column = CENTER_COLUMN;
                return;
            }
            _ => {}
        }

        match self.session.phase() {
            Phase::Setup => self.handle_setup_key(key),
            Phase::Playing => self.handle_play_key(key),
            Phase::Over => {}
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('m') => {
                let next = match self.session.mode() {
                    Mode::Pvp => Mode::Pvc,
                    Mode::Pvc => Mode::Pvp,
                };
                self.session.set_mode(next);
            }
            KeyCode::Char('1') => self.cycle_color(Player::One),
            KeyCode::Char('2') => {
                // The computer keeps its default color.
                if self.session.mode() == Mode::Pvp {
                    self.cycle_color(Player::Two);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.session.start();
                self.selected_column = CENTER_COLUMN;
            }
            _ => {}
        }
    }

    fn handle_play_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.session.play_column(self.selected_column, Instant::now());
            }
            _ => {}
        }
    }

    fn cycle_color(&mut self, player: Player) {
        let current = self.session.player_color(player);
        let next = COLOR_CHOICES
            .iter()
            .position(|&c| c == current)
            .map(|i| (i + 1) % COLOR_CHOICES.len())
            .unwrap_or(0);
        self.session.set_color(player, COLOR_CHOICES[next].to_string());
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, &self.session, self.selected_column);
    }
}
