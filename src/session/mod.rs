//! Whole-game state machine. A session owns the board, the configured mode
//! and display colors, and the scheduled computer reply; the UI is a thin
//! adapter over it.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::ai::HeuristicAgent;
use crate::game::{GameState, MoveError, Outcome, Player};

pub const DEFAULT_P1_COLOR: &str = "#e74c3c";
pub const DEFAULT_P2_COLOR: &str = "#f1c40f";

/// Game mode: two humans sharing the keyboard, or a human against the
/// heuristic opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Pvp,
    Pvc,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Pvp => "Player vs Player",
            Mode::Pvc => "Player vs Computer",
        }
    }
}

/// Session lifecycle. Every game passes through `Playing`; the terminal
/// phase only accepts a reset back to `Setup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Playing,
    Over,
}

/// Settings for a game session.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Display colors are opaque strings owned by the caller; they are never
    /// validated and never consulted by game logic.
    pub p1_color: String,
    pub p2_color: String,
    /// Pause before the computer replies. Pacing only.
    pub computer_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            mode: Mode::Pvp,
            p1_color: DEFAULT_P1_COLOR.to_string(),
            p2_color: DEFAULT_P2_COLOR.to_string(),
            computer_delay_ms: 1000,
        }
    }
}

pub struct Session {
    phase: Phase,
    mode: Mode,
    p1_color: String,
    p2_color: String,
    state: GameState,
    opponent: HeuristicAgent,
    computer_delay: Duration,
    /// Deadline of the scheduled computer reply. Cleared by `reset` and
    /// `set_mode` so a stale move can never land on a fresh board.
    pending_computer_move: Option<Instant>,
    last_drop: Option<(usize, usize)>,
    message: Option<String>,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        Session {
            phase: Phase::Setup,
            mode: config.mode,
            p1_color: config.p1_color.clone(),
            p2_color: config.p2_color.clone(),
            state: GameState::initial(),
            opponent: HeuristicAgent::new(),
            computer_delay: Duration::from_millis(config.computer_delay_ms),
            pending_computer_move: None,
            last_drop: None,
            message: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Coordinates of the most recently placed piece, for drop highlighting.
    pub fn last_drop(&self) -> Option<(usize, usize)> {
        self.last_drop
    }

    pub fn player_color(&self, player: Player) -> &str {
        match player {
            Player::One => &self.p1_color,
            Player::Two => &self.p2_color,
        }
    }

    /// True while a computer reply is scheduled but not yet applied.
    pub fn computer_pending(&self) -> bool {
        self.pending_computer_move.is_some()
    }

    /// Switch the game mode. Resets both colors to their defaults, as the
    /// setup screen does, and discards any scheduled computer move.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.p1_color = DEFAULT_P1_COLOR.to_string();
        self.p2_color = DEFAULT_P2_COLOR.to_string();
        self.pending_computer_move = None;
    }

    /// Store a display color for `player`. The string passes through
    /// untouched.
    pub fn set_color(&mut self, player: Player, color: String) {
        match player {
            Player::One => self.p1_color = color,
            Player::Two => self.p2_color = color,
        }
    }

    /// Leave setup and begin play on a fresh board.
    pub fn start(&mut self) {
        if self.phase != Phase::Setup {
            return;
        }
        self.phase = Phase::Playing;
        self.state = GameState::initial();
        self.pending_computer_move = None;
        self.last_drop = None;
        self.message = None;
        debug!(mode = self.mode.label(), "game started");
    }

    /// Return to setup. Colors revert to their defaults and any scheduled
    /// computer move is discarded.
    pub fn reset(&mut self) {
        self.phase = Phase::Setup;
        self.p1_color = DEFAULT_P1_COLOR.to_string();
        self.p2_color = DEFAULT_P2_COLOR.to_string();
        self.state = GameState::initial();
        self.pending_computer_move = None;
        self.last_drop = None;
        self.message = None;
        debug!("session reset");
    }

    /// Handle a human drop request in `col`. Requests outside `Playing`, or
    /// during the computer's turn, are no-ops, never errors.
    pub fn play_column(&mut self, col: usize, now: Instant) {
        match self.phase {
            Phase::Setup => return,
            Phase::Over => {
                self.message = Some("Game over! Press r to reset.".to_string());
                return;
            }
            Phase::Playing => {}
        }
        // The computer's turn belongs to the scheduler, not the keyboard.
        if self.mode == Mode::Pvc && self.state.current_player() == Player::Two {
            return;
        }

        match self.state.apply_move(col) {
            Ok((next, row)) => {
                self.message = None;
                self.commit(next, row, col, now);
            }
            Err(MoveError::ColumnFull) => {
                self.message = Some("This column is full!".to_string());
            }
            Err(MoveError::InvalidColumn) => {
                self.message = Some("Invalid column!".to_string());
            }
            Err(MoveError::GameOver) => {
                self.message = Some("Game over! Press r to reset.".to_string());
            }
        }
    }

    /// Apply the scheduled computer move once its deadline has passed. The
    /// deadline may outlive the game it was scheduled for, so the move is
    /// dropped unless the session is still playing a PvC game and it is
    /// still the computer's turn.
    pub fn tick(&mut self, now: Instant) {
        let Some(deadline) = self.pending_computer_move else {
            return;
        };
        if now < deadline {
            return;
        }
        self.pending_computer_move = None;
        if self.phase != Phase::Playing
            || self.mode != Mode::Pvc
            || self.state.current_player() != Player::Two
        {
            return;
        }

        let available = self.state.legal_actions();
        match self.opponent.choose_move(self.state.board(), &available) {
            Some(col) => {
                if let Ok((next, row)) = self.state.apply_move(col) {
                    self.commit(next, row, col, now);
                }
            }
            None => {
                self.phase = Phase::Over;
                self.message = Some("It's a tie!".to_string());
            }
        }
    }

    fn commit(&mut self, next: GameState, row: usize, col: usize, now: Instant) {
        self.state = next;
        self.last_drop = Some((row, col));
        debug!(column = col, row, "move applied");

        match self.state.outcome() {
            Outcome::Win(player) => {
                self.phase = Phase::Over;
                self.message = Some(format!("{} wins!", player.name()));
            }
            Outcome::Tie => {
                self.phase = Phase::Over;
                self.message = Some("It's a tie!".to_string());
            }
            Outcome::InProgress => {
                if self.mode == Mode::Pvc && self.state.current_player() == Player::Two {
                    self.pending_computer_move = Some(now + self.computer_delay);
                }
            }
        }
    }
}
