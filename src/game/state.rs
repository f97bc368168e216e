use super::board::COLS;
use super::{Board, Player};

/// Result of evaluating a position. A full board with a winning line is a
/// win, not a tie, so win is always checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Win(Player),
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    ColumnFull,
    InvalidColumn,
    GameOver,
}

/// Evaluate a board right after `just_moved` placed a piece.
pub fn evaluate(board: &Board, just_moved: Player) -> Outcome {
    if board.check_win(just_moved.to_cell()) {
        Outcome::Win(just_moved)
    } else if board.is_full() {
        Outcome::Tie
    } else {
        Outcome::InProgress
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Outcome,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::One, // Player 1 starts
            outcome: Outcome::InProgress,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::InProgress
    }

    /// Get list of legal columns (not full), ascending
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Apply a move and return the new state plus the landing row. The row
    /// is reported for drop animation; it has no game meaning. Moves after
    /// game over are rejected, never applied.
    pub fn apply_move(&self, column: usize) -> Result<(GameState, usize), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let (board, row) = self
            .board
            .with_move(column, self.current_player.to_cell())
            .map_err(|e| match e {
                super::board::MoveError::ColumnFull => MoveError::ColumnFull,
                super::board::MoveError::InvalidColumn => MoveError::InvalidColumn,
            })?;

        let next = GameState {
            board,
            current_player: self.current_player.other(),
            outcome: evaluate(&board, self.current_player),
        };
        Ok((next, row))
    }
}
