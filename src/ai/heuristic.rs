use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use tracing::debug;

use crate::game::{Board, Cell, GameState, CENTER_COLUMN};

use super::agent::Agent;

/// Rule-based opponent. It always plays `Player::Two` against `Player::One`
/// and picks a column through a seven-tier cascade, evaluated top down with
/// the first match winning. Each tier scans the available columns in
/// ascending order, so ties break toward the lowest index. One ply only, no
/// lookahead.
pub struct HeuristicAgent {
    rng: StdRng,
}

impl HeuristicAgent {
    pub fn new() -> Self {
        HeuristicAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic variant for tests.
    pub fn from_seed(seed: u64) -> Self {
        HeuristicAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a column from `available`, the ascending list of non-full
    /// columns. Returns `None` only when `available` is empty, which callers
    /// must treat as a tie.
    pub fn choose_move(&mut self, board: &Board, available: &[usize]) -> Option<usize> {
        // 1. Win immediately.
        for &col in available {
            if let Ok((next, _)) = board.with_move(col, Cell::Two) {
                if next.check_win(Cell::Two) {
                    debug!(column = col, tier = 1, "taking the winning column");
                    return Some(col);
                }
            }
        }

        // 2. Occupy the opponent's winning column.
        for &col in available {
            if let Ok((next, _)) = board.with_move(col, Cell::One) {
                if next.check_win(Cell::One) {
                    debug!(column = col, tier = 2, "blocking an immediate win");
                    return Some(col);
                }
            }
        }

        // 3. Create two simultaneous threats.
        for &col in available {
            if board.count_threats(Cell::Two, col) >= 2 {
                debug!(column = col, tier = 3, "creating a fork");
                return Some(col);
            }
        }

        // 4. Deny the opponent's fork.
        for &col in available {
            if board.count_threats(Cell::One, col) >= 2 {
                debug!(column = col, tier = 4, "blocking a fork");
                return Some(col);
            }
        }

        // 5. Strongest single threat. The strict comparison keeps the lowest
        // column on ties.
        let mut best = None;
        let mut max_threats = 0;
        for &col in available {
            let threats = board.count_threats(Cell::Two, col);
            if threats > max_threats {
                max_threats = threats;
                best = Some(col);
            }
        }
        if let Some(col) = best {
            debug!(column = col, tier = 5, threats = max_threats, "building a threat");
            return Some(col);
        }

        // 6. Take the center.
        if available.contains(&CENTER_COLUMN) {
            debug!(column = CENTER_COLUMN, tier = 6, "taking the center");
            return Some(CENTER_COLUMN);
        }

        // 7. Random fallback. No columns left means the game is a tie.
        if available.is_empty() {
            return None;
        }
        let col = available[self.rng.random_range(0..available.len())];
        debug!(column = col, tier = 7, "falling back to a random column");
        Some(col)
    }
}

impl Default for HeuristicAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for HeuristicAgent {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        self.choose_move(state.board(), &state.legal_actions())
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::game::{GameState, Player, COLS};

    fn available(board: &Board) -> Vec<usize> {
        (0..COLS).filter(|&col| !board.is_column_full(col)).collect()
    }

    #[test]
    fn test_takes_winning_column_over_fork() {
        // Two is one piece from a vertical win in column 6, while dropping in
        // column 3 would create a fork. The win must come first even though
        // the fork sits at a lower index.
        let mut board = Board::new();
        for _ in 0..3 {
            board = board.with_move(6, Cell::Two).unwrap().0;
        }
        board = board.with_move(1, Cell::Two).unwrap().0;
        board = board.with_move(2, Cell::Two).unwrap().0;
        assert_eq!(board.count_threats(Cell::Two, 3), 2);

        let mut agent = HeuristicAgent::from_seed(0);
        assert_eq!(agent.choose_move(&board, &available(&board)), Some(6));
    }

    #[test]
    fn test_blocks_opponent_win() {
        // One holds columns 2..4 on the bottom row and completes at 1 or 5.
        // The block lands on the lowest completing column.
        let mut board = Board::new();
        for col in 2..5 {
            board = board.with_move(col, Cell::One).unwrap().0;
        }
        board = board.with_move(6, Cell::Two).unwrap().0;
        board = board.with_move(6, Cell::Two).unwrap().0;

        let mut agent = HeuristicAgent::from_seed(0);
        assert_eq!(agent.choose_move(&board, &available(&board)), Some(1));
    }

    #[test]
    fn test_creates_fork() {
        // Two at columns 1 and 2; column 3 leaves open completions on both
        // sides, the first column with two threats.
        let mut board = Board::new();
        board = board.with_move(1, Cell::Two).unwrap().0;
        board = board.with_move(2, Cell::Two).unwrap().0;
        board = board.with_move(6, Cell::One).unwrap().0;
        board = board.with_move(6, Cell::One).unwrap().0;

        let mut agent = HeuristicAgent::from_seed(0);
        assert_eq!(agent.choose_move(&board, &available(&board)), Some(3));
    }

    #[test]
    fn test_blocks_opponent_fork() {
        // The mirror position: One would fork at column 3, Two has no fork
        // of its own and must deny it.
        let mut board = Board::new();
        board = board.with_move(1, Cell::One).unwrap().0;
        board = board.with_move(2, Cell::One).unwrap().0;
        board = board.with_move(6, Cell::Two).unwrap().0;

        let mut agent = HeuristicAgent::from_seed(0);
        assert_eq!(agent.choose_move(&board, &available(&board)), Some(3));
    }

    #[test]
    fn test_maximizes_single_threat() {
        // Two has a pair at columns 0 and 1, capped by One's pieces so no
        // fork exists anywhere. Column 2 is the first column producing a
        // single threat.
        let mut board = Board::new();
        board = board.with_move(0, Cell::Two).unwrap().0;
        board = board.with_move(1, Cell::Two).unwrap().0;
        board = board.with_move(0, Cell::One).unwrap().0;
        board = board.with_move(1, Cell::One).unwrap().0;

        let mut agent = HeuristicAgent::from_seed(0);
        assert_eq!(agent.choose_move(&board, &available(&board)), Some(2));
    }

    #[test]
    fn test_prefers_center_on_empty_board() {
        let board = Board::new();
        let mut agent = HeuristicAgent::from_seed(0);
        assert_eq!(agent.choose_move(&board, &available(&board)), Some(CENTER_COLUMN));
    }

    #[test]
    fn test_random_fallback_when_center_full() {
        // Column 3 filled with alternating pieces; no drop anywhere creates
        // a threat for either side, so the cascade falls through to tier 7.
        let mut board = Board::new();
        for cell in [Cell::One, Cell::Two, Cell::One, Cell::Two, Cell::One, Cell::Two] {
            board = board.with_move(3, cell).unwrap().0;
        }

        let open = available(&board);
        assert_eq!(open, vec![0, 1, 2, 4, 5, 6]);

        let mut agent = HeuristicAgent::from_seed(42);
        let col = agent.choose_move(&board, &open).unwrap();
        assert!(open.contains(&col));
    }

    #[test]
    fn test_no_columns_returns_none() {
        let board = Board::new();
        let mut agent = HeuristicAgent::from_seed(0);
        assert_eq!(agent.choose_move(&board, &[]), None);
    }

    #[test]
    fn test_select_action_uses_legal_columns() {
        let mut agent = HeuristicAgent::from_seed(0);
        let state = GameState::initial();
        assert_eq!(agent.select_action(&state), Some(CENTER_COLUMN));
    }

    #[test]
    fn test_full_game_against_random_terminates() {
        let mut heuristic = HeuristicAgent::from_seed(7);
        let mut random = RandomAgent::from_seed(7);
        let mut state = GameState::initial();

        let mut plies = 0;
        while !state.is_terminal() {
            let action = match state.current_player() {
                Player::One => random.select_action(&state).unwrap(),
                Player::Two => heuristic.select_action(&state).unwrap(),
            };
            assert!(state.legal_actions().contains(&action));
            state = state.apply_move(action).unwrap().0;
            plies += 1;
        }

        assert!(state.is_terminal());
        assert!(plies <= 42);
    }
}
