use crate::game::GameState;

/// Universal interface for computer opponents.
pub trait Agent {
    /// Select a column for the current player, or `None` when no column is
    /// open. Callers must treat `None` as a tie, not an error.
    fn select_action(&mut self, state: &GameState) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
