//! Game trait definition for the CFR engine.
//!
//! Any turn-taking two-player zero-sum game whose states implement
//! `GameState` can be solved. The engine only ever walks the tree through
//! this trait, so new games never touch the solver.

use std::fmt::Debug;

use crate::cfr::error::{SolverError, SolverResult};
use crate::cfr::infoset::{is_legal, ActionMask, InfosetKey, Player, MAX_ACTIONS};

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The given player won.
    Win(Player),
    /// Nobody won.
    Tie,
}

impl Outcome {
    /// Payoff to player 0 (+1 win, -1 loss, 0 tie).
    pub fn payoff0(self) -> f64 {
        match self {
            Outcome::Win(0) => 1.0,
            Outcome::Win(_) => -1.0,
            Outcome::Tie => 0.0,
        }
    }
}

/// One node of a game with at most nine actions per decision point.
///
/// `Default` must produce the root state. States are small values; the
/// traverser clones them freely while walking the tree.
///
/// # Contract
/// - `player` is meaningful only while the game is in progress.
/// - `winner` returns `None` while the game is in progress.
/// - `next` is called only with a legal action on a non-terminal state.
/// - `infoset` identifies the acting player's decision point; the key of the
///   same player's previous decision point must be `infoset().parent()`.
pub trait GameState: Clone + Default + Debug + Send + Sync {
    /// Player to move.
    fn player(&self) -> Player;

    /// Outcome of the game, `None` while it is still in progress.
    fn winner(&self) -> Option<Outcome>;

    /// Check if the game is over.
    fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Legal actions of the player to move.
    fn available_actions(&self) -> ActionMask;

    /// Apply `action` for the player to move, advancing exactly one ply.
    fn next(&mut self, action: usize);

    /// Information set of the player to move.
    fn infoset(&self) -> InfosetKey;

    /// Checked variant of [`GameState::next`].
    fn try_next(&mut self, action: usize) -> SolverResult<()> {
        if action >= MAX_ACTIONS {
            return Err(SolverError::Usage(format!(
                "invalid action (must be in range [0..8]; found {})",
                action
            )));
        }
        if self.is_terminal() {
            return Err(SolverError::Usage("game is over".to_string()));
        }
        if !is_legal(self.available_actions(), action) {
            return Err(SolverError::Usage(format!(
                "action {} is not legal",
                action
            )));
        }
        self.next(action);
        Ok(())
    }
}
