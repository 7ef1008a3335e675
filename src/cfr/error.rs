//! Error types for the CFR engine.
//!
//! Every error here is fatal for the operation that raised it: the engine
//! never retries or repairs a malformed buffer, it reports the problem and
//! leaves it to the caller to fix its inputs.

use thiserror::Error;

use crate::cfr::config::ConfigError;

/// Errors raised by the treeplex, traverser, averager and solver.
#[derive(Error, Debug)]
pub enum SolverError {
    /// A buffer does not have `num_infosets * 9` entries.
    #[error("buffer size mismatch (expected {expected}, found {found})")]
    Shape {
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// A strategy, vector or internal consistency check was violated.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// The caller passed an argument that is never valid.
    #[error("invalid usage: {0}")]
    Usage(String),

    /// The solver configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias used throughout the engine.
pub type SolverResult<T> = Result<T, SolverError>;

/// Fails with [`SolverError::Shape`] unless `found == expected`.
pub(crate) fn check_len(expected: usize, found: usize) -> SolverResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SolverError::Shape { expected, found })
    }
}

/// Fails with [`SolverError::Usage`] unless `player` is 0 or 1.
pub(crate) fn check_player(player: usize) -> SolverResult<()> {
    if player < 2 {
        Ok(())
    } else {
        Err(SolverError::Usage(format!(
            "invalid player (expected 0 or 1; found {})",
            player
        )))
    }
}
