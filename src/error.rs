//! Error taxonomy shared by the model and both heuristics.

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised while configuring or running a heuristic.
///
/// There are no partial results: a replication either reaches a terminal
/// state or aborts with one of these.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Invalid parameters, detected before any solution is built.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `pop`/`peek` on an empty task stack.
    ///
    /// Unreachable while the heuristics' invariants hold, so seeing it
    /// means the search state is corrupt.
    #[error("task stack underflow")]
    Underflow,

    /// Storage for a machine's task stack could not be reserved.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

impl ScheduleError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns `true` for errors detected before the run started.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;
