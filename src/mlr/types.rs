//! State and outcome types for monotone local reasoning.

use crate::model::Weight;

/// Search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MlrState {
    /// `critic` is the machine currently believed to be the bottleneck.
    Running { critic: usize },

    /// No further improving move exists.
    Done { makespan: Weight },
}

/// Bottleneck load after one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MlrTracePoint {
    /// 1-based step number.
    pub iteration: usize,
    pub makespan: Weight,
}

/// Terminal report of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlrOutcome {
    /// Load of the final critic machine.
    pub makespan: Weight,

    /// Steps executed, including the one that detected termination.
    pub iterations: usize,

    /// Tasks relocated.
    pub moves: usize,

    /// Per-step bottleneck load; empty unless tracing was enabled.
    pub trace: Vec<MlrTracePoint>,
}
