//! Bookkeeping types for Simulated Annealing.

use crate::metrics::IterationRecord;
use crate::model::Weight;

/// Proposal and acceptance counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptanceStats {
    /// Neighbors generated (one per iteration).
    pub total_proposals: usize,

    /// Neighbors with a strictly larger makespan than the current solution.
    pub worsening_proposals: usize,

    /// Worsening neighbors accepted by the Metropolis test.
    pub accepted_worsenings: usize,

    /// All accepted neighbors, improving and equal ones included.
    pub accepted_moves: usize,
}

impl AcceptanceStats {
    /// Adds another run's counters to these.
    pub fn merge(&mut self, other: &AcceptanceStats) {
        self.total_proposals += other.total_proposals;
        self.worsening_proposals += other.worsening_proposals;
        self.accepted_worsenings += other.accepted_worsenings;
        self.accepted_moves += other.accepted_moves;
    }
}

/// Terminal report of an annealing run.
#[derive(Debug, Clone, PartialEq)]
pub struct SaOutcome {
    /// Makespan of the final current solution.
    pub makespan: Weight,

    /// Lowest makespan held by the current solution at any point.
    pub best_makespan: Weight,

    /// Iterations (temperature steps) executed.
    pub iterations: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    pub stats: AcceptanceStats,

    /// One record per iteration; empty unless tracing was enabled.
    pub trace: Vec<IterationRecord>,
}
