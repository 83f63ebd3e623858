//! Records handed to an external metrics collaborator.
//!
//! The core produces these values; how they are written (CSV, JSON, a
//! database) is the consumer's concern. With the `serde` feature every
//! record derives `Serialize` and `Deserialize`.

use std::time::Duration;

use crate::model::Weight;

/// Which heuristic produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeuristicKind {
    MonotoneLocalReasoning,
    SimulatedAnnealing,
}

impl HeuristicKind {
    /// Short stable label.
    pub fn name(&self) -> &'static str {
        match self {
            HeuristicKind::MonotoneLocalReasoning => "monotone",
            HeuristicKind::SimulatedAnnealing => "annealing",
        }
    }
}

/// One replication's result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicationRecord {
    pub heuristic: HeuristicKind,
    /// Task count `n`.
    pub tasks: usize,
    /// Machine count `m`.
    pub machines: usize,
    /// 1-based replication index.
    pub replication: usize,
    pub elapsed: Duration,
    pub iterations: usize,
    pub makespan: Weight,
    /// Cooling factor for SA; `None` ("NA") for monotone reasoning.
    pub parameter: Option<f64>,
}

/// SA state after one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Temperature the acceptance decision was made at.
    pub temperature: f64,
    pub current_makespan: Weight,
    pub best_makespan: Weight,
    pub accepted: bool,
    /// The proposal was strictly worse and still accepted.
    pub accepted_worsening: bool,
}

/// Acceptance counters aggregated over the replications of one (n, m, alpha).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcceptanceRecord {
    pub tasks: usize,
    pub machines: usize,
    pub alpha: f64,
    pub total_proposals: usize,
    pub worsening_proposals: usize,
    pub accepted_worsenings: usize,
}

impl AcceptanceRecord {
    /// Share of worsening proposals that were accepted, in percent.
    ///
    /// Zero when no worsening move was ever proposed.
    pub fn acceptance_rate_percent(&self) -> f64 {
        if self.worsening_proposals == 0 {
            0.0
        } else {
            100.0 * self.accepted_worsenings as f64 / self.worsening_proposals as f64
        }
    }
}

/// Receives records as a run progresses.
///
/// All methods default to no-ops so a sink only implements what it stores.
pub trait MetricsSink {
    fn record_replication(&mut self, _record: &ReplicationRecord) {}

    /// Called with the SA trace of replication `replication`.
    fn record_iteration(&mut self, _replication: usize, _record: &IterationRecord) {}

    fn record_acceptance(&mut self, _record: &AcceptanceRecord) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MetricsSink for NullSink {}

/// Keeps every record in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub replications: Vec<ReplicationRecord>,
    /// `(replication, record)` pairs.
    pub iterations: Vec<(usize, IterationRecord)>,
    pub acceptance: Vec<AcceptanceRecord>,
}

impl MetricsSink for MemorySink {
    fn record_replication(&mut self, record: &ReplicationRecord) {
        self.replications.push(record.clone());
    }

    fn record_iteration(&mut self, replication: usize, record: &IterationRecord) {
        self.iterations.push((replication, *record));
    }

    fn record_acceptance(&mut self, record: &AcceptanceRecord) {
        self.acceptance.push(*record);
    }
}
