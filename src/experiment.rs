//! Replication driver.
//!
//! Runs one heuristic `r` times on fresh random instances of the same size,
//! sequentially and with a single injected random source, and reports each
//! replication to a [`MetricsSink`]. [`ReplicationSummary`] and
//! [`ComparisonSummary`] reduce finished records to per-configuration
//! statistics. Sweeping over parameter grids and writing the records out is
//! left to the caller.

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use tracing::info;
use u_numflow::stats;

use crate::error::{Result, ScheduleError};
use crate::metrics::{AcceptanceRecord, HeuristicKind, MetricsSink, ReplicationRecord};
use crate::mlr::{MlrConfig, MlrRunner};
use crate::model::{InstanceConfig, Weight};
use crate::sa::{AcceptanceStats, SaConfig, SaRunner};

/// Heuristic selection with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heuristic {
    MonotoneLocalReasoning,
    SimulatedAnnealing {
        /// Cooling factor in (0, 1).
        alpha: f64,
    },
}

impl Heuristic {
    pub fn kind(&self) -> HeuristicKind {
        match self {
            Heuristic::MonotoneLocalReasoning => HeuristicKind::MonotoneLocalReasoning,
            Heuristic::SimulatedAnnealing { .. } => HeuristicKind::SimulatedAnnealing,
        }
    }

    /// Value reported in [`ReplicationRecord::parameter`].
    pub fn parameter(&self) -> Option<f64> {
        match self {
            Heuristic::MonotoneLocalReasoning => None,
            Heuristic::SimulatedAnnealing { alpha } => Some(*alpha),
        }
    }
}

/// `replications` runs of one heuristic on one instance size.
///
/// # Examples
///
/// ```
/// use u_makespan::experiment::{Heuristic, ReplicationPlan};
/// use u_makespan::metrics::MemorySink;
/// use u_makespan::model::InstanceConfig;
/// use rand::SeedableRng;
///
/// let plan = ReplicationPlan::new(
///     InstanceConfig::new(10, 31),
///     Heuristic::SimulatedAnnealing { alpha: 0.8 },
/// )
/// .with_replications(3);
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let mut sink = MemorySink::default();
/// let records = plan.run(&mut rng, &mut sink).unwrap();
/// assert_eq!(records.len(), 3);
/// assert_eq!(sink.acceptance.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ReplicationPlan {
    pub instance: InstanceConfig,
    pub heuristic: Heuristic,
    pub replications: usize,
    /// Forward per-iteration SA records to the sink.
    pub record_trace: bool,
}

impl ReplicationPlan {
    pub fn new(instance: InstanceConfig, heuristic: Heuristic) -> Self {
        Self {
            instance,
            heuristic,
            replications: 10,
            record_trace: false,
        }
    }

    pub fn with_replications(mut self, r: usize) -> Self {
        self.replications = r;
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    /// Validates the plan, including the heuristic's own configuration.
    pub fn validate(&self) -> Result<()> {
        if self.replications == 0 {
            return Err(ScheduleError::config("replications must be positive"));
        }
        match self.heuristic {
            Heuristic::MonotoneLocalReasoning => self.mlr_config().validate(),
            Heuristic::SimulatedAnnealing { alpha } => self.sa_config(alpha).validate(),
        }
    }

    fn mlr_config(&self) -> MlrConfig {
        MlrConfig::new(self.instance)
    }

    fn sa_config(&self, alpha: f64) -> SaConfig {
        SaConfig::new(self.instance, alpha).with_trace(self.record_trace)
    }

    /// Runs every replication in order.
    ///
    /// For SA, one aggregate [`AcceptanceRecord`] is emitted after the last
    /// replication. Any error aborts the remaining replications.
    pub fn run<R: Rng, S: MetricsSink>(
        &self,
        rng: &mut R,
        sink: &mut S,
    ) -> Result<Vec<ReplicationRecord>> {
        self.validate()?;

        let mut records = Vec::with_capacity(self.replications);
        let mut totals = AcceptanceStats::default();

        for replication in 1..=self.replications {
            let record = match self.heuristic {
                Heuristic::MonotoneLocalReasoning => {
                    let result = MlrRunner::run_with_rng(&self.mlr_config(), rng)?;
                    self.record(
                        replication,
                        result.elapsed,
                        result.iterations,
                        result.makespan,
                    )
                }
                Heuristic::SimulatedAnnealing { alpha } => {
                    let result = SaRunner::run_with_rng(&self.sa_config(alpha), rng)?;
                    for it in &result.trace {
                        sink.record_iteration(replication, it);
                    }
                    totals.merge(&result.stats);
                    self.record(
                        replication,
                        result.elapsed,
                        result.iterations,
                        result.makespan,
                    )
                }
            };

            sink.record_replication(&record);
            records.push(record);
        }

        if let Heuristic::SimulatedAnnealing { alpha } = self.heuristic {
            sink.record_acceptance(&AcceptanceRecord {
                tasks: self.instance.tasks,
                machines: self.instance.machines,
                alpha,
                total_proposals: totals.total_proposals,
                worsening_proposals: totals.worsening_proposals,
                accepted_worsenings: totals.accepted_worsenings,
            });
        }

        info!(
            heuristic = self.heuristic.kind().name(),
            machines = self.instance.machines,
            tasks = self.instance.tasks,
            replications = self.replications,
            "replications finished"
        );
        Ok(records)
    }

    fn record(
        &self,
        replication: usize,
        elapsed: Duration,
        iterations: usize,
        makespan: Weight,
    ) -> ReplicationRecord {
        ReplicationRecord {
            heuristic: self.heuristic.kind(),
            tasks: self.instance.tasks,
            machines: self.instance.machines,
            replication,
            elapsed,
            iterations,
            makespan,
            parameter: self.heuristic.parameter(),
        }
    }
}

/// Makespan quality of one (heuristic, n, m, parameter) group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicationSummary {
    pub heuristic: HeuristicKind,
    pub tasks: usize,
    pub machines: usize,
    pub parameter: Option<f64>,
    pub replications: usize,
    pub mean_makespan: f64,
    pub best_makespan: Weight,
    pub worst_makespan: Weight,
    /// Sample standard deviation; 0 for a single replication.
    pub std_dev_makespan: f64,
    pub mean_elapsed: Duration,
    pub mean_iterations: f64,
}

impl ReplicationSummary {
    /// Summarizes records that all belong to the same group.
    ///
    /// Returns `None` for an empty slice or when the records mix groups.
    pub fn from_records(records: &[ReplicationRecord]) -> Option<Self> {
        let first = records.first()?;
        if !records.iter().all(|r| same_group(first, r)) {
            return None;
        }

        let makespans: Vec<f64> = records.iter().map(|r| r.makespan as f64).collect();
        let seconds: Vec<f64> = records.iter().map(|r| r.elapsed.as_secs_f64()).collect();
        let iterations: Vec<f64> = records.iter().map(|r| r.iterations as f64).collect();

        Some(Self {
            heuristic: first.heuristic,
            tasks: first.tasks,
            machines: first.machines,
            parameter: first.parameter,
            replications: records.len(),
            mean_makespan: stats::mean(&makespans).unwrap_or(0.0),
            best_makespan: records.iter().map(|r| r.makespan).min()?,
            worst_makespan: records.iter().map(|r| r.makespan).max()?,
            std_dev_makespan: stats::std_dev(&makespans).unwrap_or(0.0),
            mean_elapsed: Duration::from_secs_f64(stats::mean(&seconds).unwrap_or(0.0)),
            mean_iterations: stats::mean(&iterations).unwrap_or(0.0),
        })
    }

    /// Splits `records` into groups and summarizes each, in order of first
    /// appearance.
    pub fn group(records: &[ReplicationRecord]) -> Vec<Self> {
        let mut groups: Vec<Vec<ReplicationRecord>> = Vec::new();
        for record in records {
            match groups.iter_mut().find(|g| same_group(&g[0], record)) {
                Some(group) => group.push(record.clone()),
                None => groups.push(vec![record.clone()]),
            }
        }
        groups
            .iter()
            .filter_map(|g| Self::from_records(g.as_slice()))
            .collect()
    }
}

fn same_group(a: &ReplicationRecord, b: &ReplicationRecord) -> bool {
    a.heuristic == b.heuristic
        && a.tasks == b.tasks
        && a.machines == b.machines
        && a.parameter == b.parameter
}

/// Relative change from `base` to `other`, in percent; 0 when `base` is 0.
fn diff_percent(base: f64, other: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (other - base) / base * 100.0
    }
}

/// Head-to-head of SA (one alpha) against monotone reasoning on one (n, m).
///
/// Runs are paired by replication index. Ties count as monotone wins.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonSummary {
    pub tasks: usize,
    pub machines: usize,
    pub alpha: f64,
    pub pairs: usize,
    /// Mean of `(sa - mlr) / mlr * 100` over the paired makespans.
    pub mean_makespan_diff_percent: f64,
    /// Same for wall-clock time.
    pub mean_time_diff_percent: f64,
    pub mlr_quality_wins: usize,
    pub sa_quality_wins: usize,
    pub mlr_time_wins: usize,
    pub sa_time_wins: usize,
}

impl ComparisonSummary {
    /// Pairs every SA record with the monotone record of the same
    /// (n, m, replication) and summarizes per (n, m, alpha).
    ///
    /// SA records without a monotone partner are skipped. Groups appear in
    /// order of first appearance.
    pub fn from_records(records: &[ReplicationRecord]) -> Vec<Self> {
        let mlr: HashMap<(usize, usize, usize), &ReplicationRecord> = records
            .iter()
            .filter(|r| r.heuristic == HeuristicKind::MonotoneLocalReasoning)
            .map(|r| ((r.tasks, r.machines, r.replication), r))
            .collect();

        let mut summaries: Vec<(Self, f64, f64)> = Vec::new();
        for sa in records {
            if sa.heuristic != HeuristicKind::SimulatedAnnealing {
                continue;
            }
            let Some(alpha) = sa.parameter else {
                continue;
            };
            let Some(base) = mlr.get(&(sa.tasks, sa.machines, sa.replication)) else {
                continue;
            };

            let existing = summaries.iter().position(|(s, _, _)| {
                s.tasks == sa.tasks && s.machines == sa.machines && s.alpha == alpha
            });
            let index = match existing {
                Some(index) => index,
                None => {
                    summaries.push((Self::empty(sa.tasks, sa.machines, alpha), 0.0, 0.0));
                    summaries.len() - 1
                }
            };
            let (summary, makespan_diffs, time_diffs) = &mut summaries[index];

            let (base_time, sa_time) = (base.elapsed.as_secs_f64(), sa.elapsed.as_secs_f64());
            *makespan_diffs += diff_percent(base.makespan as f64, sa.makespan as f64);
            *time_diffs += diff_percent(base_time, sa_time);
            summary.pairs += 1;
            if base.makespan <= sa.makespan {
                summary.mlr_quality_wins += 1;
            } else {
                summary.sa_quality_wins += 1;
            }
            if base.elapsed <= sa.elapsed {
                summary.mlr_time_wins += 1;
            } else {
                summary.sa_time_wins += 1;
            }
        }

        summaries
            .into_iter()
            .map(|(mut summary, makespan_diffs, time_diffs)| {
                summary.mean_makespan_diff_percent = makespan_diffs / summary.pairs as f64;
                summary.mean_time_diff_percent = time_diffs / summary.pairs as f64;
                summary
            })
            .collect()
    }

    fn empty(tasks: usize, machines: usize, alpha: f64) -> Self {
        Self {
            tasks,
            machines,
            alpha,
            pairs: 0,
            mean_makespan_diff_percent: 0.0,
            mean_time_diff_percent: 0.0,
            mlr_quality_wins: 0,
            sa_quality_wins: 0,
            mlr_time_wins: 0,
            sa_time_wins: 0,
        }
    }
}
