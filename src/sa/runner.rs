//! SA execution loop.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, trace};
use u_numflow::random::create_rng;

use super::config::SaConfig;
use super::neighbor::disturb;
use super::types::{AcceptanceStats, SaOutcome};
use crate::error::Result;
use crate::metrics::IterationRecord;
use crate::model::{Solution, Weight};

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The final current solution.
    pub solution: Solution,

    /// Its makespan.
    pub makespan: Weight,

    /// Lowest makespan seen along the trajectory.
    pub best_makespan: Weight,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    pub stats: AcceptanceStats,

    /// Wall-clock time spent annealing (instance generation excluded).
    pub elapsed: Duration,

    /// Per-iteration convergence records, if requested.
    pub trace: Vec<IterationRecord>,
}

/// Metropolis acceptance probability of a move changing the cost by `delta`.
///
/// Exactly 1 for non-worsening moves; `exp(-delta / temperature)` otherwise.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else if temperature > 0.0 {
        (-delta / temperature).exp()
    } else {
        0.0
    }
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Generates an instance from `config.seed` and anneals it.
    pub fn run(config: &SaConfig) -> Result<SaResult> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(config, &mut rng)
    }

    /// Generates an instance from `rng` and anneals it with the same source.
    pub fn run_with_rng<R: Rng>(config: &SaConfig, rng: &mut R) -> Result<SaResult> {
        config.validate()?;
        let initial = config.instance.build_solution(rng)?;

        let start = Instant::now();
        let (solution, outcome) = Self::anneal(initial, config, rng)?;
        let elapsed = start.elapsed();

        Ok(SaResult {
            solution,
            makespan: outcome.makespan,
            best_makespan: outcome.best_makespan,
            iterations: outcome.iterations,
            final_temperature: outcome.final_temperature,
            stats: outcome.stats,
            elapsed,
            trace: outcome.trace,
        })
    }

    /// Anneals `initial`, returning the final current solution.
    ///
    /// Only the cooling parameters and `record_trace` of `config` are used.
    #[tracing::instrument(level = "debug", skip_all, fields(alpha = config.alpha))]
    pub fn anneal<R: Rng>(
        initial: Solution,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<(Solution, SaOutcome)> {
        config.validate()?;

        let tasks = initial.task_count();
        let total = initial.total_weight();

        let mut current = initial;
        let mut makespan = current.makespan();
        let mut best_makespan = makespan;
        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut stats = AcceptanceStats::default();
        let mut history = Vec::new();

        while temperature > config.min_temperature {
            let mut proposal = current.clone();
            disturb(&mut proposal, rng)?;
            debug_assert!(proposal.check_conservation(tasks, total));

            let new_makespan = proposal.makespan();
            let worsening = new_makespan > makespan;
            stats.total_proposals += 1;

            // Metropolis acceptance criterion
            let accept = if !worsening {
                true
            } else {
                stats.worsening_proposals += 1;
                let delta = (new_makespan - makespan) as f64;
                let probability = acceptance_probability(delta, temperature);
                rng.random_range(0.0..1.0) < probability
            };

            if accept {
                current = proposal;
                makespan = new_makespan;
                stats.accepted_moves += 1;
                if worsening {
                    stats.accepted_worsenings += 1;
                }
                best_makespan = best_makespan.min(makespan);
            }

            iterations += 1;
            trace!(iterations, temperature, new_makespan, makespan, accept, "proposal evaluated");

            if config.record_trace {
                history.push(IterationRecord {
                    iteration: iterations,
                    temperature,
                    current_makespan: makespan,
                    best_makespan,
                    accepted: accept,
                    accepted_worsening: accept && worsening,
                });
            }

            // Cool down
            temperature *= config.alpha;
        }

        debug!(
            makespan,
            best_makespan,
            iterations,
            accepted = stats.accepted_moves,
            "simulated annealing finished"
        );

        let outcome = SaOutcome {
            makespan,
            best_makespan,
            iterations,
            final_temperature: temperature,
            stats,
            trace: history,
        };
        Ok((current, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstanceConfig;

    #[test]
    fn test_acceptance_probability_non_worsening_is_one() {
        assert_eq!(acceptance_probability(0.0, 1e-9), 1.0);
        assert_eq!(acceptance_probability(-5.0, 100.0), 1.0);
    }

    #[test]
    fn test_acceptance_probability_decreases_with_temperature() {
        let delta = 5.0;
        let temps = [1e6, 1e3, 10.0, 1.0, 0.1, 1e-3];
        for w in temps.windows(2) {
            assert!(acceptance_probability(delta, w[1]) < acceptance_probability(delta, w[0]));
        }
        assert!(acceptance_probability(delta, 1e9) > 0.999);
        assert!(acceptance_probability(delta, 1e-3) < 1e-100);
        assert_eq!(acceptance_probability(delta, 0.0), 0.0);
    }

    #[test]
    fn test_acceptance_probability_decreases_with_delta() {
        assert!(acceptance_probability(10.0, 50.0) < acceptance_probability(1.0, 50.0));
    }

    #[test]
    fn test_iteration_count_matches_closed_form() {
        let config = SaConfig::new(InstanceConfig::new(10, 31), 0.9).with_seed(42);
        let result = SaRunner::run(&config).unwrap();
        assert_eq!(result.iterations, 110);
        assert_eq!(result.iterations, config.expected_iterations());
        assert!(result.final_temperature <= 0.1);
        assert_eq!(result.stats.total_proposals, 110);
    }

    #[test]
    fn test_iteration_count_exact_power_alpha() {
        let config = SaConfig::new(InstanceConfig::new(4, 12), 0.1).with_seed(42);
        let result = SaRunner::run(&config).unwrap();
        assert_eq!(result.iterations, 5);
        assert_eq!(result.iterations, config.expected_iterations());
    }

    #[test]
    fn test_rejected_proposal_keeps_current() {
        // Low temperatures make worsening proposals almost always rejected.
        let config = SaConfig::new(InstanceConfig::new(10, 100), 0.9)
            .with_initial_temperature(1.0)
            .with_min_temperature(1e-3)
            .with_trace(true);
        let initial = config.instance.build_solution(&mut create_rng(17)).unwrap();
        let start = initial.makespan();
        let (_, outcome) = SaRunner::anneal(initial, &config, &mut create_rng(17)).unwrap();

        let rejected = outcome.trace.iter().filter(|r| !r.accepted).count();
        assert!(rejected > 0);

        let mut previous = start;
        for record in &outcome.trace {
            if !record.accepted {
                assert_eq!(
                    record.current_makespan, previous,
                    "rejected proposal changed the current makespan at iteration {}",
                    record.iteration
                );
                assert!(!record.accepted_worsening);
            }
            previous = record.current_makespan;
        }
        assert_eq!(outcome.makespan, previous);
    }

    #[test]
    fn test_rejected_proposal_keeps_solution() {
        // One iteration at a vanishing temperature.
        let config = SaConfig::default()
            .with_initial_temperature(1e-9)
            .with_min_temperature(1e-10)
            .with_alpha(0.05)
            .with_trace(true);
        // Loads [9, 8, 8]: shedding the 9 always worsens the makespan.
        let mut initial = Solution::degenerate(3, &[9, 8, 8]).unwrap();
        initial.transfer(0, 1).unwrap();
        initial.transfer(0, 2).unwrap();
        assert_eq!(initial.makespan(), 9);

        for seed in 0..20 {
            let (after, outcome) =
                SaRunner::anneal(initial.clone(), &config, &mut create_rng(seed)).unwrap();
            assert_eq!(outcome.iterations, 1);
            assert_eq!(outcome.stats.worsening_proposals, 1);
            assert_eq!(outcome.stats.accepted_moves, 0);
            assert_eq!(after, initial);
            assert_eq!(outcome.makespan, 9);

            let record = outcome.trace[0];
            assert!(!record.accepted);
            assert!(!record.accepted_worsening);
            assert_eq!(record.current_makespan, 9);
        }
    }

    #[test]
    fn test_first_proposal_two_machines_is_accepted() {
        // One iteration: 1.0 > 0.5, then 0.4 <= 0.5.
        let config = SaConfig::default()
            .with_initial_temperature(1.0)
            .with_min_temperature(0.5)
            .with_alpha(0.4)
            .with_trace(true);
        let initial = Solution::degenerate(2, &[6, 2, 9]).unwrap();
        let (solution, outcome) = SaRunner::anneal(initial, &config, &mut create_rng(5)).unwrap();

        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.makespan, 17);
        assert!(solution.machine(0).is_empty());
        assert_eq!(solution.machine(1).makespan(), 17);
        assert_eq!(outcome.stats.accepted_moves, 1);
        assert_eq!(outcome.stats.worsening_proposals, 0);

        let record = outcome.trace[0];
        assert!(record.accepted);
        assert!(!record.accepted_worsening);
        assert!((record.temperature - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_result_conserves_tasks() {
        let config = SaConfig::new(InstanceConfig::new(10, 100), 0.85).with_seed(7);
        let mut rng = create_rng(7);
        let initial = config.instance.build_solution(&mut rng).unwrap();

        let result = SaRunner::run(&config).unwrap();
        assert!(result
            .solution
            .check_conservation(100, initial.total_weight()));
        assert_eq!(result.makespan, result.solution.makespan());
        assert!(result.best_makespan <= result.makespan);
        assert!(result.best_makespan < initial.makespan());
    }

    #[test]
    fn test_stats_are_consistent() {
        let config = SaConfig::new(InstanceConfig::new(20, 89), 0.95)
            .with_seed(3)
            .with_trace(true);
        let result = SaRunner::run(&config).unwrap();
        let s = result.stats;

        assert!(s.accepted_worsenings <= s.worsening_proposals);
        assert!(s.worsening_proposals <= s.total_proposals);
        assert!(s.accepted_moves <= s.total_proposals);
        assert_eq!(result.trace.len(), result.iterations);
        assert_eq!(
            result.trace.iter().filter(|r| r.accepted_worsening).count(),
            s.accepted_worsenings
        );
        for w in result.trace.windows(2) {
            assert!(w[1].best_makespan <= w[0].best_makespan);
            assert!(w[1].temperature < w[0].temperature);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = SaConfig::new(InstanceConfig::new(10, 100), 0.9)
            .with_seed(2024)
            .with_trace(true);
        let a = SaRunner::run(&config).unwrap();
        let b = SaRunner::run(&config).unwrap();

        assert_eq!(a.trace, b.trace);
        assert_eq!(a.solution, b.solution);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_single_machine() {
        let config = SaConfig::new(InstanceConfig::new(1, 5), 0.5).with_seed(1);
        let result = SaRunner::run(&config).unwrap();
        assert_eq!(result.makespan, result.solution.total_weight());
        assert_eq!(result.stats.worsening_proposals, 0);
    }

    #[test]
    fn test_invalid_alpha_never_runs() {
        let config = SaConfig::new(InstanceConfig::new(3, 3), 1.0);
        assert!(SaRunner::run(&config).unwrap_err().is_configuration());
    }
}
