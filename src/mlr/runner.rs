//! Monotone local reasoning execution loop.
//!
//! # Algorithm
//!
//! 1. Put every task on machine 0 and make it the critic
//! 2. At each step, with `target = (critic + 1) mod m`:
//!    a. Peek the critic's top task `w`
//!    b. If `target + w > critic`, stop: the move would create a worse bottleneck
//!    c. Otherwise move the task; if the target is now heavier it becomes the
//!    critic, if both are equal the loads are balanced and the search stops
//! 3. Report the final critic's load
//!
//! A move with `target + w == critic` only hands the bottleneck over to the
//! neighbor. Such sideways moves are capped per streak so that a single task
//! cannot bounce between two machines forever.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, trace, warn};
use u_numflow::random::create_rng;

use super::config::MlrConfig;
use super::types::{MlrOutcome, MlrState, MlrTracePoint};
use crate::error::Result;
use crate::model::{Solution, Weight};

/// Result of a monotone local reasoning run.
#[derive(Debug, Clone)]
pub struct MlrResult {
    /// Final assignment.
    pub solution: Solution,

    /// Load of the final critic machine.
    pub makespan: Weight,

    /// Steps executed.
    pub iterations: usize,

    /// Tasks relocated.
    pub moves: usize,

    /// Wall-clock time spent in the search (instance generation excluded).
    pub elapsed: Duration,

    /// Per-step bottleneck load, if requested.
    pub trace: Vec<MlrTracePoint>,
}

/// Executes monotone local reasoning.
pub struct MlrRunner;

impl MlrRunner {
    /// Generates an instance from `config.seed` and solves it.
    pub fn run(config: &MlrConfig) -> Result<MlrResult> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(config, &mut rng)
    }

    /// Generates an instance from the given random source and solves it.
    pub fn run_with_rng<R: Rng>(config: &MlrConfig, rng: &mut R) -> Result<MlrResult> {
        config.validate()?;
        let mut solution = config.instance.build_solution(rng)?;

        let start = Instant::now();
        let outcome = Self::solve(&mut solution, config)?;
        let elapsed = start.elapsed();

        Ok(MlrResult {
            solution,
            makespan: outcome.makespan,
            iterations: outcome.iterations,
            moves: outcome.moves,
            elapsed,
            trace: outcome.trace,
        })
    }

    /// Runs the search in place on `solution`, starting from machine 0 as critic.
    ///
    /// Deterministic: no randomness is involved once the solution exists.
    #[tracing::instrument(level = "debug", skip_all, fields(machines = solution.machine_count()))]
    pub fn solve(solution: &mut Solution, config: &MlrConfig) -> Result<MlrOutcome> {
        let machines = solution.machine_count();
        let limit = config.sideways_limit_for(machines);
        let tasks = solution.task_count();
        let total = solution.total_weight();

        let mut state = MlrState::Running { critic: 0 };
        let mut sideways = 0usize;
        let mut iterations = 0usize;
        let mut moves = 0usize;
        let mut trace = Vec::new();

        let makespan = loop {
            let critic = match state {
                MlrState::Running { critic } => critic,
                MlrState::Done { makespan } => break makespan,
            };

            let (next, moved) = step(solution, critic, &mut sideways, limit)?;
            iterations += 1;
            if moved {
                moves += 1;
                debug_assert!(solution.check_conservation(tasks, total));
            }

            if config.record_trace {
                let makespan = match next {
                    MlrState::Running { critic } => solution.machine(critic).makespan(),
                    MlrState::Done { makespan } => makespan,
                };
                trace.push(MlrTracePoint {
                    iteration: iterations,
                    makespan,
                });
            }
            state = next;
        };

        debug!(
            makespan,
            iterations,
            moves,
            "monotone local reasoning finished"
        );

        Ok(MlrOutcome {
            makespan,
            iterations,
            moves,
            trace,
        })
    }
}

/// Performs one transition from `Running { critic }`.
///
/// Returns the next state and whether a task was relocated.
fn step(
    solution: &mut Solution,
    critic: usize,
    sideways: &mut usize,
    limit: usize,
) -> Result<(MlrState, bool)> {
    let target = (critic + 1) % solution.machine_count();
    let makespan = solution.machine(critic).makespan();

    // An empty critic is the maximum, so every machine is empty too.
    if solution.machine(critic).is_empty() {
        return Ok((MlrState::Done { makespan }, false));
    }

    let task = solution.machine(critic).peek_task()?;
    let hypothetical = solution.machine(target).makespan() + task;

    if hypothetical > makespan {
        return Ok((MlrState::Done { makespan }, false));
    }

    if hypothetical == makespan {
        if *sideways >= limit {
            warn!(critic, sideways = *sideways, "sideways move limit reached");
            return Ok((MlrState::Done { makespan }, false));
        }
        *sideways += 1;
    } else {
        *sideways = 0;
    }

    solution.transfer(critic, target)?;
    let critic_load = solution.machine(critic).makespan();
    let target_load = solution.machine(target).makespan();
    trace!(critic, target, task, critic_load, target_load, "moved task");

    let next = if target_load > critic_load {
        MlrState::Running { critic: target }
    } else if target_load == critic_load {
        MlrState::Done {
            makespan: critic_load,
        }
    } else {
        MlrState::Running { critic }
    };
    Ok((next, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InstanceConfig, Machine};

    fn loads(s: &Solution) -> Vec<Weight> {
        s.machines().iter().map(Machine::makespan).collect()
    }

    #[test]
    fn test_golden_three_equal_tasks_two_machines() {
        let mut s = Solution::degenerate(2, &[10, 10, 10]).unwrap();
        let config = MlrConfig::default().with_trace(true);
        let out = MlrRunner::solve(&mut s, &config).unwrap();

        assert_eq!(out.makespan, 20);
        assert_eq!(out.moves, 3);
        assert_eq!(out.iterations, 4);
        assert_eq!(loads(&s), vec![20, 10]);
        assert_eq!(
            out.trace.iter().map(|p| p.makespan).collect::<Vec<_>>(),
            vec![20, 20, 20, 20]
        );
        assert!(s.check_conservation(3, 30));
    }

    #[test]
    fn test_golden_balances_first_pair_only() {
        let mut s = Solution::degenerate(3, &[5, 5, 5, 5, 5, 5]).unwrap();
        let out = MlrRunner::solve(&mut s, &MlrConfig::default()).unwrap();

        assert_eq!(out.makespan, 15);
        assert_eq!(out.moves, 3);
        assert_eq!(out.iterations, 3);
        assert_eq!(loads(&s), vec![15, 15, 0]);
    }

    #[test]
    fn test_stops_when_move_would_overshoot() {
        // The 50 moves over and becomes the critic; sending it back would give 60 > 50.
        let mut s = Solution::degenerate(2, &[10, 50]).unwrap();
        let out = MlrRunner::solve(&mut s, &MlrConfig::default()).unwrap();

        assert_eq!(out.makespan, 50);
        assert_eq!(out.moves, 1);
        assert_eq!(out.iterations, 2);
        assert_eq!(loads(&s), vec![10, 50]);
    }

    #[test]
    fn test_single_machine_terminates_immediately() {
        let mut s = Solution::degenerate(1, &[3, 4]).unwrap();
        let out = MlrRunner::solve(&mut s, &MlrConfig::default()).unwrap();
        assert_eq!(out.makespan, 7);
        assert_eq!(out.moves, 0);
        assert_eq!(out.iterations, 1);
    }

    #[test]
    fn test_empty_critic_reports_zero() {
        let mut s = Solution::empty(3, 0).unwrap();
        let out = MlrRunner::solve(&mut s, &MlrConfig::default()).unwrap();
        assert_eq!(out.makespan, 0);
        assert_eq!(out.moves, 0);
    }

    #[test]
    fn test_zero_sideways_limit() {
        let mut s = Solution::degenerate(2, &[10, 10, 10]).unwrap();
        let config = MlrConfig::default().with_sideways_limit(0);
        let out = MlrRunner::solve(&mut s, &config).unwrap();
        assert_eq!(out.makespan, 20);
        assert_eq!(out.moves, 1);
        assert_eq!(out.iterations, 2);
    }

    #[test]
    fn test_never_worse_than_initial() {
        let config = MlrConfig::new(InstanceConfig::new(10, 31)).with_seed(3);
        let mut rng = create_rng(3);
        let initial = config.instance.build_solution(&mut rng).unwrap();
        let initial_makespan = initial.makespan();

        let result = MlrRunner::run(&config).unwrap();
        assert!(result.makespan <= initial_makespan);
        assert!(result
            .solution
            .check_conservation(31, initial.total_weight()));
    }

    #[test]
    fn test_seeded_run_is_deterministic() {
        let config = MlrConfig::new(InstanceConfig::new(20, 89)).with_seed(11);
        let a = MlrRunner::run(&config).unwrap();
        let b = MlrRunner::run(&config).unwrap();
        assert_eq!(a.makespan, b.makespan);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.solution, b.solution);
    }

    #[test]
    fn test_invalid_config_never_runs() {
        let config = MlrConfig::new(InstanceConfig::new(0, 10));
        assert!(MlrRunner::run(&config).unwrap_err().is_configuration());
    }
}
