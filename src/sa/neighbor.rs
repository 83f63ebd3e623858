//! Load-proportional disturbance used to generate SA neighbors.
//!
//! The critic machine sheds a number of tasks proportional to how far it
//! sits above the fleet average; each shed task lands on a uniformly random
//! other machine.

use rand::Rng;
use tracing::trace;

use crate::error::Result;
use crate::model::{Solution, Weight};

/// Relative imbalance `(critic - mean) / mean`.
///
/// Returns 0 when the mean is 0, i.e. when there is nothing to balance.
pub fn disturbance_level(critic_makespan: Weight, mean: f64) -> f64 {
    if mean <= 0.0 {
        return 0.0;
    }
    (critic_makespan as f64 - mean) / mean
}

/// `floor(level * task_count)` clamped to `[1, task_count]`.
///
/// An empty critic moves nothing.
pub fn tasks_to_move(level: f64, task_count: usize) -> usize {
    if task_count == 0 {
        return 0;
    }
    let scaled = (level * task_count as f64).floor();
    let k = if scaled.is_finite() && scaled > 0.0 {
        scaled as usize
    } else {
        0
    };
    k.clamp(1, task_count)
}

/// Applies the disturbance to `solution` in place.
///
/// Returns the number of tasks moved.
pub fn disturb<R: Rng>(solution: &mut Solution, rng: &mut R) -> Result<usize> {
    let machines = solution.machine_count();
    let (critic, machine) = solution.find_critic();
    let level = disturbance_level(machine.makespan(), solution.mean_makespan());
    let k = tasks_to_move(level, machine.task_count());

    let mut moved = 0;
    for _ in 0..k {
        if solution.machine(critic).is_empty() {
            break;
        }
        let mut target = rng.random_range(0..machines);
        while machines > 1 && target == critic {
            target = rng.random_range(0..machines);
        }
        solution.transfer(critic, target)?;
        moved += 1;
    }

    trace!(critic, level, moved, "disturbance applied");
    Ok(moved)
}
