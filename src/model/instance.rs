//! Problem instance parameters and the initial solution.

use super::solution::Solution;
use super::stack::Weight;
use crate::error::{Result, ScheduleError};
use rand::Rng;

/// Size and weight distribution of a random instance.
///
/// # Examples
///
/// ```
/// use u_makespan::model::InstanceConfig;
///
/// let instance = InstanceConfig::new(10, 31)
///     .with_weight_range(1, 100);
/// assert!(instance.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceConfig {
    /// Number of identical machines (`m`).
    pub machines: usize,

    /// Number of tasks (`n`).
    pub tasks: usize,

    /// Smallest task weight, inclusive.
    pub min_weight: Weight,

    /// Largest task weight, inclusive.
    pub max_weight: Weight,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            machines: 10,
            tasks: 100,
            min_weight: 1,
            max_weight: 100,
        }
    }
}

impl InstanceConfig {
    pub fn new(machines: usize, tasks: usize) -> Self {
        Self {
            machines,
            tasks,
            ..Self::default()
        }
    }

    pub fn with_machines(mut self, m: usize) -> Self {
        self.machines = m;
        self
    }

    pub fn with_tasks(mut self, n: usize) -> Self {
        self.tasks = n;
        self
    }

    pub fn with_weight_range(mut self, min: Weight, max: Weight) -> Self {
        self.min_weight = min;
        self.max_weight = max;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.machines == 0 {
            return Err(ScheduleError::config("machines must be positive"));
        }
        if self.tasks == 0 {
            return Err(ScheduleError::config("tasks must be positive"));
        }
        if self.min_weight == 0 {
            return Err(ScheduleError::config("task weights must be positive"));
        }
        if self.min_weight > self.max_weight {
            return Err(ScheduleError::config(format!(
                "empty weight range [{}, {}]",
                self.min_weight, self.max_weight
            )));
        }
        Ok(())
    }

    /// Draws `tasks` weights uniformly from the configured range.
    pub fn sample_weights<R: Rng>(&self, rng: &mut R) -> Vec<Weight> {
        (0..self.tasks)
            .map(|_| rng.random_range(self.min_weight..=self.max_weight))
            .collect()
    }

    /// Builds the degenerate starting solution: every task on machine 0.
    pub fn build_solution<R: Rng>(&self, rng: &mut R) -> Result<Solution> {
        self.validate()?;
        Solution::degenerate(self.machines, &self.sample_weights(rng))
    }
}
