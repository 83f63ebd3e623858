//! A complete assignment of tasks to machines.

use super::machine::Machine;
use super::stack::Weight;
use crate::error::{Result, ScheduleError};

/// An ordered collection of `m` machines.
///
/// A machine's identity is its index. `Clone` deep-copies every machine, so
/// a clone and its source share no storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    machines: Vec<Machine>,
}

impl Solution {
    /// Builds `machine_count` empty machines, each sized for `capacity_hint` tasks.
    pub fn empty(machine_count: usize, capacity_hint: usize) -> Result<Self> {
        if machine_count == 0 {
            return Err(ScheduleError::config("machine count must be positive"));
        }
        let mut machines = Vec::new();
        machines.try_reserve_exact(machine_count)?;
        for _ in 0..machine_count {
            machines.push(Machine::try_new(capacity_hint)?);
        }
        Ok(Self { machines })
    }

    /// Places every weight on machine 0, in order, leaving the rest empty.
    ///
    /// This is the starting point of both heuristics. Every weight must be
    /// positive.
    pub fn degenerate(machine_count: usize, weights: &[Weight]) -> Result<Self> {
        if weights.contains(&0) {
            return Err(ScheduleError::config("task weights must be positive"));
        }
        let mut solution = Self::empty(machine_count, weights.len())?;
        let first = &mut solution.machines[0];
        for &w in weights {
            first.push_task(w);
        }
        Ok(solution)
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn machine(&self, index: usize) -> &Machine {
        &self.machines[index]
    }

    #[cfg(test)]
    fn machine_mut(&mut self, index: usize) -> &mut Machine {
        &mut self.machines[index]
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Returns the machine with the largest makespan.
    ///
    /// Ties go to the lowest index.
    pub fn find_critic(&self) -> (usize, &Machine) {
        let mut best = 0;
        for (i, m) in self.machines.iter().enumerate().skip(1) {
            if m.makespan() > self.machines[best].makespan() {
                best = i;
            }
        }
        (best, &self.machines[best])
    }

    /// The objective value: the critic machine's load.
    pub fn makespan(&self) -> Weight {
        self.find_critic().1.makespan()
    }

    pub fn total_weight(&self) -> Weight {
        self.machines.iter().map(Machine::makespan).sum()
    }

    pub fn task_count(&self) -> usize {
        self.machines.iter().map(Machine::task_count).sum()
    }

    pub fn mean_makespan(&self) -> f64 {
        self.total_weight() as f64 / self.machines.len() as f64
    }

    /// Moves the top task of `from` onto `to` and returns its weight.
    pub fn transfer(&mut self, from: usize, to: usize) -> Result<Weight> {
        let weight = self.machines[from].pop_task()?;
        self.machines[to].push_task(weight);
        Ok(weight)
    }

    /// Checks that no task was lost or duplicated and that every machine's
    /// cached load matches its stack.
    pub fn check_conservation(&self, tasks: usize, total_weight: Weight) -> bool {
        self.task_count() == tasks
            && self.total_weight() == total_weight
            && self.machines.iter().all(Machine::is_consistent)
    }
}
