//! A single machine and its running load.

use super::stack::{TaskStack, Weight};
use crate::error::Result;

/// One identical parallel machine.
///
/// `makespan` and `task_count` are maintained on every push/pop rather than
/// recomputed, so they are O(1) to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    tasks: TaskStack,
    task_count: usize,
    makespan: Weight,
}

impl Machine {
    /// Creates an empty machine whose stack is sized for `capacity_hint` tasks.
    pub fn new(capacity_hint: usize) -> Self {
        Self {
            tasks: TaskStack::with_capacity(capacity_hint),
            task_count: 0,
            makespan: 0,
        }
    }

    /// Fallible variant of [`new`](Self::new).
    pub fn try_new(capacity_hint: usize) -> Result<Self> {
        Ok(Self {
            tasks: TaskStack::try_with_capacity(capacity_hint)?,
            task_count: 0,
            makespan: 0,
        })
    }

    pub fn push_task(&mut self, weight: Weight) {
        self.tasks.push(weight);
        self.task_count += 1;
        self.makespan += weight;
    }

    pub fn pop_task(&mut self) -> Result<Weight> {
        let weight = self.tasks.pop()?;
        self.task_count -= 1;
        self.makespan -= weight;
        Ok(weight)
    }

    pub fn peek_task(&self) -> Result<Weight> {
        self.tasks.peek()
    }

    /// Total processing time assigned to this machine.
    pub fn makespan(&self) -> Weight {
        self.makespan
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn is_empty(&self) -> bool {
        self.task_count == 0
    }

    pub fn tasks(&self) -> &TaskStack {
        &self.tasks
    }

    /// Recomputes load and count from the stack and compares them with the
    /// incrementally maintained values.
    pub fn is_consistent(&self) -> bool {
        self.tasks.len() == self.task_count && self.tasks.iter().sum::<Weight>() == self.makespan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;

    #[test]
    fn test_push_pop_updates_load() {
        let mut m = Machine::new(4);
        m.push_task(10);
        m.push_task(25);
        assert_eq!(m.makespan(), 35);
        assert_eq!(m.task_count(), 2);
        assert!(m.is_consistent());

        assert_eq!(m.pop_task().unwrap(), 25);
        assert_eq!(m.makespan(), 10);
        assert_eq!(m.task_count(), 1);
        assert!(m.is_consistent());
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let mut m = Machine::new(1);
        m.push_task(8);
        assert_eq!(m.peek_task().unwrap(), 8);
        assert_eq!(m.makespan(), 8);
        assert_eq!(m.task_count(), 1);
    }

    #[test]
    fn test_empty_machine_underflows_without_corruption() {
        let mut m = Machine::new(0);
        assert!(matches!(m.pop_task(), Err(ScheduleError::Underflow)));
        assert!(matches!(m.peek_task(), Err(ScheduleError::Underflow)));
        assert_eq!(m.makespan(), 0);
        assert_eq!(m.task_count(), 0);
        assert!(m.is_consistent());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Machine::new(2);
        original.push_task(4);
        original.push_task(6);

        let mut copy = original.clone();
        copy.pop_task().unwrap();
        copy.push_task(100);

        assert_eq!(original.makespan(), 10);
        assert_eq!(original.tasks().iter().collect::<Vec<_>>(), vec![4, 6]);
        assert_eq!(copy.makespan(), 104);
        assert!(original.is_consistent() && copy.is_consistent());
    }
}
