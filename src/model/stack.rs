//! LIFO storage for a machine's task weights.

use crate::error::{Result, ScheduleError};

/// Processing time of one task.
pub type Weight = u64;

/// Growable LIFO sequence of task weights.
///
/// Only the top element is ever inspected or relocated; anything below it
/// stays put until exposed. When full, capacity doubles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStack {
    items: Vec<Weight>,
}

impl TaskStack {
    /// Creates an empty stack sized for `capacity` tasks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Like [`with_capacity`](Self::with_capacity), but reports a failed
    /// reservation instead of aborting.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items })
    }

    /// Pushes a weight on top of the stack.
    pub fn push(&mut self, weight: Weight) {
        if self.items.len() == self.items.capacity() {
            let grow = self.items.capacity().max(1);
            self.items.reserve_exact(grow);
        }
        self.items.push(weight);
    }

    /// Removes and returns the most recently pushed weight.
    pub fn pop(&mut self) -> Result<Weight> {
        self.items.pop().ok_or(ScheduleError::Underflow)
    }

    /// Returns the most recently pushed weight without removing it.
    pub fn peek(&self) -> Result<Weight> {
        self.items.last().copied().ok_or(ScheduleError::Underflow)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Iterates bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = Weight> + '_ {
        self.items.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_order() {
        let mut stack = TaskStack::with_capacity(4);
        stack.push(3);
        stack.push(7);
        stack.push(5);
        assert_eq!(stack.peek().unwrap(), 5);
        assert_eq!(stack.pop().unwrap(), 5);
        assert_eq!(stack.pop().unwrap(), 7);
        assert_eq!(stack.peek().unwrap(), 3);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_underflow() {
        let mut stack = TaskStack::default();
        assert!(matches!(stack.pop(), Err(ScheduleError::Underflow)));
        assert!(matches!(stack.peek(), Err(ScheduleError::Underflow)));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_grows_past_hint() {
        let mut stack = TaskStack::with_capacity(2);
        for w in 1..=9 {
            stack.push(w);
        }
        assert_eq!(stack.len(), 9);
        assert!(stack.capacity() >= 9);
        assert_eq!(stack.iter().collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_capacity_push() {
        let mut stack = TaskStack::with_capacity(0);
        stack.push(42);
        assert_eq!(stack.peek().unwrap(), 42);
    }

    #[test]
    fn test_try_with_capacity_reports_failure() {
        let err = TaskStack::try_with_capacity(usize::MAX).unwrap_err();
        assert!(matches!(err, ScheduleError::Allocation(_)));
    }
}
