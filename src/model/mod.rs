//! Task-load model: stacks of task weights, machines, and solutions.
//!
//! Every heuristic in this crate works on a [`Solution`]: `m` machines,
//! each holding a LIFO [`TaskStack`] whose running load is tracked
//! incrementally by its [`Machine`].

mod instance;
mod machine;
mod solution;
mod stack;

pub use instance::InstanceConfig;
pub use machine::Machine;
pub use solution::Solution;
pub use stack::{TaskStack, Weight};
