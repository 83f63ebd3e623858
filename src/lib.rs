//! Makespan minimization on identical parallel machines.
//!
//! Assigns `n` indivisible tasks with positive integer processing times to
//! `m` identical machines so that the most loaded machine (the makespan,
//! `Cmax`) is as small as possible. Two heuristics are provided:
//!
//! - **Monotone Local Reasoning (MLR)**: a deterministic greedy rebalancer
//!   that walks the bottleneck around a fixed ring of machines.
//! - **Simulated Annealing (SA)**: a Metropolis search whose neighbors come
//!   from a load-proportional randomized disturbance of the bottleneck.
//!
//! Both start from the degenerate assignment with every task on machine 0.
//! Randomness is always injected: every entry point takes a seed or a
//! caller-owned [`rand::Rng`], so identical seeds reproduce identical runs.
//!
//! # Architecture
//!
//! [`model`] holds the task-load model shared by both heuristics. [`mlr`]
//! and [`sa`] each follow the config / runner / types split. [`experiment`]
//! runs replications, feeds [`metrics`] records to a caller-provided sink
//! and summarizes finished records; writing those records anywhere is the
//! caller's job.

pub mod error;
pub mod experiment;
pub mod metrics;
pub mod mlr;
pub mod model;
pub mod sa;

pub use error::{Result, ScheduleError};
