//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic. Each iteration clones the
//! current assignment, disturbs the clone by moving tasks off its critic
//! machine in proportion to the critic's imbalance, and accepts the clone
//! by the Metropolis criterion. The temperature cools geometrically after
//! every iteration until it reaches the minimum.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod neighbor;
mod runner;
mod types;

pub use config::SaConfig;
pub use neighbor::{disturb, disturbance_level, tasks_to_move};
pub use runner::{acceptance_probability, SaResult, SaRunner};
pub use types::{AcceptanceStats, SaOutcome};
