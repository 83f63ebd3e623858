//! Monotone Local Reasoning (MLR).
//!
//! A deterministic greedy rebalancer. Starting from the degenerate
//! assignment (every task on machine 0), it repeatedly relocates the top
//! task of the current bottleneck ("critic") machine onto its ring
//! neighbor `(i + 1) mod m`, following the bottleneck as it shifts, until
//! no move can lower the critic's load.
//!
//! Each relocation strictly lowers the load of the machine it leaves,
//! which is where the "monotone" in the name comes from.

mod config;
mod runner;
mod types;

pub use config::MlrConfig;
pub use runner::{MlrResult, MlrRunner};
pub use types::{MlrOutcome, MlrState, MlrTracePoint};
