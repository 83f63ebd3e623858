//! Monotone local reasoning configuration.

use crate::error::Result;
use crate::model::InstanceConfig;

/// Configuration for monotone local reasoning.
///
/// # Examples
///
/// ```
/// use u_makespan::mlr::MlrConfig;
/// use u_makespan::model::InstanceConfig;
///
/// let config = MlrConfig::new(InstanceConfig::new(10, 31))
///     .with_trace(true)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MlrConfig {
    /// Instance to generate.
    pub instance: InstanceConfig,

    /// Maximum number of consecutive sideways moves, i.e. moves that hand
    /// the bottleneck load over to the ring neighbor unchanged.
    ///
    /// `None` uses the ring length `m`.
    pub sideways_limit: Option<usize>,

    /// Record the bottleneck load after every step.
    pub record_trace: bool,

    /// Random seed for instance generation.
    pub seed: Option<u64>,
}

impl Default for MlrConfig {
    fn default() -> Self {
        Self::new(InstanceConfig::default())
    }
}

impl MlrConfig {
    pub fn new(instance: InstanceConfig) -> Self {
        Self {
            instance,
            sideways_limit: None,
            record_trace: false,
            seed: None,
        }
    }

    pub fn with_sideways_limit(mut self, limit: usize) -> Self {
        self.sideways_limit = Some(limit);
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Effective sideways limit for a ring of `machines` machines.
    pub fn sideways_limit_for(&self, machines: usize) -> usize {
        self.sideways_limit.unwrap_or(machines)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.instance.validate()
    }
}
