//! SA configuration and geometric cooling.

use crate::error::{Result, ScheduleError};
use crate::model::InstanceConfig;

/// Configuration for the Simulated Annealing algorithm.
///
/// Cooling is geometric: `T_{k+1} = alpha * T_k`, one proposal per
/// temperature step. With fixed initial and minimum temperatures the number
/// of iterations depends on `alpha` alone (see
/// [`expected_iterations`](Self::expected_iterations)).
///
/// # Examples
///
/// ```
/// use u_makespan::model::InstanceConfig;
/// use u_makespan::sa::SaConfig;
///
/// let config = SaConfig::new(InstanceConfig::new(10, 31), 0.9)
///     .with_seed(42)
///     .with_trace(true);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.expected_iterations(), 110);
/// ```
#[derive(Debug, Clone)]
pub struct SaConfig {
    /// Instance to generate.
    pub instance: InstanceConfig,

    /// Initial temperature.
    pub initial_temperature: f64,

    /// The run stops once the temperature drops to or below this value.
    pub min_temperature: f64,

    /// Cooling factor in (0, 1). Higher = slower cooling, more iterations.
    pub alpha: f64,

    /// Record one [`IterationRecord`](crate::metrics::IterationRecord) per iteration.
    pub record_trace: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self::new(InstanceConfig::default(), 0.95)
    }
}

impl SaConfig {
    pub fn new(instance: InstanceConfig, alpha: f64) -> Self {
        Self {
            instance,
            initial_temperature: 10_000.0,
            min_temperature: 0.1,
            alpha,
            record_trace: false,
            seed: None,
        }
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
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

    /// Number of iterations a run with this configuration performs.
    ///
    /// Counts cooling steps the same way the runner does, so it agrees with
    /// the closed form `ceil(ln(T_min / T_0) / ln(alpha))` except where
    /// rounding in the logarithms would push that form off by one. Returns 0
    /// for an invalid configuration.
    pub fn expected_iterations(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        let mut temperature = self.initial_temperature;
        let mut steps = 0;
        while temperature > self.min_temperature {
            temperature *= self.alpha;
            steps += 1;
        }
        steps
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.instance.validate()?;
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(ScheduleError::config(
                "initial_temperature must be positive and finite",
            ));
        }
        if !(self.min_temperature > 0.0) {
            return Err(ScheduleError::config("min_temperature must be positive"));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(ScheduleError::config(
                "min_temperature must be less than initial_temperature",
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ScheduleError::config(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}
