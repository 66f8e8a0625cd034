//! Plausibility checks for candidate sample arrays.

use serde::{Deserialize, Serialize};

/// Why a candidate array was turned down.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// The array has no samples
    #[error("empty sample array")]
    Empty,

    /// A sample is NaN or infinite
    #[error("non-finite sample at index {index}")]
    NonFinite {
        /// Index of the first offending sample
        index: usize,
    },

    /// Mean absolute magnitude is outside the accepted range
    #[error("mean |intensity| {mean:.3e} outside [{min:.3e}, {max:.3e}]")]
    MeanOutOfRange {
        /// Observed mean absolute magnitude
        mean: f64,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
}

/// Predicate deciding whether a candidate array is real spectrum data.
///
/// On acceptance returns the mean absolute magnitude of the array.
pub trait CandidateValidator: Send + Sync {
    /// Accept or reject `values`.
    fn check(&self, values: &[f64]) -> Result<f64, Rejection>;
}

/// Bounds on the mean count rate of an accepted array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlausibilityConfig {
    /// Smallest accepted mean |intensity| (inclusive)
    pub min_mean: f64,

    /// Largest accepted mean |intensity| (inclusive)
    pub max_mean: f64,
}

impl Default for PlausibilityConfig {
    fn default() -> Self {
        Self {
            min_mean: 100.0,
            max_mean: 1e11,
        }
    }
}

/// Rejects non-finite arrays and arrays with an implausible mean count rate.
#[derive(Debug, Clone, Default)]
pub struct PlausibilityValidator {
    config: PlausibilityConfig,
}

impl PlausibilityValidator {
    /// Create a validator with the given bounds.
    pub fn new(config: PlausibilityConfig) -> Self {
        Self { config }
    }
}

impl CandidateValidator for PlausibilityValidator {
    fn check(&self, values: &[f64]) -> Result<f64, Rejection> {
        if values.is_empty() {
            return Err(Rejection::Empty);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(Rejection::NonFinite { index });
        }

        let mean = values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64;
        let PlausibilityConfig { min_mean, max_mean } = self.config;
        if (min_mean..=max_mean).contains(&mean) {
            Ok(mean)
        } else {
            Err(Rejection::MeanOutOfRange {
                mean,
                min: min_mean,
                max: max_mean,
            })
        }
    }
}
