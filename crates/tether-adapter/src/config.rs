//! Adapter configuration and validation.

use std::error::Error;
use std::fmt;

use crate::time::DEFAULT_TIME_EPSILON;

/// Errors detected during [`AdapterConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `time_epsilon` is NaN, infinite, not positive, or at least 0.5.
    InvalidEpsilon {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEpsilon { value } => {
                write!(f, "time_epsilon must be finite and in (0, 0.5), got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Adapter-level settings, independent of the wrapped model's config.
#[derive(Clone, Debug, PartialEq)]
pub struct AdapterConfig {
    /// Tolerance, in units of the native step, for treating the remainder
    /// of an `update_until` as zero or as one whole step. Default: `1e-9`.
    pub time_epsilon: f64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            time_epsilon: DEFAULT_TIME_EPSILON,
        }
    }
}

impl AdapterConfig {
    /// Validate all settings.
    ///
    /// The epsilon must stay below 0.5 so that "remainder is noise" and
    /// "remainder is a whole step" can never both hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let eps = self.time_epsilon;
        if !eps.is_finite() || eps <= 0.0 || eps >= 0.5 {
            return Err(ConfigError::InvalidEpsilon { value: eps });
        }
        Ok(())
    }
}
