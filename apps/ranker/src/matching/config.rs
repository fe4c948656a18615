use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::calibration::CalibrationConfig;
use crate::matching::weights::ComponentWeights;

/// Rejected scoring constants. Raised once at engine construction, never per match.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite number")]
    NonFinite { name: &'static str },

    #[error("component weight {name} is negative ({value})")]
    NegativeWeight { name: &'static str, value: f64 },

    #[error("component weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    #[error("calibration stretch factor must be positive to stay monotonic, got {stretch_factor}")]
    NonMonotonicCalibration { stretch_factor: f64 },

    #[error("{name} = {value} is out of range (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Everything the scoring pipeline is parameterized by.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ComponentWeights,
    pub calibration: CalibrationConfig,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        self.calibration.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config_is_valid() {
        assert_eq!(ScoringConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_weight_errors_surface_first() {
        let config = ScoringConfig {
            weights: ComponentWeights {
                skills: 0.9,
                ..ComponentWeights::default()
            },
            calibration: CalibrationConfig {
                stretch_factor: 0.0,
                ..CalibrationConfig::default()
            },
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WeightSum { .. })
        ));
    }

    #[test]
    fn test_error_messages_name_the_constant() {
        let err = ConfigError::OutOfRange {
            name: "semantic_neutral",
            value: 2.0,
            expected: "in [0, 1]",
        };
        assert_eq!(
            err.to_string(),
            "semantic_neutral = 2 is out of range (expected in [0, 1])"
        );
    }
}
