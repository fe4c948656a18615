//! Calibration layer: maps the raw composite onto the presentation range and
//! attaches special-case flags.
//!
//! All tunables live in [`CalibrationConfig`]. It is built once at start-up and
//! shared read-only; nothing here is re-fit at runtime.

use serde::{Deserialize, Serialize};

use crate::matching::config::ConfigError;
use crate::matching::normalizer::NormalizedResume;
use crate::matching::result::{ComponentScore, MatchFlag, ScoreBasis};

/// Process-wide scoring constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Affine stretch: `calibrated = clamp(base_offset + raw * stretch_factor, 0, 1)`.
    pub base_offset: f64,
    pub stretch_factor: f64,
    /// Added to the required years in the experience shortfall ramp.
    pub experience_leniency_years: f64,
    /// Score lost per education level below the requirement.
    pub education_level_penalty: f64,
    /// Exponent (< 1) applied to rescaled semantic similarity; lifts mid-range values.
    pub semantic_stretch_exponent: f64,
    /// Semantic sub-score used when the similarity model cannot answer.
    pub semantic_neutral: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            // raw 0.75 -> 0.7975, raw 0.80 -> 0.86, raw <= 0.112 -> 0
            base_offset: -0.14,
            stretch_factor: 1.25,
            // 4 of 5 required years -> 1 - 1/7 = 0.857
            experience_leniency_years: 2.0,
            // one level short -> 0.8
            education_level_penalty: 0.2,
            // 0.5 -> 0.65, 0.8 -> 0.871
            semantic_stretch_exponent: 0.62,
            semantic_neutral: 0.5,
        }
    }
}

impl CalibrationConfig {
    /// Rejects constants that would break monotonicity or the [0, 1] range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("base_offset", self.base_offset),
            ("stretch_factor", self.stretch_factor),
            ("experience_leniency_years", self.experience_leniency_years),
            ("education_level_penalty", self.education_level_penalty),
            ("semantic_stretch_exponent", self.semantic_stretch_exponent),
            ("semantic_neutral", self.semantic_neutral),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
        }

        if self.stretch_factor <= 0.0 {
            return Err(ConfigError::NonMonotonicCalibration {
                stretch_factor: self.stretch_factor,
            });
        }
        if self.experience_leniency_years <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "experience_leniency_years",
                value: self.experience_leniency_years,
                expected: "> 0",
            });
        }
        if self.education_level_penalty <= 0.0 || self.education_level_penalty >= 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "education_level_penalty",
                value: self.education_level_penalty,
                expected: "in (0, 1)",
            });
        }
        if self.semantic_stretch_exponent <= 0.0 || self.semantic_stretch_exponent > 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "semantic_stretch_exponent",
                value: self.semantic_stretch_exponent,
                expected: "in (0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.semantic_neutral) {
            return Err(ConfigError::OutOfRange {
                name: "semantic_neutral",
                value: self.semantic_neutral,
                expected: "in [0, 1]",
            });
        }
        Ok(())
    }

    /// Monotonic affine-plus-clamp remap of the raw composite.
    pub fn stretch(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return 0.0;
        }
        (self.base_offset + raw * self.stretch_factor).clamp(0.0, 1.0)
    }
}

/// Output of the calibration layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibrated {
    pub score: f64,
    pub flags: Vec<MatchFlag>,
}

/// Applies the stretch, then the flag overrides. Flags never change the score.
pub fn calibrate(
    config: &CalibrationConfig,
    composite: f64,
    resume: &NormalizedResume,
    components: &[ComponentScore],
) -> Calibrated {
    let score = config.stretch(composite);
    let mut flags = Vec::new();

    if !resume.has_email {
        flags.push(MatchFlag::MissingEmail);
    }
    if components.iter().any(ComponentScore::is_vacuous) {
        flags.push(MatchFlag::PartialRequirements);
    }
    if components.iter().any(|c| c.basis == ScoreBasis::Fallback) {
        flags.push(MatchFlag::SemanticFallback);
    }

    Calibrated { score, flags }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalizer::normalize_resume;
    use crate::matching::profile::ResumeProfile;
    use crate::matching::result::{Evidence, ScorerKind};

    fn resume(email: Option<&str>) -> NormalizedResume {
        normalize_resume(&ResumeProfile {
            email: email.map(str::to_string),
            ..Default::default()
        })
    }

    fn component(kind: ScorerKind, basis: ScoreBasis) -> ComponentScore {
        ComponentScore::new(kind, 1.0, basis, Evidence::default())
    }

    #[test]
    fn test_default_config_is_valid() {
        CalibrationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_typical_good_match_lands_in_presentation_band() {
        let config = CalibrationConfig::default();
        let low = config.stretch(0.75);
        let high = config.stretch(0.79);
        assert!((0.78..=0.85).contains(&low), "0.75 -> {low}");
        assert!((0.78..=0.85).contains(&high), "0.79 -> {high}");
    }

    #[test]
    fn test_poor_matches_trend_to_zero() {
        let config = CalibrationConfig::default();
        assert_eq!(config.stretch(0.0), 0.0);
        assert_eq!(config.stretch(0.1), 0.0);
        assert!(config.stretch(0.3) < 0.25);
    }

    #[test]
    fn test_stretch_is_monotonic_and_bounded() {
        let config = CalibrationConfig::default();
        let mut previous = config.stretch(0.0);
        for step in 1..=1000 {
            let raw = step as f64 / 1000.0;
            let current = config.stretch(raw);
            assert!(current >= previous, "not monotonic at {raw}");
            assert!((0.0..=1.0).contains(&current));
            previous = current;
        }
    }

    #[test]
    fn test_negative_stretch_is_rejected() {
        let config = CalibrationConfig {
            stretch_factor: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonMonotonicCalibration { .. })
        ));
    }

    #[test]
    fn test_non_finite_constant_is_rejected() {
        let config = CalibrationConfig {
            base_offset: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite {
                name: "base_offset"
            })
        ));
    }

    #[test]
    fn test_missing_email_flag_does_not_change_score() {
        let config = CalibrationConfig::default();
        let components = vec![component(ScorerKind::Skills, ScoreBasis::Measured)];

        let with_email = calibrate(&config, 0.8, &resume(Some("a@b.io")), &components);
        let without_email = calibrate(&config, 0.8, &resume(None), &components);

        assert_eq!(with_email.score, without_email.score);
        assert!(with_email.flags.is_empty());
        assert_eq!(without_email.flags, vec![MatchFlag::MissingEmail]);
    }

    #[test]
    fn test_vacuous_component_flags_partial_requirements() {
        let config = CalibrationConfig::default();
        let components = vec![
            component(ScorerKind::Skills, ScoreBasis::Measured),
            component(ScorerKind::Keyword, ScoreBasis::Vacuous),
        ];

        let calibrated = calibrate(&config, 0.8, &resume(Some("a@b.io")), &components);
        assert_eq!(calibrated.flags, vec![MatchFlag::PartialRequirements]);
    }

    #[test]
    fn test_fallback_component_flags_semantic_fallback() {
        let config = CalibrationConfig::default();
        let components = vec![component(ScorerKind::Semantic, ScoreBasis::Fallback)];

        let calibrated = calibrate(&config, 0.8, &resume(None), &components);
        assert_eq!(
            calibrated.flags,
            vec![MatchFlag::MissingEmail, MatchFlag::SemanticFallback]
        );
    }
}
