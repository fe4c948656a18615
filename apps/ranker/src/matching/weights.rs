use serde::{Deserialize, Serialize};

use crate::matching::config::ConfigError;
use crate::matching::result::{ComponentScore, ScorerKind};

/// Allowed drift of the weight sum away from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Default component weights.
/// Skills dominate; semantic and keyword signals act as tie-breakers.
pub const DEFAULT_WEIGHTS: ComponentWeights = ComponentWeights {
    skills: 0.35,
    experience: 0.25,
    education: 0.15,
    semantic: 0.15,
    keyword: 0.10,
};

/// Per-component weights of the composite. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub semantic: f64,
    pub keyword: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl ComponentWeights {
    pub fn sum(&self) -> f64 {
        ScorerKind::ALL
            .iter()
            .map(|kind| self.weight_for(*kind))
            .sum()
    }

    pub fn weight_for(&self, kind: ScorerKind) -> f64 {
        match kind {
            ScorerKind::Skills => self.skills,
            ScorerKind::Experience => self.experience,
            ScorerKind::Education => self.education,
            ScorerKind::Semantic => self.semantic,
            ScorerKind::Keyword => self.keyword,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in ScorerKind::ALL {
            let value = self.weight_for(kind);
            let name = weight_name(kind);
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }

    /// Weighted sum of the component values, clamped to [0, 1].
    ///
    /// Summation always runs in [`ScorerKind::ALL`] order regardless of the order
    /// the components were produced in, so equal inputs give bit-identical output.
    /// A missing component contributes 0.
    pub fn combine(&self, components: &[ComponentScore]) -> f64 {
        let composite: f64 = ScorerKind::ALL
            .iter()
            .map(|kind| {
                components
                    .iter()
                    .find(|c| c.scorer == *kind)
                    .map_or(0.0, |c| c.value * self.weight_for(*kind))
            })
            .sum();
        if composite.is_nan() {
            0.0
        } else {
            composite.clamp(0.0, 1.0)
        }
    }
}

fn weight_name(kind: ScorerKind) -> &'static str {
    match kind {
        ScorerKind::Skills => "weights.skills",
        ScorerKind::Experience => "weights.experience",
        ScorerKind::Education => "weights.education",
        ScorerKind::Semantic => "weights.semantic",
        ScorerKind::Keyword => "weights.keyword",
    }
}
