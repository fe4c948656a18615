//! Match result records and the assembler that packages them.

use serde::{Deserialize, Serialize};

use crate::matching::calibration::Calibrated;
use crate::matching::profile::ResumeProfile;

/// Identifies which scorer produced a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Skills,
    Experience,
    Education,
    Semantic,
    Keyword,
}

impl ScorerKind {
    /// Fixed component order used for aggregation and presentation.
    pub const ALL: [ScorerKind; 5] = [
        ScorerKind::Skills,
        ScorerKind::Experience,
        ScorerKind::Education,
        ScorerKind::Semantic,
        ScorerKind::Keyword,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScorerKind::Skills => "Skills Match",
            ScorerKind::Experience => "Experience Match",
            ScorerKind::Education => "Education Match",
            ScorerKind::Semantic => "Semantic Content Similarity",
            ScorerKind::Keyword => "Keyword Relevance",
        }
    }
}

/// How a component value was obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    #[default]
    Measured,
    /// 1.0 because there was nothing to match against.
    Vacuous,
    /// Neutral substitute after a collaborator failure.
    Fallback,
}

/// Explainability data. Never read back by any scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortfall_years: Option<f64>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub scorer: ScorerKind,
    pub value: f64,
    pub basis: ScoreBasis,
    pub evidence: Evidence,
}

impl ComponentScore {
    /// Builds a component, clamping the value into [0, 1].
    pub fn new(scorer: ScorerKind, value: f64, basis: ScoreBasis, evidence: Evidence) -> Self {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        Self {
            scorer,
            value,
            basis,
            evidence,
        }
    }

    pub fn is_vacuous(&self) -> bool {
        self.basis == ScoreBasis::Vacuous
    }
}

/// Special-case markers attached to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFlag {
    MissingEmail,
    PartialRequirements,
    SemanticFallback,
}

impl MatchFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchFlag::MissingEmail => "missing_email",
            MatchFlag::PartialRequirements => "partial_requirements",
            MatchFlag::SemanticFallback => "semantic_fallback",
        }
    }
}

/// Final per-resume record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub resume_id: String,
    pub candidate_name: String,
    pub email: Option<String>,
    pub components: Vec<ComponentScore>,
    pub composite: f64,
    pub score: f64,
    pub flags: Vec<MatchFlag>,
}

impl MatchResult {
    pub fn component(&self, kind: ScorerKind) -> Option<&ComponentScore> {
        self.components.iter().find(|c| c.scorer == kind)
    }

    #[cfg(test)]
    pub fn has_flag(&self, flag: MatchFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Calibrated score as a percentage rounded to two decimals.
    pub fn score_percent(&self) -> f64 {
        to_percent(self.score)
    }
}

pub fn to_percent(value: f64) -> f64 {
    (value * 10_000.0).round() / 100.0
}

/// Packages the pipeline outputs. Pure pass-through: no scoring happens here.
pub fn assemble(
    resume_id: &str,
    resume: &ResumeProfile,
    components: Vec<ComponentScore>,
    composite: f64,
    calibrated: Calibrated,
) -> MatchResult {
    MatchResult {
        resume_id: resume_id.to_string(),
        candidate_name: resume.name.trim().to_string(),
        email: resume
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string),
        components,
        composite,
        score: calibrated.score,
        flags: calibrated.flags,
    }
}
