//! Input profiles consumed by the matcher.
//!
//! Both profiles are produced by collaborators (the resume and job parsers, or an
//! API caller) and are only ever read by the scoring pipeline.

use serde::{Deserialize, Serialize};

/// Highest completed education level, on a fixed six-step ordinal scale.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", from = "EducationRepr")]
pub enum EducationLevel {
    #[default]
    None,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 6] = [
        EducationLevel::None,
        EducationLevel::HighSchool,
        EducationLevel::Associate,
        EducationLevel::Bachelor,
        EducationLevel::Master,
        EducationLevel::Doctorate,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Out-of-range ordinals clamp to the nearest level.
    pub fn from_ordinal(value: i64) -> Self {
        let index = value.clamp(0, (Self::ALL.len() - 1) as i64) as usize;
        Self::ALL[index]
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase().replace(['-', ' ', '\''], "_");
        match normalized.as_str() {
            "" | "none" | "unspecified" => Some(Self::None),
            "high_school" | "highschool" | "secondary" => Some(Self::HighSchool),
            "associate" | "associates" | "associate_s" => Some(Self::Associate),
            "bachelor" | "bachelors" | "bachelor_s" | "undergraduate" => Some(Self::Bachelor),
            "master" | "masters" | "master_s" | "graduate" => Some(Self::Master),
            "doctorate" | "phd" | "ph.d" | "ph.d." | "doctoral" => Some(Self::Doctorate),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::None => "None",
            EducationLevel::HighSchool => "High School",
            EducationLevel::Associate => "Associate",
            EducationLevel::Bachelor => "Bachelor",
            EducationLevel::Master => "Master",
            EducationLevel::Doctorate => "Doctorate",
        }
    }
}

/// Wire form accepted for education levels: a name or a raw ordinal.
#[derive(Deserialize)]
#[serde(untagged)]
enum EducationRepr {
    Ordinal(i64),
    Name(String),
}

impl From<EducationRepr> for EducationLevel {
    fn from(value: EducationRepr) -> Self {
        match value {
            EducationRepr::Ordinal(ordinal) => EducationLevel::from_ordinal(ordinal),
            EducationRepr::Name(name) => EducationLevel::parse(&name).unwrap_or_default(),
        }
    }
}

/// A skill or keyword with its relative importance. Defaults to weight 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WeightedTermRepr")]
pub struct WeightedTerm {
    pub term: String,
    pub weight: f64,
}

impl WeightedTerm {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            weight: Self::DEFAULT_WEIGHT,
        }
    }

    pub fn weighted(term: impl Into<String>, weight: f64) -> Self {
        Self {
            term: term.into(),
            weight,
        }
    }
}

/// Callers may send either `"python"` or `{"term": "python", "weight": 2.0}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WeightedTermRepr {
    Plain(String),
    Weighted {
        term: String,
        #[serde(default = "default_weight")]
        weight: f64,
    },
}

fn default_weight() -> f64 {
    WeightedTerm::DEFAULT_WEIGHT
}

impl From<WeightedTermRepr> for WeightedTerm {
    fn from(value: WeightedTermRepr) -> Self {
        match value {
            WeightedTermRepr::Plain(term) => WeightedTerm::new(term),
            WeightedTermRepr::Weighted { term, weight } => WeightedTerm::weighted(term, weight),
        }
    }
}

/// Structured resume as produced by the resume parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub years_experience: f64,
    #[serde(default)]
    pub education: EducationLevel,
    /// Full resume text, used for semantic and keyword scoring.
    #[serde(default)]
    pub text: String,
}

impl ResumeProfile {
    /// True when the resume carries a non-blank email address.
    pub fn has_email(&self) -> bool {
        self.email
            .as_deref()
            .map(|email| !email.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Structured job requirements as produced by the job parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<WeightedTerm>,
    #[serde(default)]
    pub min_experience_years: f64,
    #[serde(default)]
    pub min_education: EducationLevel,
    /// Job description text, used for semantic scoring.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub important_keywords: Vec<WeightedTerm>,
}
