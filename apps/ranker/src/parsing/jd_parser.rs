//! Job parser: derives a [`JobRequirement`] from a job posting record.
//!
//! Explicit fields on the record always win. Anything missing is derived from
//! the free-text requirements and description, including the important
//! keywords (most frequent content words).

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::{EducationLevel, JobRequirement, WeightedTerm};
use crate::parsing::vocabulary::{detect_education, find_skills};

#[derive(Debug, Error)]
pub enum JobParseError {
    #[error("could not read job file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid job JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Job posting as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub job_requirements: Vec<String>,
    /// Skills separated by `|`, `,` or `;`.
    #[serde(default)]
    pub job_skills: String,
    #[serde(default)]
    pub required_skills: Option<Vec<WeightedTerm>>,
    #[serde(default)]
    pub important_keywords: Option<Vec<WeightedTerm>>,
    #[serde(default)]
    pub min_experience_years: Option<f64>,
    #[serde(default)]
    pub min_education: Option<EducationLevel>,
}

// "5 years", "3+ years", "3-5 yrs", "2 to 4 years"
static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*(?:\+|(?:-|to)\s*\d{1,2})?\s*(?:years?|yrs?)\b").unwrap()
});

static SKILL_SEPARATORS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[|,;]").unwrap());

static KEYWORD_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap());

/// Derived keywords kept per job.
pub const MAX_DERIVED_KEYWORDS: usize = 10;

/// Filler words never promoted to keywords.
const KEYWORD_STOP_WORDS: &[&str] = &[
    "and", "the", "for", "with", "that", "this", "are", "you", "our", "your", "will", "have",
    "has", "from", "who", "can", "all", "into", "its", "not", "but", "also", "any", "such",
    "using", "able", "must", "should", "etc",
];

/// Seniority words used when a requirement gives no number, checked in order.
const SENIORITY_YEARS: &[(&str, f64)] = &[
    ("entry level", 0.0),
    ("junior", 0.0),
    ("mid level", 2.0),
    ("mid-level", 2.0),
    ("intermediate", 2.0),
    ("senior", 5.0),
    ("experienced", 5.0),
];

pub fn load_job(path: &Path) -> Result<JobPosting, JobParseError> {
    let raw = std::fs::read_to_string(path)?;
    parse_job_json(&raw)
}

pub fn parse_job_json(raw: &str) -> Result<JobPosting, JobParseError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn parse_job(posting: &JobPosting) -> JobRequirement {
    let min_experience_years = posting.min_experience_years.unwrap_or_else(|| {
        posting
            .job_requirements
            .iter()
            .filter_map(|requirement| required_years(requirement))
            .fold(0.0, f64::max)
    });

    let min_education = posting.min_education.unwrap_or_else(|| {
        posting
            .job_requirements
            .iter()
            .map(|requirement| detect_education(requirement))
            .max()
            .unwrap_or_default()
    });

    let required_skills = posting
        .required_skills
        .clone()
        .unwrap_or_else(|| derive_skills(posting));

    JobRequirement {
        title: posting.job_title.trim().to_string(),
        required_skills,
        min_experience_years,
        min_education,
        description: job_text(posting),
        important_keywords: posting
            .important_keywords
            .clone()
            .unwrap_or_else(|| derive_keywords(posting)),
    }
}

/// Most frequent content words of the description and requirements, equally
/// weighted. Ties break alphabetically so the set is stable.
pub fn derive_keywords(posting: &JobPosting) -> Vec<WeightedTerm> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let texts = std::iter::once(&posting.description).chain(&posting.job_requirements);
    for text in texts {
        for word in KEYWORD_WORD_RE.find_iter(text) {
            let word = word.as_str().to_lowercase();
            if !KEYWORD_STOP_WORDS.contains(&word.as_str()) {
                *counts.entry(word).or_default() += 1;
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // stable sort keeps the BTreeMap's alphabetical order within equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(MAX_DERIVED_KEYWORDS)
        .map(|(word, _)| WeightedTerm::new(word))
        .collect()
}

/// Years asked for by one requirement line: the first number before "years",
/// otherwise a seniority word.
pub fn required_years(requirement: &str) -> Option<f64> {
    if let Some(years) = YEARS_RE
        .captures(requirement)
        .and_then(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
    {
        return Some(f64::from(years));
    }
    let lower = requirement.to_lowercase();
    SENIORITY_YEARS
        .iter()
        .find(|(word, _)| lower.contains(word))
        .map(|(_, years)| *years)
}

/// `job_skills` tokens first, then vocabulary hits in requirements and
/// description. First occurrence wins.
fn derive_skills(posting: &JobPosting) -> Vec<WeightedTerm> {
    let listed = SKILL_SEPARATORS_RE
        .split(&posting.job_skills)
        .map(|skill| skill.trim().to_lowercase())
        .filter(|skill| !skill.is_empty());

    let found = posting
        .job_requirements
        .iter()
        .chain(std::iter::once(&posting.description))
        .flat_map(|text| find_skills(text));

    let mut skills: Vec<String> = Vec::new();
    for skill in listed.chain(found) {
        if !skills.contains(&skill) {
            skills.push(skill);
        }
    }
    skills.into_iter().map(WeightedTerm::new).collect()
}

/// Title, description and requirements joined into one text for semantic scoring.
fn job_text(posting: &JobPosting) -> String {
    std::iter::once(posting.job_title.as_str())
        .chain(std::iter::once(posting.description.as_str()))
        .chain(posting.job_requirements.iter().map(String::as_str))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
