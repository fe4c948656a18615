//! Profile normalizer: canonicalizes raw profile fields into comparable forms.
//!
//! Never fails. Absent or malformed values collapse to explicit defaults:
//! empty sets, zero years, the lowest education level.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;

use crate::matching::profile::{EducationLevel, JobRequirement, ResumeProfile, WeightedTerm};

/// Synonym groups folded onto a single canonical skill token.
///
/// Only explicit aliases live here. There is no substring matching anywhere in
/// the pipeline, so "java" and "javascript" stay distinct skills.
const SKILL_SYNONYMS: &[(&str, &[&str])] = &[
    ("javascript", &["js", "ecmascript", "es6", "java script"]),
    ("typescript", &["ts", "type script"]),
    ("nodejs", &["node", "node.js", "node js"]),
    ("react", &["reactjs", "react.js", "react js"]),
    ("vue", &["vuejs", "vue.js", "vue js"]),
    ("angular", &["angularjs", "angular.js"]),
    ("python", &["python3", "python 3", "py"]),
    ("golang", &["go", "go lang"]),
    ("csharp", &["c#", "c sharp"]),
    ("cplusplus", &["c++", "cpp", "c plus plus"]),
    ("dotnet", &[".net", "asp.net", "dot net"]),
    ("postgresql", &["postgres", "postgre sql"]),
    ("mongodb", &["mongo", "mongo db"]),
    ("mysql", &["my sql", "mariadb"]),
    ("kubernetes", &["k8s", "kube"]),
    ("aws", &["amazon web services", "amazon aws"]),
    ("gcp", &["google cloud", "google cloud platform"]),
    ("azure", &["microsoft azure", "ms azure"]),
    ("ci/cd", &["cicd", "ci cd", "continuous integration"]),
    ("rest api", &["rest", "restful", "restful api", "rest apis"]),
    ("machine learning", &["ml"]),
    ("artificial intelligence", &["ai"]),
    ("problem-solving", &["problem solving"]),
    ("object-oriented", &["oop", "object oriented"]),
    ("fullstack", &["full stack", "full-stack"]),
];

static ALIAS_TO_CANONICAL: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (canonical, aliases) in SKILL_SYNONYMS {
        map.insert(*canonical, *canonical);
        for alias in *aliases {
            map.insert(*alias, *canonical);
        }
    }
    map
});

/// Normalized resume view. Sets are ordered so downstream sums and evidence
/// lists are reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResume {
    pub skills: BTreeSet<String>,
    pub years_experience: f64,
    pub education: EducationLevel,
    pub text: String,
    pub has_email: bool,
}

/// Normalized job view. Weight maps are keyed by canonical token.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedJob {
    pub skills: BTreeMap<String, f64>,
    pub min_experience_years: f64,
    pub min_education: EducationLevel,
    pub text: String,
    pub keywords: BTreeMap<String, f64>,
}

/// Lower-cases, trims and collapses inner whitespace.
pub fn normalize_token(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes a skill and folds it through the synonym table.
/// Returns `None` for blank input.
pub fn canonical_skill(raw: &str) -> Option<String> {
    let token = normalize_token(raw);
    if token.is_empty() {
        return None;
    }
    Some(
        ALIAS_TO_CANONICAL
            .get(token.as_str())
            .map(|canonical| canonical.to_string())
            .unwrap_or(token),
    )
}

pub fn normalize_resume(resume: &ResumeProfile) -> NormalizedResume {
    NormalizedResume {
        skills: resume
            .skills
            .iter()
            .filter_map(|skill| canonical_skill(skill))
            .collect(),
        years_experience: sanitize_years(resume.years_experience),
        education: resume.education,
        text: resume.text.trim().to_string(),
        has_email: resume.has_email(),
    }
}

pub fn normalize_job(job: &JobRequirement) -> NormalizedJob {
    NormalizedJob {
        skills: fold_weighted(&job.required_skills, canonical_skill),
        min_experience_years: sanitize_years(job.min_experience_years),
        min_education: job.min_education,
        text: job.description.trim().to_string(),
        keywords: fold_weighted(&job.important_keywords, |term| {
            Some(normalize_token(term)).filter(|token| !token.is_empty())
        }),
    }
}

/// Negative, NaN and infinite year counts clamp to zero.
pub fn sanitize_years(years: f64) -> f64 {
    if years.is_finite() {
        years.max(0.0)
    } else {
        0.0
    }
}

/// Negative, NaN and infinite weights clamp to zero.
pub fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() {
        weight.max(0.0)
    } else {
        0.0
    }
}

/// Duplicate terms (after normalization) keep their largest weight.
fn fold_weighted<F>(terms: &[WeightedTerm], normalize: F) -> BTreeMap<String, f64>
where
    F: Fn(&str) -> Option<String>,
{
    let mut folded: BTreeMap<String, f64> = BTreeMap::new();
    for term in terms {
        let Some(token) = normalize(&term.term) else {
            continue;
        };
        let weight = sanitize_weight(term.weight);
        folded
            .entry(token)
            .and_modify(|existing| *existing = existing.max(weight))
            .or_insert(weight);
    }
    folded
}
