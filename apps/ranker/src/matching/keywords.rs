use crate::matching::normalizer::{normalize_token, NormalizedJob, NormalizedResume};
use crate::matching::result::{ComponentScore, Evidence, ScoreBasis, ScorerKind};

/// Weighted share of the job's important keywords found in the resume text.
///
/// Keywords match as whole words, case-insensitively. No keywords means a
/// vacuous match; an empty resume text finds nothing and scores 0.
pub fn score_keywords(resume: &NormalizedResume, job: &NormalizedJob) -> ComponentScore {
    let total_weight: f64 = job.keywords.values().sum();

    if job.keywords.is_empty() || total_weight <= 0.0 {
        return ComponentScore::new(
            ScorerKind::Keyword,
            1.0,
            ScoreBasis::Vacuous,
            Evidence {
                note: "no important keywords defined".to_string(),
                ..Default::default()
            },
        );
    }

    let haystack = normalize_token(&resume.text);
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut matched_weight = 0.0_f64;

    for (keyword, weight) in &job.keywords {
        if contains_whole_word(&haystack, keyword) {
            matched_weight += weight;
            matched.push(keyword.clone());
        } else {
            missing.push(keyword.clone());
        }
    }

    let value = matched_weight / total_weight;
    let note = format!(
        "{} of {} important keywords found",
        matched.len(),
        job.keywords.len()
    );

    ComponentScore::new(
        ScorerKind::Keyword,
        value,
        ScoreBasis::Measured,
        Evidence {
            matched,
            missing,
            shortfall_years: None,
            note,
        },
    )
}

/// Whole-word containment on already-lowercased text.
///
/// A hit must not be glued to a letter, digit or underscore on either side, so
/// "java" does not match inside "javascript" while "c++" still matches in
/// "c++, rust".
pub fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
