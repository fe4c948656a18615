use crate::matching::normalizer::{NormalizedJob, NormalizedResume};
use crate::matching::result::{ComponentScore, Evidence, ScoreBasis, ScorerKind};

/// Weighted share of required skills present in the resume.
///
/// Matching is exact on canonical tokens. A job with no required skills, or whose
/// weights are all zero, is a vacuous match.
pub fn score_skills(resume: &NormalizedResume, job: &NormalizedJob) -> ComponentScore {
    let total_weight: f64 = job.skills.values().sum();

    if job.skills.is_empty() || total_weight <= 0.0 {
        return ComponentScore::new(
            ScorerKind::Skills,
            1.0,
            ScoreBasis::Vacuous,
            Evidence {
                note: "no required skills to match against".to_string(),
                ..Default::default()
            },
        );
    }

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut matched_weight = 0.0_f64;

    for (skill, weight) in &job.skills {
        if resume.skills.contains(skill) {
            matched_weight += weight;
            matched.push(skill.clone());
        } else {
            missing.push(skill.clone());
        }
    }

    let value = matched_weight / total_weight;
    let note = format!(
        "{} of {} required skills matched ({:.0}% of weight)",
        matched.len(),
        job.skills.len(),
        value * 100.0
    );

    ComponentScore::new(
        ScorerKind::Skills,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalizer::{normalize_job, normalize_resume};
    use crate::matching::profile::{JobRequirement, ResumeProfile, WeightedTerm};

    fn resume_with(skills: &[&str]) -> NormalizedResume {
        normalize_resume(&ResumeProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    fn job_with(skills: Vec<WeightedTerm>) -> NormalizedJob {
        normalize_job(&JobRequirement {
            required_skills: skills,
            ..Default::default()
        })
    }

    #[test]
    fn test_equal_weights_give_fractional_score() {
        let resume = resume_with(&["python", "sql"]);
        let job = job_with(vec![
            WeightedTerm::new("python"),
            WeightedTerm::new("sql"),
            WeightedTerm::new("aws"),
        ]);

        let score = score_skills(&resume, &job);

        assert!((score.value - 2.0 / 3.0).abs() < 1e-12, "got {}", score.value);
        assert_eq!(score.evidence.matched, vec!["python", "sql"]);
        assert_eq!(score.evidence.missing, vec!["aws"]);
        assert_eq!(score.basis, ScoreBasis::Measured);
    }

    #[test]
    fn test_weights_shift_the_score() {
        let resume = resume_with(&["aws"]);
        let job = job_with(vec![
            WeightedTerm::weighted("python", 1.0),
            WeightedTerm::weighted("aws", 3.0),
        ]);

        let score = score_skills(&resume, &job);
        assert!((score.value - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_requirements_are_vacuous() {
        let score = score_skills(&resume_with(&[]), &job_with(vec![]));
        assert_eq!(score.value, 1.0);
        assert!(score.is_vacuous());
    }

    #[test]
    fn test_all_zero_weights_are_vacuous() {
        let job = job_with(vec![WeightedTerm::weighted("rust", 0.0)]);
        let score = score_skills(&resume_with(&["go"]), &job);
        assert_eq!(score.value, 1.0);
        assert!(score.is_vacuous());
    }

    #[test]
    fn test_no_substring_matching() {
        let resume = resume_with(&["javascript"]);
        let job = job_with(vec![WeightedTerm::new("java")]);

        let score = score_skills(&resume, &job);
        assert_eq!(score.value, 0.0);
        assert_eq!(score.evidence.missing, vec!["java"]);
    }

    #[test]
    fn test_synonyms_match_through_normalization() {
        let resume = resume_with(&["JS", "k8s"]);
        let job = job_with(vec![
            WeightedTerm::new("JavaScript"),
            WeightedTerm::new("Kubernetes"),
        ]);

        let score = score_skills(&resume, &job);
        assert_eq!(score.value, 1.0);
    }

    #[test]
    fn test_resume_without_skills_scores_zero() {
        let job = job_with(vec![WeightedTerm::new("rust")]);
        let score = score_skills(&resume_with(&[]), &job);
        assert_eq!(score.value, 0.0);
        assert!(!score.is_vacuous());
    }
}
