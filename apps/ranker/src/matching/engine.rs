//! Match engine: runs one resume against one job through the full pipeline
//! (normalize, score, aggregate, calibrate, assemble) and fans batches out
//! under a concurrency limit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::embedding::SimilarityModel;
use crate::matching::calibration::calibrate;
use crate::matching::config::{ConfigError, ScoringConfig};
use crate::matching::education::score_education;
use crate::matching::experience::score_experience;
use crate::matching::keywords::score_keywords;
use crate::matching::normalizer::{normalize_job, normalize_resume};
use crate::matching::profile::{JobRequirement, ResumeProfile};
use crate::matching::result::{assemble, MatchResult};
use crate::matching::semantic::score_semantic;
use crate::matching::skills::score_skills;

pub const DEFAULT_CONCURRENCY: usize = 8;

/// One resume handed to a batch. `Err` carries the reason the resume could
/// not be read; it becomes a failed entry without scoring.
#[derive(Debug, Clone)]
pub struct BatchSubmission {
    pub resume_id: String,
    pub resume: Result<ResumeProfile, String>,
}

/// Per-resume outcome of a batch, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchEntry {
    Scored(MatchResult),
    Failed { resume_id: String, error: String },
}

impl BatchEntry {
    #[cfg(test)]
    pub fn resume_id(&self) -> &str {
        match self {
            BatchEntry::Scored(result) => &result.resume_id,
            BatchEntry::Failed { resume_id, .. } => resume_id,
        }
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match self {
            BatchEntry::Scored(result) => Some(result),
            BatchEntry::Failed { .. } => None,
        }
    }
}

pub struct MatchEngine {
    config: ScoringConfig,
    model: Arc<dyn SimilarityModel>,
    concurrency: usize,
}

impl MatchEngine {
    /// Validates the scoring constants once. An invalid configuration is fatal
    /// at start-up and is never re-checked per match.
    pub fn new(
        config: ScoringConfig,
        model: Arc<dyn SimilarityModel>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            model,
            concurrency: DEFAULT_CONCURRENCY,
        })
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn backend(&self) -> &'static str {
        self.model.backend()
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scores one resume against one job. Never fails: bad input is clamped and
    /// a failing similarity model degrades to the neutral semantic score.
    pub async fn score(
        &self,
        resume_id: &str,
        resume: &ResumeProfile,
        job: &JobRequirement,
    ) -> MatchResult {
        let normalized_resume = normalize_resume(resume);
        let normalized_job = normalize_job(job);
        let calibration = &self.config.calibration;

        let semantic = score_semantic(
            self.model.as_ref(),
            &normalized_resume.text,
            &normalized_job.text,
            calibration,
        )
        .await;

        let components = vec![
            score_skills(&normalized_resume, &normalized_job),
            score_experience(&normalized_resume, &normalized_job, calibration),
            score_education(&normalized_resume, &normalized_job, calibration),
            semantic,
            score_keywords(&normalized_resume, &normalized_job),
        ];

        for component in &components {
            debug!(
                resume_id,
                scorer = ?component.scorer,
                value = component.value,
                basis = ?component.basis,
                "{}",
                component.evidence.note
            );
        }

        let composite = self.config.weights.combine(&components);
        let calibrated = calibrate(calibration, composite, &normalized_resume, &components);
        let result = assemble(resume_id, resume, components, composite, calibrated);

        info!(
            resume_id,
            composite = result.composite,
            score = result.score,
            flags = ?result.flags,
            "Scored resume"
        );
        result
    }

    /// Scores every submission against one job. At most `concurrency` matches
    /// run at once; entries come back in submission order and one failure never
    /// aborts the rest.
    pub async fn score_batch(
        self: &Arc<Self>,
        job: Arc<JobRequirement>,
        submissions: Vec<BatchSubmission>,
    ) -> Vec<BatchEntry> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(submissions.len());

        for submission in submissions {
            let resume_id = submission.resume_id.clone();
            let engine = Arc::clone(self);
            let job = Arc::clone(&job);
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                match submission.resume {
                    Ok(resume) => {
                        let result = engine.score(&submission.resume_id, &resume, &job).await;
                        BatchEntry::Scored(result)
                    }
                    Err(error) => {
                        warn!(
                            resume_id = %submission.resume_id,
                            "Skipping unreadable resume: {error}"
                        );
                        BatchEntry::Failed {
                            resume_id: submission.resume_id,
                            error,
                        }
                    }
                }
            });
            handles.push((resume_id, handle));
        }

        let mut entries = Vec::with_capacity(handles.len());
        for (resume_id, handle) in handles {
            let entry = match handle.await {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(resume_id = %resume_id, "Scoring task failed: {e}");
                    BatchEntry::Failed {
                        resume_id,
                        error: format!("scoring task failed: {e}"),
                    }
                }
            };
            entries.push(entry);
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingError, LexicalSimilarity};
    use crate::matching::calibration::CalibrationConfig;
    use crate::matching::profile::{EducationLevel, WeightedTerm};
    use crate::matching::result::{MatchFlag, ScoreBasis, ScorerKind};
    use crate::matching::weights::ComponentWeights;
    use async_trait::async_trait;

    /// Always answers with the same similarity.
    struct Fixed(f64);

    #[async_trait]
    impl SimilarityModel for Fixed {
        async fn similarity(&self, _: &str, _: &str) -> Result<f64, EmbeddingError> {
            Ok(self.0)
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    struct Down;

    #[async_trait]
    impl SimilarityModel for Down {
        async fn similarity(&self, _: &str, _: &str) -> Result<f64, EmbeddingError> {
            Err(EmbeddingError::Api {
                status: 503,
                message: "down".to_string(),
            })
        }

        fn backend(&self) -> &'static str {
            "down"
        }
    }

    fn engine(model: impl SimilarityModel + 'static) -> MatchEngine {
        MatchEngine::new(ScoringConfig::default(), Arc::new(model)).unwrap()
    }

    fn candidate(email: Option<&str>) -> ResumeProfile {
        ResumeProfile {
            name: "Avery Quinn".to_string(),
            email: email.map(str::to_string),
            skills: vec!["Python".to_string(), "SQL".to_string()],
            years_experience: 6.0,
            education: EducationLevel::Bachelor,
            text: "Data engineer building Python and SQL pipelines".to_string(),
        }
    }

    fn posting() -> JobRequirement {
        JobRequirement {
            title: "Data Engineer".to_string(),
            required_skills: vec![
                WeightedTerm::new("python"),
                WeightedTerm::new("sql"),
                WeightedTerm::new("aws"),
            ],
            min_experience_years: 5.0,
            min_education: EducationLevel::Bachelor,
            description: "Build data pipelines on AWS".to_string(),
            important_keywords: vec![],
        }
    }

    #[tokio::test]
    async fn test_end_to_end_example() {
        let result = engine(Fixed(0.6))
            .score("avery.pdf", &candidate(Some("avery@example.com")), &posting())
            .await;

        let value = |kind| result.component(kind).map(|c| c.value).unwrap();
        let semantic = 0.8_f64.powf(0.62);

        assert!((value(ScorerKind::Skills) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(value(ScorerKind::Experience), 1.0);
        assert_eq!(value(ScorerKind::Education), 1.0);
        assert_eq!(value(ScorerKind::Keyword), 1.0);
        assert!((value(ScorerKind::Semantic) - semantic).abs() < 1e-12);

        let composite = 0.35 * (2.0 / 3.0) + 0.25 + 0.15 + 0.15 * semantic + 0.10;
        assert!(
            (result.composite - composite).abs() < 1e-9,
            "composite {} expected {composite}",
            result.composite
        );

        let calibrated = -0.14 + 1.25 * composite;
        assert!((result.score - calibrated).abs() < 1e-9);
        assert!((0.93..0.95).contains(&result.score), "score {}", result.score);

        assert_eq!(result.flags, vec![MatchFlag::PartialRequirements]);
        assert_eq!(result.resume_id, "avery.pdf");
        assert_eq!(result.components.len(), 5);
    }

    #[tokio::test]
    async fn test_identical_inputs_are_bit_identical() {
        let engine = engine(Fixed(0.3));
        let first = engine.score("r", &candidate(None), &posting()).await;
        let second = engine.score("r", &candidate(None), &posting()).await;
        assert_eq!(first.score.to_bits(), second.score.to_bits());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_email_only_adds_a_flag() {
        let engine = engine(Fixed(0.6));
        let with_email = engine
            .score("r", &candidate(Some("a@b.io")), &posting())
            .await;
        let without_email = engine.score("r", &candidate(None), &posting()).await;

        assert_eq!(with_email.score.to_bits(), without_email.score.to_bits());
        assert!(without_email.has_flag(MatchFlag::MissingEmail));
        assert!(!with_email.has_flag(MatchFlag::MissingEmail));
    }

    #[tokio::test]
    async fn test_empty_job_skills_flag_partial_requirements() {
        let job = JobRequirement {
            required_skills: vec![],
            important_keywords: vec![WeightedTerm::new("pipelines")],
            ..posting()
        };
        let result = engine(Fixed(0.0)).score("r", &candidate(None), &job).await;

        assert_eq!(result.component(ScorerKind::Skills).unwrap().value, 1.0);
        assert!(result.has_flag(MatchFlag::PartialRequirements));
    }

    #[tokio::test]
    async fn test_model_outage_degrades_to_neutral() {
        let result = engine(Down).score("r", &candidate(None), &posting()).await;
        let semantic = result.component(ScorerKind::Semantic).unwrap();

        assert_eq!(semantic.value, 0.5);
        assert_eq!(semantic.basis, ScoreBasis::Fallback);
        assert!(result.has_flag(MatchFlag::SemanticFallback));
    }

    #[tokio::test]
    async fn test_score_is_always_in_unit_range() {
        let engine = engine(LexicalSimilarity);
        let extremes = [
            ResumeProfile::default(),
            ResumeProfile {
                years_experience: f64::NAN,
                ..candidate(None)
            },
            ResumeProfile {
                years_experience: 99.0,
                education: EducationLevel::Doctorate,
                ..candidate(Some("x@y.z"))
            },
        ];
        for resume in &extremes {
            let result = engine.score("r", resume, &posting()).await;
            assert!((0.0..=1.0).contains(&result.score), "score {}", result.score);
            assert!((0.0..=1.0).contains(&result.composite));
        }
    }

    #[test]
    fn test_invalid_weights_fail_construction() {
        let config = ScoringConfig {
            weights: ComponentWeights {
                skills: 0.5,
                ..ComponentWeights::default()
            },
            calibration: CalibrationConfig::default(),
        };
        assert!(matches!(
            MatchEngine::new(config, Arc::new(LexicalSimilarity)),
            Err(ConfigError::WeightSum { .. })
        ));
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let engine = Arc::new(engine(Fixed(0.6)).with_concurrency(2));
        let submissions = vec![
            BatchSubmission {
                resume_id: "a".to_string(),
                resume: Ok(candidate(Some("a@x.io"))),
            },
            BatchSubmission {
                resume_id: "broken".to_string(),
                resume: Err("unsupported file format: .docx".to_string()),
            },
            BatchSubmission {
                resume_id: "c".to_string(),
                resume: Ok(ResumeProfile::default()),
            },
        ];

        let entries = engine.score_batch(Arc::new(posting()), submissions).await;

        let ids: Vec<_> = entries.iter().map(BatchEntry::resume_id).collect();
        assert_eq!(ids, vec!["a", "broken", "c"]);
        assert!(entries[0].result().is_some());
        assert_eq!(
            entries[1],
            BatchEntry::Failed {
                resume_id: "broken".to_string(),
                error: "unsupported file format: .docx".to_string(),
            }
        );
        assert!(entries[2].result().is_some());
    }

    #[tokio::test]
    async fn test_batch_entry_serializes_with_status_tag() {
        let entry = BatchEntry::Failed {
            resume_id: "x".to_string(),
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["resume_id"], "x");
    }

    #[test]
    fn test_concurrency_has_a_floor_of_one() {
        assert_eq!(engine(LexicalSimilarity).with_concurrency(0).concurrency(), 1);
    }
}
