use tracing::warn;

use crate::embedding::SimilarityModel;
use crate::matching::calibration::CalibrationConfig;
use crate::matching::result::{ComponentScore, Evidence, ScoreBasis, ScorerKind};

/// Calls to the similarity model before falling back. The second call is the
/// one retry.
pub const SEMANTIC_ATTEMPTS: u32 = 2;

/// Semantic similarity between the resume and job texts.
///
/// The raw similarity in [-1, 1] is rescaled to [0, 1] and then lifted with a
/// power curve. If the model keeps failing, or returns something that is not a
/// number, the component takes the neutral value and is marked as a fallback.
/// Empty text fails inside the model and takes the same path. This never fails
/// the match.
pub async fn score_semantic(
    model: &dyn SimilarityModel,
    resume_text: &str,
    job_text: &str,
    config: &CalibrationConfig,
) -> ComponentScore {
    let mut last_error = String::new();
    for attempt in 1..=SEMANTIC_ATTEMPTS {
        match model.similarity(resume_text, job_text).await {
            Ok(raw) if raw.is_finite() => {
                let raw = raw.clamp(-1.0, 1.0);
                let value = leniency_stretch(rescale(raw), config.semantic_stretch_exponent);
                return ComponentScore::new(
                    ScorerKind::Semantic,
                    value,
                    ScoreBasis::Measured,
                    Evidence {
                        note: format!("{} similarity {raw:.3}", model.backend()),
                        ..Default::default()
                    },
                );
            }
            Ok(raw) => {
                last_error = format!("non-finite similarity {raw}");
            }
            Err(e) => {
                last_error = e.to_string();
            }
        }
        warn!(
            "Semantic similarity attempt {attempt}/{SEMANTIC_ATTEMPTS} failed ({}): {last_error}",
            model.backend()
        );
    }

    fallback(config, format!("similarity unavailable: {last_error}"))
}

/// Maps [-1, 1] onto [0, 1].
pub fn rescale(raw: f64) -> f64 {
    ((raw + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Monotonic power curve `x^exponent`; with an exponent below 1 it lifts
/// mid-range values and keeps both endpoints fixed.
pub fn leniency_stretch(value: f64, exponent: f64) -> f64 {
    value.clamp(0.0, 1.0).powf(exponent)
}

fn fallback(config: &CalibrationConfig, note: String) -> ComponentScore {
    ComponentScore::new(
        ScorerKind::Semantic,
        config.semantic_neutral,
        ScoreBasis::Fallback,
        Evidence {
            note,
            ..Default::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingError, LexicalSimilarity};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails a fixed number of times, then answers with `value`.
    struct Scripted {
        failures: u32,
        value: f64,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(failures: u32, value: f64) -> Self {
            Self {
                failures,
                value,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl SimilarityModel for Scripted {
        async fn similarity(&self, _: &str, _: &str) -> Result<f64, EmbeddingError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(EmbeddingError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            } else {
                Ok(self.value)
            }
        }

        fn backend(&self) -> &'static str {
            "scripted"
        }
    }

    async fn run(model: &Scripted) -> ComponentScore {
        score_semantic(model, "resume text", "job text", &CalibrationConfig::default()).await
    }

    #[test]
    fn test_rescale_endpoints() {
        assert_eq!(rescale(-1.0), 0.0);
        assert_eq!(rescale(0.0), 0.5);
        assert_eq!(rescale(1.0), 1.0);
    }

    #[test]
    fn test_stretch_lifts_mid_range_and_keeps_endpoints() {
        let exponent = CalibrationConfig::default().semantic_stretch_exponent;
        assert_eq!(leniency_stretch(0.0, exponent), 0.0);
        assert_eq!(leniency_stretch(1.0, exponent), 1.0);
        assert!(leniency_stretch(0.5, exponent) > 0.5);
        assert!(leniency_stretch(0.8, exponent) > 0.8);
    }

    #[test]
    fn test_stretch_is_monotonic() {
        let mut previous = 0.0;
        for step in 1..=100 {
            let current = leniency_stretch(step as f64 / 100.0, 0.62);
            assert!(current > previous);
            previous = current;
        }
    }

    #[tokio::test]
    async fn test_measured_similarity() {
        let model = Scripted::new(0, 0.6);
        let score = run(&model).await;
        assert_eq!(score.basis, ScoreBasis::Measured);
        assert!((score.value - 0.8_f64.powf(0.62)).abs() < 1e-12);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_failure_is_retried() {
        let model = Scripted::new(1, 1.0);
        let score = run(&model).await;
        assert_eq!(score.basis, ScoreBasis::Measured);
        assert_eq!(score.value, 1.0);
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persistent_failure_falls_back_to_neutral() {
        let model = Scripted::new(u32::MAX, 1.0);
        let score = run(&model).await;
        assert_eq!(score.basis, ScoreBasis::Fallback);
        assert_eq!(score.value, 0.5);
        assert_eq!(model.calls.load(Ordering::SeqCst), SEMANTIC_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_nan_similarity_falls_back() {
        let model = Scripted::new(0, f64::NAN);
        let score = run(&model).await;
        assert_eq!(score.basis, ScoreBasis::Fallback);
        assert_eq!(score.value, 0.5);
    }

    #[tokio::test]
    async fn test_out_of_range_similarity_is_clamped() {
        let model = Scripted::new(0, 3.0);
        assert_eq!(run(&model).await.value, 1.0);
    }

    #[tokio::test]
    async fn test_empty_text_falls_back_to_neutral() {
        let score = score_semantic(
            &LexicalSimilarity,
            "",
            "job text",
            &CalibrationConfig::default(),
        )
        .await;
        assert_eq!(score.basis, ScoreBasis::Fallback);
        assert_eq!(score.value, 0.5);
        assert!(score.evidence.note.contains("empty"));
    }
}
