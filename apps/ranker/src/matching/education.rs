use crate::matching::calibration::CalibrationConfig;
use crate::matching::normalizer::{NormalizedJob, NormalizedResume};
use crate::matching::result::{ComponentScore, Evidence, ScoreBasis, ScorerKind};

/// Education score: 1.0 at or above the required level, otherwise a fixed
/// penalty per missing level.
pub fn score_education(
    resume: &NormalizedResume,
    job: &NormalizedJob,
    config: &CalibrationConfig,
) -> ComponentScore {
    let actual = resume.education;
    let required = job.min_education;

    let levels_short = required.ordinal().saturating_sub(actual.ordinal());
    let value = if levels_short == 0 {
        1.0
    } else {
        (1.0 - f64::from(levels_short) * config.education_level_penalty).max(0.0)
    };

    let (matched, missing) = if levels_short == 0 {
        (vec![actual.label().to_string()], vec![])
    } else {
        (vec![], vec![required.label().to_string()])
    };

    ComponentScore::new(
        ScorerKind::Education,
        value,
        ScoreBasis::Measured,
        Evidence {
            matched,
            missing,
            shortfall_years: None,
            note: format!(
                "detected {} against required {}",
                actual.label(),
                required.label()
            ),
        },
    )
}
