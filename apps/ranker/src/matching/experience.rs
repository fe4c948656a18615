use crate::matching::calibration::CalibrationConfig;
use crate::matching::normalizer::{NormalizedJob, NormalizedResume};
use crate::matching::result::{ComponentScore, Evidence, ScoreBasis, ScorerKind};

/// Lenient experience score.
///
/// Meeting the requirement (or a zero requirement) scores 1.0. A shortfall is
/// divided by `required + leniency` rather than `required`, so being a year short
/// costs far less than a strict linear ramp would.
pub fn score_experience(
    resume: &NormalizedResume,
    job: &NormalizedJob,
    config: &CalibrationConfig,
) -> ComponentScore {
    let required = job.min_experience_years;
    let actual = resume.years_experience;

    if required <= 0.0 {
        return ComponentScore::new(
            ScorerKind::Experience,
            1.0,
            ScoreBasis::Measured,
            Evidence {
                shortfall_years: Some(0.0),
                note: format!("no minimum experience required ({actual:.1} years)"),
                ..Default::default()
            },
        );
    }

    let shortfall = (required - actual).max(0.0);
    let value = if shortfall == 0.0 {
        1.0
    } else {
        (1.0 - shortfall / (required + config.experience_leniency_years)).max(0.0)
    };

    ComponentScore::new(
        ScorerKind::Experience,
        value,
        ScoreBasis::Measured,
        Evidence {
            shortfall_years: Some(shortfall),
            note: format!(
                "{actual:.1} years against {required:.1} required ({})",
                experience_level(actual)
            ),
            ..Default::default()
        },
    )
}

/// Human-readable seniority band, for reports only.
pub fn experience_level(years: f64) -> &'static str {
    if years >= 10.0 {
        "Senior/Expert"
    } else if years >= 5.0 {
        "Mid-Senior Level"
    } else if years >= 2.0 {
        "Mid Level"
    } else {
        "Entry Level"
    }
}
