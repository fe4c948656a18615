//! Report writer: persists one batch run as CSV, JSON and per-resume Markdown.
//!
//! Percentages are rounded for display only; the JSON report carries the
//! unrounded scores.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::matching::BatchEntry;
use crate::matching::weights::ComponentWeights;

pub mod markdown;

pub const CSV_FILE: &str = "results.csv";
pub const JSON_FILE: &str = "results.json";
pub const REPORTS_DIR: &str = "reports";

const CSV_HEADER: [&str; 5] = ["Resume Name", "Match Score (%)", "Email", "Flags", "Status"];

/// Everything produced by one run of the batch driver.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub job_title: String,
    pub similarity_backend: String,
    pub entries: Vec<BatchEntry>,
}

impl RunReport {
    pub fn new(job_title: &str, similarity_backend: &str, entries: Vec<BatchEntry>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            job_title: job_title.to_string(),
            similarity_backend: similarity_backend.to_string(),
            entries,
        }
    }

    pub fn scored_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result().is_some()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.scored_count()
    }
}

/// Where the report files landed.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub reports_dir: PathBuf,
}

/// Scored entries by score descending (ties by resume id), failed entries last
/// in their original order.
pub fn ranked(entries: &[BatchEntry]) -> Vec<&BatchEntry> {
    let mut ranked: Vec<&BatchEntry> = entries.iter().collect();
    ranked.sort_by(|a, b| match (a.result(), b.result()) {
        (Some(a), Some(b)) => b
            .score
            .total_cmp(&a.score)
            .then_with(|| a.resume_id.cmp(&b.resume_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked
}

pub fn write_all(
    output_dir: &Path,
    report: &RunReport,
    weights: &ComponentWeights,
) -> Result<ReportPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let paths = ReportPaths {
        csv: output_dir.join(CSV_FILE),
        json: output_dir.join(JSON_FILE),
        reports_dir: output_dir.join(REPORTS_DIR),
    };

    write_csv(&paths.csv, report)?;
    write_json(&paths.json, report)?;
    let written = markdown::write_reports(&paths.reports_dir, report, weights)?;

    info!(
        "Wrote {} and {} plus {written} detailed reports",
        paths.csv.display(),
        paths.json.display()
    );
    Ok(paths)
}

pub fn write_csv(path: &Path, report: &RunReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(CSV_HEADER)?;

    for entry in ranked(&report.entries) {
        match entry {
            BatchEntry::Scored(result) => {
                let score = format!("{:.2}", result.score_percent());
                let flags: Vec<&str> = result.flags.iter().map(|f| f.as_str()).collect();
                let flags = flags.join(";");
                writer.write_record([
                    result.resume_id.as_str(),
                    score.as_str(),
                    result.email.as_deref().unwrap_or(""),
                    flags.as_str(),
                    "scored",
                ])?;
            }
            BatchEntry::Failed { resume_id, error } => {
                let status = format!("failed: {error}");
                writer.write_record([resume_id.as_str(), "", "", "", status.as_str()])?;
            }
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn write_json(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::matching::calibration::Calibrated;
    use crate::matching::BatchEntry;
    use crate::matching::profile::ResumeProfile;
    use crate::matching::result::{
        assemble, ComponentScore, Evidence, MatchFlag, ScoreBasis, ScorerKind,
    };

    pub fn scored(id: &str, score: f64, email: Option<&str>) -> BatchEntry {
        let resume = ResumeProfile {
            name: id.to_uppercase(),
            email: email.map(str::to_string),
            ..Default::default()
        };
        let components = ScorerKind::ALL
            .iter()
            .map(|kind| {
                ComponentScore::new(
                    *kind,
                    score,
                    ScoreBasis::Measured,
                    Evidence {
                        matched: vec!["python".to_string()],
                        missing: vec!["aws".to_string()],
                        shortfall_years: None,
                        note: "fixture".to_string(),
                    },
                )
            })
            .collect();
        let flags = if email.is_some() {
            vec![]
        } else {
            vec![MatchFlag::MissingEmail]
        };
        BatchEntry::Scored(assemble(
            id,
            &resume,
            components,
            score,
            Calibrated { score, flags },
        ))
    }

    pub fn failed(id: &str) -> BatchEntry {
        BatchEntry::Failed {
            resume_id: id.to_string(),
            error: "unsupported file format: docx".to_string(),
        }
    }
}
