//! Batch driver: ranks a directory of resumes against one job posting and
//! writes the report files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::RankArgs;
use crate::config::Config;
use crate::matching::{BatchEntry, BatchSubmission, MatchEngine};
use crate::parsing::jd_parser::{load_job, parse_job};
use crate::parsing::resume_parser::{collect_resume_files, parse_resume_file};
use crate::report::{self, ranked, RunReport};
use crate::state::build_engine;

/// Rows printed to stdout after a run.
const SUMMARY_ROWS: usize = 10;

pub async fn run_rank(config: &Config, args: RankArgs) -> Result<()> {
    let engine = build_engine(config)?;
    let report = rank_directory(&engine, &args.resumes_dir, &args.job_json).await?;

    let paths = report::write_all(&args.output_dir, &report, &engine.config().weights)?;
    print_summary(&report);
    println!("\nResults written to {}", paths.csv.display());
    Ok(())
}

/// Loads the job, parses every resume and scores the batch.
///
/// Only an unreadable job file is an error. Resumes that cannot be found or
/// parsed become failed entries; an unreadable directory yields an empty run.
pub async fn rank_directory(
    engine: &Arc<MatchEngine>,
    resumes_dir: &Path,
    job_json: &Path,
) -> Result<RunReport> {
    let posting = load_job(job_json)
        .with_context(|| format!("Failed to load job posting from {}", job_json.display()))?;
    let job = parse_job(&posting);
    info!(
        "Job '{}': {} required skills, {:.1} years, {} minimum",
        job.title,
        job.required_skills.len(),
        job.min_experience_years,
        job.min_education.label()
    );

    let files = match collect_resume_files(resumes_dir) {
        Ok(files) => files,
        Err(e) => {
            warn!("Could not read resumes from {}: {e}", resumes_dir.display());
            Vec::new()
        }
    };
    info!("Found {} resumes in {}", files.len(), resumes_dir.display());

    let submissions = load_submissions(resumes_dir, files).await;
    let title = job.title.clone();
    let entries = engine.score_batch(Arc::new(job), submissions).await;

    Ok(RunReport::new(&title, engine.backend(), entries))
}

/// Parses each file on the blocking pool. A parser panic is contained to its
/// own entry.
async fn load_submissions(root: &Path, files: Vec<PathBuf>) -> Vec<BatchSubmission> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let resume_id = resume_id_for(root, &path);
            let handle = tokio::task::spawn_blocking(move || parse_resume_file(&path));
            (resume_id, handle)
        })
        .collect();

    let mut submissions = Vec::with_capacity(handles.len());
    for (resume_id, handle) in handles {
        let resume = match handle.await {
            Ok(Ok(profile)) => Ok(profile),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("text extraction aborted: {e}")),
        };
        submissions.push(BatchSubmission { resume_id, resume });
    }
    submissions
}

/// Path relative to the resumes directory, so nested files stay distinct.
fn resume_id_for(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn print_summary(report: &RunReport) {
    println!(
        "Ranked {} resumes for '{}' ({} failed, backend: {})",
        report.entries.len(),
        report.job_title,
        report.failed_count(),
        report.similarity_backend
    );
    for (rank, entry) in ranked(&report.entries).iter().take(SUMMARY_ROWS).enumerate() {
        match entry {
            BatchEntry::Scored(result) => println!(
                "{:>3}. {:<40} {:>6.2}%  {}",
                rank + 1,
                result.resume_id,
                result.score_percent(),
                result.email.as_deref().unwrap_or("-")
            ),
            BatchEntry::Failed { resume_id, error } => {
                println!("{:>3}. {:<40} failed: {error}", rank + 1, resume_id)
            }
        }
    }
}
