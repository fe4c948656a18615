use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::matching::result::to_percent;
use crate::matching::{MatchResult, ScorerKind};
use crate::matching::weights::ComponentWeights;
use crate::report::RunReport;

/// Tier label for a calibrated score given in percent.
pub fn recommendation_tier(percent: f64) -> &'static str {
    if percent >= 80.0 {
        "Excellent match"
    } else if percent >= 70.0 {
        "Strong match"
    } else if percent >= 60.0 {
        "Good match"
    } else {
        "Weak match"
    }
}

/// Writes one Markdown report per scored entry. Returns how many were written.
pub fn write_reports(
    dir: &Path,
    report: &RunReport,
    weights: &ComponentWeights,
) -> Result<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut used = HashSet::new();
    let mut written = 0;
    for result in report.entries.iter().filter_map(|e| e.result()) {
        let path = dir.join(report_file_name(&result.resume_id, &mut used));
        let body = render(result, &report.job_title, weights)?;
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written += 1;
    }
    Ok(written)
}

/// `<stem>.md` with unsafe characters replaced; repeated stems get a numeric suffix.
fn report_file_name(resume_id: &str, used: &mut HashSet<String>) -> String {
    let stem = Path::new(resume_id)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(resume_id);
    let mut safe: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.is_empty() {
        safe = "resume".to_string();
    }

    let mut candidate = safe.clone();
    let mut suffix = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{safe}-{suffix}");
        suffix += 1;
    }
    format!("{candidate}.md")
}

pub fn render(
    result: &MatchResult,
    job_title: &str,
    weights: &ComponentWeights,
) -> Result<String, std::fmt::Error> {
    let percent = result.score_percent();
    let name = if result.candidate_name.is_empty() {
        result.resume_id.as_str()
    } else {
        result.candidate_name.as_str()
    };

    let mut out = String::new();
    writeln!(out, "# Match Report: {name}")?;
    writeln!(out)?;
    writeln!(out, "- **Resume:** {}", result.resume_id)?;
    writeln!(
        out,
        "- **Email:** {}",
        result.email.as_deref().unwrap_or("not found")
    )?;
    if !job_title.is_empty() {
        writeln!(out, "- **Position:** {job_title}")?;
    }
    writeln!(out, "- **Match score:** {percent:.2}%")?;
    writeln!(out, "- **Recommendation:** {}", recommendation_tier(percent))?;
    if !result.flags.is_empty() {
        let flags: Vec<&str> = result.flags.iter().map(|f| f.as_str()).collect();
        writeln!(out, "- **Flags:** {}", flags.join(", "))?;
    }
    writeln!(out)?;

    writeln!(out, "## Component Scores")?;
    writeln!(out)?;
    writeln!(out, "| Component | Score | Weight | Contribution |")?;
    writeln!(out, "|---|---:|---:|---:|")?;
    for kind in ScorerKind::ALL {
        let Some(component) = result.component(kind) else {
            continue;
        };
        let weight = weights.weight_for(kind);
        writeln!(
            out,
            "| {} | {:.2}% | {:.0}% | {:.2}% |",
            kind.label(),
            to_percent(component.value),
            weight * 100.0,
            to_percent(component.value * weight)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Raw composite: {:.2}%", to_percent(result.composite))?;
    writeln!(out)?;

    writeln!(out, "## Details")?;
    for component in &result.components {
        writeln!(out)?;
        writeln!(out, "### {}", component.scorer.label())?;
        writeln!(out)?;
        if !component.evidence.note.is_empty() {
            writeln!(out, "{}", component.evidence.note)?;
            writeln!(out)?;
        }
        if !component.evidence.matched.is_empty() {
            writeln!(out, "- Matched: {}", component.evidence.matched.join(", "))?;
        }
        if !component.evidence.missing.is_empty() {
            writeln!(out, "- Missing: {}", component.evidence.missing.join(", "))?;
        }
        if let Some(shortfall) = component.evidence.shortfall_years {
            writeln!(out, "- Shortfall: {shortfall:.1} years")?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::scored;

    #[test]
    fn test_recommendation_tiers() {
        assert_eq!(recommendation_tier(91.0), "Excellent match");
        assert_eq!(recommendation_tier(80.0), "Excellent match");
        assert_eq!(recommendation_tier(75.5), "Strong match");
        assert_eq!(recommendation_tier(60.0), "Good match");
        assert_eq!(recommendation_tier(12.0), "Weak match");
    }

    #[test]
    fn test_render_includes_scores_and_evidence() {
        let entry = scored("dana.pdf", 0.75, None);
        let result = entry.result().unwrap();
        let body = render(result, "Data Engineer", &ComponentWeights::default()).unwrap();

        assert!(body.starts_with("# Match Report: DANA.PDF"));
        assert!(body.contains("- **Match score:** 75.00%"));
        assert!(body.contains("- **Recommendation:** Strong match"));
        assert!(body.contains("- **Flags:** missing_email"));
        assert!(body.contains("| Skills Match | 75.00% | 35% | 26.25% |"));
        assert!(body.contains("- Missing: aws"));
    }

    #[test]
    fn test_file_names_are_safe_and_unique() {
        let mut used = HashSet::new();
        assert_eq!(report_file_name("jane doe.pdf", &mut used), "jane_doe.md");
        assert_eq!(report_file_name("jane doe.txt", &mut used), "jane_doe-2.md");
        assert_eq!(report_file_name("nested/x.md", &mut used), "x.md");
    }
}
