//! Resume parser: turns a resume document into a [`ResumeProfile`].
//!
//! Text extraction is format-specific (`pdf-extract` for PDF, UTF-8 for plain
//! text and Markdown). Field extraction is regex and vocabulary based and never
//! invents values: a resume without an email address yields `email: None`.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::matching::ResumeProfile;
use crate::parsing::vocabulary::{detect_education, find_skills};

/// File extensions the parser can read, lower-case.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Longest first line still taken to be a candidate name.
const MAX_NAME_LEN: usize = 60;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.[A-Za-z]{2,}").unwrap());

// "6 years of experience", "5+ yrs professional experience"
static EXPLICIT_YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)(?:\s+of)?(?:\s+[a-z-]+)?\s+experience")
        .unwrap()
});

// "since 2016", "from 2019"
static SINCE_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:since|from)\s+((?:19|20)\d{2})\b").unwrap());

// "2015 - 2019", "2020 to present"
static YEAR_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b((?:19|20)\d{2})\s*(?:-|\x{2013}|\x{2014}|to)\s*((?:19|20)\d{2}|present|current|now)\b",
    )
    .unwrap()
});

/// Lower-cased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

pub fn is_supported(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Extracts plain text from document bytes. `extension` selects the decoder.
pub fn extract_text(bytes: &[u8], extension: &str) -> Result<String, ExtractionError> {
    match extension.to_lowercase().as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string())),
        "txt" | "md" => Ok(String::from_utf8_lossy(bytes).into_owned()),
        other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
    }
}

/// Builds a profile from already-extracted text.
///
/// `fallback_name` is used when the first line does not look like a name;
/// `current_year` anchors open-ended date ranges.
pub fn parse_resume_text(text: &str, fallback_name: &str, current_year: i32) -> ResumeProfile {
    ResumeProfile {
        name: extract_name(text).unwrap_or_else(|| fallback_name.to_string()),
        email: extract_email(text),
        skills: find_skills(text),
        years_experience: estimate_years(text, current_year),
        education: detect_education(text),
        text: text.to_string(),
    }
}

/// Parses an in-memory document, e.g. an uploaded file.
pub fn parse_resume_bytes(
    bytes: &[u8],
    file_name: &str,
    current_year: i32,
) -> Result<ResumeProfile, ExtractionError> {
    let path = Path::new(file_name);
    let extension = extension_of(path)
        .ok_or_else(|| ExtractionError::UnsupportedFormat(file_name.to_string()))?;
    let text = extract_text(bytes, &extension)?;
    Ok(parse_resume_text(&text, &file_stem(path), current_year))
}

/// Reads and parses one resume from disk. Blocking; call from `spawn_blocking`
/// inside async code.
pub fn parse_resume_file(path: &Path) -> Result<ResumeProfile, ExtractionError> {
    let extension = extension_of(path)
        .filter(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| ExtractionError::UnsupportedFormat(path.display().to_string()))?;
    let bytes = std::fs::read(path)?;
    let text = extract_text(&bytes, &extension)?;
    Ok(parse_resume_text(
        &text,
        &file_stem(path),
        chrono::Local::now().year(),
    ))
}

/// All supported resume files under `dir`, recursively, sorted by path.
pub fn collect_resume_files(dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ExtractionError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if is_supported(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.replace(['_', '-'], " ").trim().to_string())
        .unwrap_or_default()
}

fn extract_name(text: &str) -> Option<String> {
    let first = text.lines().map(str::trim).find(|line| !line.is_empty())?;
    let looks_like_name = first.len() <= MAX_NAME_LEN
        && !first.contains('@')
        && !first.chars().any(|c| c.is_ascii_digit());
    looks_like_name.then(|| first.to_string())
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Years of experience: the largest explicit "N years of experience" mention,
/// otherwise the longest span implied by "since YYYY" and year ranges.
pub fn estimate_years(text: &str, current_year: i32) -> f64 {
    let explicit = EXPLICIT_YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max();
    if let Some(years) = explicit.filter(|years| *years > 0) {
        return f64::from(years);
    }

    let mut earliest: Option<i32> = None;
    let mut latest: Option<i32> = None;
    let mut note_span = |start: i32, end: i32| {
        if start <= end && end <= current_year {
            earliest = Some(earliest.map_or(start, |e| e.min(start)));
            latest = Some(latest.map_or(end, |l| l.max(end)));
        }
    };

    for caps in SINCE_YEAR_RE.captures_iter(text) {
        if let Some(start) = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok()) {
            note_span(start, current_year);
        }
    }
    for caps in YEAR_RANGE_RE.captures_iter(text) {
        let start = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok());
        let end = caps.get(2).map(|m| m.as_str().parse().unwrap_or(current_year));
        if let (Some(start), Some(end)) = (start, end) {
            note_span(start, end);
        }
    }

    match (earliest, latest) {
        (Some(start), Some(end)) if end - start < 50 => f64::from(end - start),
        _ => 0.0,
    }
}
