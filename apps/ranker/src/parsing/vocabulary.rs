//! Shared extraction vocabulary for the resume and job parsers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::keywords::contains_whole_word;
use crate::matching::EducationLevel;

/// Skills recognized in free text. Hits are later folded through the matcher's
/// synonym table, so aliases listed here ("node", "rest") land on the same
/// canonical token as their long forms.
pub const COMMON_SKILLS: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "ruby", "php",
    "swift", "kotlin", "scala", "html", "css", "sql", "nosql", "mongodb", "mysql",
    "postgresql", "oracle", "redis", "react", "angular", "vue", "node", "express", "django",
    "flask", "spring", "docker", "kubernetes", "aws", "azure", "gcp", "devops", "ci/cd",
    "jenkins", "terraform", "git", "github", "gitlab", "bitbucket", "agile", "scrum", "kanban",
    "machine learning", "artificial intelligence", "data science", "big data", "rest api",
    "graphql", "microservices", "testing", "junit", "selenium", "linux", "unix", "windows",
    "macos", "android", "ios", "mobile", "frontend", "backend", "fullstack",
    "web development", "mobile development", "database", "networking", "security", "cloud",
    "distributed systems", "algorithms", "data structures", "object-oriented",
    "functional programming", "software architecture", "design patterns", "mvc", "mvvm",
    "rest", "soap", "json", "xml", "yaml", "jira", "confluence", "communication", "teamwork",
    "problem-solving", "analytical", "critical thinking", "leadership", "project management",
    "time management", "debugging", "performance optimization", "scalability",
    "code review", "pair programming", "mentoring", "kafka", "spark", "airflow", "pandas",
    "pytorch", "tensorflow", "snmp", "dcim", "embedded systems", "iot",
];

/// Highest level first, so the first hit wins.
static EDUCATION_PATTERNS: Lazy<Vec<(EducationLevel, Regex)>> = Lazy::new(|| {
    vec![
        (
            EducationLevel::Doctorate,
            Regex::new(r"(?i)\b(?:ph\.?\s?d|doctorate|doctoral|doctor of)\b").unwrap(),
        ),
        (
            EducationLevel::Master,
            Regex::new(
                r"(?i)\b(?:master'?s?|msc|mba|mtech|graduate degree)\b|\bm\.(?:sc|s|a|tech|eng)\.?",
            )
            .unwrap(),
        ),
        (
            EducationLevel::Bachelor,
            Regex::new(
                r"(?i)\b(?:bachelor'?s?|undergraduate|bsc|btech|beng)\b|\bb\.(?:sc|s|a|tech|e)\.",
            )
            .unwrap(),
        ),
        (
            EducationLevel::Associate,
            Regex::new(r"(?i)\bassociate'?s?\s+(?:degree|of)\b").unwrap(),
        ),
        (
            EducationLevel::HighSchool,
            Regex::new(r"(?i)\b(?:high\s+school|secondary\s+school|ged)\b").unwrap(),
        ),
    ]
});

/// Vocabulary skills present in `text` as whole words, in vocabulary order.
pub fn find_skills(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    COMMON_SKILLS
        .iter()
        .filter(|skill| contains_whole_word(&haystack, skill))
        .map(|skill| skill.to_string())
        .collect()
}

/// Highest education level mentioned anywhere in `text`.
pub fn detect_education(text: &str) -> EducationLevel {
    EDUCATION_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(level, _)| *level)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_skills_uses_whole_words() {
        let skills = find_skills("Senior JavaScript developer. Some Go, lots of C++ and SQL.");
        assert!(skills.contains(&"javascript".to_string()));
        assert!(skills.contains(&"go".to_string()));
        assert!(skills.contains(&"c++".to_string()));
        assert!(skills.contains(&"sql".to_string()));
        assert!(!skills.contains(&"java".to_string()));
    }

    #[test]
    fn test_find_skills_multi_word() {
        let skills = find_skills("Applied Machine Learning to distributed systems");
        assert!(skills.contains(&"machine learning".to_string()));
        assert!(skills.contains(&"distributed systems".to_string()));
    }

    #[test]
    fn test_detect_education_picks_highest() {
        assert_eq!(
            detect_education("B.S. in Physics, then a Ph.D. in Chemistry"),
            EducationLevel::Doctorate
        );
        assert_eq!(
            detect_education("Master of Science, Computer Science"),
            EducationLevel::Master
        );
        assert_eq!(
            detect_education("Bachelor's degree required"),
            EducationLevel::Bachelor
        );
        assert_eq!(
            detect_education("Associate degree in Networking"),
            EducationLevel::Associate
        );
        assert_eq!(
            detect_education("High School Diploma"),
            EducationLevel::HighSchool
        );
    }

    #[test]
    fn test_undergraduate_is_not_a_graduate_degree() {
        assert_eq!(
            detect_education("Undergraduate studies in economics"),
            EducationLevel::Bachelor
        );
    }

    #[test]
    fn test_job_title_associate_is_not_a_degree() {
        assert_eq!(
            detect_education("Worked as an Associate Engineer"),
            EducationLevel::None
        );
    }
}
