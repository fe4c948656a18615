//! Parsers that turn raw documents into the profiles the matcher consumes.

pub mod handlers;
pub mod jd_parser;
pub mod resume_parser;
pub mod vocabulary;

pub use jd_parser::JobParseError;
pub use resume_parser::ExtractionError;
