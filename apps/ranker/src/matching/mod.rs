//! Resume-to-job matching core.
//!
//! Leaf-first: `normalizer` canonicalizes profiles, the component scorers
//! (`skills`, `experience`, `education`, `semantic`, `keywords`) each produce
//! one [`result::ComponentScore`], `weights` aggregates them, `calibration`
//! remaps the composite and `result` assembles the final record. `engine`
//! wires the pipeline together.

pub mod calibration;
pub mod config;
pub mod education;
pub mod engine;
pub mod experience;
pub mod handlers;
pub mod keywords;
pub mod normalizer;
pub mod profile;
pub mod result;
pub mod semantic;
pub mod skills;
pub mod weights;

pub use config::ScoringConfig;
pub use engine::{BatchEntry, BatchSubmission, MatchEngine};
pub use profile::{EducationLevel, JobRequirement, ResumeProfile, WeightedTerm};
pub use result::{MatchResult, ScorerKind};
