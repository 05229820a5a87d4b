//! Resume and job posting records consumed by the matching engine

pub mod job;
pub mod resume;

pub use job::JobPosting;
pub use resume::{normalize_skill, ExperienceLevel, ResumeProfile};
