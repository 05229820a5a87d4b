//! Candidate profile and experience levels

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Lowercase a skill and collapse inner whitespace so "Machine  Learning" == "machine learning"
pub fn normalize_skill(skill: &str) -> String {
    WHITESPACE.replace_all(skill.trim(), " ").to_lowercase()
}

/// Seniority band shared by resumes and job postings.
///
/// Unrecognized labels are kept as `Other` instead of failing deserialization;
/// scoring resolves them to neutral defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
    Other(String),
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
            ExperienceLevel::Other(label) => label,
        }
    }

    /// Inclusive years-of-experience range a posting at this level expects
    pub fn years_range(&self) -> Option<(u32, u32)> {
        match self {
            ExperienceLevel::Entry => Some((0, 2)),
            ExperienceLevel::Mid => Some((2, 5)),
            ExperienceLevel::Senior => Some((5, 10)),
            ExperienceLevel::Executive => Some((10, 20)),
            ExperienceLevel::Other(_) => None,
        }
    }

    /// Scales learning time estimates; seasoned candidates pick up skills faster
    pub fn learning_multiplier(&self) -> f32 {
        match self {
            ExperienceLevel::Entry => 1.5,
            ExperienceLevel::Mid => 1.0,
            ExperienceLevel::Senior => 0.7,
            ExperienceLevel::Executive => 0.5,
            ExperienceLevel::Other(_) => 1.0,
        }
    }
}

impl From<String> for ExperienceLevel {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "entry" => ExperienceLevel::Entry,
            "mid" => ExperienceLevel::Mid,
            "senior" => ExperienceLevel::Senior,
            "executive" => ExperienceLevel::Executive,
            _ => ExperienceLevel::Other(label),
        }
    }
}

impl From<&str> for ExperienceLevel {
    fn from(label: &str) -> Self {
        ExperienceLevel::from(label.to_string())
    }
}

impl From<ExperienceLevel> for String {
    fn from(level: ExperienceLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub email: String,
    pub experience_level: ExperienceLevel,
    pub years_of_experience: u32,
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    pub resume_embedding: Vec<f32>,
    pub skills_embedding: Vec<f32>,
}

impl ResumeProfile {
    /// Normalized skill set used for every case-insensitive comparison
    pub fn skill_set(&self) -> HashSet<String> {
        self.skills
            .iter()
            .map(|s| normalize_skill(s))
            .filter(|s| !s.is_empty())
            .collect()
    }
}
