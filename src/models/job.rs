//! Job posting record

use crate::models::resume::ExperienceLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote_allowed: bool,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    pub experience_level: ExperienceLevel,
    /// Original casing is kept for display; comparisons are case-insensitive
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub description_embedding: Vec<f32>,
    #[serde(default)]
    pub job_url: String,
    #[serde(default)]
    pub source: String,
}

impl JobPosting {
    pub fn salary_display(&self) -> Option<String> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some(format!("{} - {}", min, max)),
            (Some(min), None) => Some(format!("{}+", min)),
            (None, Some(max)) => Some(format!("up to {}", max)),
            (None, None) => None,
        }
    }
}
