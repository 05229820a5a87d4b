//! Multi-factor match scoring between a resume and a single job posting

use crate::config::ScoringWeights;
use crate::error::Result;
use crate::matching::explanation::explain_match;
use crate::matching::gaps::GapCategorizer;
use crate::matching::severity::{assess_severity, GapAnalysis};
use crate::matching::similarity::{CosineSimilarity, SimilarityProvider};
use crate::matching::taxonomy::SkillTaxonomy;
use crate::models::{normalize_skill, ExperienceLevel, JobPosting, ResumeProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Experience fit when the job declares a level with no known year range
const UNKNOWN_LEVEL_EXPERIENCE: f32 = 0.8;
/// Location fit when either side gives nothing to compare
const NEUTRAL_LOCATION: f32 = 0.6;
const LOCATION_MISMATCH: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub semantic_similarity: f32,
    pub skills_similarity: f32,
    pub experience_match: f32,
    pub location_match: f32,
}

impl ComponentScores {
    pub fn weighted(&self, weights: &ScoringWeights) -> f32 {
        let overall = self.semantic_similarity * weights.semantic
            + self.skills_similarity * weights.skills
            + self.experience_match * weights.experience
            + self.location_match * weights.location;
        overall.clamp(0.0, 1.0)
    }
}

/// Scored job, created once per request and never mutated afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub remote_allowed: bool,
    pub job_url: String,
    pub scores: ComponentScores,
    pub overall_score: f32,
    /// Skills held by the candidate and required by the job, lowercase, in job order
    pub skill_matches: Vec<String>,
    pub gap_analysis: GapAnalysis,
    pub explanation: String,
}

pub struct JobScorer<S: SimilarityProvider = CosineSimilarity> {
    similarity: S,
    taxonomy: SkillTaxonomy,
    weights: ScoringWeights,
}

impl JobScorer<CosineSimilarity> {
    pub fn new() -> Self {
        Self::with_parts(CosineSimilarity, SkillTaxonomy::default(), ScoringWeights::default())
    }
}

impl Default for JobScorer<CosineSimilarity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SimilarityProvider> JobScorer<S> {
    pub fn with_parts(similarity: S, taxonomy: SkillTaxonomy, weights: ScoringWeights) -> Self {
        Self {
            similarity,
            taxonomy,
            weights,
        }
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one job against a resume
    pub fn score_job(&self, resume: &ResumeProfile, job: &JobPosting) -> Result<MatchResult> {
        self.score_job_with_skills(resume, &resume.skill_set(), job)
    }

    /// Same as [`score_job`](Self::score_job) with the resume's normalized skill set computed once by the caller
    pub fn score_job_with_skills(
        &self,
        resume: &ResumeProfile,
        user_skills: &HashSet<String>,
        job: &JobPosting,
    ) -> Result<MatchResult> {
        let scores = ComponentScores {
            semantic_similarity: self
                .similarity
                .similarity(&resume.resume_embedding, &job.description_embedding)?,
            skills_similarity: self
                .similarity
                .similarity(&resume.skills_embedding, &job.description_embedding)?,
            experience_match: experience_match(&job.experience_level, resume.years_of_experience),
            location_match: location_match(job.remote_allowed, &resume.preferred_locations, &job.location),
        };
        let overall_score = scores.weighted(&self.weights);

        let mut seen = HashSet::new();
        let skill_matches: Vec<String> = job
            .skills_required
            .iter()
            .map(|s| normalize_skill(s))
            .filter(|s| user_skills.contains(s) && seen.insert(s.clone()))
            .collect();

        let gaps = GapCategorizer::new(&self.taxonomy).categorize_gaps(
            user_skills,
            &job.skills_required,
            &job.title,
            &job.description,
        );
        let gap_analysis = assess_severity(&gaps, &resume.experience_level);
        let explanation = explain_match(overall_score, &skill_matches, &gap_analysis);

        log::debug!(
            "Scored job {} for {}: overall {:.3} (semantic {:.3}, skills {:.3}, experience {:.2}, location {:.2})",
            job.id,
            resume.email,
            overall_score,
            scores.semantic_similarity,
            scores.skills_similarity,
            scores.experience_match,
            scores.location_match
        );

        Ok(MatchResult {
            job_id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            remote_allowed: job.remote_allowed,
            job_url: job.job_url.clone(),
            scores,
            overall_score,
            skill_matches,
            gap_analysis,
            explanation,
        })
    }
}

/// Fit between the candidate's years and the level the job declares.
///
/// Under-qualification loses 0.2 per missing year (floor 0.3); over-qualification
/// loses 0.1 per extra year (floor 0.5).
pub fn experience_match(job_level: &ExperienceLevel, years: u32) -> f32 {
    let Some((min_years, max_years)) = job_level.years_range() else {
        return UNKNOWN_LEVEL_EXPERIENCE;
    };

    if years < min_years {
        (1.0 - (min_years - years) as f32 * 0.2).max(0.3)
    } else if years > max_years {
        (1.0 - (years - max_years) as f32 * 0.1).max(0.5)
    } else {
        1.0
    }
}

/// Fit between preferred locations and the job location; remote jobs always fit
pub fn location_match(remote_allowed: bool, preferred_locations: &[String], job_location: &str) -> f32 {
    if remote_allowed {
        return 1.0;
    }

    let job_location = job_location.trim().to_lowercase();
    let preferred: Vec<String> = preferred_locations
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();

    if preferred.is_empty() || job_location.is_empty() {
        return NEUTRAL_LOCATION;
    }

    let overlaps = preferred
        .iter()
        .any(|p| job_location.contains(p.as_str()) || p.contains(job_location.as_str()));

    if overlaps {
        1.0
    } else {
        LOCATION_MISMATCH
    }
}
