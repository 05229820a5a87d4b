//! Request-level matching: score the job corpus, filter, rank and select

use crate::config::{Config, MatchingConfig};
use crate::error::{JobMatcherError, Result};
use crate::matching::scorer::{JobScorer, MatchResult};
use crate::matching::selector::{rank_matches, select_matches, RandomSource};
use crate::matching::similarity::{CosineSimilarity, SimilarityProvider};
use crate::matching::taxonomy::SkillTaxonomy;
use crate::models::{JobPosting, ResumeProfile};
use crate::store::JobStore;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

fn default_top_k() -> usize {
    30
}

fn default_min_similarity() -> f32 {
    0.3
}

fn default_randomize() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub user_identifier: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub exclude_job_ids: Vec<String>,
    #[serde(default = "default_randomize")]
    pub randomize: bool,
}

impl MatchRequest {
    pub fn new(user_identifier: impl Into<String>) -> Self {
        Self {
            user_identifier: user_identifier.into(),
            top_k: default_top_k(),
            min_similarity: default_min_similarity(),
            offset: 0,
            exclude_job_ids: Vec::new(),
            randomize: default_randomize(),
        }
    }

    /// Request seeded with configured defaults instead of the built-in ones
    pub fn from_config(user_identifier: impl Into<String>, matching: &MatchingConfig) -> Self {
        Self {
            top_k: matching.top_k,
            min_similarity: matching.min_similarity,
            randomize: matching.randomize,
            ..Self::new(user_identifier)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_identifier.trim().is_empty() {
            return Err(JobMatcherError::InvalidInput("user_identifier is empty".to_string()));
        }
        if self.top_k == 0 {
            return Err(JobMatcherError::InvalidInput("top_k must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(JobMatcherError::InvalidInput(format!(
                "min_similarity must be within [0, 1], got {}",
                self.min_similarity
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchResult>,
    /// Candidates at or above the similarity threshold
    pub total_found: usize,
    /// Jobs considered after exclusions, including any skipped as corrupt
    pub total_jobs_analyzed: usize,
    pub has_more: bool,
    /// Offset for the next page; `None` in rotation mode or on the last page
    pub next_offset: Option<usize>,
    pub skipped_job_ids: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Every job scored for one resume, with the ids that could not be scored
#[derive(Debug, Clone)]
pub struct ScoredBatch {
    pub results: Vec<MatchResult>,
    pub skipped_job_ids: Vec<String>,
}

pub struct MatchEngine<S: SimilarityProvider = CosineSimilarity> {
    scorer: JobScorer<S>,
}

impl MatchEngine<CosineSimilarity> {
    pub fn new() -> Self {
        Self {
            scorer: JobScorer::new(),
        }
    }

    pub fn from_config(config: &Config, taxonomy: SkillTaxonomy) -> Self {
        Self {
            scorer: JobScorer::with_parts(CosineSimilarity, taxonomy, config.scoring.weights),
        }
    }
}

impl Default for MatchEngine<CosineSimilarity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SimilarityProvider> MatchEngine<S> {
    pub fn with_scorer(scorer: JobScorer<S>) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &JobScorer<S> {
        &self.scorer
    }

    /// Score every job in iteration order. Corrupt jobs are skipped and reported, not fatal.
    pub fn score_all<'a, I>(&self, resume: &ResumeProfile, jobs: I) -> ScoredBatch
    where
        I: IntoIterator<Item = &'a JobPosting>,
    {
        let user_skills = resume.skill_set();
        let jobs = jobs.into_iter();
        let mut results = Vec::with_capacity(jobs.size_hint().0);
        let mut skipped_job_ids = Vec::new();

        for job in jobs {
            match self.scorer.score_job_with_skills(resume, &user_skills, job) {
                Ok(result) => results.push(result),
                Err(e) if e.is_per_job() => {
                    warn!("Skipping job {}: {}", job.id, e);
                    skipped_job_ids.push(job.id.clone());
                }
                Err(e) => {
                    warn!("Skipping job {} after unexpected error: {}", job.id, e);
                    skipped_job_ids.push(job.id.clone());
                }
            }
        }

        ScoredBatch {
            results,
            skipped_job_ids,
        }
    }

    /// Resolve the resume and job corpus from the store, then match
    pub fn find_job_matches(
        &self,
        store: &dyn JobStore,
        request: &MatchRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<MatchResponse> {
        request.validate()?;

        let resume = store.resume(&request.user_identifier)?.ok_or_else(|| {
            JobMatcherError::NotFound(format!("No resume found for {}", request.user_identifier))
        })?;

        let jobs = store.active_jobs()?;
        if jobs.is_empty() {
            return Err(JobMatcherError::NotFound("No active job postings available".to_string()));
        }

        self.match_profile(&resume, &jobs, request, rng)
    }

    /// Match an already-materialized resume against a job corpus
    pub fn match_profile(
        &self,
        resume: &ResumeProfile,
        jobs: &[JobPosting],
        request: &MatchRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<MatchResponse> {
        request.validate()?;
        let start_time = Instant::now();

        let excluded: HashSet<&str> = request.exclude_job_ids.iter().map(|id| id.as_str()).collect();
        let candidates: Vec<&JobPosting> = jobs
            .iter()
            .filter(|job| !excluded.contains(job.id.as_str()))
            .collect();

        let batch = self.score_all(resume, candidates.iter().copied());
        let mut scored: Vec<MatchResult> = batch
            .results
            .into_iter()
            .filter(|m| m.overall_score >= request.min_similarity)
            .collect();
        rank_matches(&mut scored);

        let total_found = scored.len();
        let rotating = request.randomize && total_found > request.top_k;
        let matches = select_matches(&scored, request.top_k, request.offset, request.randomize, rng);

        let (has_more, next_offset) = if rotating {
            (total_found > matches.len(), None)
        } else {
            let consumed = request.offset + matches.len();
            let has_more = consumed < total_found;
            (has_more, has_more.then_some(consumed))
        };

        info!(
            "Matched {} against {} jobs: {} above threshold, {} returned, {} skipped in {:.2?}",
            resume.email,
            candidates.len(),
            total_found,
            matches.len(),
            batch.skipped_job_ids.len(),
            start_time.elapsed()
        );

        Ok(MatchResponse {
            matches,
            total_found,
            total_jobs_analyzed: candidates.len(),
            has_more,
            next_offset,
            skipped_job_ids: batch.skipped_job_ids,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::selector::RandomSource;
    use crate::models::ExperienceLevel;
    use crate::store::InMemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FirstIndex;

    impl RandomSource for FirstIndex {
        fn next_index(&mut self, _upper: usize) -> usize {
            0
        }
    }

    fn resume() -> ResumeProfile {
        ResumeProfile {
            email: "dev@example.com".to_string(),
            experience_level: ExperienceLevel::Mid,
            years_of_experience: 3,
            skills: vec!["python".to_string(), "sql".to_string()],
            preferred_locations: vec!["Austin".to_string()],
            resume_embedding: vec![1.0, 0.0],
            skills_embedding: vec![1.0, 0.0],
        }
    }

    /// Job whose embedding has the given cosine with the resume embeddings
    fn job(id: usize, cosine: f32) -> JobPosting {
        let sine = (1.0 - cosine * cosine).max(0.0).sqrt();
        JobPosting {
            id: format!("job-{}", id),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            remote_allowed: true,
            salary_min: None,
            salary_max: None,
            experience_level: ExperienceLevel::Mid,
            skills_required: vec!["python".to_string()],
            description: String::new(),
            description_embedding: vec![cosine, sine],
            job_url: String::new(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_threshold_and_ranking() {
        let engine = MatchEngine::new();
        // overall = 0.7 * cosine + 0.3 with remote mid-level jobs
        let jobs = vec![job(0, 0.1), job(1, 0.9), job(2, 0.5), job(3, 0.0)];
        let mut request = MatchRequest::new("dev@example.com");
        request.min_similarity = 0.5;
        request.randomize = false;

        let response = engine.match_profile(&resume(), &jobs, &request, &mut FirstIndex).unwrap();
        let ids: Vec<&str> = response.matches.iter().map(|m| m.job_id.as_str()).collect();
        assert_eq!(ids, vec!["job-1", "job-2"]);
        assert_eq!(response.total_found, 2);
        assert_eq!(response.total_jobs_analyzed, 4);
        assert!(!response.has_more);
        assert_eq!(response.next_offset, None);
    }

    #[test]
    fn test_exclusions_and_corrupt_jobs() {
        let engine = MatchEngine::new();
        let mut corrupt = job(9, 0.9);
        corrupt.description_embedding = vec![1.0, 0.0, 0.0];
        let jobs = vec![job(0, 0.9), job(1, 0.8), corrupt];

        let mut request = MatchRequest::new("dev@example.com");
        request.exclude_job_ids = vec!["job-0".to_string()];
        request.randomize = false;

        let response = engine.match_profile(&resume(), &jobs, &request, &mut FirstIndex).unwrap();
        assert_eq!(response.total_jobs_analyzed, 2);
        assert_eq!(response.skipped_job_ids, vec!["job-9"]);
        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].job_id, "job-1");
    }

    #[test]
    fn test_score_all_borrows_jobs() {
        let engine = MatchEngine::new();
        let jobs = vec![job(0, 0.9), job(1, 0.4)];
        let subset: Vec<&JobPosting> = jobs.iter().filter(|j| j.id != "job-0").collect();

        let batch = engine.score_all(&resume(), subset);
        assert_eq!(batch.results.len(), 1);
        assert_eq!(batch.results[0].job_id, "job-1");
        assert!(batch.skipped_job_ids.is_empty());

        let all = engine.score_all(&resume(), &jobs);
        assert_eq!(all.results.len(), 2);
    }

    #[test]
    fn test_pagination_metadata() {
        let engine = MatchEngine::new();
        let jobs: Vec<JobPosting> = (0..7).map(|i| job(i, 0.95 - i as f32 * 0.05)).collect();
        let mut request = MatchRequest::new("dev@example.com");
        request.randomize = false;
        request.top_k = 3;

        let page = engine.match_profile(&resume(), &jobs, &request, &mut FirstIndex).unwrap();
        assert_eq!(page.matches.len(), 3);
        assert!(page.has_more);
        assert_eq!(page.next_offset, Some(3));

        request.offset = 6;
        let last = engine.match_profile(&resume(), &jobs, &request, &mut FirstIndex).unwrap();
        assert_eq!(last.matches.len(), 1);
        assert!(!last.has_more);
        assert_eq!(last.next_offset, None);
    }

    #[test]
    fn test_rotation_metadata() {
        let engine = MatchEngine::new();
        let jobs: Vec<JobPosting> = (0..10).map(|i| job(i, 0.95 - i as f32 * 0.02)).collect();
        let mut request = MatchRequest::new("dev@example.com");
        request.top_k = 4;
        request.offset = 100;

        let response = engine
            .match_profile(&resume(), &jobs, &request, &mut StdRng::seed_from_u64(5))
            .unwrap();
        // Every candidate is excellent, so only the excellent quota comes back
        assert_eq!(response.matches.len(), 2);
        assert!(response.has_more);
        assert_eq!(response.next_offset, None);
    }

    #[test]
    fn test_missing_resume_is_not_found() {
        let engine = MatchEngine::new();
        let mut store = InMemoryStore::new();
        store.insert_job(job(0, 0.9));
        let err = engine
            .find_job_matches(&store, &MatchRequest::new("ghost@example.com"), &mut FirstIndex)
            .unwrap_err();
        assert!(matches!(err, JobMatcherError::NotFound(_)));
    }

    #[test]
    fn test_empty_corpus_is_not_found() {
        let engine = MatchEngine::new();
        let mut store = InMemoryStore::new();
        store.insert_resume(resume());
        let err = engine
            .find_job_matches(&store, &MatchRequest::new("dev@example.com"), &mut FirstIndex)
            .unwrap_err();
        assert!(matches!(err, JobMatcherError::NotFound(_)));
    }

    #[test]
    fn test_invalid_request() {
        let engine = MatchEngine::new();
        let mut request = MatchRequest::new("dev@example.com");
        request.min_similarity = 2.0;
        assert!(matches!(
            engine.match_profile(&resume(), &[job(0, 0.9)], &request, &mut FirstIndex),
            Err(JobMatcherError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: MatchRequest = serde_json::from_str(r#"{"user_identifier": "a@b.c"}"#).unwrap();
        assert_eq!(request, MatchRequest::new("a@b.c"));
        assert_eq!(request.top_k, 30);
        assert!(request.randomize);
    }
}
