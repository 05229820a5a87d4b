//! Resume and job storage contract plus the in-memory implementation

pub mod json;

use crate::error::Result;
use crate::models::{JobPosting, ResumeProfile};
use std::collections::HashMap;

/// Supplies materialized resumes and jobs to the matching engine
pub trait JobStore: Send + Sync {
    /// Resume by candidate email (case-insensitive); `None` when unknown
    fn resume(&self, email: &str) -> Result<Option<ResumeProfile>>;

    /// Every active job posting, in stable iteration order
    fn active_jobs(&self) -> Result<Vec<JobPosting>>;

    /// Duplicate check used by ingestion: title and company compared case-insensitively
    fn jobs_by_title_company(&self, title: &str, company: &str) -> Result<Vec<JobPosting>>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    resumes: HashMap<String, ResumeProfile>,
    jobs: Vec<JobPosting>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_resume(&mut self, resume: ResumeProfile) {
        self.resumes.insert(resume.email.trim().to_lowercase(), resume);
    }

    /// Add a job, ignoring it when its id is already present. Returns whether it was added.
    pub fn insert_job(&mut self, job: JobPosting) -> bool {
        if self.jobs.iter().any(|existing| existing.id == job.id) {
            log::warn!("Duplicate job id {} ignored", job.id);
            return false;
        }
        self.jobs.push(job);
        true
    }

    pub fn resume_count(&self) -> usize {
        self.resumes.len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }
}

impl JobStore for InMemoryStore {
    fn resume(&self, email: &str) -> Result<Option<ResumeProfile>> {
        Ok(self.resumes.get(&email.trim().to_lowercase()).cloned())
    }

    fn active_jobs(&self) -> Result<Vec<JobPosting>> {
        Ok(self.jobs.clone())
    }

    fn jobs_by_title_company(&self, title: &str, company: &str) -> Result<Vec<JobPosting>> {
        let title = title.trim().to_lowercase();
        let company = company.trim().to_lowercase();
        Ok(self
            .jobs
            .iter()
            .filter(|job| job.title.trim().to_lowercase() == title && job.company.trim().to_lowercase() == company)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExperienceLevel;

    fn job(id: &str, title: &str, company: &str) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            location: String::new(),
            remote_allowed: false,
            salary_min: None,
            salary_max: None,
            experience_level: ExperienceLevel::Mid,
            skills_required: vec![],
            description: String::new(),
            description_embedding: vec![],
            job_url: String::new(),
            source: String::new(),
        }
    }

    #[test]
    fn test_resume_lookup_is_case_insensitive() {
        let mut store = InMemoryStore::new();
        store.insert_resume(ResumeProfile {
            email: "Dev@Example.com".to_string(),
            experience_level: ExperienceLevel::Mid,
            years_of_experience: 3,
            skills: vec![],
            preferred_locations: vec![],
            resume_embedding: vec![],
            skills_embedding: vec![],
        });
        assert!(store.resume("dev@example.com").unwrap().is_some());
        assert!(store.resume("other@example.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut store = InMemoryStore::new();
        assert!(store.insert_job(job("1", "SRE", "Acme")));
        assert!(!store.insert_job(job("1", "Other", "Acme")));
        assert_eq!(store.job_count(), 1);
    }

    #[test]
    fn test_jobs_by_title_company() {
        let mut store = InMemoryStore::new();
        store.insert_job(job("1", "Data Engineer", "Acme"));
        store.insert_job(job("2", "data engineer ", "ACME"));
        store.insert_job(job("3", "Data Engineer II", "Acme"));
        let found = store.jobs_by_title_company("Data Engineer", "acme").unwrap();
        let ids: Vec<&str> = found.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
