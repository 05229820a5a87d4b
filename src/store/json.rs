//! Loading resumes and jobs from JSON files

use crate::error::{JobMatcherError, Result};
use crate::matching::taxonomy::SkillTaxonomy;
use crate::models::{JobPosting, ResumeProfile};
use crate::store::InMemoryStore;
use log::{info, warn};
use std::path::Path;
use tokio::fs;

/// Parse a JSON array of resumes
pub fn parse_resumes(content: &str) -> Result<Vec<ResumeProfile>> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a JSON array of jobs.
///
/// Jobs that arrive without required skills get them mined from the description.
pub fn parse_jobs(content: &str, taxonomy: &SkillTaxonomy) -> Result<Vec<JobPosting>> {
    let mut jobs: Vec<JobPosting> = serde_json::from_str(content)?;

    for job in jobs.iter_mut() {
        if job.skills_required.is_empty() && !job.description.trim().is_empty() {
            job.skills_required = taxonomy.extract_skills(&job.description);
            info!(
                "Inferred {} skills for job {} from its description",
                job.skills_required.len(),
                job.id
            );
        }
        if job.description_embedding.is_empty() {
            warn!("Job {} has no description embedding; semantic scores will be 0", job.id);
        }
    }

    Ok(jobs)
}

/// Build an in-memory store from a resumes file and a jobs file
pub async fn load_store(resumes_path: &Path, jobs_path: &Path, taxonomy: &SkillTaxonomy) -> Result<InMemoryStore> {
    let resumes_text = read_file(resumes_path).await?;
    let jobs_text = read_file(jobs_path).await?;

    let mut store = InMemoryStore::new();
    for resume in parse_resumes(&resumes_text)? {
        store.insert_resume(resume);
    }
    for job in parse_jobs(&jobs_text, taxonomy)? {
        store.insert_job(job);
    }

    info!(
        "Loaded {} resumes and {} jobs",
        store.resume_count(),
        store.job_count()
    );
    Ok(store)
}

async fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(JobMatcherError::NotFound(format!(
            "File does not exist: {}",
            path.display()
        )));
    }
    Ok(fs::read_to_string(path).await?)
}
