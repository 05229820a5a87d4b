//! Skill gap categorization

use crate::matching::taxonomy::SkillTaxonomy;
use crate::models::normalize_skill;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Mentions in the job description at or above this count mark a skill as important
const IMPORTANT_MENTION_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapCategory {
    Critical,
    Important,
    Trending,
    NiceToHave,
}

impl GapCategory {
    /// Buckets in priority order
    pub const ALL: [GapCategory; 4] = [
        GapCategory::Critical,
        GapCategory::Important,
        GapCategory::Trending,
        GapCategory::NiceToHave,
    ];
}

impl fmt::Display for GapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GapCategory::Critical => "critical",
            GapCategory::Important => "important",
            GapCategory::Trending => "trending",
            GapCategory::NiceToHave => "nice_to_have",
        };
        f.write_str(label)
    }
}

/// Missing skills for one job, split into four buckets.
///
/// Each bucket keeps the order the job's required skills were scanned in, and a
/// skill lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGapSet {
    pub critical: Vec<String>,
    pub important: Vec<String>,
    pub trending: Vec<String>,
    pub nice_to_have: Vec<String>,
}

impl SkillGapSet {
    pub fn bucket(&self, category: GapCategory) -> &[String] {
        match category {
            GapCategory::Critical => &self.critical,
            GapCategory::Important => &self.important,
            GapCategory::Trending => &self.trending,
            GapCategory::NiceToHave => &self.nice_to_have,
        }
    }

    fn bucket_mut(&mut self, category: GapCategory) -> &mut Vec<String> {
        match category {
            GapCategory::Critical => &mut self.critical,
            GapCategory::Important => &mut self.important,
            GapCategory::Trending => &mut self.trending,
            GapCategory::NiceToHave => &mut self.nice_to_have,
        }
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.important.len() + self.trending.len() + self.nice_to_have.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Category a skill was filed under, compared case-insensitively
    pub fn category_of(&self, skill: &str) -> Option<GapCategory> {
        let needle = normalize_skill(skill);
        GapCategory::ALL
            .into_iter()
            .find(|category| self.bucket(*category).iter().any(|s| normalize_skill(s) == needle))
    }

    /// All missing skills in priority order
    pub fn iter(&self) -> impl Iterator<Item = (GapCategory, &str)> + '_ {
        GapCategory::ALL
            .into_iter()
            .flat_map(move |category| self.bucket(category).iter().map(move |s| (category, s.as_str())))
    }
}

pub struct GapCategorizer<'a> {
    taxonomy: &'a SkillTaxonomy,
}

impl<'a> GapCategorizer<'a> {
    pub fn new(taxonomy: &'a SkillTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Classify every required skill the candidate lacks.
    ///
    /// `user_skills` must already be normalized (see [`normalize_skill`]).
    /// Precedence is critical > important > trending > nice-to-have.
    pub fn categorize_gaps(
        &self,
        user_skills: &HashSet<String>,
        job_skills: &[String],
        job_title: &str,
        job_description: &str,
    ) -> SkillGapSet {
        let title = job_title.to_lowercase();
        let description = job_description.to_lowercase();
        let core_skills = self.taxonomy.core_skills_for(job_title, job_description);

        let mut gaps = SkillGapSet::default();
        let mut filed = HashSet::new();

        for job_skill in job_skills {
            let skill = normalize_skill(job_skill);
            if skill.is_empty() || user_skills.contains(&skill) || !filed.insert(skill.clone()) {
                continue;
            }

            let is_critical =
                title.contains(&skill) || core_skills.iter().any(|core| skill.contains(*core));
            let is_important = description.matches(skill.as_str()).count() >= IMPORTANT_MENTION_THRESHOLD;
            let is_trending = self.taxonomy.is_trending(&skill);

            let category = if is_critical {
                GapCategory::Critical
            } else if is_important {
                GapCategory::Important
            } else if is_trending {
                GapCategory::Trending
            } else {
                GapCategory::NiceToHave
            };

            log::debug!("Gap '{}' filed as {}", job_skill.trim(), category);
            gaps.bucket_mut(category).push(job_skill.trim().to_string());
        }

        gaps
    }
}
