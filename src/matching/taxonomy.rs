//! Static skill taxonomy: tech keywords, trending skills and category core skills

use crate::error::{JobMatcherError, Result};
use crate::models::normalize_skill;
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Raw tables, as loaded from TOML or built in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyTables {
    pub tech_skills: Vec<String>,
    pub trending_skills: Vec<String>,
    /// Category keyword (matched against job title/description) to its core skills
    pub categories: BTreeMap<String, Vec<String>>,
}

pub struct SkillTaxonomy {
    tech_skills: Vec<String>,
    trending: HashSet<String>,
    categories: Vec<(String, Vec<String>)>,
    matcher: AhoCorasick,
}

impl SkillTaxonomy {
    pub fn from_tables(tables: TaxonomyTables) -> Result<Self> {
        let mut tech_skills: Vec<String> = tables
            .tech_skills
            .iter()
            .map(|s| normalize_skill(s))
            .filter(|s| !s.is_empty())
            .collect();
        tech_skills.sort();
        tech_skills.dedup();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&tech_skills)
            .map_err(|e| JobMatcherError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        let trending = tables.trending_skills.iter().map(|s| normalize_skill(s)).collect();

        let categories = tables
            .categories
            .into_iter()
            .map(|(keyword, skills)| {
                let skills = skills.iter().map(|s| normalize_skill(s)).collect();
                (keyword.to_lowercase(), skills)
            })
            .collect();

        Ok(Self {
            tech_skills,
            trending,
            categories,
            matcher,
        })
    }

    /// Load replacement tables from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let tables: TaxonomyTables = toml::from_str(content)
            .map_err(|e| JobMatcherError::Configuration(format!("Failed to parse taxonomy: {}", e)))?;
        Self::from_tables(tables)
    }

    /// Load replacement tables from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(JobMatcherError::NotFound(format!(
                "Taxonomy file does not exist: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let taxonomy = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded taxonomy from {} ({} skills, {} categories)",
            path.display(),
            taxonomy.skill_count(),
            taxonomy.category_count()
        );
        Ok(taxonomy)
    }

    pub fn is_trending(&self, skill: &str) -> bool {
        self.trending.contains(&normalize_skill(skill))
    }

    /// Core skills of every category whose keyword occurs in the title or description
    pub fn core_skills_for<'a>(&'a self, title: &str, description: &str) -> Vec<&'a str> {
        let title = title.to_lowercase();
        let description = description.to_lowercase();

        self.categories
            .iter()
            .filter(|(keyword, _)| title.contains(keyword.as_str()) || description.contains(keyword.as_str()))
            .flat_map(|(_, skills)| skills.iter().map(|s| s.as_str()))
            .collect()
    }

    /// Scan free text for known tech skills.
    ///
    /// Returns unique lowercase skills in first-seen order; hits inside a larger word are ignored.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut skills = Vec::new();

        for mat in self.matcher.find_iter(text) {
            if !is_word_boundary(text, mat.start(), mat.end()) {
                continue;
            }
            let skill = &self.tech_skills[mat.pattern().as_usize()];
            if seen.insert(skill.clone()) {
                skills.push(skill.clone());
            }
        }

        skills
    }

    pub fn skill_count(&self) -> usize {
        self.tech_skills.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn default_tables() -> TaxonomyTables {
        let to_strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let tech_skills = to_strings(&[
            // Programming languages
            "python", "javascript", "typescript", "java", "c++", "c#", "go", "golang", "rust",
            "ruby", "php", "swift", "kotlin", "scala", "sql", "bash",
            // Web
            "react", "vue", "angular", "svelte", "html", "css", "node.js", "express", "django",
            "flask", "fastapi", "spring", "graphql", "rest",
            // Cloud and infrastructure
            "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible", "jenkins",
            "ci/cd", "linux", "microservices", "serverless",
            // Data stores
            "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "dynamodb", "snowflake",
            // Data and machine learning
            "machine learning", "deep learning", "tensorflow", "pytorch", "scikit-learn",
            "pandas", "numpy", "spark", "hadoop", "kafka", "airflow", "etl", "tableau",
            "llm", "generative ai", "mlops",
            // Mobile
            "react native", "flutter", "android", "ios",
            // Practices
            "git", "agile", "scrum", "testing",
        ]);

        let trending_skills = to_strings(&[
            "ai", "machine learning", "llm", "generative ai", "prompt engineering", "mlops",
            "rust", "go", "kubernetes", "terraform", "serverless", "snowflake", "dbt",
            "vector databases", "web3",
        ]);

        let mut categories = BTreeMap::new();
        categories.insert("data".to_string(), to_strings(&["python", "sql", "spark", "pandas", "etl"]));
        categories.insert("cloud".to_string(), to_strings(&["aws", "azure", "gcp", "kubernetes", "docker"]));
        categories.insert("web".to_string(), to_strings(&["javascript", "html", "css", "react"]));
        categories.insert("frontend".to_string(), to_strings(&["javascript", "typescript", "react", "css"]));
        categories.insert("backend".to_string(), to_strings(&["python", "java", "sql", "rest"]));
        categories.insert("devops".to_string(), to_strings(&["docker", "kubernetes", "terraform", "ci/cd"]));
        categories.insert("mobile".to_string(), to_strings(&["swift", "kotlin", "react native", "flutter"]));
        categories.insert(
            "machine learning".to_string(),
            to_strings(&["python", "tensorflow", "pytorch", "scikit-learn"]),
        );
        categories.insert("security".to_string(), to_strings(&["linux", "networking", "python"]));

        TaxonomyTables {
            tech_skills,
            trending_skills,
            categories,
        }
    }
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self::from_tables(Self::default_tables()).expect("Built-in taxonomy must build")
    }
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy() {
        let taxonomy = SkillTaxonomy::default();
        assert!(taxonomy.skill_count() > 50);
        assert!(taxonomy.category_count() >= 5);
        assert!(taxonomy.is_trending("Kubernetes"));
        assert!(!taxonomy.is_trending("php"));
    }

    #[test]
    fn test_core_skills_from_title_or_description() {
        let taxonomy = SkillTaxonomy::default();
        let core = taxonomy.core_skills_for("Cloud Engineer", "");
        assert!(core.contains(&"aws"));

        let core = taxonomy.core_skills_for("Engineer", "Build our data platform");
        assert!(core.contains(&"spark"));

        assert!(taxonomy.core_skills_for("Accountant", "Bookkeeping").is_empty());
    }

    #[test]
    fn test_extract_skills_respects_word_boundaries() {
        let taxonomy = SkillTaxonomy::default();
        let skills = taxonomy.extract_skills("Looking for Python and AWS. Django a plus; golfing not required.");
        assert_eq!(skills, vec!["python", "aws", "django"]);
    }

    #[test]
    fn test_extract_prefers_longest_match() {
        let taxonomy = SkillTaxonomy::default();
        let skills = taxonomy.extract_skills("Experience with React Native and machine learning");
        assert!(skills.contains(&"react native".to_string()));
        assert!(skills.contains(&"machine learning".to_string()));
        assert!(!skills.contains(&"react".to_string()));
    }

    #[test]
    fn test_from_toml() {
        let content = r#"
            tech_skills = ["Elixir", "Phoenix"]
            trending_skills = ["elixir"]

            [categories]
            functional = ["elixir"]
        "#;
        let taxonomy = SkillTaxonomy::from_toml_str(content).unwrap();
        assert_eq!(taxonomy.skill_count(), 2);
        assert!(taxonomy.is_trending("ELIXIR"));
        assert_eq!(taxonomy.core_skills_for("Functional Programmer", ""), vec!["elixir"]);
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            SkillTaxonomy::from_file(Path::new("no/such/taxonomy.toml")),
            Err(JobMatcherError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(SkillTaxonomy::from_toml_str("tech_skills = 3").is_err());
    }
}
