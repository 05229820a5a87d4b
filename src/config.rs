//! Configuration management for the job matcher

use crate::error::{JobMatcherError, Result};
use crate::matching::taxonomy::SkillTaxonomy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub matching: MatchingConfig,
    pub scoring: ScoringConfig,
    pub cache: CacheConfig,
    pub output: OutputConfig,
}

/// Defaults applied to match requests that leave a field unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub top_k: usize,
    pub min_similarity: f32,
    pub randomize: bool,
    /// TOML file replacing the built-in skill taxonomy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
}

/// Component weights for the overall match score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub semantic: f32,
    pub skills: f32,
    pub experience: f32,
    pub location: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic: 0.25,
            skills: 0.45,
            experience: 0.20,
            location: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f32 {
        self.semantic + self.skills + self.experience + self.location
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                top_k: 30,
                min_similarity: 0.3,
                randomize: true,
                taxonomy_path: None,
            },
            scoring: ScoringConfig {
                weights: ScoringWeights::default(),
            },
            cache: CacheConfig {
                ttl_secs: 300,
                max_entries: 256,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path, writing defaults there if the file does not exist yet
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| JobMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-matcher")
            .join("config.toml")
    }

    /// Skill taxonomy from `matching.taxonomy_path`, or the built-in tables when unset
    pub fn load_taxonomy(&self) -> Result<SkillTaxonomy> {
        match &self.matching.taxonomy_path {
            Some(path) => SkillTaxonomy::from_file(path),
            None => Ok(SkillTaxonomy::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.scoring.weights;
        if [w.semantic, w.skills, w.experience, w.location].iter().any(|v| *v < 0.0) {
            return Err(JobMatcherError::Configuration(
                "Scoring weights must be non-negative".to_string(),
            ));
        }
        if (w.sum() - 1.0).abs() > 1e-3 {
            return Err(JobMatcherError::Configuration(format!(
                "Scoring weights must sum to 1.0, got {:.3}",
                w.sum()
            )));
        }
        if !(0.0..=1.0).contains(&self.matching.min_similarity) {
            return Err(JobMatcherError::Configuration(format!(
                "min_similarity must be within [0, 1], got {}",
                self.matching.min_similarity
            )));
        }
        if self.matching.top_k == 0 {
            return Err(JobMatcherError::Configuration("top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}
