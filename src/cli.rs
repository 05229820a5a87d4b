//! CLI interface for the job matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "job-matcher")]
#[command(about = "Match resumes to job postings and explain the skill gaps")]
#[command(long_about = "Score job postings against a candidate's resume using embedding similarity, experience fit and location fit, then categorize the missing skills and estimate the learning effort")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skill taxonomy TOML file, overriding `matching.taxonomy_path`
    #[arg(short, long, global = true)]
    pub taxonomy: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the best job matches for a candidate
    Match {
        /// Candidate email used to look up the resume
        #[arg(short, long)]
        email: String,

        /// JSON file with resume profiles
        #[arg(short, long)]
        resumes: PathBuf,

        /// JSON file with job postings
        #[arg(short, long)]
        jobs: PathBuf,

        /// Number of matches to return (defaults to config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Pagination offset, ignored when results rotate
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Minimum overall score in [0, 1] (defaults to config)
        #[arg(short, long)]
        min_similarity: Option<f32>,

        /// Job ids to leave out, comma separated
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Return a stable ranked page instead of rotating strong matches
        #[arg(long)]
        no_randomize: bool,

        /// Seed for reproducible rotation
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: console, json, markdown (defaults to config)
        #[arg(short, long)]
        output: Option<String>,

        /// Show component scores and skill lists
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show the gap analysis for one job
    Gaps {
        /// Candidate email used to look up the resume
        #[arg(short, long)]
        email: String,

        /// JSON file with resume profiles
        #[arg(short, long)]
        resumes: PathBuf,

        /// JSON file with job postings
        #[arg(short, long)]
        jobs: PathBuf,

        /// Id of the job to analyze
        #[arg(long)]
        job_id: String,

        /// Output format: console, json, markdown (defaults to config)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Skill taxonomy commands
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum TaxonomyAction {
    /// List the known skills mentioned in a piece of text
    Extract {
        /// Text to scan, such as a job description
        text: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}
