//! Job matcher: rank job postings for a resume and explain the skill gaps

use anyhow::{anyhow, Context};
use clap::Parser;
use job_matcher::cli::{self, Cli, Commands, ConfigAction, TaxonomyAction};
use job_matcher::config::{Config, OutputFormat};
use job_matcher::matching::{MatchEngine, MatchRequest, SkillTaxonomy};
use job_matcher::output::formatter::{save_report_to_file, ReportGenerator};
use job_matcher::service::MatchService;
use job_matcher::store::json::load_store;
use job_matcher::store::JobStore;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // Config commands must still work when the file on disk is invalid
    if let Commands::Config { action } = cli.command {
        if let Err(e) = run_config_command(action, &config_path) {
            error!("Command failed: {:#}", e);
            process::exit(1);
        }
        return;
    }

    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration from {}: {}", config_path.display(), e);
            process::exit(1);
        }
    };

    let taxonomy = match load_taxonomy(cli.taxonomy.as_deref(), &config) {
        Ok(taxonomy) => taxonomy,
        Err(e) => {
            error!("Failed to load skill taxonomy: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, taxonomy, &config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    config: Config,
    taxonomy: SkillTaxonomy,
    config_path: &Path,
) -> anyhow::Result<()> {
    match command {
        Commands::Match {
            email,
            resumes,
            jobs,
            top_k,
            offset,
            min_similarity,
            exclude,
            no_randomize,
            seed,
            output,
            detailed,
            save,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let store = load_store(&resumes, &jobs, &taxonomy)
                .await
                .context("Failed to load resumes and jobs")?;

            let mut request = MatchRequest::from_config(email, &config.matching);
            if let Some(top_k) = top_k {
                request.top_k = top_k;
            }
            if let Some(min_similarity) = min_similarity {
                request.min_similarity = min_similarity;
            }
            request.offset = offset;
            request.exclude_job_ids = exclude;
            if no_randomize {
                request.randomize = false;
            }

            let service = MatchService::from_config(&config, MatchEngine::from_config(&config, taxonomy));
            let response = match seed {
                Some(seed) => {
                    info!("Using seeded rotation ({})", seed);
                    let mut rng = StdRng::seed_from_u64(seed);
                    service.handle(&store, &request, &mut rng)?
                }
                None => {
                    let mut rng = rand::thread_rng();
                    service.handle(&store, &request, &mut rng)?
                }
            };

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let report = generator.generate_matches(&response, &format)?;
            emit(&report, save)?;
        }

        Commands::Gaps {
            email,
            resumes,
            jobs,
            job_id,
            output,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let store = load_store(&resumes, &jobs, &taxonomy)
                .await
                .context("Failed to load resumes and jobs")?;

            let resume = store
                .resume(&email)?
                .ok_or_else(|| anyhow!("No resume found for {}", email))?;
            let job = store
                .jobs()
                .iter()
                .find(|job| job.id == job_id)
                .ok_or_else(|| anyhow!("No job with id {}", job_id))?;

            let engine = MatchEngine::from_config(&config, taxonomy);
            let result = engine
                .scorer()
                .score_job(&resume, job)
                .with_context(|| format!("Job {} could not be scored", job_id))?;

            let generator = ReportGenerator::with_options(config.output.color_output, true, true, true);
            println!("{}", generator.generate_gap_report(&result, &format)?);
        }

        Commands::Taxonomy { action } => match action {
            TaxonomyAction::Extract { text } => {
                let skills = taxonomy.extract_skills(&text);
                if skills.is_empty() {
                    println!("No known skills found");
                } else {
                    println!("🔍 Found {} skills:", skills.len());
                    for skill in skills {
                        let marker = if taxonomy.is_trending(&skill) { " 📈" } else { "" };
                        println!("  • {}{}", skill, marker);
                    }
                }
            }
        },

        Commands::Config { action } => run_config_command(action, config_path)?,
    }

    Ok(())
}

fn run_config_command(action: Option<ConfigAction>, config_path: &Path) -> anyhow::Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let config = Config::load_from(config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?;
            println!("⚙️  Current Configuration\n");
            println!("Matching:");
            println!("  Top K: {}", config.matching.top_k);
            println!("  Minimum score: {:.2}", config.matching.min_similarity);
            println!("  Rotate strong matches: {}", config.matching.randomize);
            match &config.matching.taxonomy_path {
                Some(path) => println!("  Taxonomy: {}", path.display()),
                None => println!("  Taxonomy: built-in"),
            }
            println!("\nScoring Weights:");
            let w = &config.scoring.weights;
            println!("  Semantic: {:.1}%", w.semantic * 100.0);
            println!("  Skills: {:.1}%", w.skills * 100.0);
            println!("  Experience: {:.1}%", w.experience * 100.0);
            println!("  Location: {:.1}%", w.location * 100.0);
            println!("\nRequest Cache:");
            println!("  TTL: {}s", config.cache.ttl_secs);
            println!("  Max entries: {}", config.cache.max_entries);
            println!("\nOutput: {:?}", config.output.format);
        }

        Some(ConfigAction::Reset) => {
            println!("🔄 Resetting configuration to defaults...");
            Config::default().save_to(config_path)?;
            println!("✅ Configuration reset successfully!");
        }

        Some(ConfigAction::Path) => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// `--taxonomy` wins over `matching.taxonomy_path`; neither means the built-in tables
fn load_taxonomy(flag: Option<&Path>, config: &Config) -> anyhow::Result<SkillTaxonomy> {
    let taxonomy = match flag {
        Some(path) => SkillTaxonomy::from_file(path),
        None => config.load_taxonomy(),
    };
    Ok(taxonomy?)
}

fn resolve_format(requested: Option<&str>, config: &Config) -> anyhow::Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(|e| anyhow!(e)),
        None => Ok(config.output.format),
    }
}

fn emit(report: &str, save: Option<PathBuf>) -> anyhow::Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(report, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("💾 Saved report to {}", path.display());
        }
        None => println!("{}", report),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_reset_repairs_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "matching = \"not a table\"").unwrap();
        assert!(Config::load_from(&path).is_err());

        run_config_command(Some(ConfigAction::Path), &path).unwrap();
        run_config_command(Some(ConfigAction::Reset), &path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().matching.top_k, 30);
    }

    #[test]
    fn test_config_show_reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "matching = 1").unwrap();
        assert!(run_config_command(Some(ConfigAction::Show), &path).is_err());
    }

    #[test]
    fn test_taxonomy_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.toml");
        std::fs::write(&path, "tech_skills = [\"cobol\"]\ntrending_skills = []\n[categories]\n").unwrap();

        let mut config = Config::default();
        config.matching.taxonomy_path = Some(dir.path().join("missing.toml"));

        let taxonomy = load_taxonomy(Some(&path), &config).unwrap();
        assert_eq!(taxonomy.extract_skills("COBOL and Rust"), vec!["cobol"]);
        assert!(load_taxonomy(None, &config).is_err());
    }
}
