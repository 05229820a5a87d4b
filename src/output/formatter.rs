//! Output formatters for match results and gap reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::matching::explanation::quality_band;
use crate::matching::{GapCategory, MatchResponse, MatchResult};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering match responses and single-job gap reports
pub trait OutputFormatter {
    fn format_matches(&self, response: &MatchResponse) -> Result<String>;
    fn format_gap_report(&self, result: &MatchResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn percent(score: f32) -> u32 {
    (score * 100.0).round() as u32
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f32) -> String {
        let band = quality_band(score);
        let color = match band {
            "Excellent" => Color::Green,
            "Good" => Color::BrightGreen,
            "Fair" => Color::Yellow,
            _ => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", band.to_uppercase().color(color).bold())
        } else {
            format!("[{}]", band.to_uppercase())
        }
    }

    fn category_icon(&self, category: GapCategory) -> &'static str {
        match (category, self.use_colors) {
            (GapCategory::Critical, true) => "🚨",
            (GapCategory::Important, true) => "⚠️",
            (GapCategory::Trending, true) => "📈",
            (GapCategory::NiceToHave, true) => "💡",
            (GapCategory::Critical, false) => "[!]",
            (GapCategory::Important, false) => "[*]",
            (GapCategory::Trending, false) => "[^]",
            (GapCategory::NiceToHave, false) => "[+]",
        }
    }

    fn format_match_line(&self, index: usize, result: &MatchResult) -> String {
        let mut output = format!(
            "{}. {} at {} - {}% {}\n",
            index,
            self.colorize(&result.title, Color::Cyan),
            result.company,
            percent(result.overall_score),
            self.format_score_badge(result.overall_score)
        );

        let location = if result.remote_allowed {
            "Remote".to_string()
        } else if result.location.is_empty() {
            "Location not listed".to_string()
        } else {
            result.location.clone()
        };
        output.push_str(&format!("   📍 {} | 🆔 {}\n", location, result.job_id));
        output.push_str(&format!("   {}\n", result.explanation));

        if self.detailed {
            let s = &result.scores;
            output.push_str(&format!(
                "   Semantic {}% | Skills {}% | Experience {}% | Location {}%\n",
                percent(s.semantic_similarity),
                percent(s.skills_similarity),
                percent(s.experience_match),
                percent(s.location_match)
            ));
            if !result.skill_matches.is_empty() {
                output.push_str(&format!("   ✅ Matched: {}\n", result.skill_matches.join(", ")));
            }
            let gaps: Vec<&str> = result.gap_analysis.skill_gaps.iter().map(|(_, s)| s).collect();
            if !gaps.is_empty() {
                output.push_str(&format!("   🎯 Missing: {}\n", gaps.join(", ")));
            }
            if !result.job_url.is_empty() {
                output.push_str(&format!("   🔗 {}\n", result.job_url));
            }
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_matches(&self, response: &MatchResponse) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("💼 JOB MATCHES", 1));
        output.push_str(&format!(
            "Generated: {} | Jobs analyzed: {} | Above threshold: {}\n",
            response.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            response.total_jobs_analyzed,
            response.total_found
        ));

        if response.matches.is_empty() {
            output.push_str(&self.colorize("\nNo jobs met the minimum match score.\n", Color::Yellow));
        } else {
            output.push_str(&self.format_header("Top Matches", 2));
            for (i, result) in response.matches.iter().enumerate() {
                output.push_str(&self.format_match_line(i + 1, result));
                output.push('\n');
            }
        }

        if !response.skipped_job_ids.is_empty() {
            output.push_str(&self.colorize(
                &format!(
                    "⚠️  Skipped {} job(s) with unusable data: {}\n",
                    response.skipped_job_ids.len(),
                    response.skipped_job_ids.join(", ")
                ),
                Color::Yellow,
            ));
        }

        if let Some(next) = response.next_offset {
            output.push_str(&format!("More results available: rerun with --offset {}\n", next));
        } else if response.has_more {
            output.push_str("More results available: rerun to rotate through other strong matches\n");
        }

        Ok(output)
    }

    fn format_gap_report(&self, result: &MatchResult) -> Result<String> {
        let analysis = &result.gap_analysis;
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("📊 GAP ANALYSIS: {} at {}", result.title, result.company), 1));
        output.push_str(&format!(
            "Overall Score: {}% {}\n",
            percent(result.overall_score),
            self.format_score_badge(result.overall_score)
        ));
        output.push_str(&format!("{}\n", self.colorize(&result.explanation, Color::Cyan)));

        output.push_str(&self.format_header("Severity", 2));
        output.push_str(&format!(
            "Severity score: {}/100 | Difficulty: {} | Estimated learning: {} weeks\n",
            analysis.severity_score, analysis.difficulty_level, analysis.estimated_learning_weeks
        ));
        output.push_str(&format!(
            "Total gaps: {} ({} critical, {} important) | Potential improvement: +{} points\n",
            analysis.total_gaps,
            analysis.critical_gaps,
            analysis.important_gaps,
            analysis.potential_score_improvement
        ));

        output.push_str(&self.format_header("Learning Priorities", 2));
        if analysis.learning_priorities.is_empty() {
            output.push_str("You already have every skill this job lists.\n");
        }
        for gap in &analysis.learning_priorities {
            let effort = if gap.base_weeks > 0 {
                format!("~{} weeks", gap.base_weeks)
            } else {
                "optional".to_string()
            };
            output.push_str(&format!(
                "{} {}. {} ({}, {})\n",
                self.category_icon(gap.category),
                gap.rank,
                gap.skill,
                gap.category,
                effort
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_matches(&self, response: &MatchResponse) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(response)?)
        } else {
            Ok(serde_json::to_string(response)?)
        }
    }

    fn format_gap_report(&self, result: &MatchResult) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(result)?)
        } else {
            Ok(serde_json::to_string(result)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_matches(&self, response: &MatchResponse) -> Result<String> {
        let mut output = String::from("# 💼 Job Matches\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Jobs analyzed:** {} | **Above threshold:** {}\n\n",
                response.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                response.total_jobs_analyzed,
                response.total_found
            ));
        }

        output.push_str("| # | Title | Company | Score | Band | Matched skills |\n");
        output.push_str("|---|-------|---------|-------|------|----------------|\n");
        for (i, result) in response.matches.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {} | {}% | {} | {} |\n",
                i + 1,
                result.title,
                result.company,
                percent(result.overall_score),
                quality_band(result.overall_score),
                result.skill_matches.join(", ")
            ));
        }
        output.push('\n');

        for result in &response.matches {
            output.push_str(&format!("### {} ({})\n\n> {}\n\n", result.title, result.company, result.explanation));
        }

        if let Some(next) = response.next_offset {
            output.push_str(&format!("*Next page offset: {}*\n", next));
        }

        Ok(output)
    }

    fn format_gap_report(&self, result: &MatchResult) -> Result<String> {
        let analysis = &result.gap_analysis;
        let mut output = format!("# 📊 Gap Analysis: {} at {}\n\n", result.title, result.company);

        output.push_str(&format!(
            "**Overall Score:** {}% ({})\n\n> {}\n\n",
            percent(result.overall_score),
            quality_band(result.overall_score),
            result.explanation
        ));

        output.push_str("| Severity | Difficulty | Learning weeks | Potential improvement |\n");
        output.push_str("|----------|------------|----------------|-----------------------|\n");
        output.push_str(&format!(
            "| {}/100 | {} | {} | +{} |\n\n",
            analysis.severity_score,
            analysis.difficulty_level,
            analysis.estimated_learning_weeks,
            analysis.potential_score_improvement
        ));

        for category in GapCategory::ALL {
            let skills = analysis.skill_gaps.bucket(category);
            if !skills.is_empty() {
                output.push_str(&format!("**{}:** `{}`\n\n", category, skills.join("`, `")));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: &OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_matches(&self, response: &MatchResponse, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_matches(response)
    }

    pub fn generate_gap_report(&self, result: &MatchResult, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_gap_report(result)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, user: &str, timestamp: bool) -> String {
    let base_name: String = user
        .split('@')
        .next()
        .unwrap_or("matches")
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_matches{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_matches{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_matches{}.md", base_name, timestamp_suffix),
    }
}
