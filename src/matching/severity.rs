//! Gap severity, learning-time estimate and learning priorities

use crate::matching::gaps::{GapCategory, SkillGapSet};
use crate::models::ExperienceLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

const CRITICAL_SEVERITY: u32 = 25;
const IMPORTANT_SEVERITY: u32 = 10;
const MAX_SEVERITY: u32 = 100;

const CRITICAL_WEEKS: u32 = 4;
const IMPORTANT_WEEKS: u32 = 2;

const CRITICAL_IMPROVEMENT: u32 = 8;
const IMPORTANT_IMPROVEMENT: u32 = 3;
const MAX_IMPROVEMENT: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DifficultyLevel::Low => "low",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::High => "high",
        };
        f.write_str(label)
    }
}

/// One missing skill in recommended learning order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedGap {
    pub rank: usize,
    pub skill: String,
    pub category: GapCategory,
    /// 0 means optional; the skill does not count toward the learning estimate
    pub base_weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub skill_gaps: SkillGapSet,
    pub total_gaps: usize,
    pub critical_gaps: usize,
    pub important_gaps: usize,
    /// 0 - 100, lower is better
    pub severity_score: u32,
    pub estimated_learning_weeks: u32,
    /// 0 - 25
    pub potential_score_improvement: u32,
    pub difficulty_level: DifficultyLevel,
    pub learning_priorities: Vec<PrioritizedGap>,
}

/// Aggregate categorized gaps into a severity assessment.
///
/// Pure function of its inputs.
pub fn assess_severity(gaps: &SkillGapSet, user_experience_level: &ExperienceLevel) -> GapAnalysis {
    let critical = gaps.critical.len() as u32;
    let important = gaps.important.len() as u32;

    let severity_score = (critical * CRITICAL_SEVERITY + important * IMPORTANT_SEVERITY).min(MAX_SEVERITY);

    let base_weeks = critical * CRITICAL_WEEKS + important * IMPORTANT_WEEKS;
    let estimated_learning_weeks =
        (base_weeks as f32 * user_experience_level.learning_multiplier()).round() as u32;

    let potential_score_improvement =
        (critical * CRITICAL_IMPROVEMENT + important * IMPORTANT_IMPROVEMENT).min(MAX_IMPROVEMENT);

    let difficulty_level = if critical >= 3 {
        DifficultyLevel::High
    } else if critical >= 1 {
        DifficultyLevel::Medium
    } else {
        DifficultyLevel::Low
    };

    GapAnalysis {
        skill_gaps: gaps.clone(),
        total_gaps: gaps.total(),
        critical_gaps: gaps.critical.len(),
        important_gaps: gaps.important.len(),
        severity_score,
        estimated_learning_weeks,
        potential_score_improvement,
        difficulty_level,
        learning_priorities: prioritize_gaps(gaps),
    }
}

/// Missing skills ordered critical, important, trending, nice-to-have
pub fn prioritize_gaps(gaps: &SkillGapSet) -> Vec<PrioritizedGap> {
    gaps.iter()
        .enumerate()
        .map(|(index, (category, skill))| PrioritizedGap {
            rank: index + 1,
            skill: skill.to_string(),
            category,
            base_weeks: match category {
                GapCategory::Critical => CRITICAL_WEEKS,
                GapCategory::Important => IMPORTANT_WEEKS,
                GapCategory::Trending | GapCategory::NiceToHave => 0,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap_set(critical: usize, important: usize, trending: usize, nice: usize) -> SkillGapSet {
        let names = |prefix: &str, n: usize| -> Vec<String> { (0..n).map(|i| format!("{}{}", prefix, i)).collect() };
        SkillGapSet {
            critical: names("c", critical),
            important: names("i", important),
            trending: names("t", trending),
            nice_to_have: names("n", nice),
        }
    }

    #[test]
    fn test_entry_level_scenario() {
        let analysis = assess_severity(&gap_set(2, 1, 0, 0), &ExperienceLevel::Entry);
        assert_eq!(analysis.severity_score, 60);
        assert_eq!(analysis.estimated_learning_weeks, 15);
        assert_eq!(analysis.potential_score_improvement, 19);
        assert_eq!(analysis.difficulty_level, DifficultyLevel::Medium);
        assert_eq!(analysis.total_gaps, 3);
        assert_eq!(analysis.critical_gaps, 2);
    }

    #[test]
    fn test_no_gaps() {
        let analysis = assess_severity(&SkillGapSet::default(), &ExperienceLevel::Mid);
        assert_eq!(analysis.severity_score, 0);
        assert_eq!(analysis.estimated_learning_weeks, 0);
        assert_eq!(analysis.difficulty_level, DifficultyLevel::Low);
        assert!(analysis.learning_priorities.is_empty());
    }

    #[test]
    fn test_caps() {
        let analysis = assess_severity(&gap_set(5, 3, 0, 0), &ExperienceLevel::Mid);
        assert_eq!(analysis.severity_score, 100);
        assert_eq!(analysis.potential_score_improvement, 25);
        assert_eq!(analysis.difficulty_level, DifficultyLevel::High);
    }

    #[test]
    fn test_severity_monotonic_in_critical_gaps() {
        let mut previous = 0;
        for critical in 0..8 {
            let score = assess_severity(&gap_set(critical, 2, 0, 0), &ExperienceLevel::Mid).severity_score;
            assert!(score >= previous);
            assert!(score <= 100);
            previous = score;
        }
    }

    #[test]
    fn test_experience_multipliers() {
        let gaps = gap_set(1, 1, 0, 0);
        assert_eq!(assess_severity(&gaps, &ExperienceLevel::Mid).estimated_learning_weeks, 6);
        assert_eq!(assess_severity(&gaps, &ExperienceLevel::Senior).estimated_learning_weeks, 4);
        assert_eq!(assess_severity(&gaps, &ExperienceLevel::Executive).estimated_learning_weeks, 3);
        assert_eq!(
            assess_severity(&gaps, &ExperienceLevel::Other("staff".to_string())).estimated_learning_weeks,
            6
        );
    }

    #[test]
    fn test_trending_and_nice_do_not_raise_severity() {
        let analysis = assess_severity(&gap_set(0, 0, 3, 4), &ExperienceLevel::Mid);
        assert_eq!(analysis.total_gaps, 7);
        assert_eq!(analysis.severity_score, 0);
        assert_eq!(analysis.difficulty_level, DifficultyLevel::Low);
    }

    #[test]
    fn test_learning_priorities_order() {
        let priorities = prioritize_gaps(&gap_set(1, 1, 1, 1));
        let order: Vec<(usize, GapCategory, u32)> =
            priorities.iter().map(|p| (p.rank, p.category, p.base_weeks)).collect();
        assert_eq!(
            order,
            vec![
                (1, GapCategory::Critical, 4),
                (2, GapCategory::Important, 2),
                (3, GapCategory::Trending, 0),
                (4, GapCategory::NiceToHave, 0),
            ]
        );
    }
}
