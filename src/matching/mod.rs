//! Job matching and scoring engine

pub mod engine;
pub mod explanation;
pub mod gaps;
pub mod scorer;
pub mod selector;
pub mod severity;
pub mod similarity;
pub mod taxonomy;

pub use engine::{MatchEngine, MatchRequest, MatchResponse, ScoredBatch};
pub use gaps::{GapCategorizer, GapCategory, SkillGapSet};
pub use scorer::{ComponentScores, JobScorer, MatchResult};
pub use selector::{select_matches, RandomSource};
pub use severity::{assess_severity, DifficultyLevel, GapAnalysis, PrioritizedGap};
pub use similarity::{CosineSimilarity, SimilarityProvider};
pub use taxonomy::SkillTaxonomy;
