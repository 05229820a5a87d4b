//! Vector similarity between precomputed embeddings

use crate::error::{JobMatcherError, Result};

/// Similarity in [0, 1] between two embeddings from the same embedding space.
///
/// Empty or zero vectors are valid input and score 0.0. Errors are reserved for
/// corrupt data (mismatched dimensions, non-finite components).
pub trait SimilarityProvider: Send + Sync {
    fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f32>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl SimilarityProvider for CosineSimilarity {
    fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.is_empty() || b.is_empty() {
            return Ok(0.0);
        }

        if a.len() != b.len() {
            return Err(JobMatcherError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }

        if a.iter().chain(b.iter()).any(|x| !x.is_finite()) {
            return Err(JobMatcherError::CorruptRecord(
                "Embedding contains non-finite values".to_string(),
            ));
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }

        Ok((dot_product / (norm_a * norm_b)).clamp(0.0, 1.0))
    }
}
