//! Ranking, pagination and quality-stratified rotation of scored matches

use crate::matching::scorer::MatchResult;
use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

const EXCELLENT_BAND: f32 = 0.7;
const GOOD_BAND: f32 = 0.5;
const FAIR_BAND: f32 = 0.3;

/// Source of uniform indices for shuffling. Swappable so tests can pin the rotation.
pub trait RandomSource {
    /// Uniform index in `0..upper`; `upper` is always at least 1
    fn next_index(&mut self, upper: usize) -> usize;
}

impl RandomSource for ThreadRng {
    fn next_index(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }
}

impl RandomSource for StdRng {
    fn next_index(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }
}

/// Fisher-Yates shuffle driven by a [`RandomSource`]
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}

/// Stable sort by overall score, highest first; ties keep job iteration order
pub fn rank_matches(matches: &mut [MatchResult]) {
    matches.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
}

/// Choose which ranked matches to return.
///
/// `scored` must already be threshold-filtered and ranked. Without `randomize`, or
/// when there are no more than `top_k` candidates, this is a plain
/// `[offset, offset + top_k)` slice. Otherwise the top `2 * top_k` are split into
/// score bands, each band is shuffled, and the result is filled from the excellent
/// band first (at least one, at most half of `top_k`), then good, then fair, so
/// fewer than `top_k` may come back. `offset` is ignored in rotation mode.
pub fn select_matches(
    scored: &[MatchResult],
    top_k: usize,
    offset: usize,
    randomize: bool,
    rng: &mut dyn RandomSource,
) -> Vec<MatchResult> {
    if !randomize || scored.len() <= top_k {
        return scored.iter().skip(offset).take(top_k).cloned().collect();
    }

    let pool = &scored[..scored.len().min(top_k * 2)];

    let mut excellent = Vec::new();
    let mut good = Vec::new();
    let mut fair = Vec::new();
    for candidate in pool {
        let score = candidate.overall_score;
        if score >= EXCELLENT_BAND {
            excellent.push(candidate);
        } else if score >= GOOD_BAND {
            good.push(candidate);
        } else if score >= FAIR_BAND {
            fair.push(candidate);
        }
    }

    shuffle(&mut excellent, rng);
    shuffle(&mut good, rng);
    shuffle(&mut fair, rng);

    let excellent_quota = (top_k / 2).max(1).min(top_k);
    let mut selected: Vec<&MatchResult> = Vec::with_capacity(top_k);

    selected.extend(excellent.into_iter().take(excellent_quota));
    for band in [good, fair] {
        let remaining = top_k - selected.len();
        selected.extend(band.into_iter().take(remaining));
    }

    selected.into_iter().cloned().collect()
}
