//! Deduplication, ranking and truncation of completion candidates
//!
//! Ranking order (in order of priority):
//! 1. Score - higher is better
//! 2. Usage frequency - higher is better
//! 3. Original input order - the sort is stable

use super::scoring::MatchKind;
use super::symbol::CandidateSymbol;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// Default maximum number of completions returned
pub const DEFAULT_MAX_COMPLETIONS: usize = 50;

/// Default minimum score a candidate needs to be shown
pub const DEFAULT_MIN_SCORE: f64 = 0.1;

/// Criteria for filtering and truncating ranked results
#[derive(Debug, Clone, PartialEq)]
pub struct RankingCriteria {
    /// Candidates scoring below this are dropped (default: 0.1)
    pub min_score: f64,

    /// Maximum results to return (default: 50)
    pub max_results: usize,
}

impl Default for RankingCriteria {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_results: DEFAULT_MAX_COMPLETIONS,
        }
    }
}

/// A candidate with the single score computed for it in this request
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub symbol: CandidateSymbol,
    pub score: f64,
    pub match_kind: MatchKind,
    /// Usage frequency at scoring time, used as the tie-break
    pub frequency: u32,
}

/// Keep the first occurrence of each candidate name, preserving order
pub fn deduplicate(candidates: Vec<CandidateSymbol>) -> Vec<CandidateSymbol> {
    let mut seen = FxHashSet::default();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.name.clone()))
        .collect()
}

/// Filter, sort and truncate scored candidates
///
/// # Arguments
/// * `candidates` - Scored candidates in provider order
/// * `criteria` - Threshold and result limit
///
/// # Returns
/// Candidates with `score >= min_score`, best first, at most `max_results` long
pub fn rank_completions(
    mut candidates: Vec<ScoredCandidate>,
    criteria: &RankingCriteria,
) -> Vec<ScoredCandidate> {
    candidates.retain(|c| c.score >= criteria.min_score);

    // sort_by is stable, so full ties keep provider order
    candidates.sort_by(|a, b| match b.score.partial_cmp(&a.score) {
        Some(Ordering::Equal) | None => b.frequency.cmp(&a.frequency),
        Some(ord) => ord,
    });

    candidates.truncate(criteria.max_results);

    candidates
}
