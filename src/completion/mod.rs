//! Completion ranking for code symbol suggestions
//!
//! This module provides:
//! - Deduplication of candidates merged from several symbol providers
//! - Multi-strategy matching (exact, prefix, substring, fuzzy subsequence) with heuristic scores
//! - Usage-based personalization bounded to a fixed number of tracked names
//! - Ranking by score and usage frequency, truncated to a configurable limit
//! - Host-agnostic formatting of the ranked list
//! - A soft latency budget monitor around the whole pipeline

pub mod symbol;
pub mod usage;
pub mod scoring;
pub mod ranking;
pub mod formatting;
pub mod sla;
pub mod engine;

pub use symbol::{CandidateSymbol, CompletionRequest, SymbolKind};
pub use usage::{UsageStats, UsageTracker};
pub use scoring::{MatchKind, Score, ScoreError, ScoringContext, kind_bonus};
pub use ranking::{RankingCriteria, ScoredCandidate, deduplicate, rank_completions};
pub use formatting::{RankedCompletion, format_completions, insert_text};
pub use sla::SlaMonitor;
pub use engine::{CompletionEngine, CompletionError, SharedCompletionEngine, parse_request};
