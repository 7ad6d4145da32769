//! Completion engine: the full ranking pipeline plus session usage state
//!
//! ```text
//! candidates ─▶ deduplicate ─▶ score (reads usage) ─▶ threshold ─▶ rank ─▶ truncate ─▶ format
//! ```
//!
//! The pipeline runs synchronously on the caller's thread and never fails
//! outward: malformed input and internal failures degrade to an empty list,
//! and a bad candidate only drops that candidate.
//!
//! One engine belongs to one editor session. Usage state is owned by the
//! engine, so independent sessions never share personalization.

use super::formatting::{RankedCompletion, format_completions};
use super::ranking::{RankingCriteria, ScoredCandidate, deduplicate, rank_completions};
use super::scoring::ScoringContext;
use super::sla::SlaMonitor;
use super::symbol::{CandidateSymbol, CompletionRequest};
use super::usage::{UsageStats, UsageTracker};
use crate::config::{ConfigError, EngineConfig};
use crate::metrics::{Metrics, metrics};
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Failures the engine absorbs at its boundary
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("malformed completion request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("completion pipeline failed: {0}")]
    Internal(String),
}

/// Decode a JSON completion request
pub fn parse_request(json: &str) -> Result<CompletionRequest, CompletionError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Debug)]
pub struct CompletionEngine {
    config: EngineConfig,
    criteria: RankingCriteria,
    usage: UsageTracker,
    sla: SlaMonitor,
    metrics: Arc<Metrics>,
}

impl CompletionEngine {
    /// Create an engine with default settings, reporting to the global metrics registry
    pub fn new() -> Self {
        Self::build(EngineConfig::default(), metrics().clone())
    }

    /// Create an engine from a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, metrics().clone()))
    }

    /// Report into `metrics` instead of the global registry
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.sla = SlaMonitor::new(self.config.sla_budget(), metrics.clone());
        self.metrics = metrics;
        self
    }

    fn build(config: EngineConfig, metrics: Arc<Metrics>) -> Self {
        let mut usage = UsageTracker::with_capacity(config.usage_capacity);
        usage.seed(config.seed_names.iter().map(String::as_str));

        Self {
            criteria: config.ranking_criteria(),
            sla: SlaMonitor::new(config.sla_budget(), metrics.clone()),
            usage,
            metrics,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// Rank `candidates` against `prefix`
    ///
    /// Pure with respect to the current usage state: identical inputs with an
    /// unchanged tracker produce identical output.
    pub fn generate_completions(
        &self,
        candidates: Vec<CandidateSymbol>,
        prefix: &str,
        language: &str,
    ) -> Vec<RankedCompletion> {
        let span = tracing::debug_span!(
            "generate_completions",
            language,
            prefix_len = prefix.len(),
            candidates = candidates.len()
        );
        let _enter = span.enter();

        self.metrics.record_request(candidates.len());

        self.guarded("generate_completions", || {
            self.run_pipeline(candidates, prefix, language)
        })
    }

    /// Run `pipeline` under the latency budget. A panic inside it is logged,
    /// counted as an internal failure and turned into an empty list.
    fn guarded(
        &self,
        operation: &str,
        pipeline: impl FnOnce() -> Vec<RankedCompletion>,
    ) -> Vec<RankedCompletion> {
        let outcome = self
            .sla
            .observe(operation, || panic::catch_unwind(AssertUnwindSafe(pipeline)));

        let completions = match outcome {
            Ok(completions) => completions,
            Err(payload) => {
                let err = CompletionError::Internal(panic_message(payload.as_ref()));
                error!("{}; returning no completions", err);
                self.metrics.record_internal_failure();
                Vec::new()
            }
        };

        if completions.is_empty() {
            self.metrics.record_empty_result();
        }

        completions
    }

    /// Rank the candidates of an already decoded request
    pub fn complete(&self, request: &CompletionRequest) -> Vec<RankedCompletion> {
        self.generate_completions(
            request.candidates.clone(),
            &request.prefix,
            &request.language,
        )
    }

    /// Rank a JSON-encoded request. Malformed input yields an empty list.
    pub fn complete_json(&self, json: &str) -> Vec<RankedCompletion> {
        match parse_request(json) {
            Ok(request) => {
                let CompletionRequest {
                    candidates,
                    prefix,
                    language,
                } = request;
                self.generate_completions(candidates, &prefix, &language)
            }
            Err(err) => {
                warn!("{}", err);
                self.metrics.record_invalid_request();
                self.metrics.record_empty_result();
                Vec::new()
            }
        }
    }

    /// Record that the user accepted `name`
    pub fn record_usage(&mut self, name: &str) {
        self.usage.record_usage(name);
        self.metrics.record_usage();
        debug!("Recorded usage of {:?}", name);
    }

    /// Clear usage state. Seeds are not re-applied; see [`Self::reseed`].
    pub fn reset(&mut self) {
        self.usage.reset();
        debug!("Usage state reset");
    }

    /// Re-apply the configured seed names
    pub fn reseed(&mut self) {
        self.usage
            .seed(self.config.seed_names.iter().map(String::as_str));
    }

    pub fn stats(&self) -> UsageStats {
        self.usage.stats()
    }

    fn run_pipeline(
        &self,
        candidates: Vec<CandidateSymbol>,
        prefix: &str,
        language: &str,
    ) -> Vec<RankedCompletion> {
        let received = candidates.len();
        let unique = deduplicate(candidates);
        self.metrics.record_duplicates_removed(received - unique.len());

        let context = ScoringContext::new(prefix, language, &self.usage);
        let mut scored = Vec::with_capacity(unique.len());

        for symbol in unique {
            match context.score(&symbol.name, symbol.kind) {
                Ok(score) => scored.push(ScoredCandidate {
                    frequency: self.usage.frequency(&symbol.name),
                    score: score.value,
                    match_kind: score.match_kind,
                    symbol,
                }),
                Err(err) => {
                    self.metrics.record_scoring_error();
                    debug!("Skipping candidate: {}", err);
                }
            }
        }

        let below_threshold = scored
            .iter()
            .filter(|c| c.score < self.criteria.min_score)
            .count();
        self.metrics.record_scored(scored.len(), below_threshold);

        let ranked = rank_completions(scored, &self.criteria);
        debug!(
            "Ranked {} of {} candidates ({} below threshold)",
            ranked.len(),
            received,
            below_threshold
        );

        format_completions(ranked)
    }
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Engine shared between threads
///
/// One lock guards both ranking (read) and usage mutation (write).
#[derive(Debug, Clone)]
pub struct SharedCompletionEngine {
    inner: Arc<RwLock<CompletionEngine>>,
}

impl SharedCompletionEngine {
    pub fn new(engine: CompletionEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn generate_completions(
        &self,
        candidates: Vec<CandidateSymbol>,
        prefix: &str,
        language: &str,
    ) -> Vec<RankedCompletion> {
        self.inner
            .read()
            .generate_completions(candidates, prefix, language)
    }

    pub fn complete_json(&self, json: &str) -> Vec<RankedCompletion> {
        self.inner.read().complete_json(json)
    }

    pub fn record_usage(&self, name: &str) {
        self.inner.write().record_usage(name);
    }

    pub fn reset(&self) {
        self.inner.write().reset();
    }

    pub fn stats(&self) -> UsageStats {
        self.inner.read().stats()
    }
}
