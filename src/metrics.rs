//! Performance metrics for the completion pipeline
//!
//! Lightweight in-memory counters and timing histograms used to watch ranking
//! latency and degradation paths in a running editor session.
//!
//! ## Metrics Tracked
//!
//! - Completion requests and empty results
//! - Candidates received, deduplicated away, scored and filtered out
//! - Per-candidate scoring errors and caught internal failures
//! - Soft latency budget overages
//! - Usage records
//! - Operation latencies (microsecond histograms)
//!
//! ## Design
//!
//! - Lock-free atomic counters for per-request updates
//! - DashMap for low-contention histogram storage
//! - Each histogram keeps only the most recent [`MAX_TIMING_SAMPLES`] samples

use dashmap::DashMap;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Samples retained per operation; older samples are dropped first
pub const MAX_TIMING_SAMPLES: usize = 1024;

/// Global metrics registry (singleton)
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// Get the global metrics instance
pub fn metrics() -> &'static Arc<Metrics> {
    &METRICS
}

/// Completion metrics registry
#[derive(Debug)]
pub struct Metrics {
    completion_requests: AtomicU64,
    empty_results: AtomicU64,

    candidates_received: AtomicU64,
    duplicates_removed: AtomicU64,
    candidates_scored: AtomicU64,
    candidates_below_threshold: AtomicU64,

    scoring_errors: AtomicU64,
    internal_failures: AtomicU64,
    invalid_requests: AtomicU64,

    sla_overages: AtomicU64,
    usage_records: AtomicU64,

    // Timing histograms (operation name -> recent durations in microseconds)
    operation_timings: DashMap<String, VecDeque<u64>>,
}

impl Metrics {
    /// Creates a new metrics registry
    pub fn new() -> Self {
        Self {
            completion_requests: AtomicU64::new(0),
            empty_results: AtomicU64::new(0),
            candidates_received: AtomicU64::new(0),
            duplicates_removed: AtomicU64::new(0),
            candidates_scored: AtomicU64::new(0),
            candidates_below_threshold: AtomicU64::new(0),
            scoring_errors: AtomicU64::new(0),
            internal_failures: AtomicU64::new(0),
            invalid_requests: AtomicU64::new(0),
            sla_overages: AtomicU64::new(0),
            usage_records: AtomicU64::new(0),
            operation_timings: DashMap::new(),
        }
    }

    /// Records one completion request and the size of its candidate list
    pub fn record_request(&self, candidate_count: usize) {
        self.completion_requests.fetch_add(1, Ordering::Relaxed);
        self.candidates_received
            .fetch_add(candidate_count as u64, Ordering::Relaxed);
    }

    pub fn record_duplicates_removed(&self, count: usize) {
        self.duplicates_removed.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_scored(&self, scored: usize, below_threshold: usize) {
        self.candidates_scored.fetch_add(scored as u64, Ordering::Relaxed);
        self.candidates_below_threshold
            .fetch_add(below_threshold as u64, Ordering::Relaxed);
    }

    pub fn record_empty_result(&self) {
        self.empty_results.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scoring_error(&self) {
        self.scoring_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_internal_failure(&self) {
        self.internal_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_request(&self) {
        self.invalid_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sla_overage(&self) {
        self.sla_overages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_usage(&self) {
        self.usage_records.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the timing of an operation
    ///
    /// # Arguments
    /// * `operation` - Name of the operation (e.g., "generate_completions")
    /// * `duration` - Duration of the operation
    pub fn record_timing(&self, operation: &str, duration: Duration) {
        let micros = duration.as_micros() as u64;

        let mut timings = self
            .operation_timings
            .entry(operation.to_string())
            .or_default();
        timings.push_back(micros);
        while timings.len() > MAX_TIMING_SAMPLES {
            timings.pop_front();
        }
    }

    /// Gets summary statistics for an operation
    pub fn operation_stats(&self, operation: &str) -> Option<OperationStats> {
        self.operation_timings.get(operation).map(|timings| {
            let mut sorted: Vec<u64> = timings.value().iter().copied().collect();
            sorted.sort_unstable();

            let count = sorted.len();
            if count == 0 {
                return OperationStats::default();
            }

            let sum: u64 = sorted.iter().sum();
            let mean = sum / count as u64;

            let p50_idx = count / 2;
            let p95_idx = (count as f64 * 0.95) as usize;
            let p99_idx = (count as f64 * 0.99) as usize;

            OperationStats {
                count,
                min_micros: sorted[0],
                max_micros: sorted[count - 1],
                mean_micros: mean,
                p50_micros: sorted[p50_idx],
                p95_micros: sorted[p95_idx.min(count - 1)],
                p99_micros: sorted[p99_idx.min(count - 1)],
            }
        })
    }

    /// Gets a summary report of all counters
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            completion_requests: self.completion_requests.load(Ordering::Relaxed),
            empty_results: self.empty_results.load(Ordering::Relaxed),
            candidates_received: self.candidates_received.load(Ordering::Relaxed),
            duplicates_removed: self.duplicates_removed.load(Ordering::Relaxed),
            candidates_scored: self.candidates_scored.load(Ordering::Relaxed),
            candidates_below_threshold: self.candidates_below_threshold.load(Ordering::Relaxed),
            scoring_errors: self.scoring_errors.load(Ordering::Relaxed),
            internal_failures: self.internal_failures.load(Ordering::Relaxed),
            invalid_requests: self.invalid_requests.load(Ordering::Relaxed),
            sla_overages: self.sla_overages.load(Ordering::Relaxed),
            usage_records: self.usage_records.load(Ordering::Relaxed),
        }
    }

    /// Resets all metrics (useful for testing)
    pub fn reset(&self) {
        self.completion_requests.store(0, Ordering::Relaxed);
        self.empty_results.store(0, Ordering::Relaxed);
        self.candidates_received.store(0, Ordering::Relaxed);
        self.duplicates_removed.store(0, Ordering::Relaxed);
        self.candidates_scored.store(0, Ordering::Relaxed);
        self.candidates_below_threshold.store(0, Ordering::Relaxed);
        self.scoring_errors.store(0, Ordering::Relaxed);
        self.internal_failures.store(0, Ordering::Relaxed);
        self.invalid_requests.store(0, Ordering::Relaxed);
        self.sla_overages.store(0, Ordering::Relaxed);
        self.usage_records.store(0, Ordering::Relaxed);
        self.operation_timings.clear();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperationStats {
    pub count: usize,
    pub min_micros: u64,
    pub max_micros: u64,
    pub mean_micros: u64,
    pub p50_micros: u64, // Median
    pub p95_micros: u64,
    pub p99_micros: u64,
}

/// Summary of all counters
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub completion_requests: u64,
    pub empty_results: u64,
    pub candidates_received: u64,
    pub duplicates_removed: u64,
    pub candidates_scored: u64,
    pub candidates_below_threshold: u64,
    pub scoring_errors: u64,
    pub internal_failures: u64,
    pub invalid_requests: u64,
    pub sla_overages: u64,
    pub usage_records: u64,
}

/// RAII guard for automatic timing measurement
///
/// Records the duration of a scope into a registry when dropped.
///
/// # Example
///
/// ```
/// use symbol_completion_ranker::metrics::{metrics, TimingGuard};
///
/// fn my_operation() {
///     let _guard = TimingGuard::new(metrics().clone(), "my_operation");
///     // ... do work ...
///     // Duration automatically recorded when _guard is dropped
/// }
/// ```
pub struct TimingGuard {
    registry: Arc<Metrics>,
    operation: String,
    start: Instant,
}

impl TimingGuard {
    /// Creates a new timing guard for the given operation
    pub fn new(registry: Arc<Metrics>, operation: impl Into<String>) -> Self {
        Self {
            registry,
            operation: operation.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.registry.record_timing(&self.operation, duration);
    }
}
