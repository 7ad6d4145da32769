//! Soft latency budget for the completion pipeline
//!
//! The budget is advisory. Exceeding it logs a warning and bumps a counter,
//! but the measured result is always returned unchanged.

use crate::metrics::{Metrics, TimingGuard};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Default soft budget for one completion request
pub const DEFAULT_SLA_BUDGET: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct SlaMonitor {
    budget: Duration,
    metrics: Arc<Metrics>,
}

impl SlaMonitor {
    pub fn new(budget: Duration, metrics: Arc<Metrics>) -> Self {
        Self { budget, metrics }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Run `f`, time it, and warn if it ran over budget
    pub fn observe<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = {
            let _timing = TimingGuard::new(self.metrics.clone(), operation);
            f()
        };
        let elapsed = start.elapsed();

        if elapsed > self.budget {
            self.metrics.record_sla_overage();
            warn!(
                "{} took {:?}, over the {:?} soft budget",
                operation, elapsed, self.budget
            );
        }

        result
    }
}
