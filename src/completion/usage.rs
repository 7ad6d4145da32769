//! Session-scoped usage personalization
//!
//! Tracks which names the user has accepted and how often. State lives only as
//! long as the owning engine; nothing is persisted.
//!
//! Membership in the recently-used set never expires on its own. Only
//! [`UsageTracker::reset`] clears it.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::debug;

/// Default upper bound on the number of names with a tracked frequency
pub const DEFAULT_USAGE_CAPACITY: usize = 100;

/// Counters exposed for observability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub recently_used_count: usize,
    pub frequency_tracked_count: usize,
}

/// Bounded frequency map plus an "ever used" set
#[derive(Debug, Clone)]
pub struct UsageTracker {
    recently_used: FxHashSet<String>,
    frequency: FxHashMap<String, u32>,
    capacity: usize,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_USAGE_CAPACITY)
    }

    /// Create a tracker that keeps at most `capacity` frequency entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            recently_used: FxHashSet::default(),
            frequency: FxHashMap::default(),
            capacity: capacity.max(1),
        }
    }

    /// Record that `name` was accepted by the user
    pub fn record_usage(&mut self, name: &str) {
        if name.trim().is_empty() {
            debug!("Ignoring usage record for empty name");
            return;
        }

        let count = self.frequency.entry(name.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        self.recently_used.insert(name.to_string());

        if self.frequency.len() > self.capacity {
            self.evict(name);
        }
    }

    /// Pre-populate the tracker so a fresh session isn't ranked from zero signal
    pub fn seed<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.record_usage(name);
        }
    }

    /// Clear all state. Does not re-seed.
    pub fn reset(&mut self) {
        self.recently_used.clear();
        self.frequency.clear();
    }

    pub fn stats(&self) -> UsageStats {
        UsageStats {
            recently_used_count: self.recently_used.len(),
            frequency_tracked_count: self.frequency.len(),
        }
    }

    /// Times `name` was recorded (0 if untracked or evicted)
    pub fn frequency(&self, name: &str) -> u32 {
        self.frequency.get(name).copied().unwrap_or(0)
    }

    pub fn is_recently_used(&self, name: &str) -> bool {
        self.recently_used.contains(name)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keep the `capacity` highest-count entries. Among equal counts the name
    /// just recorded survives, then the rest are ordered by name.
    fn evict(&mut self, just_recorded: &str) {
        let mut entries: Vec<(String, u32)> = self.frequency.drain().collect();
        entries.sort_unstable_by(|(name_a, count_a), (name_b, count_b)| {
            count_b
                .cmp(count_a)
                .then_with(|| (name_b == just_recorded).cmp(&(name_a == just_recorded)))
                .then_with(|| name_a.cmp(name_b))
        });
        let dropped = entries.len().saturating_sub(self.capacity);
        entries.truncate(self.capacity);
        self.frequency.extend(entries);

        debug!(
            "Evicted {} usage entries (capacity {})",
            dropped, self.capacity
        );
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new()
    }
}
