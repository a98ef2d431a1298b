//! Counters for the rejection-sampling loop

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Thread-safe generation counters, shared through `Arc`
#[derive(Debug, Default)]
pub struct GenerationMetrics {
    attempts: AtomicU64,
    accepted: AtomicU64,
    exhausted: AtomicU64,
    rejections: Mutex<HashMap<String, u64>>,
}

/// Point-in-time copy of [`GenerationMetrics`]
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub attempts: u64,
    pub accepted: u64,
    /// Requests that hit the attempt cap
    pub exhausted: u64,
    /// Rejections keyed by the first failing predicate
    pub rejections: HashMap<String, u64>,
}

impl MetricsSnapshot {
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempts as f64
        }
    }

    /// Rejection counts, most frequent first
    pub fn top_rejections(&self) -> Vec<(&str, u64)> {
        let mut sorted: Vec<(&str, u64)> = self
            .rejections
            .iter()
            .map(|(name, &count)| (name.as_str(), count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one request's counters in
    pub fn record_batch(&self, attempts: u64, accepted: u64, rejections: HashMap<&str, u64>) {
        self.attempts.fetch_add(attempts, Ordering::Relaxed);
        self.accepted.fetch_add(accepted, Ordering::Relaxed);
        if rejections.is_empty() {
            return;
        }
        let mut totals = self.rejections.lock();
        for (name, count) in rejections {
            *totals.entry(name.to_string()).or_insert(0) += count;
        }
    }

    pub fn increment_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            rejections: self.rejections.lock().clone(),
        }
    }
}
