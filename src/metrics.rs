use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing pipeline activity since startup.
#[derive(Default)]
pub struct PipelineMetrics {
    summaries_completed: AtomicU64,
    requests_rejected: AtomicU64,
    requests_failed: AtomicU64,
    persistence_failures: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summary returned to the caller.
    pub fn record_summary(&self) {
        self.summaries_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request refused for a caller-side reason.
    pub fn record_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that failed on the server side.
    pub fn record_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a summary whose history record could not be written.
    pub fn record_persistence_failure(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            summaries_completed: self.summaries_completed.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Summaries returned successfully.
    pub summaries_completed: u64,
    /// Requests rejected with a 4xx-class error.
    pub requests_rejected: u64,
    /// Requests that failed with a 5xx-class error.
    pub requests_failed: u64,
    /// Summaries returned without a history record.
    pub persistence_failures: u64,
}
