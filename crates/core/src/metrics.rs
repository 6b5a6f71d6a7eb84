use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Session-lifetime counters. Cheap to share; incremented from the command
/// and idle pipelines.
#[derive(Default)]
pub struct Metrics {
    commands: AtomicU64,
    submissions_dropped: AtomicU64,
    classify_failures: AtomicU64,
    summaries: AtomicU64,
    summary_failures: AtomicU64,
    idle_alerts: AtomicU64,
    tabs_recalled: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_commands(&self) {
        self.commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_submissions_dropped(&self) {
        self.submissions_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_classify_failures(&self) {
        self.classify_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_summaries(&self) {
        self.summaries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_summary_failures(&self) {
        self.summary_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_idle_alerts(&self) {
        self.idle_alerts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_tabs_recalled(&self, count: u64) {
        self.tabs_recalled.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands: self.commands.load(Ordering::Relaxed),
            submissions_dropped: self.submissions_dropped.load(Ordering::Relaxed),
            classify_failures: self.classify_failures.load(Ordering::Relaxed),
            summaries: self.summaries.load(Ordering::Relaxed),
            summary_failures: self.summary_failures.load(Ordering::Relaxed),
            idle_alerts: self.idle_alerts.load(Ordering::Relaxed),
            tabs_recalled: self.tabs_recalled.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub commands: u64,
    pub submissions_dropped: u64,
    pub classify_failures: u64,
    pub summaries: u64,
    pub summary_failures: u64,
    pub idle_alerts: u64,
    pub tabs_recalled: u64,
}

impl MetricsSnapshot {
    pub fn classify_success_rate(&self) -> f64 {
        if self.commands == 0 {
            return 1.0;
        }
        1.0 - (self.classify_failures as f64 / self.commands as f64)
    }

    pub fn summary_success_rate(&self) -> f64 {
        if self.summaries == 0 {
            return 1.0;
        }
        1.0 - (self.summary_failures as f64 / self.summaries as f64)
    }
}
