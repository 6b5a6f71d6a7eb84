use crate::registry::TabRegistry;
use std::collections::HashSet;
use std::time::Duration;

/// Per-tab idle state machine: Active → Idle → Alerted → Active.
///
/// A tab crosses into Idle when its time since last access exceeds the
/// threshold; the caller dispatches one alert and marks the tab Alerted so
/// re-polling cannot alert it again. Reactivation or a "keep open" answer
/// returns it to Active and arms a fresh episode. Markers are removed when
/// the tab closes — an alert must never fire for a nonexistent tab.
#[derive(Debug)]
pub struct IdleTracker {
    threshold_ms: i64,
    alerted: HashSet<String>,
}

impl IdleTracker {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold_ms: threshold.as_millis() as i64,
            alerted: HashSet::new(),
        }
    }

    pub fn threshold_ms(&self) -> i64 {
        self.threshold_ms
    }

    /// Recompute idle flags and return the first newly-idle tab id, if any.
    ///
    /// Only one tab is surfaced per tick so the user is never flooded;
    /// remaining idle tabs are picked up on later ticks. The caller must
    /// `mark_alerted` as soon as it commits to dispatching, before any slow
    /// summarization await.
    pub fn tick(&self, now: i64, registry: &mut TabRegistry) -> Option<String> {
        registry.mark_idle_flags(now, self.threshold_ms);
        registry
            .tabs()
            .iter()
            .find(|t| t.is_idle && !self.alerted.contains(&t.id))
            .map(|t| t.id.clone())
    }

    pub fn mark_alerted(&mut self, id: &str) {
        self.alerted.insert(id.to_string());
    }

    pub fn is_alerted(&self, id: &str) -> bool {
        self.alerted.contains(id)
    }

    /// Reactivation / "keep open": clear the marker so a fresh idle period
    /// can alert again. The caller refreshes the tab's access timestamp.
    pub fn reset(&mut self, id: &str) {
        self.alerted.remove(id);
    }

    /// Tab closed: drop the marker outright.
    pub fn forget(&mut self, id: &str) {
        self.alerted.remove(id);
    }
}
