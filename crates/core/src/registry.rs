use crate::types::{Tab, TabTemplate};

/// Result of a close request. "Already closed" is a first-class outcome
/// the caller reports back to the user, never a silent success.
#[derive(Debug, Clone)]
pub enum CloseOutcome {
    /// The removed tab, so the caller can name it and record it.
    Closed(Tab),
    AlreadyClosed,
}

/// Canonical, ordered collection of open tabs plus the active-tab id.
///
/// Invariants: ids are unique; the active id, when set, references a tab
/// present in the collection. Closing the active tab elects the first
/// remaining tab (provider order) or clears the active id.
#[derive(Debug, Clone, Default)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    active_tab_id: Option<String>,
    next_local_id: u64,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry from the host's current tab list.
    pub fn from_tabs(tabs: Vec<Tab>, active_tab_id: Option<String>) -> Self {
        let active_tab_id =
            active_tab_id.filter(|id| tabs.iter().any(|t| &t.id == id));
        Self {
            tabs,
            active_tab_id,
            next_local_id: 0,
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    /// Make a tab active and refresh its access timestamp. Unknown ids are
    /// a silent no-op.
    pub fn set_active(&mut self, id: &str, now: i64) {
        if self.find(id).is_none() {
            return;
        }
        self.active_tab_id = Some(id.to_string());
        self.refresh_access(id, now);
    }

    pub fn close_tab(&mut self, id: &str) -> CloseOutcome {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return CloseOutcome::AlreadyClosed;
        };
        let removed = self.tabs.remove(index);

        if self.active_tab_id.as_deref() == Some(id) {
            self.active_tab_id = self.tabs.first().map(|t| t.id.clone());
        }

        tracing::debug!("Closed tab {} (\"{}\")", removed.id, removed.title);
        CloseOutcome::Closed(removed)
    }

    /// Reopen a remembered template as a live tab. The new tab gets a fresh
    /// id, a current timestamp, and takes focus, matching how newly opened
    /// tabs behave in the browser.
    pub fn add_tab(&mut self, template: TabTemplate, now: i64) -> &Tab {
        let id = self.fresh_id();
        self.tabs.push(Tab {
            id: id.clone(),
            title: template.title,
            url: template.url,
            favicon: template.favicon,
            content: template.content,
            last_accessed: now,
            is_idle: false,
        });
        self.active_tab_id = Some(id);
        // Just pushed, so last() is always present.
        &self.tabs[self.tabs.len() - 1]
    }

    pub fn refresh_access(&mut self, id: &str, now: i64) {
        if let Some(tab) = self.find_mut(id) {
            tab.last_accessed = now;
            tab.is_idle = false;
        }
    }

    /// Recompute the derived idle flags. The active tab is never idle.
    pub fn mark_idle_flags(&mut self, now: i64, threshold_ms: i64) {
        let active = self.active_tab_id.clone();
        for tab in &mut self.tabs {
            tab.is_idle = active.as_deref() != Some(tab.id.as_str())
                && now - tab.last_accessed > threshold_ms;
        }
    }

    fn fresh_id(&mut self) -> String {
        loop {
            self.next_local_id += 1;
            let id = format!("local-{}", self.next_local_id);
            if self.find(&id).is_none() {
                return id;
            }
        }
    }
}
