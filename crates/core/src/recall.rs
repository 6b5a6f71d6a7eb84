use crate::types::TabTemplate;

/// Result of a topic lookup. An empty remembered session is distinct from
/// no session at all; both get their own user-facing reply.
#[derive(Debug)]
pub enum RecallMatch<'a> {
    Session {
        key: &'a str,
        tabs: &'a [TabTemplate],
    },
    EmptySession {
        key: &'a str,
    },
    NotFound,
}

#[derive(Debug, Clone)]
struct RecallEntry {
    key: String,
    tabs: Vec<TabTemplate>,
}

/// Keyword-indexed store of remembered tab sets from prior sessions.
///
/// Matching is substring containment: a key matches when the lowercased
/// topic *contains* the key. The first matching entry in insertion order
/// wins; there is no scoring among multiple matches. Short keys ("ai")
/// will therefore match almost any topic that embeds them — a known
/// sharp edge of this matching rule, kept as-is pending a product call.
#[derive(Debug, Clone, Default)]
pub struct RecallStore {
    entries: Vec<RecallEntry>,
}

impl RecallStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacement is whole-value and keeps the
    /// key's original position, so lookups stay deterministic.
    pub fn insert(&mut self, key: impl Into<String>, tabs: Vec<TabTemplate>) {
        let key = key.into().to_lowercase();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.tabs = tabs,
            None => self.entries.push(RecallEntry { key, tabs }),
        }
    }

    pub fn lookup(&self, topic: &str) -> RecallMatch<'_> {
        let topic = topic.to_lowercase();
        for entry in &self.entries {
            if topic.contains(&entry.key) {
                if entry.tabs.is_empty() {
                    return RecallMatch::EmptySession { key: &entry.key };
                }
                return RecallMatch::Session {
                    key: &entry.key,
                    tabs: &entry.tabs,
                };
            }
        }
        RecallMatch::NotFound
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
