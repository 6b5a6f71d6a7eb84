use serde::{Deserialize, Serialize};

/// Recently-closed tabs kept for "reopen" requests.
pub const RECENTLY_CLOSED_LIMIT: usize = 20;
/// Conversation records kept across restarts.
pub const CHAT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTab {
    pub title: String,
    pub url: String,
    pub closed_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    pub timestamp: i64,
    /// "user" or "assistant".
    pub sender: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiPrefs {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_show_tab_list")]
    pub show_tab_list: bool,
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_show_tab_list() -> bool {
    true
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            show_tab_list: default_show_tab_list(),
        }
    }
}

/// Everything the assistant persists between runs. Absence of the backing
/// file (or of any field) loads as these defaults, never as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantState {
    #[serde(default)]
    pub recently_closed: Vec<ClosedTab>,
    #[serde(default)]
    pub chat_history: Vec<ChatRecord>,
    #[serde(default)]
    pub prefs: UiPrefs,
}

impl AssistantState {
    /// Newest first; the oldest entry falls off past the limit.
    pub fn push_closed(&mut self, record: ClosedTab) {
        self.recently_closed.insert(0, record);
        self.recently_closed.truncate(RECENTLY_CLOSED_LIMIT);
    }

    /// Oldest first; the front is evicted past the limit.
    pub fn push_chat(&mut self, record: ChatRecord) {
        self.chat_history.push(record);
        if self.chat_history.len() > CHAT_HISTORY_LIMIT {
            let excess = self.chat_history.len() - CHAT_HISTORY_LIMIT;
            self.chat_history.drain(..excess);
        }
    }
}
