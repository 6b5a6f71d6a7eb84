use serde_json::json;
use tabwarden_providers::{ActionDecl, FunctionCall};

/// Sentinel tab id meaning "whatever is active at resolution time".
pub const ACTIVE_TAB: &str = "active";

pub const ACTION_SWITCH: &str = "tabs.switch";
pub const ACTION_CLOSE: &str = "tabs.close";
pub const ACTION_SUMMARIZE: &str = "tabs.summarize";
pub const ACTION_RECALL: &str = "tabs.recall";

/// The closed set of intents the interpreter can produce. This enum is the
/// single source of truth: the declared-actions list sent to the model and
/// the resolver's match arms are both derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SwitchTab { tab_id: String },
    CloseTab { tab_id: String },
    RecallTabs { topic: String },
    SummarizeTab { tab_id: String },
    Chat { text: String },
    Unknown,
}

/// The callable actions declared to the language model. Exactly the four
/// tool-backed variants; `Chat` and `Unknown` are fallbacks, not tools.
pub fn declared_actions() -> Vec<ActionDecl> {
    vec![
        ActionDecl {
            name: ACTION_SWITCH.to_string(),
            description: "Finds a tab based on a user query about its content or title \
                          and makes it the active tab."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "tabId": { "type": "string", "description": "The ID of the tab to switch to." }
                },
                "required": ["tabId"]
            }),
        },
        ActionDecl {
            name: ACTION_CLOSE.to_string(),
            description: "Closes a specific tab based on user query.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "tabId": { "type": "string", "description": "The ID of the tab to close." }
                },
                "required": ["tabId"]
            }),
        },
        ActionDecl {
            name: ACTION_SUMMARIZE.to_string(),
            description: "Summarizes the content of a specific tab.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "tabId": {
                        "type": "string",
                        "description": "The ID of the tab to summarize. Can be \"active\" for the currently active tab."
                    }
                },
                "required": ["tabId"]
            }),
        },
        ActionDecl {
            name: ACTION_RECALL.to_string(),
            description: "Reopens tabs from a previous session based on a topic.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "The topic of the tabs to recall, e.g., \"design research\"."
                    }
                },
                "required": ["topic"]
            }),
        },
    ]
}

impl Action {
    /// Maps a structured model call back onto the variant set. Unknown
    /// names and missing required arguments degrade to `Unknown` here, at
    /// the boundary, so the resolver never sees a malformed call.
    pub fn from_call(call: &FunctionCall) -> Action {
        let string_arg = |key: &str| {
            call.arguments
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(|s| s.to_string())
        };

        match call.name.as_str() {
            ACTION_SWITCH => match string_arg("tabId") {
                Some(tab_id) => Action::SwitchTab { tab_id },
                None => Action::Unknown,
            },
            ACTION_CLOSE => match string_arg("tabId") {
                Some(tab_id) => Action::CloseTab { tab_id },
                None => Action::Unknown,
            },
            ACTION_SUMMARIZE => match string_arg("tabId") {
                Some(tab_id) => Action::SummarizeTab { tab_id },
                None => Action::Unknown,
            },
            ACTION_RECALL => match string_arg("topic") {
                Some(topic) => Action::RecallTabs { topic },
                None => Action::Unknown,
            },
            other => {
                tracing::warn!("Model called undeclared action: {}", other);
                Action::Unknown
            }
        }
    }
}
