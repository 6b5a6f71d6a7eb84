use crate::action::{declared_actions, Action};
use crate::heuristic;
use crate::metrics::Metrics;
use crate::registry::TabRegistry;
use std::sync::Arc;
use tabwarden_providers::LanguageModel;

/// Shown whenever classification itself fails; the user always gets a
/// reply, never a propagated fault.
pub const GENERIC_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

enum Backend {
    Model(Arc<dyn LanguageModel>),
    Heuristic,
}

/// Maps raw user text plus the current tab snapshot onto one [`Action`].
///
/// The backend is chosen once at startup: model-backed when a language
/// model is configured, otherwise the offline keyword heuristic. Both
/// paths produce the same closed variant set.
pub struct CommandInterpreter {
    backend: Backend,
    metrics: Arc<Metrics>,
}

impl CommandInterpreter {
    pub fn with_model(model: Arc<dyn LanguageModel>, metrics: Arc<Metrics>) -> Self {
        Self {
            backend: Backend::Model(model),
            metrics,
        }
    }

    pub fn heuristic(metrics: Arc<Metrics>) -> Self {
        Self {
            backend: Backend::Heuristic,
            metrics,
        }
    }

    pub async fn interpret(&self, text: &str, registry: &TabRegistry) -> Action {
        // Replacing "active tab" with the concrete id grounds the phrase
        // for classification; it must happen before the text leaves here.
        let text = ground_active_tab(text, registry.active_tab_id());

        match &self.backend {
            Backend::Model(model) => self.interpret_with_model(model.as_ref(), &text, registry).await,
            Backend::Heuristic => heuristic::classify(&text, registry),
        }
    }

    async fn interpret_with_model(
        &self,
        model: &dyn LanguageModel,
        text: &str,
        registry: &TabRegistry,
    ) -> Action {
        let instruction = system_instruction(registry);

        match model.classify(&instruction, text, &declared_actions()).await {
            Ok(reply) => {
                if let Some(call) = reply.call {
                    tracing::debug!("Model called {} with {}", call.name, call.arguments);
                    return Action::from_call(&call);
                }
                match reply.content {
                    Some(content) if !content.trim().is_empty() => Action::Chat { text: content },
                    _ => Action::Unknown,
                }
            }
            Err(err) => {
                tracing::warn!("Classification via {} failed: {}", model.name(), err);
                self.metrics.inc_classify_failures();
                Action::Chat {
                    text: GENERIC_APOLOGY.to_string(),
                }
            }
        }
    }
}

/// System instruction sent with every classification request. Only id and
/// title go into the tab context, which keeps the prompt bounded.
fn system_instruction(registry: &TabRegistry) -> String {
    let mut instruction = String::from(
        "You are TabWarden, an expert AI assistant for browser tab management.\n\
         Your goal is to understand user requests and use the provided tools to manage their tabs.\n\
         If the user's request is a command that maps to a tool, call the function.\n\
         If the user is just chatting or asking a general question, respond conversationally.\n\
         Here is the current list of open tabs:\n",
    );
    for tab in registry.tabs() {
        instruction.push_str(&format!("Tab(id: \"{}\", title: \"{}\")\n", tab.id, tab.title));
    }
    instruction
}

/// Substitute the literal phrase "active tab" (any case) with an explicit
/// reference to the active tab's id. No-op when no tab is active.
fn ground_active_tab(text: &str, active_id: Option<&str>) -> String {
    const PHRASE: &str = "active tab";

    let Some(id) = active_id else {
        return text.to_string();
    };
    if !text.to_lowercase().contains(PHRASE) {
        return text.to_string();
    }

    let replacement = format!("tab with ID {}", id);
    let mut out = String::with_capacity(text.len() + replacement.len());
    let mut skip_until = 0;
    for (index, ch) in text.char_indices() {
        if index < skip_until {
            continue;
        }
        if text
            .get(index..index + PHRASE.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(PHRASE))
        {
            out.push_str(&replacement);
            skip_until = index + PHRASE.len();
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tab;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tabwarden_providers::{
        ActionDecl, ClassifyReply, FunctionCall, LanguageModel, ProviderError,
    };

    fn registry() -> TabRegistry {
        let tabs = vec![Tab {
            id: "7".to_string(),
            title: "Release Notes".to_string(),
            url: "example.com/notes".to_string(),
            favicon: "📄".to_string(),
            content: None,
            last_accessed: 0,
            is_idle: false,
        }];
        TabRegistry::from_tabs(tabs, Some("7".to_string()))
    }

    struct ScriptedModel {
        reply: Mutex<Option<Result<ClassifyReply, ProviderError>>>,
        seen_text: Mutex<Option<String>>,
    }

    impl ScriptedModel {
        fn new(reply: Result<ClassifyReply, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                seen_text: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn classify(
            &self,
            _system_instruction: &str,
            text: &str,
            _actions: &[ActionDecl],
        ) -> Result<ClassifyReply, ProviderError> {
            *self.seen_text.lock().unwrap() = Some(text.to_string());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(ClassifyReply::default()))
        }

        async fn summarize(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok("a summary".to_string())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[test]
    fn grounding_replaces_every_occurrence_case_insensitively() {
        let grounded = ground_active_tab("Summarize the Active Tab, then the ACTIVE TAB again", Some("7"));
        assert_eq!(
            grounded,
            "Summarize the tab with ID 7, then the tab with ID 7 again"
        );
    }

    #[test]
    fn grounding_is_noop_without_active_tab() {
        assert_eq!(
            ground_active_tab("summarize the active tab", None),
            "summarize the active tab"
        );
    }

    #[tokio::test]
    async fn structured_call_maps_to_action() {
        let model = ScriptedModel::new(Ok(ClassifyReply {
            content: None,
            call: Some(FunctionCall {
                name: "tabs.switch".to_string(),
                arguments: serde_json::json!({ "tabId": "7" }),
            }),
        }));
        let interpreter = CommandInterpreter::with_model(model, Metrics::new());

        let action = interpreter.interpret("go to the notes", &registry()).await;
        assert_eq!(
            action,
            Action::SwitchTab {
                tab_id: "7".to_string()
            }
        );
    }

    #[tokio::test]
    async fn free_text_maps_to_chat() {
        let model = ScriptedModel::new(Ok(ClassifyReply {
            content: Some("Happy to help!".to_string()),
            call: None,
        }));
        let interpreter = CommandInterpreter::with_model(model, Metrics::new());

        let action = interpreter.interpret("how are you?", &registry()).await;
        assert_eq!(
            action,
            Action::Chat {
                text: "Happy to help!".to_string()
            }
        );
    }

    #[tokio::test]
    async fn empty_reply_maps_to_unknown() {
        let model = ScriptedModel::new(Ok(ClassifyReply::default()));
        let interpreter = CommandInterpreter::with_model(model, Metrics::new());

        let action = interpreter.interpret("???", &registry()).await;
        assert_eq!(action, Action::Unknown);
    }

    #[tokio::test]
    async fn provider_error_becomes_apologetic_chat() {
        let metrics = Metrics::new();
        let model = ScriptedModel::new(Err(ProviderError::Http("timeout".to_string())));
        let interpreter = CommandInterpreter::with_model(model, metrics.clone());

        let action = interpreter.interpret("close the tab", &registry()).await;
        assert_eq!(
            action,
            Action::Chat {
                text: GENERIC_APOLOGY.to_string()
            }
        );
        assert_eq!(metrics.snapshot().classify_failures, 1);
    }

    #[tokio::test]
    async fn grounded_text_reaches_the_model() {
        let model = ScriptedModel::new(Ok(ClassifyReply::default()));
        let interpreter = CommandInterpreter::with_model(model.clone(), Metrics::new());

        interpreter.interpret("summarize the active tab", &registry()).await;

        let seen = model.seen_text.lock().unwrap().clone();
        assert_eq!(seen.as_deref(), Some("summarize the tab with ID 7"));
    }
}
