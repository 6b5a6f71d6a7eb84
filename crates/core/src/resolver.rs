use crate::action::{Action, ACTIVE_TAB};
use crate::host::{ContentReader, ReadError};
use crate::metrics::Metrics;
use crate::recall::{RecallMatch, RecallStore};
use crate::registry::{CloseOutcome, TabRegistry};
use std::sync::Arc;
use tabwarden_providers::LanguageModel;
use thiserror::Error;

/// At most this much page text goes into a summarization prompt.
const SUMMARY_INPUT_CAP: usize = 8000;
/// Length of the extractive summary used when no model is configured.
const SNIPPET_SUMMARY_CAP: usize = 120;

/// Registry mutations performed during resolution, reported so the caller
/// can mirror them to the tab host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    Activated(String),
    Closed {
        id: String,
        title: String,
        url: String,
    },
    Opened {
        id: String,
        url: String,
    },
}

/// The user-facing outcome of one resolved action. Misses ("not found",
/// "already closed") are ordinary resolutions, not errors.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub reply: String,
    pub effects: Vec<SideEffect>,
}

impl Resolution {
    fn reply_only(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            effects: Vec::new(),
        }
    }
}

/// Summarization is the one sub-operation with a hard failure mode (the
/// model call itself); everything softer is folded into the summary text.
#[derive(Debug, Error)]
#[error("summarization failed")]
pub struct SummaryFailed;

/// Turns a classified [`Action`] plus the current registry/recall state
/// into a reply and the mutations that produced it.
pub struct ActionResolver {
    reader: Arc<dyn ContentReader>,
    model: Option<Arc<dyn LanguageModel>>,
    metrics: Arc<Metrics>,
}

impl ActionResolver {
    pub fn new(
        reader: Arc<dyn ContentReader>,
        model: Option<Arc<dyn LanguageModel>>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            reader,
            model,
            metrics,
        }
    }

    pub async fn resolve(
        &self,
        action: Action,
        registry: &mut TabRegistry,
        recall: &RecallStore,
        now: i64,
    ) -> Resolution {
        match action {
            Action::SwitchTab { tab_id } => match registry.find(&tab_id) {
                Some(tab) => {
                    let title = tab.title.clone();
                    registry.set_active(&tab_id, now);
                    Resolution {
                        reply: format!("Sure, I've switched to the \"{}\" tab for you.", title),
                        effects: vec![SideEffect::Activated(tab_id)],
                    }
                }
                None => Resolution::reply_only(
                    "I couldn't find a tab with that name. Maybe it's closed?",
                ),
            },

            Action::CloseTab { tab_id } => match registry.close_tab(&tab_id) {
                CloseOutcome::Closed(tab) => Resolution {
                    reply: format!("Okay, I've closed the \"{}\" tab.", tab.title),
                    effects: vec![SideEffect::Closed {
                        id: tab.id,
                        title: tab.title,
                        url: tab.url,
                    }],
                },
                CloseOutcome::AlreadyClosed => {
                    Resolution::reply_only("It seems that tab is already closed.")
                }
            },

            Action::SummarizeTab { tab_id } => {
                // "active" is resolved now, not at interpretation time; the
                // active tab may have changed while the command was in flight.
                let resolved = if tab_id == ACTIVE_TAB {
                    registry.active_tab_id().map(|id| id.to_string())
                } else {
                    Some(tab_id)
                };

                match resolved.filter(|id| registry.find(id).is_some()) {
                    Some(id) => {
                        let title = registry
                            .find(&id)
                            .map(|t| t.title.clone())
                            .unwrap_or_default();
                        match self.tab_summary(registry, &id).await {
                            Ok(summary) => Resolution::reply_only(format!(
                                "Here's a summary of the \"{}\" tab:\n\n{}",
                                title, summary
                            )),
                            Err(SummaryFailed) => {
                                Resolution::reply_only("I had trouble summarizing that tab.")
                            }
                        }
                    }
                    None => Resolution::reply_only("I couldn't find that tab to summarize."),
                }
            }

            Action::RecallTabs { topic } => match recall.lookup(&topic) {
                RecallMatch::Session { key, tabs } => {
                    let mut effects = Vec::with_capacity(tabs.len());
                    for template in tabs {
                        let tab = registry.add_tab(template.clone(), now);
                        effects.push(SideEffect::Opened {
                            id: tab.id.clone(),
                            url: tab.url.clone(),
                        });
                    }
                    self.metrics.add_tabs_recalled(effects.len() as u64);
                    Resolution {
                        reply: format!(
                            "I've reopened {} tabs from your session on \"{}\".",
                            effects.len(),
                            key
                        ),
                        effects,
                    }
                }
                RecallMatch::EmptySession { key } => Resolution::reply_only(format!(
                    "I found a session on \"{}\", but it was empty.",
                    key
                )),
                RecallMatch::NotFound => Resolution::reply_only(format!(
                    "Sorry, I couldn't find any saved sessions related to \"{}\".",
                    topic.to_lowercase()
                )),
            },

            Action::Chat { text } => Resolution::reply_only(text),

            Action::Unknown => Resolution::reply_only(
                "I'm not sure how to help with that. Could you rephrase?",
            ),
        }
    }

    /// Produce the summary text for one tab. Soft misses (restricted page,
    /// no text content) become the summary itself; only a failed model call
    /// is an error, which each caller words for its own context.
    pub async fn tab_summary(
        &self,
        registry: &mut TabRegistry,
        tab_id: &str,
    ) -> Result<String, SummaryFailed> {
        let Some(tab) = registry.find(tab_id) else {
            return Err(SummaryFailed);
        };
        let title = tab.title.clone();
        let mut content = tab.content.clone().unwrap_or_default();

        if content.trim().is_empty() {
            match self.reader.read_visible_text(tab_id).await {
                Ok(text) => {
                    if !text.trim().is_empty() {
                        if let Some(tab) = registry.find_mut(tab_id) {
                            tab.content = Some(text.clone());
                        }
                    }
                    content = text;
                }
                Err(ReadError::Restricted) => {
                    return Ok(format!(
                        "Could not access tab \"{}\". It might be a protected browser page.",
                        title
                    ));
                }
                Err(ReadError::Unavailable(reason)) => {
                    tracing::debug!("Content unavailable for tab {}: {}", tab_id, reason);
                }
            }
        }

        if content.trim().is_empty() {
            return Ok(format!(
                "The tab \"{}\" doesn't seem to have any text content to summarize.",
                title
            ));
        }

        let snippet: String = content.chars().take(SUMMARY_INPUT_CAP).collect();
        match &self.model {
            Some(model) => {
                self.metrics.inc_summaries();
                let prompt = format!(
                    "Please provide a concise, one-sentence summary of the following content \
                     from the tab titled \"{}\":\n\n---\n{}\n---",
                    title, snippet
                );
                match model.summarize(&prompt).await {
                    Ok(summary) => Ok(summary.trim().to_string()),
                    Err(err) => {
                        tracing::warn!("Summarization via {} failed: {}", model.name(), err);
                        self.metrics.inc_summary_failures();
                        Err(SummaryFailed)
                    }
                }
            }
            None => Ok(snippet_summary(&snippet)),
        }
    }
}

/// Extractive fallback: the leading slice of the content.
fn snippet_summary(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= SNIPPET_SUMMARY_CAP {
        return trimmed.to_string();
    }
    let snippet: String = trimmed.chars().take(SNIPPET_SUMMARY_CAP).collect();
    format!("{}...", snippet.trim_end())
}
