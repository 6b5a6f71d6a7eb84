//! The single-actor event pipeline tying the interpreter, resolver,
//! registry, idle tracker, and persistence together. All state mutation
//! happens here, in response to one discrete event at a time.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tabwarden_core::{
    ActionResolver, CloseOutcome, CommandInterpreter, ContentReader, IdleTracker, Metrics,
    RecallStore, SideEffect, SummaryFailed, Tab, TabHost, TabRegistry,
};
use tabwarden_memory::{AssistantState, ChatRecord, ClosedTab, StateStore};
use tabwarden_providers::LanguageModel;
use tokio::sync::Mutex;

pub const IDLE_ALERT_OPTIONS: [&str; 2] = ["Yes, close it", "No, keep it"];

const SENDER_USER: &str = "user";
const SENDER_ASSISTANT: &str = "assistant";

/// Outcome of handing user text to the session. A submission made while
/// another command is in flight is dropped, not queued.
#[derive(Debug)]
pub enum Submission {
    Reply(String),
    Busy,
}

/// A one-shot recommendation for an idle tab, answered via
/// [`Session::answer_idle`] or dismissed by ignoring it.
#[derive(Debug, Clone)]
pub struct IdleAlert {
    pub tab_id: String,
    pub message: String,
}

struct SessionState {
    registry: TabRegistry,
    idle: IdleTracker,
    recall: RecallStore,
    persisted: AssistantState,
}

pub struct Session {
    state: Mutex<SessionState>,
    /// Ready/busy guard for user commands; idle ticks also stand down
    /// while a command is in flight.
    busy: AtomicBool,
    interpreter: CommandInterpreter,
    resolver: ActionResolver,
    host: Arc<dyn TabHost>,
    store: StateStore,
    metrics: Arc<Metrics>,
}

impl Session {
    pub async fn initialize(
        host: Arc<dyn TabHost>,
        reader: Arc<dyn ContentReader>,
        model: Option<Arc<dyn LanguageModel>>,
        store: StateStore,
        recall: RecallStore,
        idle_threshold: Duration,
    ) -> Result<Self> {
        store.initialize().await?;
        let persisted = store
            .load()
            .await
            .context("Failed to load assistant state")?;

        let now = chrono::Utc::now().timestamp_millis();
        let descriptors = host
            .list_open_tabs()
            .await
            .context("Failed to list open tabs")?;
        let tabs: Vec<Tab> = descriptors
            .into_iter()
            .map(|d| Tab {
                id: d.id,
                title: d.title,
                url: d.url,
                favicon: d.favicon,
                content: None,
                last_accessed: now,
                is_idle: false,
            })
            .collect();
        let active = tabs.first().map(|t| t.id.clone());
        let registry = TabRegistry::from_tabs(tabs, active);

        tracing::info!(
            "Session started with {} tabs, idle threshold {}s",
            registry.len(),
            idle_threshold.as_secs()
        );

        let metrics = Metrics::new();
        let interpreter = match &model {
            Some(model) => CommandInterpreter::with_model(model.clone(), metrics.clone()),
            None => CommandInterpreter::heuristic(metrics.clone()),
        };
        let resolver = ActionResolver::new(reader, model, metrics.clone());

        Ok(Self {
            state: Mutex::new(SessionState {
                registry,
                idle: IdleTracker::new(idle_threshold),
                recall,
                persisted,
            }),
            busy: AtomicBool::new(false),
            interpreter,
            resolver,
            host,
            store,
            metrics,
        })
    }

    /// Handle one user command. Drops the submission when another is in
    /// flight so two resolutions can never interleave on the same state.
    pub async fn submit(&self, text: &str) -> Submission {
        if self.busy.swap(true, Ordering::SeqCst) {
            tracing::debug!("Dropping submission while busy: {}", text);
            self.metrics.inc_submissions_dropped();
            return Submission::Busy;
        }

        let reply = self.handle_command(text).await;
        self.busy.store(false, Ordering::SeqCst);
        Submission::Reply(reply)
    }

    async fn handle_command(&self, text: &str) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        self.metrics.inc_commands();

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let action = self.interpreter.interpret(text, &state.registry).await;
        tracing::debug!("Interpreted \"{}\" as {:?}", text, action);

        let resolution = self
            .resolver
            .resolve(action, &mut state.registry, &state.recall, now)
            .await;
        self.apply_effects(state, &resolution.effects, now).await;

        state.persisted.push_chat(ChatRecord {
            timestamp: now,
            sender: SENDER_USER.to_string(),
            text: text.to_string(),
        });
        state.persisted.push_chat(ChatRecord {
            timestamp: now,
            sender: SENDER_ASSISTANT.to_string(),
            text: resolution.reply.clone(),
        });
        let snapshot = state.persisted.clone();
        drop(guard);

        self.persist(&snapshot).await;
        resolution.reply
    }

    /// Mirror registry mutations to the tab host. Host failures are logged
    /// and swallowed; the registry remains the source of truth.
    async fn apply_effects(&self, state: &mut SessionState, effects: &[SideEffect], now: i64) {
        for effect in effects {
            match effect {
                SideEffect::Activated(id) => {
                    state.idle.reset(id);
                    if let Err(err) = self.host.activate(id).await {
                        tracing::warn!("Host failed to activate tab {}: {}", id, err);
                    }
                }
                SideEffect::Closed { id, title, url } => {
                    state.idle.forget(id);
                    state.persisted.push_closed(ClosedTab {
                        title: title.clone(),
                        url: url.clone(),
                        closed_at: now,
                    });
                    if let Err(err) = self.host.close(id).await {
                        tracing::warn!("Host failed to close tab {}: {}", id, err);
                    }
                }
                SideEffect::Opened { id, url } => match self.host.open_new(url).await {
                    Ok(host_id) => {
                        tracing::debug!("Host opened {} as {} (registry id {})", url, host_id, id)
                    }
                    Err(err) => tracing::warn!("Host failed to open {}: {}", url, err),
                },
            }
        }
    }

    /// One poll of the idle state machine. At most one alert per tick; the
    /// tab is marked Alerted before the (slow) summarization so a racing
    /// tick cannot surface it twice.
    pub async fn idle_tick(&self, now: i64) -> Option<IdleAlert> {
        if self.busy.load(Ordering::SeqCst) {
            return None;
        }

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let tab_id = state.idle.tick(now, &mut state.registry)?;
        state.idle.mark_alerted(&tab_id);
        let title = state.registry.find(&tab_id)?.title.clone();

        self.metrics.inc_idle_alerts();
        tracing::info!("Tab {} (\"{}\") went idle, raising recommendation", tab_id, title);

        let summary = match self.resolver.tab_summary(&mut state.registry, &tab_id).await {
            Ok(summary) => summary,
            Err(SummaryFailed) => "I couldn't summarize it".to_string(),
        };

        let message = format!(
            "The tab \"{}\" has been idle for a while. It's about: {}. Would you like to close it?",
            title, summary
        );
        state.persisted.push_chat(ChatRecord {
            timestamp: now,
            sender: SENDER_ASSISTANT.to_string(),
            text: message.clone(),
        });
        let snapshot = state.persisted.clone();
        drop(guard);

        self.persist(&snapshot).await;
        Some(IdleAlert { tab_id, message })
    }

    /// Apply the user's answer to an idle recommendation. "Keep it open"
    /// restarts the tab's idle episode from now.
    pub async fn answer_idle(&self, tab_id: &str, close: bool) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let reply = if close {
            match state.registry.close_tab(tab_id) {
                CloseOutcome::Closed(tab) => {
                    state.idle.forget(&tab.id);
                    state.persisted.push_closed(ClosedTab {
                        title: tab.title,
                        url: tab.url,
                        closed_at: now,
                    });
                    if let Err(err) = self.host.close(tab_id).await {
                        tracing::warn!("Host failed to close tab {}: {}", tab_id, err);
                    }
                    "Okay, I've closed it for you!".to_string()
                }
                CloseOutcome::AlreadyClosed => "It seems that tab is already closed.".to_string(),
            }
        } else {
            state.idle.reset(tab_id);
            state.registry.refresh_access(tab_id, now);
            "No problem, I'll keep it open.".to_string()
        };

        state.persisted.push_chat(ChatRecord {
            timestamp: now,
            sender: SENDER_ASSISTANT.to_string(),
            text: reply.clone(),
        });
        let snapshot = state.persisted.clone();
        drop(guard);

        self.persist(&snapshot).await;
        reply
    }

    /// Persistence is best-effort; a failed save must never surface as a
    /// user-facing fault.
    async fn persist(&self, snapshot: &AssistantState) {
        if let Err(err) = self.store.save(snapshot).await {
            tracing::warn!("Failed to persist assistant state: {}", err);
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn tabs_snapshot(&self) -> Vec<Tab> {
        self.state.lock().await.registry.tabs().to_vec()
    }

    pub async fn tab_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    pub async fn active_tab_id(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .registry
            .active_tab_id()
            .map(|id| id.to_string())
    }

    pub async fn recently_closed(&self) -> Vec<ClosedTab> {
        self.state.lock().await.persisted.recently_closed.clone()
    }

    pub async fn show_tab_list(&self) -> bool {
        self.state.lock().await.persisted.prefs.show_tab_list
    }
}
