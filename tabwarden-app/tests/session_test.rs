//! End-to-end session scenarios against the demo host with a scripted
//! language model.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tabwarden_app::host::{DemoContentReader, DemoTabHost};
use tabwarden_app::seed;
use tabwarden_app::session::{Session, Submission};
use tabwarden_memory::StateStore;
use tabwarden_providers::{
    ActionDecl, ClassifyReply, FunctionCall, LanguageModel, ProviderError,
};
use tokio::sync::Notify;

struct ScriptedModel {
    replies: Mutex<VecDeque<ClassifyReply>>,
    /// When set, classification blocks until the gate is released.
    gate: Option<Arc<Notify>>,
}

impl ScriptedModel {
    fn new(replies: Vec<ClassifyReply>) -> Arc<dyn LanguageModel> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            gate: None,
        })
    }

    fn gated(replies: Vec<ClassifyReply>, gate: Arc<Notify>) -> Arc<dyn LanguageModel> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            gate: Some(gate),
        })
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn classify(
        &self,
        _system_instruction: &str,
        _text: &str,
        _actions: &[ActionDecl],
    ) -> Result<ClassifyReply, ProviderError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn summarize(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok("a page worth keeping around".to_string())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn call(name: &str, arguments: serde_json::Value) -> ClassifyReply {
    ClassifyReply {
        content: None,
        call: Some(FunctionCall {
            name: name.to_string(),
            arguments,
        }),
    }
}

async fn session_with(
    model: Option<Arc<dyn LanguageModel>>,
    dir: &tempfile::TempDir,
    idle_threshold: Duration,
) -> Arc<Session> {
    let host = Arc::new(DemoTabHost::new(seed::initial_tabs()));
    let reader = Arc::new(DemoContentReader::new(seed::page_entries()));
    let store = StateStore::new(dir.path());

    Arc::new(
        Session::initialize(
            host,
            reader,
            model,
            store,
            seed::curated_recall(),
            idle_threshold,
        )
        .await
        .expect("session should initialize"),
    )
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[tokio::test]
async fn switch_command_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![call(
        "tabs.switch",
        serde_json::json!({ "tabId": "2" }),
    )]);
    let session = session_with(Some(model), &dir, Duration::from_secs(10)).await;

    let submission = session.submit("Switch to the tab about Gemini").await;
    let Submission::Reply(reply) = submission else {
        panic!("expected a reply");
    };

    assert_eq!(
        reply,
        "Sure, I've switched to the \"Gemini API Overview\" tab for you."
    );
    assert_eq!(session.active_tab_id().await.as_deref(), Some("2"));
}

#[tokio::test]
async fn switch_to_closed_tab_is_a_miss_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![call(
        "tabs.switch",
        serde_json::json!({ "tabId": "99" }),
    )]);
    let session = session_with(Some(model), &dir, Duration::from_secs(10)).await;

    let Submission::Reply(reply) = session.submit("switch to that old tab").await else {
        panic!("expected a reply");
    };

    assert_eq!(reply, "I couldn't find a tab with that name. Maybe it's closed?");
    assert_eq!(session.active_tab_id().await.as_deref(), Some("1"));
    assert_eq!(session.tab_count().await, 4);
}

#[tokio::test]
async fn recall_then_close_round_trips_the_registry() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![
        call(
            "tabs.recall",
            serde_json::json!({ "topic": "design research from yesterday" }),
        ),
        call("tabs.close", serde_json::json!({ "tabId": "local-1" })),
        call("tabs.close", serde_json::json!({ "tabId": "local-2" })),
        call("tabs.close", serde_json::json!({ "tabId": "local-3" })),
    ]);
    let session = session_with(Some(model), &dir, Duration::from_secs(10)).await;

    let Submission::Reply(reply) = session
        .submit("Reopen my design research from yesterday")
        .await
    else {
        panic!("expected a reply");
    };
    assert_eq!(reply, "I've reopened 3 tabs from your session on \"design\".");
    assert_eq!(session.tab_count().await, 7);

    // Reopened tabs take focus; the last one is active.
    assert_eq!(session.active_tab_id().await.as_deref(), Some("local-3"));

    for _ in 0..3 {
        let Submission::Reply(reply) = session.submit("close it").await else {
            panic!("expected a reply");
        };
        assert!(reply.starts_with("Okay, I've closed"));
    }

    assert_eq!(session.tab_count().await, 4);
    let active = session.active_tab_id().await.expect("an active tab remains");
    assert!(session
        .tabs_snapshot()
        .await
        .iter()
        .any(|tab| tab.id == active));

    // Every close landed in the recently-closed history, newest first.
    let closed = session.recently_closed().await;
    assert_eq!(closed.len(), 3);
    assert_eq!(closed[0].title, "Color Psychology in Branding");
}

#[tokio::test]
async fn recall_without_match_reports_no_session() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![call(
        "tabs.recall",
        serde_json::json!({ "topic": "quantum" }),
    )]);
    let session = session_with(Some(model), &dir, Duration::from_secs(10)).await;

    let Submission::Reply(reply) = session.submit("reopen my quantum stuff").await else {
        panic!("expected a reply");
    };

    assert_eq!(
        reply,
        "Sorry, I couldn't find any saved sessions related to \"quantum\"."
    );
    assert_eq!(session.tab_count().await, 4);
}

#[tokio::test]
async fn second_submission_while_busy_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let gate = Arc::new(Notify::new());
    let model = ScriptedModel::gated(
        vec![call("tabs.switch", serde_json::json!({ "tabId": "2" }))],
        gate.clone(),
    );
    let session = session_with(Some(model), &dir, Duration::from_secs(10)).await;

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.submit("switch to the gemini tab").await }
    });
    // Let the first submission reach the (blocked) model call.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = session.submit("close the react tab").await;
    assert!(matches!(second, Submission::Busy));

    gate.notify_one();
    let first = first.await.unwrap();
    assert!(matches!(first, Submission::Reply(_)));

    // The dropped submission had no observable effect.
    assert_eq!(session.tab_count().await, 4);
    assert_eq!(session.active_tab_id().await.as_deref(), Some("2"));
    assert_eq!(session.metrics().snapshot().submissions_dropped, 1);
}

#[tokio::test]
async fn idle_episode_alerts_once_and_keep_open_rearms() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(Vec::new());
    let session = session_with(Some(model), &dir, Duration::from_secs(10)).await;

    let start = now_ms();
    let idle_at = start + 10_001;

    // One tab per tick, in registry order, skipping the active tab.
    let first = session.idle_tick(idle_at).await.expect("first alert");
    assert_eq!(first.tab_id, "2");
    assert!(first.message.contains("\"Gemini API Overview\" has been idle for a while"));
    assert!(first.message.contains("a page worth keeping around"));

    let second = session.idle_tick(idle_at).await.expect("second alert");
    assert_eq!(second.tab_id, "3");
    let third = session.idle_tick(idle_at).await.expect("third alert");
    assert_eq!(third.tab_id, "4");

    // Everything eligible has alerted; re-polling stays quiet.
    assert!(session.idle_tick(idle_at).await.is_none());
    assert!(session.idle_tick(idle_at + 60_000).await.is_none());

    // "Keep it open" restarts tab 2's episode from roughly now.
    let reply = session.answer_idle("2", false).await;
    assert_eq!(reply, "No problem, I'll keep it open.");
    assert!(session.idle_tick(now_ms() + 5_000).await.is_none());

    let later = now_ms() + 10_001;
    let again = session.idle_tick(later).await.expect("re-alert after fresh idle period");
    assert_eq!(again.tab_id, "2");
}

#[tokio::test]
async fn idle_alert_close_answer_removes_the_tab() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(Vec::new());
    let session = session_with(Some(model), &dir, Duration::from_secs(10)).await;

    let alert = session
        .idle_tick(now_ms() + 10_001)
        .await
        .expect("an idle alert");
    assert_eq!(alert.tab_id, "2");

    let reply = session.answer_idle(&alert.tab_id, true).await;
    assert_eq!(reply, "Okay, I've closed it for you!");
    assert_eq!(session.tab_count().await, 3);

    let closed = session.recently_closed().await;
    assert_eq!(closed[0].title, "Gemini API Overview");
}

#[tokio::test]
async fn heuristic_session_works_without_a_model() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_with(None, &dir, Duration::from_secs(10)).await;

    let Submission::Reply(reply) = session.submit("find the tab about gemini").await else {
        panic!("expected a reply");
    };
    assert_eq!(
        reply,
        "Sure, I've switched to the \"Gemini API Overview\" tab for you."
    );
    assert_eq!(session.active_tab_id().await.as_deref(), Some("2"));

    // Summaries fall back to the extractive snippet offline.
    let Submission::Reply(reply) = session.submit("summarize the active tab").await else {
        panic!("expected a reply");
    };
    assert!(reply.starts_with("Here's a summary of the \"Gemini API Overview\" tab:"));
    assert!(reply.contains("The Gemini API gives you access"));
}

#[tokio::test]
async fn chat_history_records_both_sides_of_the_exchange() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![ClassifyReply {
        content: Some("Happy to chat!".to_string()),
        call: None,
    }]);
    let session = session_with(Some(model), &dir, Duration::from_secs(10)).await;

    session.submit("hello!").await;

    let store = StateStore::new(dir.path());
    let state = store.load().await.unwrap();
    assert_eq!(state.chat_history.len(), 2);
    assert_eq!(state.chat_history[0].sender, "user");
    assert_eq!(state.chat_history[0].text, "hello!");
    assert_eq!(state.chat_history[1].sender, "assistant");
    assert_eq!(state.chat_history[1].text, "Happy to chat!");
}
