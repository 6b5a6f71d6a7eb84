use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tabwarden_app::config::{Config, ProviderConfig};
use tabwarden_app::host::{DemoContentReader, DemoTabHost};
use tabwarden_app::session::{IdleAlert, Session, Submission, IDLE_ALERT_OPTIONS};
use tabwarden_app::{bootstrap, seed};
use tabwarden_interfaces::{Interface, TerminalInterface};
use tabwarden_memory::StateStore;
use tabwarden_providers::{
    GeminiProvider, LanguageModel, OpenAICompatibleProvider, DEFAULT_GEMINI_MODEL,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              TabWarden Terminal Assistant             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // Missing or invalid provider configuration is the one fatal class;
    // everything after boot resolves to a conversational reply instead.
    let config = if Config::exists() {
        let config = Config::load()?;
        config.validate()?;
        config
    } else {
        bootstrap::run_bootstrap()?
    };

    let model: Option<Arc<dyn LanguageModel>> = match &config.provider {
        ProviderConfig::Gemini { .. } => {
            let api_key = config.api_key().context(
                "Gemini provider needs an API key: set TABWARDEN_API_KEY or re-run bootstrap",
            )?;
            let model_name = config
                .model()
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
            Some(Arc::new(GeminiProvider::new(api_key, model_name)))
        }
        ProviderConfig::OpenAICompatible { .. } => {
            let endpoint = config
                .endpoint()
                .context("OpenAI-compatible provider needs an endpoint")?;
            let model_name = config
                .model()
                .context("OpenAI-compatible provider needs a model")?;
            Some(Arc::new(OpenAICompatibleProvider::new(
                endpoint,
                config.api_key(),
                model_name,
            )))
        }
        ProviderConfig::Heuristic => None,
    };

    match &model {
        Some(model) => println!("Using provider: {}", model.name()),
        None => println!("Using offline heuristic matching (no language model)"),
    }
    println!();

    let host = Arc::new(DemoTabHost::new(seed::initial_tabs()));
    let reader = Arc::new(DemoContentReader::new(seed::page_entries()));
    let store = StateStore::new(&config.data_dir);

    let session = Arc::new(
        Session::initialize(
            host,
            reader,
            model,
            store,
            seed::curated_recall(),
            Duration::from_secs(config.idle_threshold_secs),
        )
        .await?,
    );

    let interface = TerminalInterface::new();

    interface.send_output(seed::GREETING).await;
    if session.show_tab_list().await {
        let active = session.active_tab_id().await;
        for tab in session.tabs_snapshot().await {
            let marker = if active.as_deref() == Some(tab.id.as_str()) {
                "▸"
            } else {
                " "
            };
            println!("  {} {}  {}", marker, tab.favicon, tab.title);
        }
        println!();
    }
    println!("Try: {}", seed::SUGGESTIONS.join(" · "));
    println!("Type \"quit\" to exit.");
    println!();

    // One recurring poll task; the handle is the cancellation tie to
    // session teardown.
    let (alert_tx, mut alert_rx) = tokio::sync::mpsc::channel::<IdleAlert>(4);
    let poller = tokio::spawn({
        let session = session.clone();
        let interval = Duration::from_secs(config.poll_interval_secs);
        async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let now = chrono::Utc::now().timestamp_millis();
                if let Some(alert) = session.idle_tick(now).await {
                    if alert_tx.send(alert).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // An outstanding recommendation consumes the next yes/no line; any
    // other input dismisses it and is handled as a normal command.
    let mut pending_alert: Option<String> = None;

    loop {
        tokio::select! {
            maybe_alert = alert_rx.recv() => {
                let Some(alert) = maybe_alert else {
                    tracing::warn!("Idle poller stopped unexpectedly");
                    break;
                };
                interface.send_with_options(&alert.message, &IDLE_ALERT_OPTIONS).await;
                pending_alert = Some(alert.tab_id);
            }
            maybe_line = interface.receive_input() => {
                let Some(line) = maybe_line else { break };
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
                    break;
                }

                if let Some(tab_id) = pending_alert.take() {
                    let answer = line.to_lowercase();
                    if answer.starts_with('y') {
                        let reply = session.answer_idle(&tab_id, true).await;
                        interface.send_output(&reply).await;
                        continue;
                    }
                    if answer.starts_with('n') {
                        let reply = session.answer_idle(&tab_id, false).await;
                        interface.send_output(&reply).await;
                        continue;
                    }
                }

                interface.show_status("thinking…").await;
                match session.submit(&line).await {
                    Submission::Reply(reply) => interface.send_output(&reply).await,
                    Submission::Busy => {
                        interface.show_status("still working on the last request").await
                    }
                }
            }
        }
    }

    poller.abort();

    let stats = session.metrics().snapshot();
    tracing::info!(
        "Session ended: {} commands, {} idle alerts, {} tabs recalled",
        stats.commands,
        stats.idle_alerts,
        stats.tabs_recalled
    );

    Ok(())
}
