use crate::config::{Config, ProviderConfig};
use anyhow::{Context, Result};
use std::io::{self, Write};
use tabwarden_providers::DEFAULT_GEMINI_MODEL;

pub fn run_bootstrap() -> Result<Config> {
    println!("\nNo provider configured.");
    println!("Select provider:");
    println!("1. Google Gemini");
    println!("2. OpenAI-compatible endpoint");
    println!("3. Offline heuristic (no API key, keyword matching only)");
    print!("\nChoice [1-3]: ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;

    match choice.trim() {
        "1" => bootstrap_gemini(),
        "2" => bootstrap_openai_compatible(),
        "3" => bootstrap_heuristic(),
        _ => {
            anyhow::bail!("Invalid choice. Please select 1-3.");
        }
    }
}

fn bootstrap_gemini() -> Result<Config> {
    println!("\nEnter Gemini API key (leave empty to use TABWARDEN_API_KEY):");
    let api_key = rpassword::read_password().context("Failed to read API key")?;
    let api_key = Some(api_key.trim().to_string()).filter(|k| !k.is_empty());

    let config = Config::with_provider(
        ProviderConfig::Gemini {
            model: DEFAULT_GEMINI_MODEL.to_string(),
        },
        api_key,
    );

    config.save()?;
    println!("✅ Gemini provider configured");

    Ok(config)
}

fn bootstrap_openai_compatible() -> Result<Config> {
    print!("\nEnter endpoint base URL (e.g. http://localhost:8080/v1): ");
    io::stdout().flush()?;
    let mut endpoint = String::new();
    io::stdin().read_line(&mut endpoint)?;
    let endpoint = endpoint.trim().to_string();
    if endpoint.is_empty() {
        anyhow::bail!("Endpoint cannot be empty");
    }

    print!("Enter model name: ");
    io::stdout().flush()?;
    let mut model = String::new();
    io::stdin().read_line(&mut model)?;
    let model = model.trim().to_string();
    if model.is_empty() {
        anyhow::bail!("Model cannot be empty");
    }

    println!("Enter API key (leave empty for unauthenticated endpoints):");
    let api_key = rpassword::read_password().context("Failed to read API key")?;
    let api_key = Some(api_key.trim().to_string()).filter(|k| !k.is_empty());

    let config = Config::with_provider(ProviderConfig::OpenAICompatible { endpoint, model }, api_key);

    config.save()?;
    println!("✅ OpenAI-compatible provider configured");

    Ok(config)
}

fn bootstrap_heuristic() -> Result<Config> {
    let config = Config::with_provider(ProviderConfig::Heuristic, None);

    config.save()?;
    println!("✅ Offline heuristic configured (commands are matched by keywords)");

    Ok(config)
}
