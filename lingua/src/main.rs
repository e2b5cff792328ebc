#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod logging;

use std::path::Path;

use anyhow::Context;
use args::Args;
use clap::Parser;
use lingua_config::{Config, ProviderConfig};
use lingua_llm::{ChatRequest, Message, build_provider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init(&args.log_filter);

    let config = Config::load(&args.config)?;
    let (name, provider_config) = select_provider(&config, args.provider.as_deref())?;

    tracing::debug!(
        config_path = %args.config.display(),
        provider = %name,
        "using provider"
    );

    let provider = build_provider(name, provider_config)?;

    if args.list_models {
        for model in provider.list_models().await? {
            println!("{model}");
        }
        return Ok(());
    }

    let request = build_request(&args)?;
    let response = provider.chat_completions_create(&request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Pick the requested provider, or the only configured one
fn select_provider<'a>(config: &'a Config, requested: Option<&'a str>) -> anyhow::Result<(&'a str, &'a ProviderConfig)> {
    if let Some(name) = requested {
        let provider = config
            .provider(name)
            .with_context(|| format!("provider `{name}` is not configured"))?;
        return Ok((name, provider));
    }

    match config.providers.len() {
        1 => config
            .providers
            .first()
            .map(|(name, provider)| (name.as_str(), provider))
            .context("no providers configured"),
        _ => anyhow::bail!("several providers are configured; pick one with --provider"),
    }
}

/// Assemble the canonical request from command-line arguments
fn build_request(args: &Args) -> anyhow::Result<ChatRequest> {
    let model = args.model.clone().context("--model is required to send a completion")?;

    let mut messages = Vec::new();

    if let Some(system) = &args.system {
        messages.push(Message::system(system.as_str()));
    }

    if let Some(path) = &args.messages {
        messages.extend(load_messages(path)?);
    }

    if let Some(prompt) = &args.prompt {
        messages.push(Message::user(prompt.as_str()));
    }

    anyhow::ensure!(
        messages.iter().any(|m| m.role != lingua_llm::types::Role::System),
        "nothing to send: pass a prompt or --messages"
    );

    let mut request = ChatRequest::new(model, messages);

    if let Some(temperature) = args.temperature {
        request = request.with_option("temperature", temperature);
    }
    if let Some(max_tokens) = args.max_tokens {
        request = request.with_option("max_tokens", max_tokens);
    }

    Ok(request)
}

/// Read a JSON array of canonical messages
fn load_messages(path: &Path) -> anyhow::Result<Vec<Message>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let values: Vec<serde_json::Value> =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON array", path.display()))?;

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| Message::from_value(value).with_context(|| format!("message {i} in {}", path.display())))
        .collect()
}
