use std::path::PathBuf;

use clap::Parser;

/// Lingua chat-completion client
#[derive(Debug, Parser)]
#[command(name = "lingua", about = "Send one chat completion to any configured backend")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "lingua.toml", env = "LINGUA_CONFIG")]
    pub config: PathBuf,

    /// Configured provider to use; optional when only one is configured
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model identifier understood by the provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt placed before the conversation
    #[arg(long)]
    pub system: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// JSON file holding a canonical message array
    #[arg(long)]
    pub messages: Option<PathBuf>,

    /// List the provider's models instead of sending a completion
    #[arg(long)]
    pub list_models: bool,

    /// Log filter directive
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_filter: String,

    /// User prompt appended after any loaded messages
    pub prompt: Option<String>,
}
