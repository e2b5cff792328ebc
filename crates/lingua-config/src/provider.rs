use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Configuration for a single chat-completion backend
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Backend wire protocol and vendor
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Safety thresholds attached to every request (Google only)
    #[serde(default)]
    pub safety_settings: Vec<SafetySettingConfig>,
}

impl ProviderConfig {
    /// Create an empty configuration for a provider type
    pub const fn new(provider_type: ProviderType) -> Self {
        Self {
            provider_type,
            api_key: None,
            base_url: None,
            safety_settings: Vec::new(),
        }
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Fill a missing API key or base URL from the provider's environment variables
    ///
    /// Values already present in the configuration win. Empty strings, whether
    /// configured or taken from the environment, count as missing.
    #[must_use]
    pub fn with_env_fallback(mut self) -> Self {
        if self.api_key.as_ref().is_none_or(|k| k.expose_secret().is_empty()) {
            self.api_key = read_env(self.provider_type.api_key_env()).map(SecretString::from);
        }

        if self.base_url.is_none()
            && let Some(var) = self.provider_type.base_url_env()
            && let Some(raw) = read_env(var)
        {
            match Url::parse(&raw) {
                Ok(url) => self.base_url = Some(url),
                Err(e) => tracing::warn!(variable = var, error = %e, "ignoring invalid base URL override"),
            }
        }

        self
    }

    /// The API key, if one is configured and non-empty
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|k| !k.expose_secret().is_empty())
    }
}

/// Read a non-empty environment variable
fn read_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

/// Supported chat-completion backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// `OpenAI` chat completions API
    Openai,
    /// `DeepSeek` (OpenAI-compatible)
    Deepseek,
    /// Inception Labs (OpenAI-compatible)
    Inception,
    /// Cerebras (OpenAI-compatible)
    Cerebras,
    /// `OpenRouter` (OpenAI-compatible)
    Openrouter,
    /// Anthropic Messages API
    Anthropic,
    /// Google Generative Language API
    Google,
}

impl ProviderType {
    /// Every supported backend
    pub const ALL: [Self; 7] = [
        Self::Openai,
        Self::Deepseek,
        Self::Inception,
        Self::Cerebras,
        Self::Openrouter,
        Self::Anthropic,
        Self::Google,
    ];

    /// Configuration name of the backend
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Deepseek => "deepseek",
            Self::Inception => "inception",
            Self::Cerebras => "cerebras",
            Self::Openrouter => "openrouter",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }

    /// Environment variable holding the API key
    pub const fn api_key_env(self) -> &'static str {
        match self {
            Self::Openai => "OPENAI_API_KEY",
            Self::Deepseek => "DEEPSEEK_API_KEY",
            Self::Inception => "INCEPTION_API_KEY",
            Self::Cerebras => "CEREBRAS_API_KEY",
            Self::Openrouter => "OPENROUTER_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Google => "GEMINI_API_KEY",
        }
    }

    /// Environment variable overriding the base URL, for backends that honor one
    pub const fn base_url_env(self) -> Option<&'static str> {
        match self {
            Self::Openai => Some("OPENAI_BASE_URL"),
            Self::Anthropic => Some("ANTHROPIC_BASE_URL"),
            Self::Deepseek | Self::Inception | Self::Cerebras | Self::Openrouter | Self::Google => None,
        }
    }

    /// Whether the backend speaks the `OpenAI` chat completions wire format
    pub const fn is_openai_compatible(self) -> bool {
        matches!(
            self,
            Self::Openai | Self::Deepseek | Self::Inception | Self::Cerebras | Self::Openrouter
        )
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single Google safety threshold
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SafetySettingConfig {
    /// Harm category (e.g. `HARM_CATEGORY_HATE_SPEECH`)
    pub category: String,
    /// Block threshold (e.g. `BLOCK_ONLY_HIGH`)
    pub threshold: String,
}
