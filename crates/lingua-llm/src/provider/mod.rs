//! Provider trait and implementations for chat-completion backends

pub mod anthropic;
pub mod google;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use lingua_config::{ProviderConfig, ProviderType};
use reqwest::RequestBuilder;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use url::Url;

pub use self::anthropic::AnthropicProvider;
pub use self::google::GoogleProvider;
pub use self::openai::OpenAiProvider;
use crate::error::{ConfigurationError, LlmError, MalformedResponseError, ProviderError};
use crate::types::{ChatRequest, ChatResponse};

/// Trait implemented by each chat-completion backend
///
/// Implementations hold only immutable state, so one instance can serve
/// concurrent callers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Configured provider name
    fn name(&self) -> &str;

    /// Send a completion request and normalize the reply
    async fn chat_completions_create(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Model identifiers the backend currently offers
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

/// Construct the adapter for a configured provider
///
/// Missing credentials and base URLs are filled from the provider's
/// environment variables before the adapter is built.
///
/// # Errors
///
/// Returns `LlmError::Configuration` if no API key is available
pub fn build_provider(name: &str, config: &ProviderConfig) -> Result<Arc<dyn Provider>, LlmError> {
    let config = config.clone().with_env_fallback();

    let provider: Arc<dyn Provider> = match config.provider_type {
        ProviderType::Anthropic => Arc::new(AnthropicProvider::new(name.to_owned(), &config)?),
        ProviderType::Google => Arc::new(GoogleProvider::new(name.to_owned(), &config)?),
        ProviderType::Openai
        | ProviderType::Deepseek
        | ProviderType::Inception
        | ProviderType::Cerebras
        | ProviderType::Openrouter => Arc::new(OpenAiProvider::new(name.to_owned(), &config)?),
    };

    tracing::debug!(provider = %name, provider_type = %config.provider_type, "provider ready");

    Ok(provider)
}

/// Take the API key out of a configuration, refusing to build without one
fn require_api_key(name: &str, config: &ProviderConfig) -> Result<SecretString, ConfigurationError> {
    config
        .api_key()
        .cloned()
        .ok_or_else(|| ConfigurationError::missing_api_key(name, config.provider_type.api_key_env()))
}

/// Configured base URL, or the given default
///
/// # Panics
///
/// Panics if the hardcoded default base URL is invalid (should never happen).
fn base_url_or(config: &ProviderConfig, default: &str) -> Url {
    config
        .base_url
        .clone()
        .unwrap_or_else(|| Url::parse(default).expect("valid default URL"))
}

/// Join an endpoint path onto a base URL
fn endpoint(base_url: &Url, path: &str) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    format!("{base}/{path}")
}

/// Send a prepared request and decode a JSON success body
///
/// Transport failures and non-success statuses become `ProviderError`; a
/// success body that does not decode becomes `MalformedResponseError`.
async fn send_json<T: DeserializeOwned>(provider: &str, builder: RequestBuilder) -> Result<T, LlmError> {
    let response = builder.send().await.map_err(|e| {
        tracing::error!(provider = %provider, error = %e, "upstream request failed");
        ProviderError::Transport {
            provider: provider.to_owned(),
            message: e.to_string(),
        }
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        tracing::error!(provider = %provider, error = %e, "failed to read upstream response");
        ProviderError::Transport {
            provider: provider.to_owned(),
            message: format!("failed to read response body: {e}"),
        }
    })?;

    if !status.is_success() {
        tracing::warn!(
            provider = %provider,
            status = %status,
            "upstream returned error"
        );
        return Err(ProviderError::Status {
            provider: provider.to_owned(),
            status: status.as_u16(),
            body,
        }
        .into());
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(provider = %provider, error = %e, "upstream response did not decode");
        MalformedResponseError::undecodable(&e).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_configuration_error() {
        temp_env::with_var_unset("DEEPSEEK_API_KEY", || {
            let config = ProviderConfig::new(ProviderType::Deepseek);
            let Err(err) = build_provider("deepseek", &config) else {
                panic!("expected configuration error");
            };
            assert!(matches!(err, LlmError::Configuration(_)));
            assert!(err.to_string().contains("DEEPSEEK_API_KEY"));
        });
    }

    #[test]
    fn empty_key_counts_as_missing() {
        temp_env::with_var("ANTHROPIC_API_KEY", Some(""), || {
            let config = ProviderConfig::new(ProviderType::Anthropic).with_api_key("");
            assert!(matches!(
                build_provider("claude", &config),
                Err(LlmError::Configuration(_))
            ));
        });
    }

    #[test]
    fn key_from_environment() {
        temp_env::with_var("GEMINI_API_KEY", Some("env-key"), || {
            let provider = build_provider("gemini", &ProviderConfig::new(ProviderType::Google)).unwrap();
            assert_eq!(provider.name(), "gemini");
        });
    }

    #[test]
    fn every_type_builds_with_a_key() {
        for provider_type in ProviderType::ALL {
            let config = ProviderConfig::new(provider_type).with_api_key("sk-test");
            let provider = build_provider(provider_type.as_str(), &config).unwrap();
            assert_eq!(provider.name(), provider_type.as_str());
        }
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let base = Url::parse("http://localhost:8080/v1/").unwrap();
        assert_eq!(endpoint(&base, "models"), "http://localhost:8080/v1/models");
    }
}
