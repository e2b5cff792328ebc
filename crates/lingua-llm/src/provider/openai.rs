//! OpenAI-compatible provider implementation

use async_trait::async_trait;
use lingua_config::{ProviderConfig, ProviderType};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{Provider, base_url_or, endpoint, require_api_key, send_json};
use crate::convert::{Converter, OpenAiConverter};
use crate::error::{ConfigurationError, LlmError};
use crate::protocol::openai::{OpenAiModelList, OpenAiResponse};
use crate::types::{ChatRequest, ChatResponse};

/// Default API base URL for each OpenAI-compatible backend
pub const fn default_base_url(provider_type: ProviderType) -> &'static str {
    match provider_type {
        ProviderType::Deepseek => "https://api.deepseek.com",
        ProviderType::Inception => "https://api.inceptionlabs.ai/v1",
        ProviderType::Cerebras => "https://api.cerebras.ai/v1",
        ProviderType::Openrouter => "https://openrouter.ai/api/v1",
        ProviderType::Openai | ProviderType::Anthropic | ProviderType::Google => "https://api.openai.com/v1",
    }
}

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    name: String,
    client: Client,
    base_url: Url,
    api_key: SecretString,
    converter: OpenAiConverter,
}

impl OpenAiProvider {
    /// Create from provider configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if no API key is configured.
    pub fn new(name: String, config: &ProviderConfig) -> Result<Self, LlmError> {
        if !config.provider_type.is_openai_compatible() {
            return Err(ConfigurationError::new(format!(
                "provider `{name}` of type `{}` does not speak the OpenAI wire format",
                config.provider_type
            ))
            .into());
        }
        let api_key = require_api_key(&name, config)?;
        let base_url = base_url_or(config, default_base_url(config.provider_type));

        Ok(Self {
            name,
            client: Client::new(),
            base_url,
            api_key,
            converter: OpenAiConverter,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat_completions_create(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let wire_request = self.converter.convert_request(request)?;

        tracing::debug!(provider = %self.name, model = %request.model, "sending chat completion");

        let builder = self
            .client
            .post(endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&wire_request);

        let wire_response: OpenAiResponse = send_json(&self.name, builder).await?;

        Ok(self.converter.convert_response(wire_response)?)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let builder = self
            .client
            .get(endpoint(&self.base_url, "models"))
            .bearer_auth(self.api_key.expose_secret());

        let body: OpenAiModelList = send_json(&self.name, builder).await?;

        Ok(body.data.into_iter().map(|m| m.id).collect())
    }
}
