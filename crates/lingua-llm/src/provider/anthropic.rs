//! Anthropic Messages API provider implementation

use async_trait::async_trait;
use lingua_config::ProviderConfig;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{Provider, base_url_or, endpoint, require_api_key, send_json};
use crate::convert::{AnthropicConverter, Converter};
use crate::error::LlmError;
use crate::protocol::anthropic::{AnthropicModelList, AnthropicResponse};
use crate::types::{ChatRequest, ChatResponse};

/// Default Anthropic API base URL
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    name: String,
    client: Client,
    base_url: Url,
    api_key: SecretString,
    converter: AnthropicConverter,
}

impl AnthropicProvider {
    /// Create from provider configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if no API key is configured.
    pub fn new(name: String, config: &ProviderConfig) -> Result<Self, LlmError> {
        let api_key = require_api_key(&name, config)?;

        Ok(Self {
            name,
            client: Client::new(),
            base_url: base_url_or(config, DEFAULT_BASE_URL),
            api_key,
            converter: AnthropicConverter,
        })
    }

    /// Attach the authentication and version headers
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat_completions_create(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let wire_request = self.converter.convert_request(request)?;

        tracing::debug!(provider = %self.name, model = %request.model, "sending messages request");

        let builder = self
            .authorize(self.client.post(endpoint(&self.base_url, "messages")))
            .json(&wire_request);

        let wire_response: AnthropicResponse = send_json(&self.name, builder).await?;

        Ok(self.converter.convert_response(wire_response)?)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let builder = self.authorize(self.client.get(endpoint(&self.base_url, "models")));

        let body: AnthropicModelList = send_json(&self.name, builder).await?;

        Ok(body.data.into_iter().map(|m| m.id).collect())
    }
}
