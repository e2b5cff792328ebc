//! Google Generative Language API provider implementation

use async_trait::async_trait;
use lingua_config::ProviderConfig;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{Provider, base_url_or, endpoint, require_api_key, send_json};
use crate::convert::google::default_safety_settings;
use crate::convert::{Converter, GoogleConverter};
use crate::error::{ConfigurationError, LlmError};
use crate::protocol::google::{GoogleModelList, GoogleResponse, GoogleSafetySetting};
use crate::types::{ChatRequest, ChatResponse};

/// Default Google Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Generative Language API provider
pub struct GoogleProvider {
    name: String,
    client: Client,
    base_url: Url,
    api_key: SecretString,
    converter: GoogleConverter,
}

impl GoogleProvider {
    /// Create from provider configuration
    ///
    /// Configured safety settings replace the defaults wholesale.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if no API key is configured.
    pub fn new(name: String, config: &ProviderConfig) -> Result<Self, LlmError> {
        let api_key = require_api_key(&name, config)?;

        let safety_settings = if config.safety_settings.is_empty() {
            default_safety_settings()
        } else {
            config
                .safety_settings
                .iter()
                .map(|s| GoogleSafetySetting {
                    category: s.category.clone(),
                    threshold: s.threshold.clone(),
                })
                .collect()
        };

        Ok(Self {
            name,
            client: Client::new(),
            base_url: base_url_or(config, DEFAULT_BASE_URL),
            api_key,
            converter: GoogleConverter::new(safety_settings),
        })
    }

    pub fn safety_settings(&self) -> &[GoogleSafetySetting] {
        self.converter.safety_settings()
    }

    /// `generateContent` URL for a model, its name escaped as one path segment
    fn generate_content_url(&self, model: &str) -> Result<Url, ConfigurationError> {
        let model = model.strip_prefix("models/").unwrap_or(model);

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigurationError::new(format!("base URL `{}` cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{model}:generateContent"));
        Ok(url)
    }

    /// The key travels in a header so it never shows up in URLs or error text
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("x-goog-api-key", self.api_key.expose_secret())
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat_completions_create(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let wire_request = self.converter.convert_request(request)?;

        let url = self.generate_content_url(&request.model)?;
        tracing::debug!(provider = %self.name, model = %request.model, "sending generateContent request");

        let builder = self.authorize(self.client.post(url)).json(&wire_request);

        let wire_response: GoogleResponse = send_json(&self.name, builder).await?;

        Ok(self.converter.convert_response(wire_response)?)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let builder = self.authorize(self.client.get(endpoint(&self.base_url, "models")));

        let body: GoogleModelList = send_json(&self.name, builder).await?;

        Ok(body
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| m.name.strip_prefix("models/").map_or_else(|| m.name.clone(), str::to_owned))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use lingua_config::{ProviderType, SafetySettingConfig};

    use super::*;

    #[test]
    fn default_safety_settings_block_only_high() {
        let config = ProviderConfig::new(ProviderType::Google).with_api_key("key");
        let provider = GoogleProvider::new("gemini".to_owned(), &config).unwrap();

        assert_eq!(provider.safety_settings().len(), 4);
        assert!(provider.safety_settings().iter().all(|s| s.threshold == "BLOCK_ONLY_HIGH"));
    }

    #[test]
    fn model_name_is_one_escaped_path_segment() {
        let config = ProviderConfig::new(ProviderType::Google)
            .with_api_key("key")
            .with_base_url(Url::parse("http://127.0.0.1:9000/v1beta/").unwrap());
        let provider = GoogleProvider::new("gemini".to_owned(), &config).unwrap();

        let url = provider.generate_content_url("models/gemini-2.0-flash").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v1beta/models/gemini-2.0-flash:generateContent");

        let url = provider.generate_content_url("odd?x#y/z").unwrap();
        assert_eq!(url.path(), "/v1beta/models/odd%3Fx%23y%2Fz:generateContent");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn configured_safety_settings_replace_defaults() {
        let mut config = ProviderConfig::new(ProviderType::Google).with_api_key("key");
        config.safety_settings.push(SafetySettingConfig {
            category: "HARM_CATEGORY_HATE_SPEECH".to_owned(),
            threshold: "BLOCK_LOW_AND_ABOVE".to_owned(),
        });

        let provider = GoogleProvider::new("gemini".to_owned(), &config).unwrap();
        assert_eq!(
            provider.safety_settings(),
            [GoogleSafetySetting {
                category: "HARM_CATEGORY_HATE_SPEECH".to_owned(),
                threshold: "BLOCK_LOW_AND_ABOVE".to_owned(),
            }]
        );
    }
}
