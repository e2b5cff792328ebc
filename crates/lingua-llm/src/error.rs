use thiserror::Error;

/// A provider could not be constructed from its configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration error: {message}")]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Credential for `provider` is absent from both config and environment
    pub fn missing_api_key(provider: &str, env_var: &str) -> Self {
        Self::new(format!(
            "no API key for provider `{provider}`: set `api_key` in the config or the {env_var} environment variable"
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A canonical request could not be expressed in a backend wire format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conversion error: {message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A backend response lacks a field its contract guarantees
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed response: {detail} (at `{path}`)")]
pub struct MalformedResponseError {
    /// Path of the offending field, e.g. `choices[0].message`
    pub path: String,
    /// What was wrong at that path
    pub detail: String,
}

impl MalformedResponseError {
    pub fn new(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Required field absent or `null`
    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, "required field is missing")
    }

    /// Body could not be decoded at all
    pub fn undecodable(error: &serde_json::Error) -> Self {
        Self::new("$", format!("response body is not the expected JSON: {error}"))
    }
}

/// The backend call itself failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Request never produced a response (connect, TLS, timeout)
    #[error("provider `{provider}` request failed: {message}")]
    Transport { provider: String, message: String },

    /// Backend answered with a non-success status
    #[error("provider `{provider}` returned {status}: {body}")]
    Status { provider: String, status: u16, body: String },
}

impl ProviderError {
    /// HTTP status of the failed call, if the backend answered at all
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } => None,
            Self::Status { status, .. } => Some(*status),
        }
    }
}

/// Errors that can occur while talking to a chat-completion backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponseError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl LlmError {
    /// Whether repeating the same call could succeed
    ///
    /// Only backend failures are transient; configuration, conversion and
    /// malformed-response errors repeat deterministically.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}
