use serde::{Deserialize, Serialize};

use super::message::Message;
use super::tool::ToolSpec;
use crate::error::ConversionError;

/// Caller-supplied generation options, forwarded to the backend untouched
pub type Options = serde_json::Map<String, serde_json::Value>;

/// Canonical chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier as understood by the backend
    pub model: String,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Tool definitions available to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec>>,
    /// Pass-through generation options (temperature, `max_tokens`, ...)
    #[serde(flatten)]
    pub options: Options,
}

impl ChatRequest {
    /// Request without tools or options
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            options: Options::new(),
        }
    }

    /// Attach tool declarations
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set a pass-through generation option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Tool declarations, empty when none were supplied
    pub fn tools(&self) -> &[ToolSpec] {
        self.tools.as_deref().unwrap_or_default()
    }

    /// Parse an untyped JSON request and check every message
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the value does not have the canonical
    /// request shape or any message violates its invariants
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConversionError> {
        let request: Self =
            serde_json::from_value(value).map_err(|e| ConversionError::new(format!("malformed request: {e}")))?;
        for message in &request.messages {
            message.validate()?;
        }
        Ok(request)
    }

    /// Reject options whose keys collide with fields the converter writes itself
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` naming the first colliding option
    pub fn check_reserved_options(&self, reserved: &[&str]) -> Result<(), ConversionError> {
        match reserved.iter().find(|key| self.options.contains_key(**key)) {
            Some(key) => Err(ConversionError::new(format!(
                "option `{key}` collides with a field set by the converter"
            ))),
            None => Ok(()),
        }
    }
}
