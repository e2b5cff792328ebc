//! `OpenAI` chat completion API wire format types
//!
//! Shared by every OpenAI-compatible backend (`DeepSeek`, Inception,
//! Cerebras, `OpenRouter`).

use serde::{Deserialize, Serialize};

use crate::types::{Message, Options, ToolSpec};

// -- Request types --

/// `OpenAI` chat completion request
///
/// The canonical message and tool shapes are already the `OpenAI` shapes,
/// so they are sent as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Tool definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec>>,
    /// Caller options (temperature, `max_tokens`, ...), sent inline
    #[serde(flatten)]
    pub options: Options,
}

// -- Response types --

/// `OpenAI` chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponse {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Completion choices
    #[serde(default)]
    pub choices: Option<Vec<OpenAiChoice>>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

/// A single choice in an `OpenAI` response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
    /// Choice index
    #[serde(default)]
    pub index: Option<u32>,
    /// Generated message
    #[serde(default)]
    pub message: Option<OpenAiResponseMessage>,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message within a response choice
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponseMessage {
    /// Text content; `null` when the model only called tools
    #[serde(default)]
    pub content: Option<OpenAiContent>,
    /// Tool calls made by the assistant
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
}

/// `OpenAI` content can be a string or array of content parts
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OpenAiContent {
    /// Plain text content
    Text(String),
    /// Array of content parts
    Parts(Vec<OpenAiContentPart>),
}

/// Content part in a response; only text parts carry text
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiContentPart {
    /// Part type (e.g. "text")
    #[serde(rename = "type")]
    pub part_type: String,
    /// Text, for text parts
    #[serde(default)]
    pub text: Option<String>,
}

/// Tool call in an `OpenAI` response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiToolCall {
    /// Tool call identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Function call details
    pub function: OpenAiFunctionCall,
}

/// Function call details
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiFunctionCall {
    /// Function name
    pub name: String,
    /// Arguments, a JSON string per the API contract; some compatible
    /// backends send a bare object instead
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

/// Token usage statistics
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt tokens
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    /// Completion tokens
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

// -- Models list types --

/// `OpenAI` models list response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiModelList {
    /// List of models
    #[serde(default)]
    pub data: Vec<OpenAiModel>,
}

/// Single model entry
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiModel {
    /// Model identifier
    pub id: String,
}
