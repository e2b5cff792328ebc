//! Bidirectional conversion between canonical types and wire formats
//!
//! Each backend family implements [`Converter`] once; the adapter picks its
//! converter at construction time and never branches on backend names.

pub mod anthropic;
pub mod google;
pub mod openai;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use self::anthropic::AnthropicConverter;
pub use self::google::GoogleConverter;
pub use self::openai::OpenAiConverter;
use crate::error::{ConversionError, MalformedResponseError};
use crate::types::{ChatRequest, ChatResponse, ToolSpec};

/// Request/response translation for one backend family
pub trait Converter: Send + Sync {
    /// Backend-native request body
    type Request: Serialize + Send + Sync;
    /// Backend-native response body
    type Response: DeserializeOwned + Send;
    /// Backend-native tool declarations
    type Tools;

    /// Translate a canonical request into the backend wire format
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the request cannot be expressed for this
    /// backend
    fn convert_request(&self, request: &ChatRequest) -> Result<Self::Request, ConversionError>;

    /// Translate canonical tool declarations, preserving their order
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the backend cannot declare tools
    fn convert_tool_spec(&self, tools: &[ToolSpec]) -> Result<Self::Tools, ConversionError>;

    /// Normalize a backend response into the canonical response
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponseError` naming the first required path the
    /// backend left out
    fn convert_response(&self, response: Self::Response) -> Result<ChatResponse, MalformedResponseError>;
}

/// Canonical fields a converter writes itself; options may not shadow them
const RESERVED_OPTIONS: &[&str] = &["model", "messages", "tools"];

/// Encode a native tool input object as a canonical `arguments` string
///
/// A missing or `null` input encodes as an empty object.
fn encode_arguments(input: Option<&serde_json::Value>) -> String {
    match input {
        None | Some(serde_json::Value::Null) => "{}".to_owned(),
        Some(value) => value.to_string(),
    }
}

/// Synthesize a tool call id for backends that do not assign one
fn synthesize_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}
