use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConversionError;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
    /// Tool/function result
    Tool,
}

impl Role {
    /// Wire name of the role
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author
    pub role: Role,
    /// Message content; `null` reads as empty text
    #[serde(default, deserialize_with = "nullable_content")]
    pub content: Content,
    /// Optional participant name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tool calls made by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// ID of the tool call this message is a response to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn new(role: Role, content: impl Into<Content>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// System instruction
    pub fn system(content: impl Into<Content>) -> Self {
        Self::new(Role::System, content)
    }

    /// User turn
    pub fn user(content: impl Into<Content>) -> Self {
        Self::new(Role::User, content)
    }

    /// Assistant turn without tool calls
    pub fn assistant(content: impl Into<Content>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Assistant turn requesting tool invocations
    pub fn assistant_with_tool_calls(content: impl Into<Content>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::new(Role::Assistant, content)
        }
    }

    /// Result of the tool call identified by `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<Content>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }

    /// Parse an untyped JSON message and check its invariants
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the value is not a message object, its
    /// content is neither a string nor a recognized part sequence, or a
    /// tool-role message lacks `tool_call_id`
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConversionError> {
        let message: Self =
            serde_json::from_value(value).map_err(|e| ConversionError::new(format!("malformed message: {e}")))?;
        message.validate()?;
        Ok(message)
    }

    /// Check the structural invariants of the message
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if a tool-role message lacks `tool_call_id`
    pub fn validate(&self) -> Result<(), ConversionError> {
        if self.role == Role::Tool && self.tool_call_id.is_none() {
            return Err(ConversionError::new("tool message is missing `tool_call_id`"));
        }
        Ok(())
    }

    /// Tool calls carried by the message, empty when there are none
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

fn nullable_content<'de, D>(deserializer: D) -> Result<Content, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Content>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Message content, either plain text or structured parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text content
    Text(String),
    /// Ordered content parts
    Parts(Vec<ContentPart>),
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Content {
    /// Extract text content, joining text parts with no separator
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ToolUse { .. } | ContentPart::ToolResult { .. } => None,
                })
                .collect(),
        }
    }

    /// Whether the content carries no text and no parts
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Parts(parts) => parts.is_empty(),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Vec<ContentPart>> for Content {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// Individual part within a multipart message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content block
    Text {
        /// The text string
        text: String,
    },
    /// Tool invocation requested by the assistant
    ToolUse {
        /// Tool call identifier
        id: String,
        /// Tool name
        name: String,
        /// Decoded arguments
        input: serde_json::Value,
    },
    /// Output of a tool invocation
    ToolResult {
        /// ID of the tool call this result answers
        tool_use_id: String,
        /// Result text
        content: String,
    },
}

/// Kind of tool call; only functions exist today
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    /// Function call
    #[default]
    Function,
}

/// A tool/function call requested by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Tool kind
    #[serde(rename = "type", default)]
    pub kind: ToolType,
    /// Name of the function to call
    pub function: FunctionCall,
}

impl ToolCall {
    /// Build a function tool call from raw parts
    pub fn function(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ToolType::Function,
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Function name and arguments within a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// JSON-encoded arguments object
    pub arguments: String,
}

impl FunctionCall {
    /// Decode the arguments string into a JSON object
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the arguments are not valid JSON or do
    /// not encode an object
    pub fn decode_arguments(&self) -> Result<serde_json::Map<String, serde_json::Value>, ConversionError> {
        match serde_json::from_str(&self.arguments) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(other) => Err(ConversionError::new(format!(
                "arguments of tool call `{}` must be a JSON object, got {other}",
                self.name
            ))),
            Err(e) => Err(ConversionError::new(format!(
                "arguments of tool call `{}` are not valid JSON: {e}",
                self.name
            ))),
        }
    }
}
