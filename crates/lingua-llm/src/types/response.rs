use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::message::{Role, ToolCall};

/// Reason the model stopped generating
///
/// Backend values outside the canonical vocabulary are kept verbatim in
/// `Other` so callers can still branch on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Hit the token limit
    Length,
    /// Model decided to call a tool
    ToolCalls,
    /// Content was filtered by safety systems
    ContentFilter,
    /// Unrecognized backend value, passed through unchanged
    Other(String),
}

impl FinishReason {
    /// Map a backend stop reason onto the canonical vocabulary
    ///
    /// Matching ignores ASCII case so upper-case vocabularies resolve too.
    pub fn from_backend(reason: &str) -> Self {
        match reason.to_ascii_lowercase().as_str() {
            "end_turn" | "stop" => Self::Stop,
            "max_tokens" | "length" => Self::Length,
            "tool_use" | "tool_calls" | "function_call" => Self::ToolCalls,
            "content_filter" | "safety" | "blocklist" | "prohibited_content" | "spii" => Self::ContentFilter,
            _ => Self::Other(reason.to_owned()),
        }
    }

    /// Map an optional backend stop reason, treating absence as a natural stop
    pub fn from_optional(reason: Option<&str>) -> Self {
        reason.map_or(Self::Stop, Self::from_backend)
    }

    /// Canonical string, or the original backend string for `Other`
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ToolCalls => "tool_calls",
            Self::ContentFilter => "content_filter",
            Self::Other(reason) => reason,
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FinishReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FinishReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_backend(&raw))
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

impl Usage {
    /// Build usage from backend counts
    ///
    /// A total supplied by the backend wins over the computed sum; a
    /// mismatch is logged and otherwise tolerated.
    pub fn from_counts(prompt_tokens: u32, completion_tokens: u32, supplied_total: Option<u32>) -> Self {
        let computed = prompt_tokens.saturating_add(completion_tokens);

        let total_tokens = match supplied_total {
            Some(total) if total != computed => {
                tracing::warn!(
                    prompt_tokens,
                    completion_tokens,
                    supplied_total = total,
                    computed_total = computed,
                    "backend total_tokens disagrees with prompt + completion"
                );
                total
            }
            Some(total) => total,
            None => computed,
        };

        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// A single completion choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Index of this choice
    pub index: u32,
    /// Generated message
    pub message: ChoiceMessage,
    /// Why generation stopped
    pub finish_reason: FinishReason,
}

/// Assistant message within a response choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Always `assistant`
    pub role: Role,
    /// Concatenated text content, empty when the model produced none
    pub content: String,
    /// Tool calls in the order the backend produced them
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl ChoiceMessage {
    /// Assistant message from already-extracted text and tool calls
    pub const fn new(content: String, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
        }
    }
}

/// Canonical chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Backend response identifier, when the backend reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Model that served the request, when the backend reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Generated choices, at least one per backend candidate
    pub choices: Vec<Choice>,
    /// Token usage; absent when the backend sent none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reason_table() {
        let cases = [
            ("end_turn", FinishReason::Stop),
            ("stop", FinishReason::Stop),
            ("max_tokens", FinishReason::Length),
            ("length", FinishReason::Length),
            ("tool_use", FinishReason::ToolCalls),
            ("tool_calls", FinishReason::ToolCalls),
            ("function_call", FinishReason::ToolCalls),
            ("content_filter", FinishReason::ContentFilter),
            ("SAFETY", FinishReason::ContentFilter),
            ("STOP", FinishReason::Stop),
            ("MAX_TOKENS", FinishReason::Length),
        ];
        for (raw, expected) in cases {
            assert_eq!(FinishReason::from_backend(raw), expected, "{raw}");
        }
    }

    #[test]
    fn documented_vocabularies_never_panic() {
        let anthropic = ["end_turn", "max_tokens", "stop_sequence", "tool_use", "pause_turn", "refusal"];
        let openai = ["stop", "length", "tool_calls", "content_filter", "function_call"];
        let google = [
            "FINISH_REASON_UNSPECIFIED",
            "STOP",
            "MAX_TOKENS",
            "SAFETY",
            "RECITATION",
            "LANGUAGE",
            "OTHER",
            "BLOCKLIST",
            "PROHIBITED_CONTENT",
            "SPII",
            "MALFORMED_FUNCTION_CALL",
        ];

        for raw in anthropic.into_iter().chain(openai).chain(google) {
            let reason = FinishReason::from_backend(raw);
            match &reason {
                FinishReason::Other(original) => assert_eq!(original, raw),
                known => assert!(["stop", "length", "tool_calls", "content_filter"].contains(&known.as_str())),
            }
        }
    }

    #[test]
    fn unrecognized_reason_passes_through() {
        let reason = FinishReason::from_backend("stop_sequence");
        assert_eq!(reason, FinishReason::Other("stop_sequence".to_owned()));
        assert_eq!(serde_json::to_value(&reason).unwrap(), "stop_sequence");
    }

    #[test]
    fn absent_reason_is_stop() {
        assert_eq!(FinishReason::from_optional(None), FinishReason::Stop);
    }

    #[test]
    fn usage_sums_when_total_missing() {
        let usage = Usage::from_counts(10, 5, None);
        assert_eq!(usage.total_tokens, 15);
    }

    #[test]
    fn supplied_total_wins() {
        let usage = Usage::from_counts(10, 5, Some(16));
        assert_eq!(usage.total_tokens, 16);
        assert_eq!(usage.prompt_tokens, 10);
    }

    #[test]
    fn response_serializes_canonical_shape() {
        let response = ChatResponse {
            id: None,
            model: None,
            choices: vec![Choice {
                index: 0,
                message: ChoiceMessage::new(String::new(), Vec::new()),
                finish_reason: FinishReason::Stop,
            }],
            usage: None,
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "", "tool_calls": []},
                    "finish_reason": "stop"
                }]
            })
        );
    }
}
