//! Conversion between canonical types and Google Generative Language format
//!
//! Requests take the flattened-text path: the text of every message becomes
//! one part of a single user turn. Roles, tool calls and tool results have no
//! representation there and are dropped, and tool declarations are refused.
//! Messages without text contribute no part at all, so an assistant turn
//! carrying only tool calls vanishes from the request.

use super::{Converter, RESERVED_OPTIONS, encode_arguments, synthesize_call_id};
use crate::error::{ConversionError, MalformedResponseError};
use crate::protocol::google::{
    GoogleCandidate, GoogleContent, GooglePart, GoogleRequest, GoogleResponse, GoogleSafetySetting,
    GoogleUsageMetadata,
};
use crate::types::{ChatRequest, ChatResponse, Choice, ChoiceMessage, FinishReason, Options, ToolCall, ToolSpec, Usage};

/// Harm categories covered by the default safety settings
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Threshold used by the default safety settings
const DEFAULT_THRESHOLD: &str = "BLOCK_ONLY_HIGH";

/// Canonical option names that Google spells differently
const OPTION_RENAMES: [(&str, &str); 5] = [
    ("max_tokens", "maxOutputTokens"),
    ("top_p", "topP"),
    ("top_k", "topK"),
    ("stop", "stopSequences"),
    ("n", "candidateCount"),
];

/// Every harm category at `BLOCK_ONLY_HIGH`
pub fn default_safety_settings() -> Vec<GoogleSafetySetting> {
    HARM_CATEGORIES
        .iter()
        .map(|category| GoogleSafetySetting {
            category: (*category).to_owned(),
            threshold: DEFAULT_THRESHOLD.to_owned(),
        })
        .collect()
}

/// Converter for the Google `generateContent` API
#[derive(Debug, Clone)]
pub struct GoogleConverter {
    safety_settings: Vec<GoogleSafetySetting>,
}

impl Default for GoogleConverter {
    fn default() -> Self {
        Self::new(default_safety_settings())
    }
}

impl GoogleConverter {
    /// Converter attaching the given safety settings to every request
    pub const fn new(safety_settings: Vec<GoogleSafetySetting>) -> Self {
        Self { safety_settings }
    }

    pub fn safety_settings(&self) -> &[GoogleSafetySetting] {
        &self.safety_settings
    }
}

impl Converter for GoogleConverter {
    type Request = GoogleRequest;
    type Response = GoogleResponse;
    type Tools = ();

    fn convert_request(&self, request: &ChatRequest) -> Result<GoogleRequest, ConversionError> {
        request.check_reserved_options(RESERVED_OPTIONS)?;
        self.convert_tool_spec(request.tools())?;

        let mut parts = Vec::with_capacity(request.messages.len());
        for message in &request.messages {
            message.validate()?;
            let text = message.content.as_text();
            if !text.is_empty() {
                parts.push(GooglePart::text(text));
            }
        }

        let contents = if parts.is_empty() {
            Vec::new()
        } else {
            vec![GoogleContent {
                role: Some("user".to_owned()),
                parts,
            }]
        };

        Ok(GoogleRequest {
            contents,
            safety_settings: self.safety_settings.clone(),
            generation_config: generation_config(&request.options),
        })
    }

    fn convert_tool_spec(&self, tools: &[ToolSpec]) -> Result<(), ConversionError> {
        if tools.is_empty() {
            Ok(())
        } else {
            Err(ConversionError::new(
                "tool declarations are not supported by the Google flattened-text conversion",
            ))
        }
    }

    fn convert_response(&self, response: GoogleResponse) -> Result<ChatResponse, MalformedResponseError> {
        let choices = match (response.candidates, response.prompt_feedback) {
            (Some(candidates), _) => candidates
                .into_iter()
                .enumerate()
                .map(|(position, candidate)| convert_candidate(position, candidate))
                .collect(),
            // Blocked prompts come back with feedback instead of candidates
            (None, Some(feedback)) if feedback.block_reason.is_some() => vec![Choice {
                index: 0,
                message: ChoiceMessage::new(String::new(), Vec::new()),
                finish_reason: FinishReason::from_optional(feedback.block_reason.as_deref()),
            }],
            (None, _) => return Err(MalformedResponseError::missing("candidates")),
        };

        Ok(ChatResponse {
            id: response.response_id,
            model: response.model_version,
            choices,
            usage: response.usage_metadata.map(convert_usage),
        })
    }
}

/// Build `generationConfig` from pass-through options
fn generation_config(options: &Options) -> Option<Options> {
    if options.is_empty() {
        return None;
    }

    let config = options
        .iter()
        .map(|(key, value)| {
            let renamed = OPTION_RENAMES
                .iter()
                .find(|(canonical, _)| *canonical == key.as_str())
                .map_or(key.as_str(), |(_, google)| *google);

            let value = match (renamed, value) {
                ("stopSequences", serde_json::Value::String(_)) => serde_json::Value::Array(vec![value.clone()]),
                _ => value.clone(),
            };

            (renamed.to_owned(), value)
        })
        .collect();

    Some(config)
}

fn convert_candidate(position: usize, candidate: GoogleCandidate) -> Choice {
    let mut content = String::new();
    let mut tool_calls = Vec::new();

    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(text) = part.text {
            content.push_str(&text);
        }
        if let Some(call) = part.function_call {
            tool_calls.push(ToolCall::function(
                synthesize_call_id(),
                call.name,
                encode_arguments(call.args.as_ref()),
            ));
        }
    }

    // Google reports STOP even when the model called functions
    let finish_reason = match FinishReason::from_optional(candidate.finish_reason.as_deref()) {
        FinishReason::Stop if !tool_calls.is_empty() => FinishReason::ToolCalls,
        other => other,
    };

    let index = candidate
        .index
        .unwrap_or_else(|| u32::try_from(position).unwrap_or(u32::MAX));

    Choice {
        index,
        message: ChoiceMessage::new(content, tool_calls),
        finish_reason,
    }
}

fn convert_usage(usage: GoogleUsageMetadata) -> Usage {
    Usage::from_counts(
        usage.prompt_token_count.unwrap_or(0),
        usage.candidates_token_count.unwrap_or(0),
        usage.total_token_count,
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{Message, ParametersSchema};

    fn normalize(body: serde_json::Value) -> Result<ChatResponse, MalformedResponseError> {
        let response: GoogleResponse = serde_json::from_value(body).unwrap();
        GoogleConverter::default().convert_response(response)
    }

    #[test]
    fn messages_flatten_into_one_user_turn() {
        let request = ChatRequest::new(
            "gemini-2.0-flash",
            vec![
                Message::system("Be brief."),
                Message::user("Hello!"),
                Message::assistant("Hi."),
                Message::tool("call_1", "42"),
            ],
        );

        let body = serde_json::to_value(GoogleConverter::default().convert_request(&request).unwrap()).unwrap();

        assert_eq!(
            body["contents"],
            json!([{
                "role": "user",
                "parts": [{"text": "Be brief."}, {"text": "Hello!"}, {"text": "Hi."}, {"text": "42"}]
            }])
        );
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn messages_without_text_add_no_part() {
        let call = ToolCall::function("call_1", "lookup", r#"{"q": "x"}"#);
        let request = ChatRequest::new(
            "gemini-2.0-flash",
            vec![
                Message::user("Look it up."),
                Message::assistant_with_tool_calls("", vec![call]),
                Message::tool("call_1", "found"),
            ],
        );

        let body = serde_json::to_value(GoogleConverter::default().convert_request(&request).unwrap()).unwrap();

        assert_eq!(
            body["contents"],
            json!([{"role": "user", "parts": [{"text": "Look it up."}, {"text": "found"}]}])
        );
    }

    #[test]
    fn only_empty_messages_yield_no_contents() {
        let request = ChatRequest::new("gemini", vec![Message::system(""), Message::assistant("")]);
        let body = serde_json::to_value(GoogleConverter::default().convert_request(&request).unwrap()).unwrap();
        assert_eq!(body["contents"], json!([]));
    }

    #[test]
    fn default_safety_settings_are_attached() {
        let request = ChatRequest::new("gemini", vec![Message::user("Hi")]);
        let body = serde_json::to_value(GoogleConverter::default().convert_request(&request).unwrap()).unwrap();

        let settings = body["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert!(settings.iter().all(|s| s["threshold"] == "BLOCK_ONLY_HIGH"));
        assert_eq!(settings[1]["category"], "HARM_CATEGORY_HATE_SPEECH");
    }

    #[test]
    fn empty_safety_settings_are_omitted() {
        let request = ChatRequest::new("gemini", vec![Message::user("Hi")]);
        let body = serde_json::to_value(GoogleConverter::new(Vec::new()).convert_request(&request).unwrap()).unwrap();
        assert!(body.get("safetySettings").is_none());
    }

    #[test]
    fn options_move_into_generation_config() {
        let request = ChatRequest::new("gemini", vec![Message::user("Hi")])
            .with_option("temperature", 0.3)
            .with_option("max_tokens", 100)
            .with_option("top_p", 0.9)
            .with_option("stop", "END")
            .with_option("responseMimeType", "application/json");

        let body = serde_json::to_value(GoogleConverter::default().convert_request(&request).unwrap()).unwrap();

        assert_eq!(
            body["generationConfig"],
            json!({
                "temperature": 0.3,
                "maxOutputTokens": 100,
                "topP": 0.9,
                "stopSequences": ["END"],
                "responseMimeType": "application/json"
            })
        );
    }

    #[test]
    fn tools_are_rejected() {
        let request = ChatRequest::new("gemini", vec![Message::user("Hi")])
            .with_tools(vec![ToolSpec::function("f", "", ParametersSchema::object())]);
        assert!(GoogleConverter::default().convert_request(&request).is_err());
    }

    #[test]
    fn plain_text_response() {
        let response = normalize(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "mocked-text-response"}]}, "finishReason": "STOP"}]
        }))
        .unwrap();

        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.content, "mocked-text-response");
        assert_eq!(response.choices[0].finish_reason, FinishReason::Stop);
        assert!(response.usage.is_none());
    }

    #[test]
    fn function_call_with_stop_is_tool_calls() {
        let response = normalize(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"functionCall": {"name": "get_weather", "args": {"location": "Paris"}}}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 8, "candidatesTokenCount": 4, "totalTokenCount": 12}
        }))
        .unwrap();

        let choice = &response.choices[0];
        assert_eq!(choice.finish_reason, FinishReason::ToolCalls);
        assert!(choice.message.tool_calls[0].id.starts_with("call_"));
        assert_eq!(choice.message.tool_calls[0].function.name, "get_weather");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&choice.message.tool_calls[0].function.arguments).unwrap(),
            json!({"location": "Paris"})
        );
        assert_eq!(response.usage.unwrap().total_tokens, 12);
    }

    #[test]
    fn safety_block_is_content_filter() {
        let response = normalize(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        let choice = &response.choices[0];
        assert_eq!(choice.finish_reason, FinishReason::ContentFilter);
        assert_eq!(choice.message.content, "");
        assert!(choice.message.tool_calls.is_empty());
    }

    #[test]
    fn blocked_prompt_yields_filtered_choice() {
        let response = normalize(json!({"promptFeedback": {"blockReason": "PROHIBITED_CONTENT"}})).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].finish_reason, FinishReason::ContentFilter);
    }

    #[test]
    fn unknown_reason_passes_through() {
        let response = normalize(json!({"candidates": [{"content": {"parts": []}, "finishReason": "RECITATION"}]})).unwrap();
        assert_eq!(response.choices[0].finish_reason, FinishReason::Other("RECITATION".to_owned()));
    }

    #[test]
    fn missing_candidates_is_malformed() {
        let err = normalize(json!({"usageMetadata": {"promptTokenCount": 1}})).unwrap_err();
        assert_eq!(err.path, "candidates");
    }

    #[test]
    fn multiple_candidates_keep_order() {
        let response = normalize(json!({
            "candidates": [
                {"content": {"parts": [{"text": "a"}]}, "finishReason": "STOP", "index": 0},
                {"content": {"parts": [{"text": "b"}, {"text": "c"}]}, "finishReason": "MAX_TOKENS", "index": 1}
            ]
        }))
        .unwrap();

        assert_eq!(response.choices.len(), 2);
        assert_eq!(response.choices[1].message.content, "bc");
        assert_eq!(response.choices[1].finish_reason, FinishReason::Length);
    }
}
