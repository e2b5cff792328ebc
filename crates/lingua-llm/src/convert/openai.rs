//! Conversion between canonical types and `OpenAI` wire format
//!
//! The canonical schema is OpenAI-shaped, so requests pass through
//! untouched; responses are still validated while normalizing.

use super::{Converter, RESERVED_OPTIONS, encode_arguments, synthesize_call_id};
use crate::error::{ConversionError, MalformedResponseError};
use crate::protocol::openai::{
    OpenAiChoice, OpenAiContent, OpenAiContentPart, OpenAiRequest, OpenAiResponse, OpenAiToolCall, OpenAiUsage,
};
use crate::types::{ChatRequest, ChatResponse, Choice, ChoiceMessage, FinishReason, ToolCall, ToolSpec, Usage};

/// Converter for the OpenAI-compatible family
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiConverter;

impl Converter for OpenAiConverter {
    type Request = OpenAiRequest;
    type Response = OpenAiResponse;
    type Tools = Vec<ToolSpec>;

    fn convert_request(&self, request: &ChatRequest) -> Result<OpenAiRequest, ConversionError> {
        request.check_reserved_options(RESERVED_OPTIONS)?;
        for message in &request.messages {
            message.validate()?;
        }

        let tools = match &request.tools {
            Some(tools) => Some(self.convert_tool_spec(tools)?),
            None => None,
        };

        Ok(OpenAiRequest {
            model: request.model.clone(),
            messages: request.messages.clone(),
            tools,
            options: request.options.clone(),
        })
    }

    fn convert_tool_spec(&self, tools: &[ToolSpec]) -> Result<Vec<ToolSpec>, ConversionError> {
        Ok(tools.to_vec())
    }

    fn convert_response(&self, response: OpenAiResponse) -> Result<ChatResponse, MalformedResponseError> {
        let choices = response.choices.ok_or_else(|| MalformedResponseError::missing("choices"))?;

        let choices = choices
            .into_iter()
            .enumerate()
            .map(|(position, choice)| convert_choice(position, choice))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChatResponse {
            id: response.id,
            model: response.model,
            choices,
            usage: response.usage.map(convert_usage),
        })
    }
}

fn convert_choice(position: usize, choice: OpenAiChoice) -> Result<Choice, MalformedResponseError> {
    let message = choice
        .message
        .ok_or_else(|| MalformedResponseError::missing(format!("choices[{position}].message")))?;

    let content = match message.content {
        None => String::new(),
        Some(OpenAiContent::Text(text)) => text,
        Some(OpenAiContent::Parts(parts)) => join_text_parts(parts),
    };

    let tool_calls: Vec<ToolCall> = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(convert_tool_call)
        .collect();

    let index = choice
        .index
        .unwrap_or_else(|| u32::try_from(position).unwrap_or(u32::MAX));

    Ok(Choice {
        index,
        message: ChoiceMessage::new(content, tool_calls),
        finish_reason: FinishReason::from_optional(choice.finish_reason.as_deref()),
    })
}

fn join_text_parts(parts: Vec<OpenAiContentPart>) -> String {
    parts
        .into_iter()
        .filter(|part| part.part_type == "text")
        .filter_map(|part| part.text)
        .collect()
}

fn convert_tool_call(call: OpenAiToolCall) -> ToolCall {
    let arguments = match call.function.arguments {
        Some(serde_json::Value::String(encoded)) => encoded,
        other => encode_arguments(other.as_ref()),
    };

    ToolCall::function(call.id.unwrap_or_else(synthesize_call_id), call.function.name, arguments)
}

fn convert_usage(usage: OpenAiUsage) -> Usage {
    Usage::from_counts(
        usage.prompt_tokens.unwrap_or(0),
        usage.completion_tokens.unwrap_or(0),
        usage.total_tokens,
    )
}
