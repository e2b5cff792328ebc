//! Conversion between canonical types and Anthropic wire format

use super::{Converter, RESERVED_OPTIONS, encode_arguments};
use crate::error::{ConversionError, MalformedResponseError};
use crate::protocol::anthropic::{
    AnthropicContent, AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse,
    AnthropicResponseBlock, AnthropicSystem, AnthropicTextBlock, AnthropicTool, AnthropicUsage,
};
use crate::types::{
    ChatRequest, ChatResponse, Choice, ChoiceMessage, Content, ContentPart, FinishReason, Message, Options, Role,
    ToolCall, ToolSpec, Usage,
};

/// Default max tokens when not specified (Anthropic requires this field)
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Converter for the Anthropic Messages API
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicConverter;

impl Converter for AnthropicConverter {
    type Request = AnthropicRequest;
    type Response = AnthropicResponse;
    type Tools = Vec<AnthropicTool>;

    fn convert_request(&self, request: &ChatRequest) -> Result<AnthropicRequest, ConversionError> {
        request.check_reserved_options(RESERVED_OPTIONS)?;
        request.check_reserved_options(&["system"])?;

        let (system, rest) = extract_system(&request.messages);

        let messages = rest
            .iter()
            .map(convert_message)
            .collect::<Result<Vec<_>, _>>()?;

        let tools = match &request.tools {
            Some(tools) => Some(self.convert_tool_spec(tools)?),
            None => None,
        };

        let mut options = request.options.clone();
        let max_tokens = match options.remove("max_tokens") {
            None | Some(serde_json::Value::Null) => DEFAULT_MAX_TOKENS,
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| ConversionError::new(format!("`max_tokens` must be a positive integer, got {value}")))?,
        };
        rename_stop(&mut options)?;

        Ok(AnthropicRequest {
            model: request.model.clone(),
            max_tokens,
            system,
            messages,
            tools,
            options,
        })
    }

    fn convert_tool_spec(&self, tools: &[ToolSpec]) -> Result<Vec<AnthropicTool>, ConversionError> {
        Ok(tools
            .iter()
            .map(|tool| AnthropicTool {
                name: tool.function.name.clone(),
                description: tool.function.description.clone(),
                input_schema: tool.function.parameters.clone(),
            })
            .collect())
    }

    fn convert_response(&self, response: AnthropicResponse) -> Result<ChatResponse, MalformedResponseError> {
        let blocks = response.content.ok_or_else(|| MalformedResponseError::missing("content"))?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for block in blocks {
            match block {
                AnthropicResponseBlock::Text { text } => content.push_str(&text),
                AnthropicResponseBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall::function(id, name, encode_arguments(Some(&input))));
                }
                AnthropicResponseBlock::Unknown => {}
            }
        }

        Ok(ChatResponse {
            id: response.id,
            model: response.model,
            choices: vec![Choice {
                index: 0,
                message: ChoiceMessage::new(content, tool_calls),
                finish_reason: FinishReason::from_optional(response.stop_reason.as_deref()),
            }],
            usage: response.usage.map(convert_usage),
        })
    }
}

/// Split off a leading system message
///
/// Returns the top-level system value and the remaining messages. A missing
/// or empty system prompt yields an empty block list; the empty system
/// message is still consumed.
fn extract_system(messages: &[Message]) -> (AnthropicSystem, &[Message]) {
    let Some((first, rest)) = messages.split_first() else {
        return (AnthropicSystem::default(), messages);
    };
    if first.role != Role::System {
        return (AnthropicSystem::default(), messages);
    }

    let system = match &first.content {
        Content::Text(text) if text.is_empty() => AnthropicSystem::default(),
        Content::Text(text) => AnthropicSystem::Text(text.clone()),
        Content::Parts(parts) => AnthropicSystem::Blocks(
            parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } if !text.is_empty() => Some(AnthropicTextBlock::new(text.as_str())),
                    _ => None,
                })
                .collect(),
        ),
    };
    (system, rest)
}

/// Move `stop` into Anthropic's `stop_sequences`, wrapping a single string
fn rename_stop(options: &mut Options) -> Result<(), ConversionError> {
    let Some(stop) = options.remove("stop") else {
        return Ok(());
    };
    if options.contains_key("stop_sequences") {
        return Err(ConversionError::new("`stop` and `stop_sequences` cannot both be set"));
    }

    let sequences = match stop {
        serde_json::Value::Null => return Ok(()),
        serde_json::Value::String(text) => serde_json::Value::Array(vec![serde_json::Value::String(text)]),
        list @ serde_json::Value::Array(_) => list,
        other => {
            return Err(ConversionError::new(format!(
                "`stop` must be a string or a list of strings, got {other}"
            )));
        }
    };
    options.insert("stop_sequences".to_owned(), sequences);
    Ok(())
}

/// Convert one non-leading canonical message
fn convert_message(message: &Message) -> Result<AnthropicMessage, ConversionError> {
    message.validate()?;

    match message.role {
        Role::System => Err(ConversionError::new(
            "system message must be the first message for Anthropic",
        )),
        Role::Tool => {
            // Validated above
            let tool_use_id = message.tool_call_id.clone().unwrap_or_default();
            Ok(AnthropicMessage {
                role: Role::User.as_str().to_owned(),
                content: AnthropicContent::Blocks(vec![AnthropicContentBlock::ToolResult {
                    tool_use_id,
                    content: message.content.as_text(),
                }]),
            })
        }
        Role::Assistant if !message.tool_calls().is_empty() => {
            let text = message.content.as_text();
            let mut blocks = Vec::with_capacity(message.tool_calls().len() + 1);

            // Anthropic rejects empty text blocks
            if !text.is_empty() {
                blocks.push(AnthropicContentBlock::Text { text });
            }

            for call in message.tool_calls() {
                let input = call.function.decode_arguments()?;
                blocks.push(AnthropicContentBlock::ToolUse {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    input: serde_json::Value::Object(input),
                });
            }

            Ok(AnthropicMessage {
                role: Role::Assistant.as_str().to_owned(),
                content: AnthropicContent::Blocks(blocks),
            })
        }
        Role::User | Role::Assistant => Ok(AnthropicMessage {
            role: message.role.as_str().to_owned(),
            content: convert_content(&message.content),
        }),
    }
}

fn convert_content(content: &Content) -> AnthropicContent {
    match content {
        Content::Text(text) => AnthropicContent::Text(text.clone()),
        Content::Parts(parts) => AnthropicContent::Blocks(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => AnthropicContentBlock::Text { text: text.clone() },
                    ContentPart::ToolUse { id, name, input } => AnthropicContentBlock::ToolUse {
                        id: id.clone(),
                        name: name.clone(),
                        input: input.clone(),
                    },
                    ContentPart::ToolResult { tool_use_id, content } => AnthropicContentBlock::ToolResult {
                        tool_use_id: tool_use_id.clone(),
                        content: content.clone(),
                    },
                })
                .collect(),
        ),
    }
}

fn convert_usage(usage: AnthropicUsage) -> Usage {
    Usage::from_counts(usage.input_tokens.unwrap_or(0), usage.output_tokens.unwrap_or(0), None)
}
