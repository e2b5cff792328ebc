//! Canonical request/response vocabulary
//!
//! These types are provider-agnostic; every backend wire format converts to
//! and from them. They are built fresh per call and never shared.

pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use message::{Content, ContentPart, FunctionCall, Message, Role, ToolCall, ToolType};
pub use request::{ChatRequest, Options};
pub use response::{ChatResponse, Choice, ChoiceMessage, FinishReason, Usage};
pub use tool::{FunctionSpec, ParametersSchema, PropertySchema, ToolSpec};
