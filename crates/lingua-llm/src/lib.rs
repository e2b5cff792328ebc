//! Provider-agnostic chat completions for Lingua
//!
//! Callers build one canonical [`ChatRequest`] and get back one canonical
//! [`ChatResponse`] whichever backend served it. The `convert` module holds
//! the per-backend translation, `provider` the HTTP adapters around it.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod types;

pub use convert::Converter;
pub use error::{ConfigurationError, ConversionError, LlmError, MalformedResponseError, ProviderError};
pub use provider::{Provider, build_provider};
pub use types::{ChatRequest, ChatResponse, Message, ToolCall, ToolSpec};
