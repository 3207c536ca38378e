//! Assistant backend for SolFlow.
//!
//! [`CompletionClient`] talks to any OpenAI-compatible `/chat/completions`
//! endpoint. Callers depend on the [`TextGenerator`] trait and use
//! [`ask`] or [`answer`] to move a [`solflow_core::ChatState`] forward.

mod assistant;
mod client;
mod error;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
mod prompt;
mod provider;

pub use assistant::{answer, ask};
pub use client::{CompletionClient, TextGenerator};
pub use error::{LlmError, LlmResult};
pub use prompt::{GenerationRequest, SYSTEM_PROMPT};
pub use provider::{ProviderConfig, DEFAULT_API_URL, DEFAULT_MODEL};
