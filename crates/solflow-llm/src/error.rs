//! Error types for text generation.

use thiserror::Error;

/// Result type alias for generation calls.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors raised while configuring or calling the completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request never got a response.
    #[error("llm call failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("llm http error {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the chat-completions shape.
    #[error("malformed llm response: {0}")]
    MalformedResponse(#[source] reqwest::Error),

    /// The response contained no message content.
    #[error("llm response missing choices")]
    EmptyResponse,

    /// The API key cannot be sent as a header value.
    #[error("invalid api key header")]
    InvalidApiKey,

    /// Provider configuration could not be read.
    #[error("unable to read provider file: {0}")]
    Io(#[from] std::io::Error),

    /// Provider configuration could not be parsed.
    #[error("invalid provider toml: {0}")]
    Toml(#[from] toml::de::Error),
}
