//! Chat transcript and the submit/complete state machine behind the chat panel.
//!
//! The state machine is synchronous. A submit produces a [`PendingPrompt`]
//! carrying a [`RequestToken`]; whoever runs the generation call reports back
//! through [`ChatState::complete`] with the same token. Completions whose
//! token is no longer in flight are dropped.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// First assistant message of every transcript.
pub const GREETING: &str =
    "Hello! I'm your Solana program assistant. How can I help you understand the smart program flow?";

/// Assistant message appended when generation fails.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Identifies one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// A prompt waiting to be sent to the text generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrompt {
    pub token: RequestToken,
    /// Raw user text, exactly as typed.
    pub prompt: String,
}

/// What happened to a completion handed to [`ChatState::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Generated text was appended.
    Answered,
    /// The call failed and the apology was appended.
    Apologized,
    /// The token was not in flight; nothing changed.
    Stale,
}

/// Append-only transcript, input buffer and loading flag.
#[derive(Debug, Clone)]
pub struct ChatState {
    transcript: Vec<ChatMessage>,
    /// Text currently in the input field.
    pub input: String,
    in_flight: Option<RequestToken>,
    next_token: u64,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// Transcript seeded with the assistant greeting.
    pub fn new() -> Self {
        Self {
            transcript: vec![ChatMessage::assistant(GREETING)],
            input: String::new(),
            in_flight: None,
            next_token: 1,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// True strictly between a submit and its completion.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight
    }

    /// Submit whatever is in the input buffer.
    pub fn submit(&mut self) -> Option<PendingPrompt> {
        let input = std::mem::take(&mut self.input);
        let pending = self.submit_text(&input);
        if pending.is_none() {
            self.input = input;
        }
        pending
    }

    /// Submit `text` directly, bypassing the input buffer.
    ///
    /// Blank text is a no-op. Otherwise the user message is appended, the
    /// input is cleared and a new token becomes the in-flight request. A
    /// request that was already in flight is superseded.
    pub fn submit_text(&mut self, text: &str) -> Option<PendingPrompt> {
        if text.trim().is_empty() {
            return None;
        }

        let token = RequestToken(self.next_token);
        self.next_token += 1;

        if let Some(previous) = self.in_flight.replace(token) {
            debug!(superseded = %previous, token = %token, "chat request superseded");
        }

        self.transcript.push(ChatMessage::user(text));
        self.input.clear();
        debug!(token = %token, chars = text.len(), "chat submit");

        Some(PendingPrompt {
            token,
            prompt: text.to_string(),
        })
    }

    /// Apply the result of a generation call.
    pub fn complete<E: fmt::Display>(
        &mut self,
        token: RequestToken,
        result: Result<String, E>,
    ) -> CompletionOutcome {
        if self.in_flight != Some(token) {
            debug!(token = %token, "stale chat completion ignored");
            return CompletionOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(text) => {
                self.transcript.push(ChatMessage::assistant(text));
                CompletionOutcome::Answered
            }
            Err(err) => {
                error!(token = %token, "Error generating response: {err}");
                self.transcript.push(ChatMessage::assistant(APOLOGY));
                CompletionOutcome::Apologized
            }
        }
    }
}
