//! Fixed prompt material for the assistant.

/// System prompt sent with every question.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant specializing in Solana blockchain and smart programs.
Provide concise, accurate information about Solana program flow, architecture, and development.
Focus on explaining concepts in simple terms and helping users understand the flow diagram they're viewing.";

/// One generation call: a system prompt plus the user's raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
}

impl GenerationRequest {
    /// Request using the assistant's fixed system prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            prompt: prompt.into(),
        }
    }

    /// Override the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }
}
