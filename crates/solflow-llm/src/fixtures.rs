//! Canned generators for tests in this and downstream crates.

use std::sync::{Arc, Mutex};

use crate::client::TextGenerator;
use crate::error::{LlmError, LlmResult};
use crate::prompt::GenerationRequest;

/// Generator that returns a fixed reply and records every request.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    reply: Result<String, u16>,
    seen: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedGenerator {
    /// Always answers with `reply`.
    pub fn answering(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            seen: Arc::default(),
        }
    }

    /// Always fails with an HTTP `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            seen: Arc::default(),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Status {
                status: *status,
                body: "scripted failure".into(),
            }),
        }
    }
}
