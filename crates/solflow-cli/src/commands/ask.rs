//! Headless single chat turn.
//!
//! Goes through the same chat state machine as the window, so a failed call
//! prints the assistant's apology instead of an error.

use anyhow::{Context, Result};
use solflow_core::{ChatState, CompletionOutcome};
use solflow_llm::{ask, CompletionClient};
use tracing::warn;

use crate::config::Config;

pub async fn execute(config: &Config, question: &str) -> Result<()> {
    let client =
        CompletionClient::new(config.provider.clone()).context("Failed to build completion client")?;

    let mut chat = ChatState::new();
    let outcome = ask(&mut chat, &client, question)
        .await
        .context("Question is empty")?;

    if outcome == CompletionOutcome::Apologized {
        warn!(model = %config.provider.model_name, "assistant request failed");
    }

    if let Some(reply) = chat.transcript().last() {
        println!("{}", reply.content);
    }
    Ok(())
}
