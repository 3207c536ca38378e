//! Drives a [`ChatState`] through one question and answer.

use solflow_core::{ChatState, CompletionOutcome, PendingPrompt, RequestToken};

use crate::client::TextGenerator;
use crate::error::LlmResult;
use crate::prompt::GenerationRequest;

/// Run the generation call for a pending prompt.
///
/// Returns the token alongside the result so the caller can hand both to
/// [`ChatState::complete`] once it is back on the owning thread.
pub async fn answer(
    generator: &dyn TextGenerator,
    pending: PendingPrompt,
) -> (RequestToken, LlmResult<String>) {
    let request = GenerationRequest::new(pending.prompt);
    let result = generator.generate(&request).await;
    (pending.token, result)
}

/// Submit `text`, wait for the generator and apply the completion.
///
/// `None` when `text` is blank and nothing was sent.
pub async fn ask(
    chat: &mut ChatState,
    generator: &dyn TextGenerator,
    text: &str,
) -> Option<CompletionOutcome> {
    let pending = chat.submit_text(text)?;
    let (token, result) = answer(generator, pending).await;
    Some(chat.complete(token, result))
}
