//! Text generation over an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{LlmError, LlmResult};
use crate::prompt::GenerationRequest;
use crate::provider::ProviderConfig;

/// Anything that can turn a prompt into text.
///
/// The GUI and the CLI only see this trait, so tests can swap in a stub.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String>;
}

/// Client for `POST {api_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    config: ProviderConfig,
}

impl CompletionClient {
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(LlmError::ClientBuild)?;
        Ok(Self { http, config })
    }

    /// Client configured from the process environment.
    pub fn from_env() -> LlmResult<Self> {
        Self::new(ProviderConfig::from_env())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn headers(&self) -> LlmResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}"))
                    .map_err(|_| LlmError::InvalidApiKey)?,
            );
        }
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl TextGenerator for CompletionClient {
    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
        let body = json!({
            "model": self.config.model_name,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt}
            ]
        });

        debug!(
            target: "solflow::llm",
            model = %self.config.model_name,
            chars = request.prompt.len(),
            "sending completion request"
        );

        let response = self
            .http
            .post(self.config.completions_url())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(target: "solflow::llm", status = status.as_u16(), "completion request rejected");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(LlmError::MalformedResponse)?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;
        debug!(target: "solflow::llm", chars = content.len(), "llm response received");
        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}
