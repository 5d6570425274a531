//! OpenAI-compatible chat completion client.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use crate::client::{self, HttpSettings};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};

/// A text-completion collaborator: prompt in, raw model text out.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete a single user prompt.
    async fn complete(&self, prompt: &str) -> ClientResult<String>;
}

/// Client for `POST {base_url}/chat/completions`.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: ClientWithMiddleware,
    endpoint: String,
    model: String,
    has_api_key: bool,
    timeout: std::time::Duration,
}

impl ChatCompletionClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails or the API key is
    /// not a valid header value.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        if let Some(ref key) = config.llm_api_key {
            headers.insert(reqwest::header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        }

        let client = client::build_client(HttpSettings {
            headers,
            timeout: config.request_timeout,
            connect_timeout: config.connect_timeout,
            max_retries: config.max_retries,
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.llm_base_url.trim_end_matches('/')),
            model: config.llm_model.clone(),
            has_api_key: config.llm_api_key.is_some(),
            timeout: config.request_timeout,
        })
    }

    /// Model identifier sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[async_trait::async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> ClientResult<String> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0
        });
        let body_str = serde_json::to_string(&body)?;

        let response = self
            .client
            .post(&self.endpoint)
            .body(body_str)
            .send()
            .await
            .map_err(|e| client::send_error(e, self.timeout))?;

        let response = client::check_status(response).await?;
        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ClientError::EmptyCompletion)
    }
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("has_api_key", &self.has_api_key)
            .finish_non_exhaustive()
    }
}
