//! OpenAI backend implementation.
//!
//! Talks to the completions endpoint, which takes a bare prompt and returns
//! generated text in `choices[0].text`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{CompletionBackend, CompletionError, CompletionRequest};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/completions";

/// Client for the OpenAI completions API.
pub struct OpenAiClient {
    api_key: String,
    client: Client,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the resolved API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self { api_key, client }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "completion response received");

        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(CompletionError::RateLimited);
            }
            let message = response
                .json::<OpenAiErrorBody>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::Api { status, message });
        }

        let completion: OpenAiResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or(CompletionError::EmptyCompletion)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    text: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}
