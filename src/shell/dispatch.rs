//! Request dispatch: prompt in, displayable text out.

use tracing::debug;

use crate::llm::{CompletionBackend, CompletionError, CompletionRequest};
use crate::session::Session;

use super::spinner::with_spinner;

/// Status line shown while a completion request is outstanding.
const BUSY_MESSAGE: &str = "Requesting OpenAI...";

/// Advisory shown when the service reports an exhausted quota.
const QUOTA_ADVISORY: &str = concat!(
    "ERROR: You exceeded your current quota, please check your plan and billing details.\n",
    "       Check your API key \"api_key\" in config.toml under the section \"[openai]\"."
);

/// Builds completion requests from prompts and turns the service's answers
/// into displayable text.
pub struct Dispatcher<B> {
    session: Session<B>,
}

impl<B: CompletionBackend> Dispatcher<B> {
    pub fn new(session: Session<B>) -> Self {
        Self { session }
    }

    /// Send one prompt to the completion service.
    ///
    /// A rate-limited request is reported as the quota advisory rather than
    /// an error, so the shell keeps running; every other service failure
    /// propagates untouched. No retries.
    pub async fn dispatch(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest::new(prompt, &self.session.params);
        debug!(model = %self.session.params.model, "dispatching completion request");

        let result = with_spinner(BUSY_MESSAGE, self.session.backend.complete(&request)).await;

        match result {
            Ok(text) => Ok(format!(">> {}", text.trim())),
            Err(CompletionError::RateLimited) => Ok(QUOTA_ADVISORY.to_string()),
            Err(err) => Err(err),
        }
    }
}
