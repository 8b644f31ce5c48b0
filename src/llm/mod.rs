//! Completion service backends.
//!
//! Everything above this module programs against the [`CompletionBackend`]
//! trait; the OpenAI implementation lives in [`openai`].

pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::session::GenerationParams;

/// A single completion request: one prompt plus the session's fixed
/// generation parameters. Built per prompt, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl<'a> CompletionRequest<'a> {
    /// Combine a prompt with the session parameters.
    pub fn new(prompt: &'a str, params: &'a GenerationParams) -> Self {
        Self {
            model: &params.model,
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
        }
    }
}

/// Errors from the completion service.
///
/// Only [`CompletionError::RateLimited`] is recovered by the dispatcher;
/// every other variant propagates and ends the session.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The service rejected the request because the usage quota is exhausted.
    #[error("rate limited: usage quota exceeded")]
    RateLimited,

    /// Any other non-success response from the service.
    #[error("OpenAI API request failed with status {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Transport-level failure (connect, timeout, body decode).
    #[error("failed to reach the OpenAI API")]
    Network(#[from] reqwest::Error),

    /// Success response that contained no completion text.
    #[error("empty completion in OpenAI response")]
    EmptyCompletion,
}

/// Interface to a text-completion service.
#[async_trait]
pub trait CompletionBackend {
    /// Generate a completion for the request, returning the raw text.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, CompletionError>;
}
