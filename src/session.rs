//! Session state resolved once at startup.

use crate::config::OpenAiConfig;
use crate::llm::CompletionBackend;

/// Generation parameters, fixed for the lifetime of one client run.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Nucleus sampling parameter, pinned to 1.0.
    pub top_p: f32,
}

impl GenerationParams {
    /// Build the parameter set from resolved configuration.
    pub fn from_config(config: &OpenAiConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: 1.0,
        }
    }
}

/// One client run: the resolved generation parameters plus the authenticated
/// service handle. Created once at startup and never mutated.
pub struct Session<B> {
    pub params: GenerationParams,
    pub backend: B,
}

impl<B: CompletionBackend> Session<B> {
    pub fn new(params: GenerationParams, backend: B) -> Self {
        Self { params, backend }
    }
}
