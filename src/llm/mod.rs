//! Remote text generation used to describe a detected disease.

mod gemini;
mod openai;

use std::time::Duration;

use async_trait::async_trait;

pub use gemini::GeminiGenerator;
pub use openai::OpenAiGenerator;

use crate::config::{Config, LlmProvider};
use crate::error::LlmError;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw completion text for a system instruction and a user prompt.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Sampling and endpoint settings shared by every provider.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Builds the provider selected in the configuration.
pub fn from_config(config: &Config) -> Result<Box<dyn TextGenerator>, LlmError> {
    let client = build_client(Duration::from_secs(config.llm_timeout_secs))?;
    let settings = GenerationSettings {
        base_url: config.llm_base_url(),
        api_key: config.llm_api_key.clone(),
        model: config.llm_model(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    Ok(match config.llm_provider {
        LlmProvider::Openai => Box::new(OpenAiGenerator::new(client, settings)),
        LlmProvider::Gemini => Box::new(GeminiGenerator::new(client, settings)),
    })
}

/// Reads a response body, turning a non-success status into `LlmError::Status`.
async fn read_body(response: reqwest::Response) -> Result<String, LlmError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(LlmError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
