//! Command-line and environment configuration.
//!
//! Every option can come from a flag or an environment variable; `main`
//! loads `.env` with dotenvy before parsing.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::disease_info::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions (OpenAI, vLLM, llama.cpp, ...)
    Openai,
    /// Google Gemini generateContent
    Gemini,
}

/// Plant Disease Recognition API
#[derive(Parser, Debug, Clone)]
#[command(name = "plant-disease-api")]
#[command(version)]
#[command(about = "Classifies plant-leaf diseases and describes them with an LLM")]
pub struct Config {
    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8501)]
    pub port: u16,

    /// ONNX export of the trained classifier
    #[arg(long, env = "MODEL_PATH", default_value = "plant_disease_model.onnx")]
    pub model_path: PathBuf,

    /// Text-generation provider used for disease descriptions
    #[arg(long, env = "LLM_PROVIDER", value_enum, default_value_t = LlmProvider::Openai)]
    pub llm_provider: LlmProvider,

    /// Base URL of the text-generation API (provider default when unset)
    #[arg(long, env = "LLM_BASE_URL")]
    pub llm_base_url: Option<String>,

    /// API key for the text-generation API
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Model name (provider default when unset)
    #[arg(long, env = "LLM_MODEL")]
    pub llm_model: Option<String>,

    /// Timeout for a single text-generation request, in seconds
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 60)]
    pub llm_timeout_secs: u64,

    /// Sampling temperature
    #[arg(long, env = "LLM_TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[arg(long, env = "LLM_MAX_TOKENS", default_value_t = 1000)]
    pub max_tokens: u32,

    /// Prompt language; also selects the section headers to look for
    #[arg(long, env = "PROMPT_LANGUAGE", value_enum, default_value_t = Language::En)]
    pub language: Language,

    /// Maximum request body size in megabytes
    #[arg(long, env = "BODY_LIMIT_MB", default_value_t = 10)]
    pub body_limit_mb: usize,

    /// API base URL the dashboard posts to (empty means same origin)
    #[arg(long, env = "DASHBOARD_API_BASE", default_value = "")]
    pub dashboard_api_base: String,
}

impl Config {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb * 1024 * 1024
    }

    pub fn llm_base_url(&self) -> String {
        match (&self.llm_base_url, self.llm_provider) {
            (Some(url), _) => url.clone(),
            (None, LlmProvider::Openai) => "https://api.openai.com/v1".to_string(),
            (None, LlmProvider::Gemini) => {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }
        }
    }

    pub fn llm_model(&self) -> String {
        match (&self.llm_model, self.llm_provider) {
            (Some(model), _) => model.clone(),
            (None, LlmProvider::Openai) => "Qwen/Qwen3-8B".to_string(),
            (None, LlmProvider::Gemini) => "gemini-2.5-flash".to_string(),
        }
    }
}
