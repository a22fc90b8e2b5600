use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{read_body, GenerationSettings, TextGenerator};
use crate::error::LlmError;

/// Any server speaking the OpenAI chat-completions protocol (OpenAI itself,
/// vLLM, llama.cpp, ...).
pub struct OpenAiGenerator {
    client: reqwest::Client,
    settings: GenerationSettings,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(client: reqwest::Client, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let payload = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(model = %self.settings.model, url = %self.endpoint(), "sending chat completion request");

        let mut request = self.client.post(self.endpoint()).json(&payload);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }
        let body = read_body(request.send().await?).await?;

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    fn settings(base_url: String) -> GenerationSettings {
        GenerationSettings {
            base_url,
            api_key: Some("test-key".into()),
            model: "Qwen/Qwen3-8B".into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    #[tokio::test]
    async fn test_parses_first_choice_and_sends_expected_request() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer test-key");
                assert_eq!(body["model"], "Qwen/Qwen3-8B");
                assert_eq!(body["max_tokens"], 1000);
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["content"], "describe it");
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "Description: spots" } }]
                }))
            }),
        );
        let base = mock::serve(app).await;
        let generator = OpenAiGenerator::new(reqwest::Client::new(), settings(format!("{base}/v1/")));

        let text = generator.generate("expert", "describe it").await.unwrap();
        assert_eq!(text, "Description: spots");
    }

    #[tokio::test]
    async fn test_no_choices_is_empty() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base = mock::serve(app).await;
        let generator = OpenAiGenerator::new(reqwest::Client::new(), settings(base));

        let err = generator.generate("s", "p").await.unwrap_err();
        assert!(matches!(err, LlmError::Empty));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let base = mock::serve(app).await;
        let generator = OpenAiGenerator::new(reqwest::Client::new(), settings(base));

        match generator.generate("s", "p").await.unwrap_err() {
            LlmError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
