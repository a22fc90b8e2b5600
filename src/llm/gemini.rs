use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{read_body, GenerationSettings, TextGenerator};
use crate::error::LlmError;

/// Google Gemini `generateContent` endpoint.
pub struct GeminiGenerator {
    client: reqwest::Client,
    settings: GenerationSettings,
}

impl GeminiGenerator {
    pub fn new(client: reqwest::Client, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let payload = json!({
            "systemInstruction": {
                "parts": [{ "text": system }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "maxOutputTokens": self.settings.max_tokens
            }
        });

        debug!(model = %self.settings.model, "sending generateContent request");

        let mut request = self.client.post(self.endpoint()).json(&payload);
        if let Some(key) = &self.settings.api_key {
            request = request.header("x-goog-api-key", key);
        }
        let body = read_body(request.send().await?).await?;

        let result: Value =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed(e.to_string()))?;

        let Some(parts) = result["candidates"][0]["content"]["parts"].as_array() else {
            return Err(LlmError::Empty);
        };
        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        if text.trim().is_empty() {
            return Err(LlmError::Empty);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock;
    use crate::disease_info::{DiseaseInfoService, Language};
    use axum::{
        extract::{Path, Query},
        http::HeaderMap,
        routing::post,
        Json, Router,
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    fn settings(base_url: String) -> GenerationSettings {
        GenerationSettings {
            base_url,
            api_key: Some("secret".into()),
            model: "gemini-2.5-flash".into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    #[tokio::test]
    async fn test_joins_candidate_parts() {
        let app = Router::new().route(
            "/models/*call",
            post(
                |Path(call): Path<String>,
                 Query(query): Query<HashMap<String, String>>,
                 headers: HeaderMap,
                 Json(body): Json<Value>| async move {
                    assert_eq!(call, "gemini-2.5-flash:generateContent");
                    assert_eq!(headers["x-goog-api-key"], "secret");
                    assert!(query.is_empty());
                    assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
                    assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt");
                    Json(json!({
                        "candidates": [{
                            "content": { "parts": [{ "text": "Description: a" }, { "text": "\nSymptoms: b" }] }
                        }]
                    }))
                },
            ),
        );
        let base = mock::serve(app).await;
        let generator = GeminiGenerator::new(reqwest::Client::new(), settings(base));

        let text = generator.generate("system", "prompt").await.unwrap();
        assert_eq!(text, "Description: a\nSymptoms: b");
    }

    #[tokio::test]
    async fn test_missing_candidates_is_empty() {
        let app = Router::new().route(
            "/models/*call",
            post(|| async { Json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })) }),
        );
        let base = mock::serve(app).await;
        let generator = GeminiGenerator::new(reqwest::Client::new(), settings(base));

        assert!(matches!(
            generator.generate("s", "p").await,
            Err(LlmError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let app = Router::new().route(
            "/models/*call",
            post(|| async { "<html>gateway</html>" }),
        );
        let base = mock::serve(app).await;
        let generator = GeminiGenerator::new(reqwest::Client::new(), settings(base));

        assert!(matches!(
            generator.generate("s", "p").await,
            Err(LlmError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_failure_does_not_expose_api_key() {
        // Nothing listens on port 1.
        let mut unreachable = settings("http://127.0.0.1:1".into());
        unreachable.api_key = Some("SUPERSECRETKEY".into());
        let generator = GeminiGenerator::new(reqwest::Client::new(), unreachable);

        let err = generator.generate("s", "p").await.unwrap_err();
        assert!(matches!(err, LlmError::Request(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));

        let service = DiseaseInfoService::new(Arc::new(generator), Language::En);
        let info = service.describe("Tomato___Late_blight").await;
        assert!(info.description.starts_with("Error retrieving information:"));
        assert!(!info.description.contains("SUPERSECRETKEY"));
        assert!(!info.description.contains("127.0.0.1:1"));
    }
}
