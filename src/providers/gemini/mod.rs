//! Gemini Provider
//!
//! 通过 REST 接口 `models/{model}:generateContent` 调用 Gemini

mod constants;
mod types;

pub use constants::GEMINI_API_BASE;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::providers::Provider;
use crate::story::GenerationConfig;
use crate::utils::{build_http_client, truncate_for_log};
use constants::{API_KEY_HEADER, ERROR_BODY_LOG_CHARS, GENERATE_CONTENT_METHOD};
use types::{GenerateContentRequest, GenerateContentResponse};

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>, base_url: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api_key,
            base_url,
            client: build_http_client(timeout)?,
        })
    }

    fn api_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url, model, GENERATE_CONTENT_METHOD
        )
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("GEMINI_API_KEY is not configured")?;

        let body = GenerateContentRequest::new(prompt, config);

        tracing::debug!(
            model = config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url(config.model))
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Gemini API error {}: {}",
                status,
                truncate_for_log(&error_body, ERROR_BODY_LOG_CHARS)
            );
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        if let Some(reason) = parsed.block_reason() {
            anyhow::bail!("Gemini blocked the prompt: {}", reason);
        }

        let usage = parsed.usage_metadata.as_ref();
        tracing::info!(
            model = config.model,
            input_tokens = usage.map(|u| u.prompt_token_count).unwrap_or(0),
            output_tokens = usage.map(|u| u.candidates_token_count).unwrap_or(0),
            finish_reason = parsed.finish_reason().unwrap_or("unknown"),
            "response"
        );

        parsed.text().with_context(|| {
            format!(
                "Gemini returned no text (finish reason: {})",
                parsed.finish_reason().unwrap_or("unknown")
            )
        })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn provider(server: &MockServer, api_key: Option<&str>) -> GeminiProvider {
        GeminiProvider::new(
            api_key.map(str::to_string),
            server.uri(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn text_response(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<_> = parts.iter().map(|t| json!({ "text": t })).collect();
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 40, "candidatesTokenCount": 120 }
        })
    }

    #[tokio::test]
    async fn sends_prompt_and_generation_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Tell a story" }] }],
                "generationConfig": {
                    "temperature": 0.7,
                    "topP": 0.95,
                    "topK": 64,
                    "maxOutputTokens": 8192
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&[
                "Once upon a time, ",
                "there was a robot.",
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider(&server, Some("test-key"))
            .generate("Tell a story", &GenerationConfig::default())
            .await;

        assert_eq!(assert_ok!(text), "Once upon a time, there was a robot.");
    }

    #[tokio::test]
    async fn missing_key_fails_without_calling_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["x"])))
            .expect(0)
            .mount(&server)
            .await;

        let gemini = provider(&server, None);
        assert!(!gemini.is_configured());

        let err = assert_err!(gemini.generate("p", &GenerationConfig::default()).await);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn upstream_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = assert_err!(
            provider(&server, Some("k"))
                .generate("p", &GenerationConfig::default())
                .await
        );
        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("overloaded"));
    }

    #[tokio::test]
    async fn blocked_prompt_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let err = assert_err!(
            provider(&server, Some("k"))
                .generate("p", &GenerationConfig::default())
                .await
        );
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn candidate_without_text_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "MAX_TOKENS" }]
            })))
            .mount(&server)
            .await;

        let err = assert_err!(
            provider(&server, Some("k"))
                .generate("p", &GenerationConfig::default())
                .await
        );
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[tokio::test]
    async fn raw_text_is_returned_untrimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(text_response(&["\n  The end.  \n"])),
            )
            .mount(&server)
            .await;

        let text = provider(&server, Some("k"))
            .generate("p", &GenerationConfig::with_temperature(1.0))
            .await;
        assert_eq!(assert_ok!(text), "\n  The end.  \n");
    }
}
