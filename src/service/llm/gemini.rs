//! Google Gemini `generateContent` integration.

use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::base::{config::Config, types::Res};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the gemini implementation.

impl LlmClient {
    pub fn gemini(config: &Config) -> Res<Self> {
        let client = GeminiLlmClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// The text of the first part of the first candidate.
    fn into_text(self) -> Option<String> {
        self.candidates.into_iter().next()?.content.parts.into_iter().next().map(|p| p.text)
    }
}

// Specific implementations.

/// Gemini LLM client implementation.
#[derive(Clone)]
pub struct GeminiLlmClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiLlmClient {
    /// Create a new Gemini LLM client.
    #[instrument(name = "GeminiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder().build()?;
        let endpoint = format!("{}/models/{}:generateContent", config.gemini_api_base.trim_end_matches('/'), config.gemini_model);

        Ok(Self {
            client,
            endpoint,
            api_key: config.gemini_api_key.clone(),
        })
    }
}

#[async_trait]
impl GenericLlmClient for GeminiLlmClient {
    #[instrument(skip_all)]
    async fn generate_text(&self, prompt: &str) -> Res<String> {
        debug!("Requesting completion from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Gemini API error ({status}): {body}");
        }

        let response: GenerateContentResponse = response.json().await.context("Failed to parse Gemini response")?;

        response.into_text().context("Gemini response has no candidate text")
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::base::config::ConfigInner;

    fn client(server: &mockito::Server) -> GeminiLlmClient {
        let config = Config::from(ConfigInner {
            gemini_api_key: "test-key".to_string(),
            gemini_api_base: server.url(),
            gemini_model: "gemini-test".to_string(),
            ..Default::default()
        });

        GeminiLlmClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn generate_text_returns_first_candidate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::Json(serde_json::json!({ "contents": [{ "parts": [{ "text": "hello there" }] }] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "candidates": [
                        { "content": { "parts": [{ "text": "hi, how is it going" }], "role": "model" } },
                        { "content": { "parts": [{ "text": "second" }] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client(&server).generate_text("hello there").await.unwrap();

        assert_eq!(text, "hi, how is it going");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_text_fails_on_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let error = client(&server).generate_text("hello").await.unwrap_err();

        assert!(error.to_string().contains("429"));
    }

    #[tokio::test]
    async fn generate_text_fails_without_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        assert!(client(&server).generate_text("hello").await.is_err());
    }
}
