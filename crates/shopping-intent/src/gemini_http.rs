//! HTTP client for a Gemini-style `generateContent` endpoint.

use crate::completion::{CompletionConfig, TextCompletion};
use crate::error::CompletionError;
use async_trait::async_trait;

pub struct GeminiCompletion {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl GeminiCompletion {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CompletionError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl TextCompletion for GeminiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        #[derive(serde::Serialize)]
        struct Part<'a> {
            text: &'a str,
        }
        #[derive(serde::Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }
        #[derive(serde::Serialize)]
        struct GenerateReq<'a> {
            contents: Vec<Content<'a>>,
        }

        let req = GenerateReq {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(self.config.url())
            .json(&req)
            .send()
            .await
            .map_err(|e| CompletionError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CompletionError::Status(resp.status().as_u16()));
        }

        // Expected response: { candidates: [{ content: { parts: [{ text }] } }] }
        #[derive(serde::Deserialize)]
        struct RespPart {
            #[serde(default)]
            text: String,
        }
        #[derive(serde::Deserialize)]
        struct RespContent {
            #[serde(default)]
            parts: Vec<RespPart>,
        }
        #[derive(serde::Deserialize)]
        struct Candidate {
            content: Option<RespContent>,
        }
        #[derive(serde::Deserialize)]
        struct RespBody {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        let body: RespBody = resp
            .json()
            .await
            .map_err(|e| CompletionError::Http(e.to_string()))?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        tracing::debug!(
            model = %self.config.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "completion response received"
        );

        if text.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
