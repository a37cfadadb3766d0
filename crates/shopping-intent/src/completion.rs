use crate::error::CompletionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// External text-completion service: a prompt in, free-form text out.
///
/// Replies are untrusted and best-effort; callers only ever split them into
/// lines.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Short name for logs
    fn name(&self) -> &str {
        "completion"
    }
}

/// Connection settings for a `generateContent`-style endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    /// Read from the environment, never written to config files
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
        }
    }
}

impl CompletionConfig {
    pub fn url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        match &self.api_key {
            Some(key) => format!("{base}/{}:generateContent?key={key}", self.model),
            None => format!("{base}/{}:generateContent", self.model),
        }
    }
}
