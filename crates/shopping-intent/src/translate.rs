//! Language detection and translation through the completion service.
//!
//! Every call degrades to a safe default: detection to `en-US`, translation
//! to the untouched input.

use crate::completion::TextCompletion;
use crate::error::CompletionError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_LANGUAGE: &str = "en-US";

pub const SUPPORTED_LANGUAGES: [(&str, &str); 10] = [
    ("en-US", "English"),
    ("es-ES", "Spanish"),
    ("fr-FR", "French"),
    ("de-DE", "German"),
    ("it-IT", "Italian"),
    ("pt-BR", "Portuguese"),
    ("ja-JP", "Japanese"),
    ("ko-KR", "Korean"),
    ("zh-CN", "Chinese"),
    ("hi-IN", "Hindi"),
];

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[derive(Clone)]
pub struct Translator {
    completion: Option<Arc<dyn TextCompletion>>,
    timeout: Duration,
}

impl Translator {
    pub fn new(completion: Option<Arc<dyn TextCompletion>>) -> Self {
        Self {
            completion,
            timeout: Duration::from_millis(4000),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Language code of `text`, or `en-US` when unsure
    pub async fn detect_language(&self, text: &str) -> String {
        let prompt = format!(
            "Detect the language of this text and return only the language code \
             (e.g., en-US, es-ES, fr-FR, de-DE, it-IT, pt-BR, ja-JP, ko-KR, zh-CN, hi-IN). \
             If unsure, return 'en-US'. Text: \"{text}\""
        );
        match self.ask(&prompt).await {
            Ok(code) if is_supported(&code) => code,
            Ok(code) => {
                debug!(code = %code, "unsupported language code");
                DEFAULT_LANGUAGE.to_string()
            }
            Err(e) => {
                warn!("language detection failed: {}", e);
                DEFAULT_LANGUAGE.to_string()
            }
        }
    }

    pub async fn to_english(&self, text: &str, source: &str) -> String {
        if source == DEFAULT_LANGUAGE {
            return text.to_string();
        }
        let prompt = format!(
            "Translate this text from {source} to English. Return only the English translation: \"{text}\""
        );
        self.translate(&prompt, text).await
    }

    pub async fn to_user_language(&self, text: &str, target: &str) -> String {
        if target == DEFAULT_LANGUAGE {
            return text.to_string();
        }
        let prompt = format!(
            "Translate this text from English to {target}. Return only the translation: \"{text}\""
        );
        self.translate(&prompt, text).await
    }

    async fn translate(&self, prompt: &str, original: &str) -> String {
        match self.ask(prompt).await {
            Ok(translated) if !translated.is_empty() => translated,
            Ok(_) => original.to_string(),
            Err(e) => {
                warn!("translation failed: {}", e);
                original.to_string()
            }
        }
    }

    async fn ask(&self, prompt: &str) -> Result<String, CompletionError> {
        let completion = self
            .completion
            .as_ref()
            .ok_or(CompletionError::NotConfigured)?;
        let reply = tokio::time::timeout(self.timeout, completion.complete(prompt))
            .await
            .map_err(|_| CompletionError::Timeout(self.timeout.as_millis() as u64))??;
        Ok(strip_quotes(&reply))
    }
}

fn strip_quotes(reply: &str) -> String {
    reply
        .trim()
        .replace('"', "")
        .trim_matches('\'')
        .trim()
        .to_string()
}
