use anyhow::Result;
use serde::{Deserialize, Serialize};
use shopping_intent::{CompletionConfig, InterpreterConfig};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language code of the user's speech, or "auto" to detect per utterance
    pub language: String,
    /// Optional YAML file replacing the built-in lookup tables
    pub tables_path: Option<String>,
    pub interpreter: InterpreterConfig,
    pub completion: CompletionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            tables_path: None,
            interpreter: InterpreterConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            let contents = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
