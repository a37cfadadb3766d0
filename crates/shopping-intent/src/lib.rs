//! Shopping Intent Interpreter
//!
//! Turns one transcribed voice utterance into a structured shopping
//! [`Command`]: add, remove, search, update, variety suggestions and
//! confirmation of a suggested variety.

mod command;
mod completion;
pub mod error;
#[cfg(feature = "gemini")]
mod gemini_http;
#[cfg(feature = "mock")]
pub mod mock;
mod parser;
pub mod patterns;
pub mod selection;
pub mod suggestions;
pub mod tables;
pub mod translate;
pub mod varieties;

pub use command::{Command, Intent, ShoppingItem};
pub use completion::{CompletionConfig, TextCompletion};
pub use error::{CompletionError, ConfigError};
#[cfg(feature = "gemini")]
pub use gemini_http::GeminiCompletion;
pub use parser::{IntentParser, PARSE_MISS_MESSAGE, RETRY_MESSAGE};
pub use selection::{PendingSelection, SelectionReply};
pub use suggestions::SuggestionEngine;
pub use tables::{load_tables_file, LookupTables};
pub use translate::Translator;
pub use varieties::{VarietyGateway, VarietyOptions, VarietySource};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for the interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Budget for one completion-service request
    pub suggestion_timeout_ms: u64,
    /// Maximum variety options offered per suggestion
    pub max_suggestions: usize,
    /// Offer varieties for bare product names missing from the variety table
    pub suggest_unknown_products: bool,
    pub default_unit: String,
    pub default_category: String,
    /// Extra patterns per family name, tried after the built-in ones
    pub custom_patterns: HashMap<String, Vec<String>>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            suggestion_timeout_ms: 4000,
            max_suggestions: varieties::MAX_VARIETIES,
            suggest_unknown_products: true,
            default_unit: "piece".to_string(),
            default_category: "general".to_string(),
            custom_patterns: HashMap::new(),
        }
    }
}

/// Initialize the interpreter system
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Initializing shopping intent interpreter");
    Ok(())
}

/// Create a new parser with default configuration and built-in tables
pub fn create_parser() -> Result<IntentParser, ConfigError> {
    IntentParser::new(InterpreterConfig::default())
}

/// Interpret a single utterance with no pending selection
pub async fn interpret(text: &str) -> Result<Command, ConfigError> {
    let parser = create_parser()?;
    Ok(parser.interpret(text, None).await)
}

/// One-line description of how an utterance is interpreted
pub async fn describe_command(text: &str) -> Result<String, ConfigError> {
    let command = interpret(text).await?;
    Ok(format!("Parsed: {} ({})", command.intent, command.message))
}
