//! Pending variety selection and confirmation replies.
//!
//! The parser never stores a pending selection. The caller keeps it between
//! utterances and hands it back while a choice is outstanding.

use crate::command::{Command, Intent};
use crate::error::{ConfigError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

const ORDINALS: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

/// Optional lead-in before a choice: "yes, the gala", "i'll take number 2".
const LEAD_IN: &str = r"(?:(?:yes|yeah|yep|no|ok|okay|sure)\b[,\s]*)?(?:(?:i'll take|i will take|i'll have|give me|let's go with|go with|i want|i'd like)\s+)?";

/// Selection context captured from a `suggest` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub product: Option<String>,
    pub category: String,
    pub message: String,
    pub options: Vec<String>,
}

impl PendingSelection {
    pub fn from_command(command: &Command) -> Option<Self> {
        if command.intent != Intent::Suggest {
            return None;
        }
        let options = command.suggestions.clone().filter(|s| !s.is_empty())?;
        Some(Self {
            product: command.item.clone(),
            category: command
                .category
                .clone()
                .unwrap_or_else(|| "general".to_string()),
            message: command.message.clone(),
            options,
        })
    }

    /// Option named by `reply`, or `None` if the reply points outside the list.
    pub fn resolve(&self, reply: &SelectionReply) -> Option<&str> {
        match reply {
            SelectionReply::Index(i) => self.options.get(*i).map(String::as_str),
            SelectionReply::Last => self.options.last().map(String::as_str),
            SelectionReply::Affirmative => self.options.first().map(String::as_str),
            SelectionReply::Named(name) => self.find_option(name),
            SelectionReply::Cancel => None,
        }
    }

    /// First option containing `name`, case-insensitive.
    pub fn find_option(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        self.options
            .iter()
            .find(|o| o.to_lowercase().contains(&name))
            .map(String::as_str)
    }

    fn unique_option(&self, name: &str) -> Option<&str> {
        let mut hits = self
            .options
            .iter()
            .filter(|o| o.to_lowercase().contains(name));
        match (hits.next(), hits.next()) {
            (Some(only), None) => Some(only.as_str()),
            _ => None,
        }
    }
}

/// How the user answered a pending selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionReply {
    Cancel,
    /// Zero-based option index
    Index(usize),
    Last,
    Named(String),
    Affirmative,
}

/// Recognizes replies to a pending selection.
#[derive(Debug, Clone)]
pub struct ConfirmationMatcher {
    number: Regex,
    ordinal: Regex,
    named: Regex,
    cancel: Regex,
    affirmative: Regex,
}

impl ConfirmationMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            number: compile(&format!(
                r"^{LEAD_IN}(?:number|option|choice|#)\s*(\d+)(?:\s+please)?$"
            ))?,
            ordinal: compile(&format!(
                r"^{LEAD_IN}(?:the\s+)?(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|last)(?:\s+(?:one|option))?(?:\s+please)?$"
            ))?,
            named: compile(&format!(
                r"^{LEAD_IN}the\s+([a-z0-9][a-z0-9%'\- ]*?)(?:\s+one)?(?:\s+please)?$"
            ))?,
            cancel: compile(
                r"^(?:no|nope|cancel|never\s*mind|forget it|none(?:\s+of\s+(?:them|those|these))?)(?:,?\s+thanks?(?:\s+you)?)?$",
            )?,
            affirmative: compile(
                r"^(?:yes|yeah|yep|yup|okay|ok|sure|fine|good|great|perfect|sounds good|that's fine|that is fine)(?:,?\s+please)?(?:,?\s+thanks?(?:\s+you)?)?$",
            )?,
        })
    }

    /// Classify `text` (lowercased, trimmed) against `pending`.
    ///
    /// Every form must cover the whole utterance, so "remove the milk" or
    /// "add bread first" are never replies. Order: number, ordinal, "the X",
    /// cancel, affirmative, then a bare option name that matches exactly one
    /// option.
    pub fn recognize(&self, text: &str, pending: &PendingSelection) -> Option<SelectionReply> {
        if let Some(n) = self
            .number
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX))
        {
            return Some(SelectionReply::Index(n.wrapping_sub(1)));
        }

        if let Some(word) = self.ordinal.captures(text).and_then(|c| c.get(1)) {
            let word = word.as_str();
            if word == "last" {
                return Some(SelectionReply::Last);
            }
            if let Some(i) = ORDINALS.iter().position(|o| *o == word) {
                return Some(SelectionReply::Index(i));
            }
        }

        if let Some(name) = self.named.captures(text).and_then(|c| c.get(1)) {
            let name = name.as_str().trim();
            if pending.find_option(name).is_some() {
                return Some(SelectionReply::Named(name.to_string()));
            }
        }

        if self.cancel.is_match(text) {
            return Some(SelectionReply::Cancel);
        }
        if self.affirmative.is_match(text) {
            return Some(SelectionReply::Affirmative);
        }

        let bare = text.trim();
        if bare.len() >= 3 {
            if let Some(option) = pending.unique_option(bare) {
                return Some(SelectionReply::Named(option.to_lowercase()));
            }
        }
        None
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        family: "confirm",
        pattern: pattern.to_string(),
        source,
    })
}
