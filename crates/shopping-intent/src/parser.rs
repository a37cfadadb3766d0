//! Intent resolution for shopping utterances
//!
//! Precedence, applied in this order to every utterance:
//!
//! 1. empty input → `error`
//! 2. reply to a pending selection (only when the caller passes one) → `confirm`
//! 3. product mention without an add/remove/search verb → `suggest`
//! 4. `remove` patterns
//! 5. `update` patterns (none built in)
//! 6. `search` patterns
//! 7. `add`, falling back to stop-word stripping
//! 8. nothing usable → `error`

use crate::command::{Command, Intent};
use crate::completion::TextCompletion;
use crate::error::{ConfigError, Result};
use crate::patterns::{PatternFamily, PatternSet};
use crate::selection::{ConfirmationMatcher, PendingSelection, SelectionReply};
use crate::tables::{tokenize, LookupTables};
use crate::varieties::{VarietyGateway, VarietySource};
use crate::InterpreterConfig;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Hint returned when nothing usable could be extracted
pub const PARSE_MISS_MESSAGE: &str =
    "I didn't understand that. Try saying something like \"add milk\" or \"I need 5 apples\".";

/// Returned for input that cannot be processed at all
pub const RETRY_MESSAGE: &str = "Sorry, I had trouble processing your request. Please try again.";

/// Words stripped when no add pattern captures an item
const STOP_WORDS: [&str; 13] = [
    "add", "buy", "get", "need", "want", "to", "my", "list", "the", "shopping", "please", "can",
    "you",
];

const LEADING_FILLERS: [&str; 11] = [
    "the", "a", "an", "some", "more", "my", "to", "of", "any", "please", "also",
];

const TRAILING_FILLERS: [&str; 10] = [
    "please", "now", "too", "list", "cart", "to", "my", "the", "shopping", "thanks",
];

/// Tokens that never name a product on their own
const NON_PRODUCT_WORDS: [&str; 35] = [
    "a", "an", "some", "i", "me", "of", "on", "off", "for", "and", "or", "but", "with", "from",
    "it", "them",
    "yes", "yeah", "no", "ok", "okay", "sure", "thanks", "thank", "hello", "hi", "hey", "help",
    "stop", "cancel", "what", "what's", "how", "where", "nothing",
];

const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

/// Command verbs that suppress proactive variety suggestions.
const EXPLICIT_VERBS: &str = r"\b(?:add|buy|get|grab|purchase|pick up|need|want|i'd like|would like|remove|delete|take|drop|cross off|scratch|change|update|set|find|search|look for|looking for|show me|do you have|where (?:is|are|can))\b";

/// Voice command interpreter.
///
/// Stateless across calls: tables and patterns are read-only after
/// construction and any pending selection is owned by the caller.
#[derive(Clone)]
pub struct IntentParser {
    config: InterpreterConfig,
    tables: Arc<LookupTables>,
    patterns: Arc<PatternSet>,
    confirmations: ConfirmationMatcher,
    verbs: Regex,
    gateway: VarietyGateway,
}

impl IntentParser {
    /// Create a parser over the built-in tables
    pub fn new(config: InterpreterConfig) -> Result<Self> {
        Self::with_tables(config, LookupTables::builtin())
    }

    /// Create a parser over caller-supplied tables
    pub fn with_tables(config: InterpreterConfig, tables: LookupTables) -> Result<Self> {
        let tables = Arc::new(tables);
        let patterns = Arc::new(PatternSet::with_custom(&config.custom_patterns)?);
        let verbs = Regex::new(EXPLICIT_VERBS).map_err(|source| ConfigError::Pattern {
            family: "verbs",
            pattern: EXPLICIT_VERBS.to_string(),
            source,
        })?;
        let gateway = VarietyGateway::new(tables.clone())
            .with_timeout(Duration::from_millis(config.suggestion_timeout_ms))
            .with_max_options(config.max_suggestions);

        Ok(Self {
            config,
            tables,
            patterns,
            confirmations: ConfirmationMatcher::new()?,
            verbs,
            gateway,
        })
    }

    /// Attach the external completion service used for unknown products
    pub fn with_completion(mut self, completion: Arc<dyn TextCompletion>) -> Self {
        tracing::info!("Variety suggestions backed by {}", completion.name());
        self.gateway = self.gateway.with_completion(completion);
        self
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn gateway(&self) -> &VarietyGateway {
        &self.gateway
    }

    /// Interpret one utterance. Never fails; the worst case is an `error` command.
    pub async fn interpret(&self, utterance: &str, pending: Option<&PendingSelection>) -> Command {
        let text = normalize_utterance(utterance);
        let command = self.resolve(&text, pending).await;
        debug!(utterance = %text, intent = %command.intent, "resolved command");
        command
    }

    async fn resolve(&self, text: &str, pending: Option<&PendingSelection>) -> Command {
        if text.is_empty() {
            return Command::error(RETRY_MESSAGE);
        }

        if let Some(pending) = pending {
            if let Some(command) = self.confirm(text, pending) {
                return command;
            }
        }

        if !self.verbs.is_match(text) {
            let tokens = tokenize(text);
            if let Some(entry) = self.tables.find_variety_mention(&tokens) {
                let product = entry.product.clone();
                return self.suggest(&product).await;
            }
            if self.config.suggest_unknown_products {
                if let Some(product) = bare_product(&tokens) {
                    return self.suggest(&product).await;
                }
            }
        }

        if let Some(command) = self.remove(text) {
            return command;
        }
        if let Some(command) = self.update(text) {
            return command;
        }
        if let Some(command) = self.search(text) {
            return command;
        }
        self.add(text)
    }

    fn confirm(&self, text: &str, pending: &PendingSelection) -> Option<Command> {
        let reply = self.confirmations.recognize(text, pending)?;
        debug!(?reply, "selection reply");
        if reply == SelectionReply::Cancel {
            return Some(Command::new(
                Intent::Confirm,
                "Okay, I won't add any of those.",
            ));
        }

        let command = match pending.resolve(&reply) {
            Some(option) => {
                let unit = self
                    .tables
                    .unit_for(option)
                    .unwrap_or(&self.config.default_unit)
                    .to_string();
                Command::new(
                    Intent::Confirm,
                    format!("Great choice! I'll add {option} to your list."),
                )
                .with_selected_item(option)
                .with_item(option)
                .with_quantity(1)
                .with_unit(unit)
                .with_category(pending.category.clone())
            }
            None => {
                let n = pending.options.len();
                Command::error(format!(
                    "I only have {n} options. Say a number between 1 and {n}."
                ))
            }
        };
        Some(command)
    }

    async fn suggest(&self, product: &str) -> Command {
        let result = self.gateway.suggest(product).await;
        let category = self
            .tables
            .category_for(&result.product)
            .unwrap_or(&self.config.default_category)
            .to_string();
        let message = match result.source {
            VarietySource::Table => format!(
                "I found several varieties of {}. Which one would you like?",
                result.product
            ),
            VarietySource::Service | VarietySource::Fallback => format!(
                "I found several options for {}. Which one would you like?",
                result.product
            ),
        };
        Command::new(Intent::Suggest, message)
            .with_item(result.product)
            .with_category(category)
            .with_suggestions(result.options)
    }

    fn remove(&self, text: &str) -> Option<Command> {
        let m = self.patterns.first_match(PatternFamily::Remove, text)?;
        let Some(item) = object(m.group(1)) else {
            return Some(Command::error(PARSE_MISS_MESSAGE));
        };
        Some(
            Command::new(
                Intent::Remove,
                format!("Removed {item} from your shopping list."),
            )
            .with_item(item),
        )
    }

    fn update(&self, text: &str) -> Option<Command> {
        let m = self.patterns.first_match(PatternFamily::Update, text)?;
        let Some(item) = object(m.group(1)) else {
            return Some(Command::error(PARSE_MISS_MESSAGE));
        };
        let mut command = Command::new(
            Intent::Update,
            format!("Updated {item} on your shopping list."),
        );
        if let Some(quantity) = m.group(2).and_then(|q| q.parse::<u32>().ok()) {
            command = command.with_quantity(quantity);
        }
        Some(command.with_item(item))
    }

    fn search(&self, text: &str) -> Option<Command> {
        let m = self.patterns.first_match(PatternFamily::Search, text)?;
        let raw = m.group(1).unwrap_or_default();
        let (item, price) = match m.group(2) {
            Some(bound) => (object(Some(raw)), bound.parse::<f64>().ok()),
            None => {
                let mut working = raw.to_string();
                let price = self
                    .take(PatternFamily::Price, &mut working, |_| true)
                    .and_then(|p| p.parse::<f64>().ok());
                (object(Some(working.as_str())), price)
            }
        };
        let Some(item) = item else {
            return Some(Command::error(PARSE_MISS_MESSAGE));
        };
        let message = match price {
            Some(p) => format!("Searching for {item} under ${}.", format_price(p)),
            None => format!("Searching for {item}."),
        };
        Some(
            Command::new(Intent::Search, message)
                .with_item(item)
                .with_price(price),
        )
    }

    fn add(&self, text: &str) -> Command {
        let mut working = normalize_number_words(text);

        // Secondary phrases are cut out so they cannot leak into the item name.
        let price = self
            .take(PatternFamily::Price, &mut working, |_| true)
            .and_then(|p| p.parse::<f64>().ok());
        let notes = self.take(PatternFamily::Notes, &mut working, |_| true);
        let explicit_category = self.take(PatternFamily::Category, &mut working, |_| true);
        let brand = self.take(PatternFamily::Brand, &mut working, |b| {
            !STOP_WORDS.contains(&b) && !self.verbs.is_match(b)
        });

        let quantity = self
            .patterns
            .capture(PatternFamily::Quantity, &working, 1)
            .and_then(|q| q.parse::<u32>().ok())
            .filter(|q| *q > 0);
        let spoken_unit = self
            .patterns
            .capture(PatternFamily::Unit, &working, 1)
            .map(str::to_string);

        let raw_item = match self.patterns.capture(PatternFamily::Add, &working, 1) {
            Some(item) => item.to_string(),
            None => strip_stop_words(&working),
        };
        let item = normalize_item(&raw_item, spoken_unit.as_deref());
        if is_non_product(&item) || self.only_verbs(&item) {
            debug!(utterance = %text, "no item after stripping");
            return Command::error(PARSE_MISS_MESSAGE);
        }

        let unit = spoken_unit
            .or_else(|| self.tables.unit_for(&item).map(str::to_string))
            .unwrap_or_else(|| self.config.default_unit.clone());
        let category = explicit_category
            .or_else(|| self.tables.category_for(&item).map(str::to_string))
            .unwrap_or_else(|| self.config.default_category.clone());

        let message = match quantity {
            Some(q) => format!("Added {q} {unit} of {item} to your shopping list."),
            None => format!("Added {item} to your shopping list."),
        };

        Command::new(Intent::Add, message)
            .with_item(item)
            .with_quantity(quantity.unwrap_or(1))
            .with_unit(unit)
            .with_category(category)
            .with_price(price)
            .with_brand(brand)
            .with_notes(notes)
    }

    /// "remove", "find", "look for": a command verb with nothing left to act on.
    fn only_verbs(&self, item: &str) -> bool {
        let rest = self.verbs.replace_all(item, " ");
        is_non_product(&clean_item(&rest))
    }

    /// Capture group 1 of `family`'s first match and cut the whole match out
    /// of `working`. A rejected capture leaves `working` untouched.
    fn take<F>(&self, family: PatternFamily, working: &mut String, accept: F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        let (value, span) = {
            let m = self.patterns.first_match(family, working.as_str())?;
            (m.group(1)?.to_string(), m.span())
        };
        if !accept(&value) {
            return None;
        }
        working.replace_range(span, " ");
        *working = collapse_whitespace(working);
        Some(value)
    }
}

fn normalize_utterance(utterance: &str) -> String {
    let lowered = utterance.replace(['\u{2019}', '\u{2018}'], "'").to_lowercase();
    collapse_whitespace(&lowered)
        .trim_end_matches(['.', '!', '?', ','])
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_number_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| match NUMBER_WORDS.iter().position(|n| *n == word) {
            Some(n) => n.to_string(),
            None => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_stop_words(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim filler words from both ends; a phrase made only of stop words is empty.
fn clean_item(raw: &str) -> String {
    let mut words: Vec<&str> = raw
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, ',' | '.' | '!' | '?' | ';' | ':')))
        .filter(|w| !w.is_empty())
        .collect();

    while words.first().is_some_and(|w| LEADING_FILLERS.contains(w)) {
        words.remove(0);
    }
    while words.last().is_some_and(|w| TRAILING_FILLERS.contains(w)) {
        words.pop();
    }
    if words
        .iter()
        .all(|w| STOP_WORDS.contains(w) || LEADING_FILLERS.contains(w))
    {
        return String::new();
    }
    words.join(" ")
}

/// Drop a quantity or unit that was captured again inside the item text
/// ("5 apples", "2 bags of rice", "milk 2 gallons").
fn normalize_item(raw: &str, unit: Option<&str>) -> String {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    let is_unit = |w: &str| unit.is_some_and(|u| u == w);
    let is_quantity = |w: &str| {
        let rest = w.trim_start_matches(|c: char| c.is_ascii_digit());
        rest.len() < w.len() && (rest.is_empty() || is_unit(rest))
    };

    if words.first().is_some_and(|w| matches!(*w, "a" | "an")) {
        words.remove(0);
    }
    if words.first().is_some_and(|w| is_quantity(*w)) {
        words.remove(0);
    }
    if words.first().is_some_and(|w| is_unit(*w)) {
        words.remove(0);
        if words.first() == Some(&"of") {
            words.remove(0);
        }
    }
    if words.last().is_some_and(|w| is_unit(*w)) {
        words.pop();
    }
    if words.last().is_some_and(|w| is_quantity(*w)) {
        words.pop();
    }
    clean_item(&words.join(" "))
}

/// Cleaned target of a remove, update or search; `None` if nothing nameable is left.
fn object(raw: Option<&str>) -> Option<String> {
    let item = clean_item(raw?);
    (!is_non_product(&item)).then_some(item)
}

/// True for an empty item too.
fn is_non_product(item: &str) -> bool {
    item.split_whitespace()
        .all(|w| NON_PRODUCT_WORDS.contains(&w))
}

/// Product named by a verb-less utterance, if it looks like one.
fn bare_product(tokens: &[String]) -> Option<String> {
    if tokens
        .iter()
        .any(|t| t.chars().any(|c| c.is_ascii_digit()))
    {
        return None;
    }
    let words: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !STOP_WORDS.contains(t) && !LEADING_FILLERS.contains(t))
        .collect();
    if words.is_empty() || words.len() > 3 {
        return None;
    }
    let looks_like_product = words.iter().all(|w| {
        !NON_PRODUCT_WORDS.contains(w) && w.chars().all(|c| c.is_alphabetic() || c == '-')
    });
    let product = words.join(" ");
    (looks_like_product && product.len() > 2).then_some(product)
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> IntentParser {
        IntentParser::new(InterpreterConfig::default()).unwrap()
    }

    async fn run(text: &str) -> Command {
        parser().interpret(text, None).await
    }

    #[tokio::test]
    async fn test_add_with_quantity() {
        let cmd = run("I need 5 apples").await;
        assert_eq!(cmd.intent, Intent::Add);
        assert_eq!(cmd.item.as_deref(), Some("apples"));
        assert_eq!(cmd.quantity, Some(5));
        assert_eq!(cmd.unit.as_deref(), Some("piece"));
        assert_eq!(cmd.category.as_deref(), Some("produce"));
        assert_eq!(cmd.price, None);
        assert_eq!(cmd.suggestions, None);
    }

    #[tokio::test]
    async fn test_add_defaults() {
        let cmd = run("add milk").await;
        assert_eq!(cmd.intent, Intent::Add);
        assert_eq!(cmd.item.as_deref(), Some("milk"));
        assert_eq!(cmd.quantity, Some(1));
        assert_eq!(cmd.unit.as_deref(), Some("gallon"));
        assert_eq!(cmd.category.as_deref(), Some("dairy"));

        let cmd = run("add batteries").await;
        assert_eq!(cmd.unit.as_deref(), Some("piece"));
        assert_eq!(cmd.category.as_deref(), Some("general"));
    }

    #[tokio::test]
    async fn test_add_spoken_unit_is_kept_exactly() {
        let cmd = run("add 2 bags of rice").await;
        assert_eq!(cmd.item.as_deref(), Some("rice"));
        assert_eq!(cmd.quantity, Some(2));
        assert_eq!(cmd.unit.as_deref(), Some("bags"));
        assert_eq!(cmd.category.as_deref(), Some("pantry"));

        let cmd = run("add 3 cans soup").await;
        assert_eq!(cmd.item.as_deref(), Some("soup"));
        assert_eq!(cmd.quantity, Some(3));
        assert_eq!(cmd.unit.as_deref(), Some("cans"));

        let cmd = run("add milk 2 gallons").await;
        assert_eq!(cmd.item.as_deref(), Some("milk"));
        assert_eq!(cmd.unit.as_deref(), Some("gallons"));
    }

    #[tokio::test]
    async fn test_add_secondary_fields() {
        let cmd = run("add horizon brand milk under $4").await;
        assert_eq!(cmd.intent, Intent::Add);
        assert_eq!(cmd.item.as_deref(), Some("milk"));
        assert_eq!(cmd.brand.as_deref(), Some("horizon"));
        assert_eq!(cmd.price, Some(4.0));

        let cmd = run("add chips in the snacks aisle").await;
        assert_eq!(cmd.item.as_deref(), Some("chips"));
        assert_eq!(cmd.category.as_deref(), Some("snacks"));

        let cmd = run("add bread, note: sliced please").await;
        assert_eq!(cmd.item.as_deref(), Some("bread"));
        assert_eq!(cmd.notes.as_deref(), Some("sliced please"));
    }

    #[tokio::test]
    async fn test_add_number_words() {
        let cmd = run("buy three cans of tuna").await;
        assert_eq!(cmd.quantity, Some(3));
        assert_eq!(cmd.unit.as_deref(), Some("cans"));
        assert_eq!(cmd.item.as_deref(), Some("tuna"));
    }

    #[tokio::test]
    async fn test_stop_words_only_is_error() {
        let cmd = run("add to my list").await;
        assert_eq!(cmd.intent, Intent::Error);
        assert_eq!(cmd.message, PARSE_MISS_MESSAGE);
        assert_eq!(cmd.item, None);

        let cmd = run("please can you add paper towels to my shopping list").await;
        assert_eq!(cmd.intent, Intent::Add);
        assert_eq!(cmd.item.as_deref(), Some("paper towels"));

        let cmd = run("add it").await;
        assert_eq!(cmd.intent, Intent::Error);
    }

    #[tokio::test]
    async fn test_empty_input_is_error() {
        let cmd = run("   ").await;
        assert_eq!(cmd.intent, Intent::Error);
        assert_eq!(cmd.message, RETRY_MESSAGE);
    }

    #[tokio::test]
    async fn test_remove() {
        let cmd = run("remove milk from list").await;
        assert_eq!(cmd.intent, Intent::Remove);
        assert_eq!(cmd.item.as_deref(), Some("milk"));
        assert_eq!(cmd.quantity, None);
        assert_eq!(cmd.unit, None);
        assert_eq!(cmd.category, None);

        let cmd = run("Take the eggs off my list.").await;
        assert_eq!(cmd.intent, Intent::Remove);
        assert_eq!(cmd.item.as_deref(), Some("eggs"));
    }

    #[tokio::test]
    async fn test_search() {
        let cmd = run("find toothpaste under $5").await;
        assert_eq!(cmd.intent, Intent::Search);
        assert_eq!(cmd.item.as_deref(), Some("toothpaste"));
        assert_eq!(cmd.price, Some(5.0));
        assert_eq!(cmd.quantity, None);

        let cmd = run("search for organic honey").await;
        assert_eq!(cmd.intent, Intent::Search);
        assert_eq!(cmd.item.as_deref(), Some("organic honey"));
        assert_eq!(cmd.price, None);

        let cmd = run("look for shampoo for $8").await;
        assert_eq!(cmd.item.as_deref(), Some("shampoo"));
        assert_eq!(cmd.price, Some(8.0));
    }

    #[tokio::test]
    async fn test_bare_table_product_suggests() {
        let p = parser();
        let cmd = p.interpret("apples", None).await;
        assert_eq!(cmd.intent, Intent::Suggest);
        assert_eq!(cmd.item.as_deref(), Some("apples"));
        assert_eq!(cmd.category.as_deref(), Some("produce"));
        let expected = &p.tables().find_variety("apples").unwrap().varieties;
        assert_eq!(cmd.suggestions.as_ref(), Some(expected));
    }

    #[tokio::test]
    async fn test_verb_beats_product_keyword() {
        let cmd = run("add apples").await;
        assert_eq!(cmd.intent, Intent::Add);
        let cmd = run("find milk").await;
        assert_eq!(cmd.intent, Intent::Search);
        let cmd = run("i don't need bread anymore").await;
        assert_eq!(cmd.intent, Intent::Remove);
        assert_eq!(cmd.item.as_deref(), Some("bread"));
    }

    #[tokio::test]
    async fn test_bare_unknown_product_uses_fallback() {
        let cmd = run("toothpaste").await;
        assert_eq!(cmd.intent, Intent::Suggest);
        assert_eq!(cmd.category.as_deref(), Some("personal care"));
        let suggestions = cmd.suggestions.unwrap();
        assert_eq!(suggestions[0], "Colgate Toothpaste");
    }

    #[tokio::test]
    async fn test_unknown_products_can_be_disabled() {
        let config = InterpreterConfig {
            suggest_unknown_products: false,
            ..InterpreterConfig::default()
        };
        let p = IntentParser::new(config).unwrap();
        let cmd = p.interpret("toothpaste", None).await;
        assert_eq!(cmd.intent, Intent::Add);
        assert_eq!(cmd.item.as_deref(), Some("toothpaste"));
    }

    #[tokio::test]
    async fn test_confirmation_only_with_pending() {
        let p = parser();
        let suggest = p.interpret("apples", None).await;
        let pending = PendingSelection::from_command(&suggest).unwrap();

        let cmd = p.interpret("number 3", Some(&pending)).await;
        assert_eq!(cmd.intent, Intent::Confirm);
        assert_eq!(cmd.selected_item.as_deref(), Some("Gala Apples"));
        assert_eq!(cmd.category.as_deref(), Some("produce"));
        assert_eq!(cmd.unit.as_deref(), Some("piece"));

        let cmd = p.interpret("yes", Some(&pending)).await;
        assert_eq!(cmd.selected_item.as_deref(), Some("Red Delicious Apples"));

        let cmd = p.interpret("no", Some(&pending)).await;
        assert_eq!(cmd.intent, Intent::Confirm);
        assert_eq!(cmd.selected_item, None);

        let cmd = p.interpret("number 42", Some(&pending)).await;
        assert_eq!(cmd.intent, Intent::Error);

        // Without a pending selection the same words are not confirmations
        let cmd = p.interpret("number 3", None).await;
        assert_ne!(cmd.intent, Intent::Confirm);
        let cmd = p.interpret("yes", None).await;
        assert_eq!(cmd.intent, Intent::Error);
    }

    #[tokio::test]
    async fn test_pending_does_not_swallow_new_commands() {
        let p = parser();
        let suggest = p.interpret("milk", None).await;
        let pending = PendingSelection::from_command(&suggest).unwrap();
        let cmd = p.interpret("remove the bread", Some(&pending)).await;
        assert_eq!(cmd.intent, Intent::Remove);
        assert_eq!(cmd.item.as_deref(), Some("bread"));
    }

    #[tokio::test]
    async fn test_verb_without_object_is_error() {
        for text in [
            "remove",
            "delete",
            "find",
            "look for",
            "search for",
            "remove from my list",
            "delete it",
            "take it off my list",
        ] {
            let cmd = run(text).await;
            assert_eq!(cmd.intent, Intent::Error, "{text}");
            assert_eq!(cmd.item, None, "{text}");
        }
    }

    #[tokio::test]
    async fn test_pending_yields_to_commands_naming_an_option() {
        let p = parser();
        let suggest = p.interpret("milk", None).await;
        let pending = PendingSelection::from_command(&suggest).unwrap();

        let cmd = p.interpret("remove the milk", Some(&pending)).await;
        assert_eq!(cmd.intent, Intent::Remove);
        assert_eq!(cmd.item.as_deref(), Some("milk"));

        let cmd = p.interpret("add bread first", Some(&pending)).await;
        assert_eq!(cmd.intent, Intent::Add);
        assert!(cmd.item.unwrap().starts_with("bread"));

        let cmd = p.interpret("no, add bread instead", Some(&pending)).await;
        assert_eq!(cmd.intent, Intent::Add);
        assert!(cmd.item.unwrap().starts_with("bread"));

        let cmd = p.interpret("i'll take the second one", Some(&pending)).await;
        assert_eq!(cmd.intent, Intent::Confirm);
        assert_eq!(cmd.selected_item.as_deref(), Some("2% Reduced Fat Milk"));
    }

    #[tokio::test]
    async fn test_unlisted_unit_before_of() {
        let cmd = run("add 2 crates of beer").await;
        assert_eq!(cmd.item.as_deref(), Some("beer"));
        assert_eq!(cmd.quantity, Some(2));
        assert_eq!(cmd.unit.as_deref(), Some("crates"));
    }

    #[tokio::test]
    async fn test_zero_quantity_means_one() {
        let cmd = run("add 0 apples").await;
        assert_eq!(cmd.intent, Intent::Add);
        assert_eq!(cmd.item.as_deref(), Some("apples"));
        assert_eq!(cmd.quantity, Some(1));
    }

    #[tokio::test]
    async fn test_custom_update_pattern() {
        let mut config = InterpreterConfig::default();
        config.custom_patterns.insert(
            "update".to_string(),
            vec![r"\bchange\s+(.+?)\s+to\s+(\d+)$".to_string()],
        );
        let p = IntentParser::new(config).unwrap();
        let cmd = p.interpret("change milk to 2", None).await;
        assert_eq!(cmd.intent, Intent::Update);
        assert_eq!(cmd.item.as_deref(), Some("milk"));
        assert_eq!(cmd.quantity, Some(2));
    }

    #[test]
    fn test_normalize_item() {
        assert_eq!(normalize_item("5 apples", None), "apples");
        assert_eq!(normalize_item("2 bags of rice", Some("bags")), "rice");
        assert_eq!(normalize_item("5kg flour", Some("kg")), "flour");
        assert_eq!(normalize_item("a loaf of bread", Some("loaf")), "bread");
        assert_eq!(normalize_item("7up", None), "7up");
        assert_eq!(normalize_item("the", None), "");
    }

    #[test]
    fn test_bare_product() {
        let t = |s: &str| bare_product(&tokenize(s));
        assert_eq!(t("kombucha"), Some("kombucha".to_string()));
        assert_eq!(t("green tea please"), Some("green tea".to_string()));
        assert_eq!(t("yes"), None);
        assert_eq!(t("5 limes"), None);
        assert_eq!(t("to my list"), None);
        assert_eq!(t("one two three four five"), None);
    }
}
