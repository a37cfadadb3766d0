//! Ordered pattern families for extracting intents and fields from utterances
//!
//! Each family is a list of regular expressions tried strictly in declaration
//! order. The first one that matches wins; later patterns are never consulted.

use crate::error::{ConfigError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// Units recognised after a number or before "of".
const UNIT_WORDS: &str = r"pounds?|lbs?|kilograms?|kilos?|kgs?|grams?|g|ounces?|oz|liters?|litres?|l|ml|gallons?|quarts?|pints?|bottles?|cans?|boxes|box|bags?|packs?|packages?|packets?|cartons?|dozens?|loaf|loaves|bunch(?:es)?|jars?|tubes?|pairs?|pieces?|pcs|cups?|containers?|rolls?|bars?|heads?|slices?|sticks?";

const LIST_SUFFIX: &str = r"(?:\s+(?:to|on|onto|in|into|from|off|off of)\s+(?:my\s+|the\s+|our\s+)?(?:shopping\s+|grocery\s+)?(?:list|cart))?(?:\s+please)?";

const BOUND_WORDS: &str = r"under|below|less than|for less than|cheaper than|up to|at most|no more than";

const SEARCH_VERBS: &str =
    r"find|search for|search|look for|looking for|show me|do you have|where (?:is|are|can i find)";

/// Pattern families known to the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternFamily {
    Add,
    Remove,
    Search,
    Update,
    Quantity,
    Unit,
    Category,
    Price,
    Brand,
    Notes,
}

impl PatternFamily {
    pub const ALL: [PatternFamily; 10] = [
        PatternFamily::Add,
        PatternFamily::Remove,
        PatternFamily::Search,
        PatternFamily::Update,
        PatternFamily::Quantity,
        PatternFamily::Unit,
        PatternFamily::Category,
        PatternFamily::Price,
        PatternFamily::Brand,
        PatternFamily::Notes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PatternFamily::Add => "add",
            PatternFamily::Remove => "remove",
            PatternFamily::Search => "search",
            PatternFamily::Update => "update",
            PatternFamily::Quantity => "quantity",
            PatternFamily::Unit => "unit",
            PatternFamily::Category => "category",
            PatternFamily::Price => "price",
            PatternFamily::Brand => "brand",
            PatternFamily::Notes => "notes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(name.trim()))
    }

    fn builtin(&self) -> Vec<String> {
        match self {
            PatternFamily::Add => vec![
                format!(
                    r"^(?:please\s+)?(?:(?:can|could|would)\s+you\s+)?(?:i\s+|we\s+)?(?:also\s+)?(?:need to buy|need to get|want to buy|would like|'d like|i'd like|add|buy|get|grab|purchase|pick up|need|want)\s+(?:some\s+|more\s+)?(.+?){LIST_SUFFIX}$"
                ),
                format!(
                    r"\b(?:add|buy|get|grab|purchase|pick up|need|want)\s+(?:some\s+|more\s+)?(.+?){LIST_SUFFIX}$"
                ),
                r"^(.+?)\s+(?:to|on|onto)\s+(?:my\s+|the\s+|our\s+)?(?:shopping\s+|grocery\s+)?(?:list|cart)$"
                    .to_string(),
            ],
            PatternFamily::Remove => vec![
                r"\btake\s+(?:the\s+)?(.+?)\s+off\s+(?:of\s+)?(?:my\s+|the\s+|our\s+)?(?:shopping\s+|grocery\s+)?(?:list|cart)$"
                    .to_string(),
                format!(
                    r"\b(?:remove|delete|take off|take out|get rid of|drop|cross off|scratch)\s+(?:the\s+|my\s+|all\s+(?:the\s+)?)?(.+?){LIST_SUFFIX}$"
                ),
                r"\b(?:don't|do not|no longer)\s+need\s+(?:the\s+|any\s+)?(.+?)(?:\s+any\s*more)?$"
                    .to_string(),
            ],
            PatternFamily::Search => vec![
                format!(
                    r"\b(?:{SEARCH_VERBS})\s+(?:me\s+|some\s+|a\s+|an\s+|the\s+)?(.+?)\s+(?:{BOUND_WORDS})\s+\$?\s*(\d+(?:\.\d+)?)(?:\s*(?:dollars?|bucks))?$"
                ),
                format!(r"\b(?:{SEARCH_VERBS})\s+(?:me\s+|some\s+|a\s+|an\s+|the\s+)?(.+?)$"),
            ],
            // No trigger phrase is built in; see DESIGN.md.
            PatternFamily::Update => Vec::new(),
            PatternFamily::Quantity => vec![
                r"\b(?:quantity|qty)\s*(?:of\s+)?(\d+)\b".to_string(),
                r"(?:^|\s)(\d+)(?:\s|$)".to_string(),
                format!(r"(?:^|\s)(\d+)\s*(?:{UNIT_WORDS})\b"),
            ],
            PatternFamily::Unit => vec![
                format!(r"(?:^|\s)\d+\s*({UNIT_WORDS})\b"),
                format!(r"\b(?:a|an|one)\s+({UNIT_WORDS})\s+of\b"),
                format!(r"\b({UNIT_WORDS})\s+of\b"),
                // "2 crates of beer": any word between a count and "of"
                r"(?:^|\s)\d+\s+([a-z]+)\s+of\b".to_string(),
            ],
            PatternFamily::Category => vec![
                r"\b(?:in|under|to|into)\s+(?:the\s+)?([a-z]+(?:\s+care)?)\s+(?:category|section|aisle|department)\b"
                    .to_string(),
                r"\b(?:category|section|aisle)\s*:?\s+([a-z]+(?:\s+care)?)$".to_string(),
            ],
            PatternFamily::Price => vec![
                format!(
                    r"\b(?:{BOUND_WORDS}|max(?:imum)?|for|around|about|at)\s+\$\s*(\d+(?:\.\d+)?)"
                ),
                format!(r"\b(?:{BOUND_WORDS})\s+(\d+(?:\.\d+)?)(?:\s*(?:dollars?|bucks))?\b"),
                r"\$\s*(\d+(?:\.\d+)?)".to_string(),
                r"\b(?:(?:for|at|around|about)\s+)?(\d+(?:\.\d+)?)\s*(?:dollars?|bucks)\b".to_string(),
            ],
            PatternFamily::Brand => vec![
                r"\b(?:from|of)\s+(?:the\s+)?brand\s+([a-z][\w&'\-]*)".to_string(),
                r"\bbrand\s*:\s*([a-z][\w&'\-]*)".to_string(),
                r"\b([a-z][\w&'\-]*)\s+brand\b".to_string(),
                r"\b(?:made by|by)\s+([a-z][\w&'\-]*(?:\s+[a-z][\w&'\-]*)?)$".to_string(),
            ],
            PatternFamily::Notes => {
                vec![r"[,;]?\s*\b(?:with a note|note|notes)\s*:?\s+(.+)$".to_string()]
            }
        }
    }
}

/// A successful match of one pattern in a family.
#[derive(Debug)]
pub struct PatternMatch<'t> {
    family: PatternFamily,
    index: usize,
    captures: Captures<'t>,
}

impl<'t> PatternMatch<'t> {
    pub fn family(&self) -> PatternFamily {
        self.family
    }

    /// Position of the winning pattern within its family.
    pub fn pattern_index(&self) -> usize {
        self.index
    }

    /// Capture group `i`, trimmed; `None` if absent or blank.
    pub fn group(&self, i: usize) -> Option<&'t str> {
        self.captures
            .get(i)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    }

    /// Byte range of the whole match in the input.
    pub fn span(&self) -> Range<usize> {
        self.captures
            .get(0)
            .map(|m| m.range())
            .unwrap_or(0..0)
    }
}

/// Compiled pattern families. Immutable once built.
#[derive(Debug, Clone)]
pub struct PatternSet {
    families: HashMap<PatternFamily, Vec<Regex>>,
}

impl PatternSet {
    /// Build the built-in families.
    pub fn builtin() -> Result<Self> {
        Self::with_custom(&HashMap::new())
    }

    /// Build the built-in families and append `custom` patterns (keyed by
    /// family name) after them.
    pub fn with_custom(custom: &HashMap<String, Vec<String>>) -> Result<Self> {
        let mut families = HashMap::new();
        for family in PatternFamily::ALL {
            let compiled = family
                .builtin()
                .iter()
                .map(|p| compile(family, p))
                .collect::<Result<Vec<_>>>()?;
            families.insert(family, compiled);
        }

        // Sorted so a bad pattern is always reported the same way.
        let mut names: Vec<&String> = custom.keys().collect();
        names.sort();
        for name in names {
            let family = PatternFamily::from_name(name)
                .ok_or_else(|| ConfigError::UnknownFamily(name.clone()))?;
            let entry = families.entry(family).or_insert_with(Vec::new);
            for pattern in &custom[name] {
                entry.push(compile(family, pattern)?);
            }
        }

        Ok(Self { families })
    }

    pub fn patterns(&self, family: PatternFamily) -> &[Regex] {
        self.families
            .get(&family)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// First match across `family`'s patterns in declaration order.
    pub fn first_match<'t>(&self, family: PatternFamily, text: &'t str) -> Option<PatternMatch<'t>> {
        self.patterns(family)
            .iter()
            .enumerate()
            .find_map(|(index, regex)| {
                regex.captures(text).map(|captures| PatternMatch {
                    family,
                    index,
                    captures,
                })
            })
    }

    /// Convenience: group `i` of the first match in `family`.
    pub fn capture<'t>(&self, family: PatternFamily, text: &'t str, i: usize) -> Option<&'t str> {
        self.first_match(family, text).and_then(|m| m.group(i))
    }
}

fn compile(family: PatternFamily, pattern: &str) -> Result<Regex> {
    // Utterances are lowercased before matching; keep custom patterns honest too.
    Regex::new(&format!("(?i){pattern}")).map_err(|source| ConfigError::Pattern {
        family: family.name(),
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> PatternSet {
        PatternSet::builtin().unwrap()
    }

    #[test]
    fn test_add_item_capture() {
        let p = set();
        assert_eq!(p.capture(PatternFamily::Add, "add milk", 1), Some("milk"));
        assert_eq!(
            p.capture(PatternFamily::Add, "add milk to my shopping list", 1),
            Some("milk")
        );
        assert_eq!(p.capture(PatternFamily::Add, "i need 5 apples", 1), Some("5 apples"));
        assert_eq!(
            p.capture(PatternFamily::Add, "can you buy some bread please", 1),
            Some("bread")
        );
        assert_eq!(p.capture(PatternFamily::Add, "bananas on my list", 1), Some("bananas"));
    }

    #[test]
    fn test_first_pattern_wins() {
        let p = set();
        let m = p.first_match(PatternFamily::Add, "add milk").unwrap();
        assert_eq!(m.pattern_index(), 0);
        // unanchored fallback only when the anchored form fails
        let m = p.first_match(PatternFamily::Add, "hey assistant add eggs").unwrap();
        assert_eq!(m.pattern_index(), 1);
        assert_eq!(m.group(1), Some("eggs"));
    }

    #[test]
    fn test_remove_capture() {
        let p = set();
        assert_eq!(p.capture(PatternFamily::Remove, "remove milk from list", 1), Some("milk"));
        assert_eq!(
            p.capture(PatternFamily::Remove, "take the eggs off my list", 1),
            Some("eggs")
        );
        assert_eq!(
            p.capture(PatternFamily::Remove, "i don't need bread anymore", 1),
            Some("bread")
        );
        assert!(p.first_match(PatternFamily::Remove, "add milk").is_none());
    }

    #[test]
    fn test_search_with_price_bound() {
        let p = set();
        let m = p
            .first_match(PatternFamily::Search, "find toothpaste under $5")
            .unwrap();
        assert_eq!(m.group(1), Some("toothpaste"));
        assert_eq!(m.group(2), Some("5"));

        let m = p.first_match(PatternFamily::Search, "search for organic honey").unwrap();
        assert_eq!(m.group(1), Some("organic honey"));
        assert_eq!(m.group(2), None);
    }

    #[test]
    fn test_quantity_and_unit() {
        let p = set();
        assert_eq!(p.capture(PatternFamily::Quantity, "add 2 bags of rice", 1), Some("2"));
        assert_eq!(p.capture(PatternFamily::Unit, "add 2 bags of rice", 1), Some("bags"));
        assert_eq!(p.capture(PatternFamily::Quantity, "add 5kg flour", 1), Some("5"));
        assert_eq!(p.capture(PatternFamily::Unit, "add 5kg flour", 1), Some("kg"));
        assert_eq!(p.capture(PatternFamily::Unit, "add a loaf of bread", 1), Some("loaf"));
        assert_eq!(p.capture(PatternFamily::Quantity, "add 7up", 1), None);
        assert_eq!(p.capture(PatternFamily::Unit, "add 3 lemons", 1), None);
    }

    #[test]
    fn test_unlisted_unit_before_of() {
        let p = set();
        for (text, unit) in [
            ("add 2 crates of beer", "crates"),
            ("add 4 tins of tomatoes", "tins"),
            ("buy 1 sack of potatoes", "sack"),
        ] {
            let m = p.first_match(PatternFamily::Unit, text).unwrap();
            assert_eq!(m.pattern_index(), 3, "{text}");
            assert_eq!(m.group(1), Some(unit));
        }
        // known units still win
        let m = p.first_match(PatternFamily::Unit, "add 2 bags of rice").unwrap();
        assert_eq!(m.pattern_index(), 0);
    }

    #[test]
    fn test_price_and_brand() {
        let p = set();
        assert_eq!(p.capture(PatternFamily::Price, "add milk under $4", 1), Some("4"));
        assert_eq!(p.capture(PatternFamily::Price, "add wine for 12 dollars", 1), Some("12"));
        assert_eq!(
            p.capture(PatternFamily::Brand, "add horizon brand milk", 1),
            Some("horizon")
        );
        assert_eq!(
            p.capture(PatternFamily::Brand, "add cereal by kellogg's", 1),
            Some("kellogg's")
        );
    }

    #[test]
    fn test_match_span() {
        let p = set();
        let text = "add milk under $4";
        let m = p.first_match(PatternFamily::Price, text).unwrap();
        assert_eq!(&text[m.span()], "under $4");
    }

    #[test]
    fn test_update_family_empty_by_default() {
        let p = set();
        assert!(p.patterns(PatternFamily::Update).is_empty());
        assert!(p.first_match(PatternFamily::Update, "change milk to 2").is_none());
    }

    #[test]
    fn test_custom_patterns_append() {
        let mut custom = HashMap::new();
        custom.insert(
            "update".to_string(),
            vec![r"\bchange\s+(.+?)\s+to\s+(\d+)$".to_string()],
        );
        let p = PatternSet::with_custom(&custom).unwrap();
        let m = p.first_match(PatternFamily::Update, "change milk to 2").unwrap();
        assert_eq!(m.group(1), Some("milk"));
        assert_eq!(m.group(2), Some("2"));
    }

    #[test]
    fn test_custom_pattern_errors() {
        let mut custom = HashMap::new();
        custom.insert("teleport".to_string(), vec!["x".to_string()]);
        assert!(matches!(
            PatternSet::with_custom(&custom),
            Err(ConfigError::UnknownFamily(_))
        ));

        let mut custom = HashMap::new();
        custom.insert("add".to_string(), vec!["(unclosed".to_string()]);
        assert!(matches!(
            PatternSet::with_custom(&custom),
            Err(ConfigError::Pattern { family: "add", .. })
        ));
    }
}
