//! Keyword tables for category, default unit and variety lookups.
//!
//! Tables are plain data injected into the parser at construction. Every
//! lookup walks entries in declaration order and the first hit wins, so the
//! YAML representation uses sequences rather than maps.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A label (category or unit) and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub value: String,
    pub keywords: Vec<String>,
}

/// A canonical product and its varieties in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarietyEntry {
    pub product: String,
    pub varieties: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTables {
    #[serde(default)]
    pub categories: Vec<KeywordGroup>,
    #[serde(default)]
    pub units: Vec<KeywordGroup>,
    #[serde(default)]
    pub varieties: Vec<VarietyEntry>,
}

impl LookupTables {
    /// Category for an item name, matched keyword-by-keyword against its tokens.
    pub fn category_for(&self, item: &str) -> Option<&str> {
        lookup_keyword(&self.categories, item)
    }

    /// Default unit for an item name.
    pub fn unit_for(&self, item: &str) -> Option<&str> {
        lookup_keyword(&self.units, item)
    }

    /// Variety entry for a product name: exact key first, then any token of
    /// the name that matches a key.
    pub fn find_variety(&self, product: &str) -> Option<&VarietyEntry> {
        let product = product.trim().to_lowercase();
        if let Some(entry) = self.varieties.iter().find(|e| e.product == product) {
            return Some(entry);
        }
        let tokens = tokenize(&product);
        self.find_variety_mention(&tokens)
    }

    /// First variety entry (table order) whose product is named by one of `tokens`.
    pub fn find_variety_mention<S: AsRef<str>>(&self, tokens: &[S]) -> Option<&VarietyEntry> {
        self.varieties.iter().find(|entry| {
            tokens
                .iter()
                .any(|token| names_product(token.as_ref(), &entry.product))
        })
    }

    /// Tables shipped with the interpreter.
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                group("produce", &["apple", "banana", "mango", "tomato", "vegetable", "fruit"]),
                group("dairy", &["milk", "cheese", "yogurt", "egg", "dairy"]),
                group("bakery", &["bread", "cake", "pastry", "bun", "croissant"]),
                group("meat", &["chicken", "beef", "pork", "lamb", "meat", "fish"]),
                group("pantry", &["rice", "lentil", "dal", "pasta", "flour", "grain"]),
                group(
                    "clothing",
                    &["shirt", "pants", "dress", "shoes", "clothes", "clothing"],
                ),
                group(
                    "personal care",
                    &["toothpaste", "soap", "shampoo", "deodorant", "cosmetic", "beauty"],
                ),
                group(
                    "electronics",
                    &["phone", "laptop", "computer", "electronic", "gadget"],
                ),
            ],
            units: vec![
                group("piece", &["apple", "banana", "mango", "tomato", "fruit"]),
                group("gallon", &["milk"]),
                group("loaf", &["bread"]),
                group("dozen", &["egg"]),
                group("package", &["cheese"]),
                group("container", &["yogurt"]),
                group("pound", &["chicken", "beef", "meat"]),
                group("bag", &["rice", "lentil", "dal"]),
                group("piece", &["shirt", "pants", "dress", "clothes", "clothing"]),
                group("tube", &["toothpaste", "soap", "shampoo"]),
                group("pair", &["shoes", "footwear"]),
            ],
            varieties: vec![
                varieties(
                    "apples",
                    &[
                        "Red Delicious Apples",
                        "Granny Smith Apples",
                        "Gala Apples",
                        "Fuji Apples",
                        "Honeycrisp Apples",
                        "Pink Lady Apples",
                        "Golden Delicious Apples",
                        "McIntosh Apples",
                        "Braeburn Apples",
                        "Cortland Apples",
                    ],
                ),
                varieties(
                    "milk",
                    &[
                        "Whole Milk",
                        "2% Reduced Fat Milk",
                        "1% Low Fat Milk",
                        "Skim Milk",
                        "Almond Milk",
                        "Soy Milk",
                        "Oat Milk",
                        "Coconut Milk",
                        "Organic Whole Milk",
                        "Lactose-Free Milk",
                    ],
                ),
                varieties(
                    "bread",
                    &[
                        "Whole Wheat Bread",
                        "White Bread",
                        "Sourdough Bread",
                        "Multigrain Bread",
                        "Rye Bread",
                        "Pumpernickel Bread",
                        "Brioche Bread",
                        "Ciabatta Bread",
                        "Gluten-Free Bread",
                        "Artisan Bread",
                    ],
                ),
                varieties(
                    "eggs",
                    &[
                        "Large Eggs",
                        "Extra Large Eggs",
                        "Jumbo Eggs",
                        "Organic Eggs",
                        "Free-Range Eggs",
                        "Cage-Free Eggs",
                        "Pasture-Raised Eggs",
                        "Brown Eggs",
                        "White Eggs",
                        "Omega-3 Enriched Eggs",
                    ],
                ),
                varieties(
                    "cheese",
                    &[
                        "Cheddar Cheese",
                        "Mozzarella Cheese",
                        "Swiss Cheese",
                        "Provolone Cheese",
                        "Gouda Cheese",
                        "Brie Cheese",
                        "Blue Cheese",
                        "Feta Cheese",
                        "Parmesan Cheese",
                        "Colby Jack Cheese",
                    ],
                ),
                varieties(
                    "yogurt",
                    &[
                        "Greek Yogurt",
                        "Regular Yogurt",
                        "Vanilla Yogurt",
                        "Strawberry Yogurt",
                        "Blueberry Yogurt",
                        "Plain Yogurt",
                        "Low-Fat Yogurt",
                        "Non-Fat Yogurt",
                        "Organic Yogurt",
                        "Plant-Based Yogurt",
                    ],
                ),
                varieties(
                    "bananas",
                    &[
                        "Regular Bananas",
                        "Organic Bananas",
                        "Plantains",
                        "Red Bananas",
                        "Lady Finger Bananas",
                        "Cavendish Bananas",
                        "Baby Bananas",
                        "Green Bananas",
                        "Ripe Bananas",
                        "Frozen Bananas",
                    ],
                ),
                varieties(
                    "tomatoes",
                    &[
                        "Roma Tomatoes",
                        "Cherry Tomatoes",
                        "Beefsteak Tomatoes",
                        "Grape Tomatoes",
                        "Heirloom Tomatoes",
                        "Campari Tomatoes",
                        "Vine-Ripened Tomatoes",
                        "Organic Tomatoes",
                        "Green Tomatoes",
                        "Yellow Tomatoes",
                    ],
                ),
                varieties(
                    "chicken",
                    &[
                        "Chicken Breast",
                        "Chicken Thighs",
                        "Chicken Wings",
                        "Whole Chicken",
                        "Ground Chicken",
                        "Chicken Tenders",
                        "Organic Chicken",
                        "Free-Range Chicken",
                        "Boneless Chicken",
                        "Skinless Chicken",
                    ],
                ),
                varieties(
                    "rice",
                    &[
                        "White Rice",
                        "Brown Rice",
                        "Basmati Rice",
                        "Jasmine Rice",
                        "Arborio Rice",
                        "Wild Rice",
                        "Sushi Rice",
                        "Long Grain Rice",
                        "Short Grain Rice",
                        "Organic Rice",
                    ],
                ),
            ],
        }
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let mut tables: LookupTables = serde_yaml::from_str(raw).context("decoding lookup tables")?;
        tables.normalize();
        Ok(tables)
    }

    // Keys are matched against lowercased utterances.
    fn normalize(&mut self) {
        for group in self.categories.iter_mut().chain(self.units.iter_mut()) {
            for keyword in group.keywords.iter_mut() {
                *keyword = keyword.trim().to_lowercase();
            }
            group.keywords.retain(|k| !k.is_empty());
        }
        for entry in self.varieties.iter_mut() {
            entry.product = entry.product.trim().to_lowercase();
        }
    }
}

pub fn load_tables_file(path: impl AsRef<Path>) -> anyhow::Result<LookupTables> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading lookup tables: {}", path.display()))?;
    LookupTables::from_yaml_str(&raw).with_context(|| format!("parsing yaml: {}", path.display()))
}

/// Lowercase word tokens with surrounding punctuation removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn lookup_keyword<'a>(groups: &'a [KeywordGroup], item: &str) -> Option<&'a str> {
    let tokens = tokenize(item);
    groups
        .iter()
        .find(|group| {
            group
                .keywords
                .iter()
                .any(|keyword| tokens.iter().any(|token| token.contains(keyword.as_str())))
        })
        .map(|group| group.value.as_str())
}

/// Whether a spoken token names a product key, allowing the singular form
/// ("apple" for `apples`, "tomato" for `tomatoes`).
fn names_product(token: &str, product: &str) -> bool {
    if token == product {
        return true;
    }
    if let Some(stem) = product.strip_suffix("oes") {
        if token.len() == stem.len() + 1 && token.starts_with(stem) && token.ends_with('o') {
            return true;
        }
    }
    product.strip_suffix('s') == Some(token)
}

fn group(value: &str, keywords: &[&str]) -> KeywordGroup {
    KeywordGroup {
        value: value.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn varieties(product: &str, names: &[&str]) -> VarietyEntry {
    VarietyEntry {
        product: product.to_string(),
        varieties: names.iter().map(|n| n.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_first_group_wins() {
        let tables = LookupTables::builtin();
        assert_eq!(tables.category_for("apples"), Some("produce"));
        assert_eq!(tables.category_for("organic milk"), Some("dairy"));
        assert_eq!(tables.category_for("chicken breast"), Some("meat"));
        assert_eq!(tables.category_for("colgate toothpaste"), Some("personal care"));
        assert_eq!(tables.category_for("garden hose"), None);
    }

    #[test]
    fn test_category_matches_tokens_not_phrase() {
        let tables = LookupTables::builtin();
        // "pineapple" contains "apple"; token substring matching is intended
        assert_eq!(tables.category_for("pineapple chunks"), Some("produce"));
    }

    #[test]
    fn test_unit_lookup() {
        let tables = LookupTables::builtin();
        assert_eq!(tables.unit_for("milk"), Some("gallon"));
        assert_eq!(tables.unit_for("eggs"), Some("dozen"));
        assert_eq!(tables.unit_for("running shoes"), Some("pair"));
        assert_eq!(tables.unit_for("batteries"), None);
    }

    #[test]
    fn test_find_variety_by_key_and_singular() {
        let tables = LookupTables::builtin();
        let entry = tables.find_variety("apples").unwrap();
        assert_eq!(entry.product, "apples");
        assert_eq!(entry.varieties.len(), 10);

        assert_eq!(tables.find_variety("apple").unwrap().product, "apples");
        assert_eq!(tables.find_variety("tomato").unwrap().product, "tomatoes");
        assert_eq!(tables.find_variety("some cheese").unwrap().product, "cheese");
        assert!(tables.find_variety("toothpaste").is_none());
        // no substring hits inside unrelated words
        assert!(tables.find_variety("price").is_none());
    }

    #[test]
    fn test_yaml_tables_keep_declaration_order() {
        let yaml = r#"
categories:
  - value: snacks
    keywords: [Chips, salsa]
  - value: produce
    keywords: [chips]
units:
  - value: bag
    keywords: [chips]
varieties:
  - product: Chips
    varieties: [Plain Chips, BBQ Chips]
"#;
        let tables = LookupTables::from_yaml_str(yaml).unwrap();
        assert_eq!(tables.category_for("tortilla chips"), Some("snacks"));
        assert_eq!(tables.unit_for("chips"), Some("bag"));
        let entry = tables.find_variety("chips").unwrap();
        assert_eq!(entry.varieties, vec!["Plain Chips", "BBQ Chips"]);
    }

    #[test]
    fn test_load_tables_file_missing() {
        let err = load_tables_file("/nonexistent/tables.yaml").unwrap_err();
        assert!(err.to_string().contains("reading lookup tables"));
    }
}
