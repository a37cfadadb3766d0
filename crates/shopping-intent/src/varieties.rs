//! Variety suggestions for bare product mentions.
//!
//! Lookup order: the static variety table, then one request to the
//! completion service, then a deterministic local generator. Nothing here
//! returns an error; every failure degrades to the local generator.

use crate::completion::TextCompletion;
use crate::error::CompletionError;
use crate::tables::LookupTables;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const MAX_VARIETIES: usize = 10;

/// Where a set of variety options came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarietySource {
    Table,
    Service,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarietyOptions {
    /// Product name the options were produced for (the table key on a table hit)
    pub product: String,
    pub source: VarietySource,
    pub options: Vec<String>,
}

#[derive(Clone)]
pub struct VarietyGateway {
    tables: Arc<LookupTables>,
    completion: Option<Arc<dyn TextCompletion>>,
    timeout: Duration,
    max_options: usize,
}

impl VarietyGateway {
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self {
            tables,
            completion: None,
            timeout: Duration::from_millis(4000),
            max_options: MAX_VARIETIES,
        }
    }

    pub fn with_completion(mut self, completion: Arc<dyn TextCompletion>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_options(mut self, max: usize) -> Self {
        self.max_options = max.clamp(1, MAX_VARIETIES);
        self
    }

    /// Ordered variety names for `product`. Never empty.
    pub async fn suggest(&self, product: &str) -> VarietyOptions {
        let product = product.trim();

        if let Some(entry) = self.tables.find_variety(product) {
            debug!(product = %entry.product, "variety table hit");
            return VarietyOptions {
                product: entry.product.clone(),
                source: VarietySource::Table,
                options: entry.varieties.iter().take(self.max_options).cloned().collect(),
            };
        }

        match self.request(product).await {
            Ok(options) if !options.is_empty() => {
                debug!(product, count = options.len(), "varieties from completion service");
                return VarietyOptions {
                    product: product.to_string(),
                    source: VarietySource::Service,
                    options,
                };
            }
            Ok(_) => warn!(product, "completion service returned no usable lines"),
            Err(CompletionError::NotConfigured) => {
                debug!(product, "no completion service configured")
            }
            Err(e) => warn!(product, "variety request failed: {}", e),
        }

        let mut options = fallback_varieties(product);
        options.truncate(self.max_options);
        VarietyOptions {
            product: product.to_string(),
            source: VarietySource::Fallback,
            options,
        }
    }

    async fn request(&self, product: &str) -> Result<Vec<String>, CompletionError> {
        let completion = self
            .completion
            .as_ref()
            .ok_or(CompletionError::NotConfigured)?;
        let prompt = variety_prompt(product);
        let text = tokio::time::timeout(self.timeout, completion.complete(&prompt))
            .await
            .map_err(|_| CompletionError::Timeout(self.timeout.as_millis() as u64))??;
        Ok(parse_variety_lines(&text, self.max_options))
    }
}

pub fn variety_prompt(product: &str) -> String {
    format!(
        "List 8 to 10 popular varieties, brands, or types of \"{product}\" that people commonly buy. \
         Cover different brands, flavors, sizes, or types. \
         Return only the names, one per line, without numbers or bullet points.\n\
         Examples:\n\
         - For \"toothpaste\": Colgate, Crest, Sensodyne, Oral-B\n\
         - For \"shoes\": Nike, Adidas, Converse, Vans\n\
         - For \"lentils\": Red Lentils, Green Lentils, Black Lentils"
    )
}

/// One option per non-empty line, with stray bullets or numbering removed.
pub fn parse_variety_lines(text: &str, max: usize) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line.trim_start_matches(&['-', '*', '•'][..]).trim_start();
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }
    line
}

/// Deterministic placeholder varieties used when the service is unavailable.
pub fn fallback_varieties(item: &str) -> Vec<String> {
    let lower = item.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    let themed: Option<&[&str]> = if has(&["shirt", "clothes", "clothing"]) {
        Some(&[
            "Nike Shirt",
            "Adidas Shirt",
            "Puma Shirt",
            "Under Armour Shirt",
            "Levi's Shirt",
            "Tommy Hilfiger Shirt",
            "Calvin Klein Shirt",
            "Ralph Lauren Shirt",
        ])
    } else if has(&["shoes", "footwear"]) {
        Some(&[
            "Nike Shoes",
            "Adidas Shoes",
            "Converse Shoes",
            "Vans Shoes",
            "Puma Shoes",
            "Reebok Shoes",
            "New Balance Shoes",
            "Skechers Shoes",
        ])
    } else if has(&["toothpaste", "dental"]) {
        Some(&[
            "Colgate Toothpaste",
            "Crest Toothpaste",
            "Sensodyne Toothpaste",
            "Oral-B Toothpaste",
            "Aquafresh Toothpaste",
            "Arm & Hammer Toothpaste",
            "Tom's Toothpaste",
            "Close-Up Toothpaste",
        ])
    } else if has(&["meat", "beef", "pork"]) {
        Some(&["Beef", "Pork", "Lamb", "Chicken", "Turkey", "Duck", "Goat", "Bison"])
    } else if has(&["lentil", "dal"]) {
        Some(&[
            "Red Lentils",
            "Green Lentils",
            "Black Lentils",
            "Yellow Lentils",
            "Brown Lentils",
            "Split Peas",
            "Chickpeas",
            "Kidney Beans",
        ])
    } else {
        None
    };

    if let Some(names) = themed {
        return names.iter().map(|n| n.to_string()).collect();
    }

    let item = match item.trim() {
        "" => "Item",
        trimmed => trimmed,
    };
    [
        "Brand A",
        "Brand B",
        "Premium",
        "Organic",
        "Regular",
        "Large Size",
        "Small Size",
        "Standard",
    ]
    .iter()
    .map(|variant| format!("{item} - {variant}"))
    .collect()
}
