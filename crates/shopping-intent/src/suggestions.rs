//! List-aware shopping suggestions: seasonal, trending, related and organic picks.

use crate::command::ShoppingItem;
use std::collections::HashSet;
use time::{Date, Month};

pub const MAX_SUGGESTIONS: usize = 8;
pub const MAX_MEAL_SUGGESTIONS: usize = 5;

const TRENDING: [&str; 15] = [
    "organic avocados",
    "plant-based milk",
    "quinoa",
    "chia seeds",
    "kombucha",
    "kale chips",
    "coconut water",
    "almond butter",
    "spirulina",
    "matcha powder",
    "organic honey",
    "local farm eggs",
    "artisan bread",
    "cold-pressed juices",
    "superfood smoothies",
];

const APPLE_PAIRINGS: &[&str] = &[
    "organic honey",
    "local honey",
    "cinnamon",
    "nuts",
    "yogurt",
    "cheese",
    "organic bread",
    "artisan bread",
    "organic milk",
    "farm fresh eggs",
    "cold-pressed olive oil",
    "maple syrup",
];

const BOUGHT_TOGETHER: Pairings = &[
    ("milk", &["bread", "cereal", "eggs", "honey", "cookies", "chocolate"]),
    ("bread", &["milk", "butter", "jam", "honey", "olive oil", "garlic"]),
    ("eggs", &["milk", "bacon", "cheese", "bread", "vegetables", "herbs"]),
    ("bananas", &["yogurt", "cereal", "peanut butter", "honey", "nuts", "chocolate"]),
    ("chicken", &["rice", "vegetables", "sauce", "herbs", "olive oil", "garlic"]),
    ("pasta", &["tomato sauce", "cheese", "vegetables", "olive oil", "garlic", "herbs"]),
    ("coffee", &["cream", "sugar", "filters", "cookies", "pastries", "milk"]),
    ("toothpaste", &["toothbrush", "floss", "mouthwash", "soap", "shampoo", "deodorant"]),
    ("apples", APPLE_PAIRINGS),
    ("apple", APPLE_PAIRINGS),
    (
        "honey",
        &["organic tea", "organic bread", "organic yogurt", "organic nuts", "artisan bread"],
    ),
];

const SUBSTITUTES: Pairings = &[
    ("milk", &["almond milk", "soy milk", "oat milk", "coconut milk"]),
    ("butter", &["olive oil", "coconut oil", "avocado", "greek yogurt"]),
    ("eggs", &["flax seeds", "chia seeds", "banana", "applesauce"]),
    ("sugar", &["honey", "maple syrup", "stevia", "coconut sugar"]),
    ("flour", &["almond flour", "coconut flour", "oat flour", "quinoa flour"]),
    ("meat", &["tofu", "tempeh", "seitan", "legumes", "mushrooms"]),
];

const MEALS: Pairings = &[
    ("pasta dinner", &["pasta", "tomato sauce", "cheese", "garlic", "olive oil"]),
    ("stir fry", &["vegetables", "soy sauce", "ginger", "garlic", "oil"]),
    ("salad", &["lettuce", "tomatoes", "cucumber", "olive oil", "vinegar"]),
    ("soup", &["vegetables", "broth", "herbs", "onions", "carrots"]),
    ("breakfast", &["eggs", "bread", "milk", "butter", "fruits"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn from_month(month: Month) -> Self {
        match month {
            Month::March | Month::April | Month::May => Season::Spring,
            Month::June | Month::July | Month::August => Season::Summer,
            Month::September | Month::October | Month::November => Season::Fall,
            Month::December | Month::January | Month::February => Season::Winter,
        }
    }

    pub fn produce(&self) -> &'static [&'static str] {
        match self {
            Season::Spring => &["asparagus", "peas", "strawberries", "rhubarb", "artichokes"],
            Season::Summer => &[
                "tomatoes",
                "corn",
                "watermelon",
                "peaches",
                "zucchini",
                "bell peppers",
            ],
            Season::Fall => &[
                "pumpkin",
                "squash",
                "apples",
                "pears",
                "mushrooms",
                "sweet potatoes",
            ],
            Season::Winter => &[
                "citrus fruits",
                "root vegetables",
                "winter squash",
                "cabbage",
                "kale",
            ],
        }
    }
}

/// Suggests items to add based on what is already on the list
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    limit: usize,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self {
            limit: MAX_SUGGESTIONS,
        }
    }
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Seasonal, trending, bought-together, substitute and organic picks,
    /// in that order, without duplicates.
    pub fn generate(&self, items: &[ShoppingItem], today: Date) -> Vec<String> {
        let mut picks: Vec<&str> = Vec::new();
        picks.extend(Season::from_month(today.month()).produce().iter().take(3));
        picks.extend(TRENDING.iter().take(3));
        picks.extend(related(items, BOUGHT_TOGETHER).into_iter().take(3));
        picks.extend(related(items, SUBSTITUTES).into_iter().take(3));
        picks.extend(organic_picks(items).into_iter().take(2));

        let mut seen = HashSet::new();
        picks
            .into_iter()
            .filter(|p| seen.insert(*p))
            .take(self.limit)
            .map(str::to_string)
            .collect()
    }

    /// Missing ingredients for the named meals
    pub fn meal_suggestions<S: AsRef<str>>(
        &self,
        items: &[ShoppingItem],
        meals: &[S],
    ) -> Vec<String> {
        meals
            .iter()
            .filter_map(|meal| lookup(MEALS, &meal.as_ref().trim().to_lowercase()))
            .flat_map(|ingredients| ingredients.iter().copied())
            .filter(|ingredient| !on_list(items, ingredient))
            .take(MAX_MEAL_SUGGESTIONS)
            .map(str::to_string)
            .collect()
    }
}

type Pairings = &'static [(&'static str, &'static [&'static str])];

fn lookup(table: Pairings, key: &str) -> Option<&'static [&'static str]> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn on_list(items: &[ShoppingItem], name: &str) -> bool {
    items.iter().any(|item| item.matches_name(name))
}

fn related(items: &[ShoppingItem], table: Pairings) -> Vec<&'static str> {
    items
        .iter()
        .filter_map(|item| lookup(table, &item.name.to_lowercase()))
        .flat_map(|names| names.iter().copied())
        .filter(|name| !on_list(items, name))
        .collect()
}

fn organic_picks(items: &[ShoppingItem]) -> Vec<&'static str> {
    let mentions = |word: &str| items.iter().any(|item| item.matches_name(word));
    let has_organic = items.iter().any(|item| {
        item.matches_name("organic")
            || item
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains("organic"))
    });

    let mut picks: Vec<&'static str> = if has_organic {
        vec![
            "organic honey",
            "farm fresh eggs",
            "artisan bread",
            "cold-pressed olive oil",
            "natural maple syrup",
            "local farm produce",
        ]
    } else {
        vec![
            "organic milk",
            "organic eggs",
            "organic bread",
            "organic honey",
            "local farm produce",
        ]
    };
    if mentions("apple") {
        picks.extend(["organic honey", "local honey", "organic cinnamon"]);
    }
    if mentions("milk") {
        picks.extend(["organic bread", "organic eggs", "organic yogurt"]);
    }
    if mentions("bread") {
        picks.extend(["organic milk", "local honey", "organic butter"]);
    }
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn item(name: &str) -> ShoppingItem {
        ShoppingItem::new(name, 1, "piece", "general")
    }

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(Month::March), Season::Spring);
        assert_eq!(Season::from_month(Month::August), Season::Summer);
        assert_eq!(Season::from_month(Month::November), Season::Fall);
        assert_eq!(Season::from_month(Month::February), Season::Winter);
    }

    #[test]
    fn test_empty_list_gets_seasonal_and_trending() {
        let picks = SuggestionEngine::new().generate(&[], date!(2024 - 04 - 10));
        assert_eq!(
            picks,
            vec![
                "asparagus",
                "peas",
                "strawberries",
                "organic avocados",
                "plant-based milk",
                "quinoa",
                "organic milk",
                "organic eggs",
            ]
        );
    }

    #[test]
    fn test_related_items_skip_what_is_listed() {
        let list = vec![item("milk"), item("bread")];
        let picks = SuggestionEngine::new()
            .with_limit(20)
            .generate(&list, date!(2024 - 07 - 01));
        // "bread" is on the list already, so the first pairing is cereal
        assert!(picks.contains(&"cereal".to_string()));
        assert!(!picks.contains(&"bread".to_string()));
        assert!(picks.contains(&"almond milk".to_string()));
        assert_eq!(picks[0], "tomatoes");
    }

    #[test]
    fn test_no_duplicates_and_capped() {
        let list = vec![item("apples"), item("organic milk"), item("eggs")];
        let picks = SuggestionEngine::new().generate(&list, date!(2024 - 10 - 01));
        assert!(picks.len() <= MAX_SUGGESTIONS);
        let unique: HashSet<_> = picks.iter().collect();
        assert_eq!(unique.len(), picks.len());
    }

    #[test]
    fn test_meal_suggestions() {
        let engine = SuggestionEngine::new();
        let list = vec![item("Spaghetti Pasta"), item("garlic")];
        let picks = engine.meal_suggestions(&list, &["Pasta Dinner", "salad"]);
        assert_eq!(
            picks,
            vec!["tomato sauce", "cheese", "olive oil", "lettuce", "tomatoes"]
        );
        assert!(engine.meal_suggestions(&list, &["brunch"]).is_empty());
    }
}
