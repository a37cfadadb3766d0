//! Command and shopping item definitions

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Classified purpose of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Append a new item to the list
    Add,
    /// Remove an existing item by name
    Remove,
    /// Look for items, optionally under a price bound
    Search,
    /// Change an existing item
    Update,
    /// Offer a set of varieties to choose from
    Suggest,
    /// Pick one of the previously offered varieties
    Confirm,
    /// Nothing usable could be extracted
    Error,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Add => "add",
            Intent::Remove => "remove",
            Intent::Search => "search",
            Intent::Update => "update",
            Intent::Suggest => "suggest",
            Intent::Confirm => "confirm",
            Intent::Error => "error",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result of interpreting one utterance.
///
/// Fields that do not apply to the resolved intent stay `None`, so a caller
/// can tell "not said" apart from an explicit zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    #[serde(rename = "type")]
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_item: Option<String>,
    pub message: String,
}

impl Command {
    pub fn new(intent: Intent, message: impl Into<String>) -> Self {
        Self {
            intent,
            item: None,
            quantity: None,
            unit: None,
            category: None,
            price: None,
            brand: None,
            notes: None,
            suggestions: None,
            selected_item: None,
            message: message.into(),
        }
    }

    /// Create an error command carrying a user-facing hint
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Intent::Error, message)
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price(mut self, price: Option<f64>) -> Self {
        self.price = price;
        self
    }

    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.brand = brand;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    pub fn with_selected_item(mut self, selected: impl Into<String>) -> Self {
        self.selected_item = Some(selected.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.intent == Intent::Error
    }
}

/// An entry on the caller's shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_completed: bool,
    pub added_at: OffsetDateTime,
}

impl ShoppingItem {
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            category: category.into(),
            price: None,
            brand: None,
            notes: None,
            is_completed: false,
            added_at: OffsetDateTime::now_utc(),
        }
    }

    /// Build the item an `add` or resolved `confirm` command proposes.
    pub fn from_command(command: &Command) -> Option<Self> {
        let name = match command.intent {
            Intent::Add => command.item.as_deref()?,
            Intent::Confirm => command
                .selected_item
                .as_deref()
                .or(command.item.as_deref())?,
            _ => return None,
        };
        let mut item = Self::new(
            name,
            command.quantity.unwrap_or(1),
            command.unit.as_deref().unwrap_or("piece"),
            command.category.as_deref().unwrap_or("general"),
        );
        item.price = command.price;
        item.brand = command.brand.clone();
        item.notes = command.notes.clone();
        Some(item)
    }

    /// Case-insensitive substring match used for removal and search.
    pub fn matches_name(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_json_omits_unset_fields() {
        let cmd = Command::new(Intent::Remove, "Removed milk from your shopping list.")
            .with_item("milk");
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "remove",
                "item": "milk",
                "message": "Removed milk from your shopping list."
            })
        );
    }

    #[test]
    fn test_command_json_camel_case() {
        let cmd = Command::new(Intent::Confirm, "ok").with_selected_item("Gala Apples");
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["selectedItem"], "Gala Apples");
        assert_eq!(json["type"], "confirm");
    }

    #[test]
    fn test_item_from_add_command() {
        let cmd = Command::new(Intent::Add, "added")
            .with_item("apples")
            .with_quantity(5)
            .with_unit("piece")
            .with_category("produce")
            .with_price(Some(3.0));
        let item = ShoppingItem::from_command(&cmd).unwrap();
        assert_eq!(item.name, "apples");
        assert_eq!(item.quantity, 5);
        assert_eq!(item.category, "produce");
        assert_eq!(item.price, Some(3.0));
        assert!(!item.is_completed);
    }

    #[test]
    fn test_item_from_non_add_command() {
        let cmd = Command::new(Intent::Remove, "removed").with_item("milk");
        assert!(ShoppingItem::from_command(&cmd).is_none());
        let cmd = Command::new(Intent::Confirm, "cancelled");
        assert!(ShoppingItem::from_command(&cmd).is_none());
    }

    #[test]
    fn test_matches_name() {
        let item = ShoppingItem::new("Organic Whole Milk", 1, "gallon", "dairy");
        assert!(item.matches_name("milk"));
        assert!(item.matches_name(" WHOLE "));
        assert!(!item.matches_name("bread"));
    }
}
