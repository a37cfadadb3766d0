//! The session's shopping list and the pending variety choice.

use shopping_intent::{Command, Intent, PendingSelection, ShoppingItem};
use std::fmt::Write;
use tracing::debug;

/// What applying a command did to the list
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Added(ShoppingItem),
    Removed(ShoppingItem),
    Updated(ShoppingItem),
    Found(Vec<ShoppingItem>),
    NotFound(String),
    AwaitingChoice(PendingSelection),
    Cancelled,
    Ignored,
}

#[derive(Debug, Default)]
pub struct ShoppingList {
    items: Vec<ShoppingItem>,
    pending: Option<PendingSelection>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    /// Selection to pass back to the interpreter while a choice is open
    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }

    pub fn apply(&mut self, command: &Command) -> Outcome {
        debug!(intent = %command.intent, "applying command");
        match command.intent {
            // A failed utterance leaves an open choice open.
            Intent::Error => Outcome::Ignored,
            Intent::Suggest => match PendingSelection::from_command(command) {
                Some(pending) => {
                    self.pending = Some(pending.clone());
                    Outcome::AwaitingChoice(pending)
                }
                None => Outcome::Ignored,
            },
            Intent::Confirm => {
                self.pending = None;
                match ShoppingItem::from_command(command) {
                    Some(item) => self.push(item),
                    None => Outcome::Cancelled,
                }
            }
            Intent::Add => {
                self.pending = None;
                match ShoppingItem::from_command(command) {
                    Some(item) => self.push(item),
                    None => Outcome::Ignored,
                }
            }
            Intent::Remove => {
                self.pending = None;
                let name = command.item.as_deref().unwrap_or_default();
                match self.position(name) {
                    Some(i) => Outcome::Removed(self.items.remove(i)),
                    None => Outcome::NotFound(name.to_string()),
                }
            }
            Intent::Update => {
                self.pending = None;
                let name = command.item.as_deref().unwrap_or_default();
                let Some(i) = self.position(name) else {
                    return Outcome::NotFound(name.to_string());
                };
                let item = &mut self.items[i];
                if let Some(quantity) = command.quantity {
                    item.quantity = quantity;
                }
                if let Some(unit) = &command.unit {
                    item.unit = unit.clone();
                }
                Outcome::Updated(item.clone())
            }
            Intent::Search => {
                self.pending = None;
                let name = command.item.as_deref().unwrap_or_default();
                let hits = self
                    .items
                    .iter()
                    .filter(|item| item.matches_name(name))
                    .filter(|item| match (command.price, item.price) {
                        (Some(bound), Some(price)) => price <= bound,
                        _ => true,
                    })
                    .cloned()
                    .collect();
                Outcome::Found(hits)
            }
        }
    }

    /// Flip the completed flag; false if no item has that id
    pub fn toggle_completed(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.is_completed = !item.is_completed;
                true
            }
            None => false,
        }
    }

    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return "Your shopping list is empty.".to_string();
        }
        let mut out = String::new();
        for (i, item) in self.items.iter().enumerate() {
            let mark = if item.is_completed { "x" } else { " " };
            let _ = write!(
                out,
                "{:>2}. [{}] {} {} {} ({})",
                i + 1,
                mark,
                item.quantity,
                item.unit,
                item.name,
                item.category
            );
            if let Some(brand) = &item.brand {
                let _ = write!(out, " by {brand}");
            }
            if let Some(price) = item.price {
                let _ = write!(out, " ${price:.2}");
            }
            out.push('\n');
        }
        out
    }

    fn push(&mut self, item: ShoppingItem) -> Outcome {
        self.items.push(item.clone());
        Outcome::Added(item)
    }

    fn position(&self, name: &str) -> Option<usize> {
        if name.trim().is_empty() {
            return None;
        }
        self.items.iter().position(|item| item.matches_name(name))
    }
}
