use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Urgency of an item. Ordering follows the rank used by the shopping list: `Urgent` first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    #[default]
    Normal,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Urgent, Priority::Normal, Priority::Low];

    /// Sort rank, lower comes first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::Normal => "Normal",
            Priority::Low => "Low",
        }
    }
}

/// An item on the shared list as mirrored from the `items` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Key generated by the store
    pub id: String,
    pub name: String,
    /// Name of the category the item belongs to. Not guaranteed to exist.
    pub category: String,
    pub assigned_to: Option<String>,
    pub priority: Priority,
}

impl Item {
    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }
}

/// An item that was submitted locally but has not been written to the store yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub priority: Priority,
}

impl NewItem {
    /// Validates user input. Nothing is sent anywhere when this fails.
    pub fn new(
        name: &str,
        category: Option<&str>,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyItemName);
        }
        let category = match category.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => return Err(ValidationError::NoCategorySelected),
        };

        Ok(Self {
            name: name.to_string(),
            category: category.to_string(),
            priority,
        })
    }
}
