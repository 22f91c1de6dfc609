use serde::{Deserialize, Serialize};

use crate::color::ColorSpec;
use crate::elements::{ArchivedItem, Category, Item, NewItem, Priority};

/// `items` record as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub category: String,
    #[serde(rename = "assignedTo", default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl ItemRecord {
    pub fn into_item(self, id: &str) -> Item {
        Item {
            id: id.to_string(),
            name: self.name,
            category: self.category,
            assigned_to: self.assigned_to,
            priority: self.priority,
        }
    }
}

impl From<&NewItem> for ItemRecord {
    fn from(item: &NewItem) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            assigned_to: None,
            priority: item.priority,
        }
    }
}

/// `categories` record as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
    /// Literal color or `var(--name)` reference
    #[serde(rename = "colorVar")]
    pub color_var: String,
}

impl CategoryRecord {
    pub fn into_category(self, id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: self.name,
            color: ColorSpec::from_css(&self.color_var),
        }
    }
}

/// `archive` record as stored remotely. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub name: String,
    pub category: String,
    pub priority: Priority,
    /// ISO-8601
    pub timestamp: String,
}

impl ArchiveRecord {
    pub fn into_archived(self, id: &str) -> ArchivedItem {
        ArchivedItem {
            id: id.to_string(),
            name: self.name,
            category: self.category,
            priority: self.priority,
            timestamp: self.timestamp,
        }
    }
}
