use serde::{Deserialize, Serialize};

use crate::Priority;

/// Snapshot of an item taken when it was checked off. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub priority: Priority,
    /// ISO-8601 creation time
    pub timestamp: String,
}
