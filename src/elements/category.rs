use serde::{Deserialize, Serialize};

use crate::ColorSpec;

/// A category ("nebula") as mirrored from the `categories` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// Unique display name, referenced by [`crate::Item::category`]
    pub name: String,
    pub color: ColorSpec,
}

/// Color given to a category created by a user, derived from how many categories already exist.
pub fn new_category_color(existing: usize) -> ColorSpec {
    let hue = (existing * 50 + 270) % 360;
    ColorSpec::Direct(format!("hsla({hue}, 70%, 55%, 0.8)"))
}
