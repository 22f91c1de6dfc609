use crate::elements::{ArchivedItem, Item};

/// Items assigned to `user`, most urgent first. Items of equal priority keep their order.
pub fn my_items<'a>(items: &'a [Item], user: &str) -> Vec<&'a Item> {
    let mut mine: Vec<&Item> = items
        .iter()
        .filter(|i| i.assigned_to.as_deref() == Some(user))
        .collect();
    mine.sort_by_key(|i| i.priority.rank());
    mine
}

/// Archive entries, most recently archived first.
pub fn archive_newest_first(archive: &[ArchivedItem]) -> Vec<&ArchivedItem> {
    archive.iter().rev().collect()
}
