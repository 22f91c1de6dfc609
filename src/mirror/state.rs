use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use crossbeam::channel::{unbounded, Receiver};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::records::{ArchiveRecord, CategoryRecord, ItemRecord};
use super::store::{Collection, RemoteStore, Snapshot};
use crate::elements::{new_category_color, ArchivedItem, Category, Item, NewItem, Priority};
use crate::{StoreError, ValidationError};

/// Which mirrored collections were replaced by a [`StateMirror::poll`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changed {
    pub items: bool,
    pub categories: bool,
    pub archive: bool,
}

impl Changed {
    pub fn any(self) -> bool {
        self.items || self.categories || self.archive
    }
}

/// Partial update of an item. `None` fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the assignee
    pub assigned_to: Option<Option<String>>,
}

impl ItemPatch {
    fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(name) = self.name {
            fields.insert("name".to_string(), json!(name));
        }
        if let Some(category) = self.category {
            fields.insert("category".to_string(), json!(category));
        }
        if let Some(priority) = self.priority {
            fields.insert("priority".to_string(), json!(priority));
        }
        if let Some(assigned_to) = self.assigned_to {
            fields.insert("assignedTo".to_string(), json!(assigned_to));
        }
        fields
    }
}

/// Default categories written into an empty store.
const SEED_CATEGORIES: [(&str, &str); 3] = [
    ("Küche", "var(--cat-kueche)"),
    ("Bad", "var(--cat-bad)"),
    ("Allgemein", "var(--cat-allgemein)"),
];

/// Local copy of the three remote collections.
///
/// Store callbacks only push snapshots into a channel. The mirror is the single writer of the
/// local collections: [`Self::poll`] drains the channel on the owning thread and replaces
/// whole collections, so readers holding an `Arc` keep a consistent view.
///
/// Mutations are fire-and-forget. Failures are logged and the local state stays as it was
/// until the next snapshot arrives.
pub struct StateMirror {
    store: Arc<dyn RemoteStore>,
    rx: Receiver<(Collection, Snapshot)>,

    items: Arc<Vec<Item>>,
    categories: Arc<Vec<Category>>,
    archive: Arc<Vec<ArchivedItem>>,

    loaded: HashSet<Collection>,
    seed_pending: HashSet<Collection>,
}

impl StateMirror {
    /// Subscribes to all collections of `store`.
    pub fn connect(store: Arc<dyn RemoteStore>) -> Result<Self, StoreError> {
        let (tx, rx) = unbounded();
        for collection in Collection::ALL {
            let tx = tx.clone();
            store.subscribe(
                collection,
                Box::new(move |c: Collection, snapshot: Snapshot| {
                    // the mirror is gone, nothing to update
                    let _ = tx.send((c, snapshot));
                }),
            )?;
        }
        info!("state mirror subscribed to {} collections", Collection::ALL.len());

        Ok(Self {
            store,
            rx,
            items: Arc::new(Vec::new()),
            categories: Arc::new(Vec::new()),
            archive: Arc::new(Vec::new()),
            loaded: HashSet::new(),
            seed_pending: HashSet::new(),
        })
    }

    pub fn items(&self) -> Arc<Vec<Item>> {
        Arc::clone(&self.items)
    }

    pub fn categories(&self) -> Arc<Vec<Category>> {
        Arc::clone(&self.categories)
    }

    pub fn archive(&self) -> Arc<Vec<ArchivedItem>> {
        Arc::clone(&self.archive)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Applies every snapshot received since the last call.
    pub fn poll(&mut self) -> Changed {
        let mut changed = Changed::default();
        while let Ok((collection, snapshot)) = self.rx.try_recv() {
            let first = self.loaded.insert(collection);
            let empty = snapshot.is_empty();
            match collection {
                Collection::Items => {
                    self.items = Arc::new(parse(collection, snapshot, ItemRecord::into_item));
                    changed.items = true;
                }
                Collection::Categories => {
                    self.categories =
                        Arc::new(parse(collection, snapshot, CategoryRecord::into_category));
                    changed.categories = true;
                }
                Collection::Archive => {
                    self.archive = Arc::new(parse(collection, snapshot, ArchiveRecord::into_archived));
                    changed.archive = true;
                }
            }
            if first && empty && self.seed_pending.remove(&collection) {
                self.seed(collection);
            }
            if first {
                self.seed_pending.remove(&collection);
            }
        }
        changed
    }

    /// Requests the default data for collections that turn out empty on their first snapshot.
    /// Collections already loaded are left alone, so seeding happens at most once.
    pub fn seed_initial_data(&mut self) {
        for collection in [Collection::Categories, Collection::Items] {
            if !self.loaded.contains(&collection) {
                self.seed_pending.insert(collection);
            }
        }
    }

    fn seed(&self, collection: Collection) {
        match collection {
            Collection::Categories => {
                info!("categories are empty, seeding defaults");
                let mut updates = BTreeMap::new();
                for (name, color_var) in SEED_CATEGORIES {
                    let key = match self.store.generate_key(collection) {
                        Ok(key) => key,
                        Err(e) => {
                            warn!("seeding categories failed: {e}");
                            return;
                        }
                    };
                    let record = CategoryRecord {
                        name: name.to_string(),
                        color_var: color_var.to_string(),
                    };
                    match serde_json::to_value(record) {
                        Ok(v) => {
                            updates.insert(collection.path(&key), Some(v));
                        }
                        Err(e) => {
                            warn!("seeding categories failed: {e}");
                            return;
                        }
                    }
                }
                report("seed categories", self.store.multi_path_update(updates));
            }
            Collection::Items => {
                info!("items are empty, seeding defaults");
                for (name, category, priority) in [
                    ("Milch", "Küche", Priority::Normal),
                    ("Seife", "Bad", Priority::Urgent),
                ] {
                    if let Ok(item) = NewItem::new(name, Some(category), priority) {
                        self.add_item(&item);
                    }
                }
            }
            Collection::Archive => {}
        }
    }

    /// Creates a category with a generated color. Rejects empty and duplicate names without
    /// touching the store.
    pub fn add_category(&self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        if self.category(name).is_some() {
            return Err(ValidationError::DuplicateCategory {
                name: name.to_string(),
            });
        }

        let record = CategoryRecord {
            name: name.to_string(),
            color_var: new_category_color(self.categories.len()).to_css(),
        };
        self.create(Collection::Categories, &record, "add category");
        Ok(())
    }

    pub fn add_item(&self, item: &NewItem) {
        self.create(Collection::Items, &ItemRecord::from(item), "add item");
    }

    pub fn update_item(&self, id: &str, patch: ItemPatch) {
        let fields = patch.into_fields();
        if fields.is_empty() {
            return;
        }
        report(
            "update item",
            self.store
                .update_fields(&Collection::Items.path(id), fields),
        );
    }

    /// Assigns `user`, or clears the assignee if `user` is already assigned.
    pub fn assign(&self, id: &str, user: &str) {
        let Some(item) = self.item(id) else {
            warn!("assign: unknown item {id}");
            return;
        };
        let assigned_to = if item.assigned_to.as_deref() == Some(user) {
            None
        } else {
            Some(user.to_string())
        };
        self.update_item(
            id,
            ItemPatch {
                assigned_to: Some(assigned_to),
                ..ItemPatch::default()
            },
        );
    }

    pub fn delete_item(&self, id: &str) {
        report(
            "delete item",
            self.store.delete_by_path(&Collection::Items.path(id)),
        );
    }

    /// Appends the item to the archive, then removes it. The item stays if archiving failed.
    pub fn archive_item(&self, id: &str) {
        let Some(item) = self.item(id) else {
            warn!("archive: unknown item {id}");
            return;
        };
        let record = ArchiveRecord {
            name: item.name.clone(),
            category: item.category.clone(),
            priority: item.priority,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        if self.create(Collection::Archive, &record, "archive item") {
            self.delete_item(id);
        }
    }

    /// Deletes the category and every item referencing it in one write.
    pub fn delete_category_and_items(&self, name: &str) {
        let Some(category) = self.category(name) else {
            warn!("delete category: unknown category {name}");
            return;
        };

        let mut updates = BTreeMap::new();
        updates.insert(Collection::Categories.path(&category.id), None);
        for item in self.items.iter().filter(|i| i.category == name) {
            updates.insert(Collection::Items.path(&item.id), None);
        }
        info!(
            "deleting category {name} with {} items",
            updates.len() - 1
        );
        report("delete category", self.store.multi_path_update(updates));
    }

    fn create(&self, collection: Collection, record: &impl serde::Serialize, what: &str) -> bool {
        let value = match serde_json::to_value(record) {
            Ok(v) => v,
            Err(e) => {
                warn!("{what} failed: {e}");
                return false;
            }
        };
        report(what, self.store.create_with_generated_key(collection, value)).is_some()
    }
}

fn report<T>(what: &str, res: Result<T, StoreError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("{what} failed: {e}");
            None
        }
    }
}

fn parse<R: DeserializeOwned, T>(
    collection: Collection,
    snapshot: Snapshot,
    convert: impl Fn(R, &str) -> T,
) -> Vec<T> {
    snapshot
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<R>(value) {
            Ok(record) => Some(convert(record, &key)),
            Err(e) => {
                warn!("skipping malformed {} record {key}: {e}", collection.name());
                None
            }
        })
        .collect()
}
