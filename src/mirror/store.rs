use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::StoreError;

/// The three remote collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    Items,
    Categories,
    Archive,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Items, Collection::Categories, Collection::Archive];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Items => "items",
            Collection::Categories => "categories",
            Collection::Archive => "archive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Path of a record in this collection.
    pub fn path(self, key: &str) -> String {
        format!("{}/{key}", self.name())
    }
}

/// Splits `collection[/key]`, leading slashes allowed.
pub fn parse_path(path: &str) -> Result<(Collection, Option<&str>), StoreError> {
    let trimmed = path.trim_matches('/');
    let (head, key) = match trimmed.split_once('/') {
        Some((head, key)) => (head, Some(key)),
        None => (trimmed, None),
    };
    let collection = Collection::from_name(head).ok_or_else(|| StoreError::UnknownCollection {
        path: path.to_string(),
    })?;
    match key {
        Some(k) if k.is_empty() || k.contains('/') => Err(StoreError::NotARecord {
            path: path.to_string(),
        }),
        key => Ok((collection, key)),
    }
}

/// Full state of a collection, keyed by record key. Key order is creation order.
pub type Snapshot = BTreeMap<String, Value>;

/// Callback invoked with the full collection state, possibly from another thread.
pub type OnChange = Box<dyn Fn(Collection, Snapshot) + Send + Sync>;

/// Collaborator holding the shared household data.
///
/// `subscribe` fires immediately with the current snapshot and again after every change.
/// Mutations report errors to the caller, success is observed through subscriptions.
pub trait RemoteStore: Send + Sync {
    fn subscribe(&self, collection: Collection, on_change: OnChange) -> Result<(), StoreError>;

    /// Reserves a fresh key without writing anything.
    fn generate_key(&self, collection: Collection) -> Result<String, StoreError>;

    fn create_with_generated_key(
        &self,
        collection: Collection,
        record: Value,
    ) -> Result<String, StoreError>;

    /// Merges `fields` into the record at `path`.
    fn update_fields(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError>;

    fn delete_by_path(&self, path: &str) -> Result<(), StoreError>;

    /// Applies all writes at once. `None` deletes. A path without key replaces the whole
    /// collection with the given object.
    fn multi_path_update(&self, updates: BTreeMap<String, Option<Value>>) -> Result<(), StoreError>;
}

#[derive(Default)]
struct Inner {
    data: HashMap<Collection, Snapshot>,
    subscribers: Vec<(Collection, Arc<OnChange>)>,
    counter: u64,
    offline: bool,
}

impl Inner {
    fn next_key(&mut self) -> String {
        self.counter += 1;
        format!("k{:010}", self.counter)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Offline);
        }
        Ok(())
    }

    fn collection_mut(&mut self, c: Collection) -> &mut Snapshot {
        self.data.entry(c).or_default()
    }

    fn notifications(&self, changed: &[Collection]) -> Vec<(Arc<OnChange>, Collection, Snapshot)> {
        self.subscribers
            .iter()
            .filter(|(c, _)| changed.contains(c))
            .map(|(c, cb)| {
                let snapshot = self.data.get(c).cloned().unwrap_or_default();
                (Arc::clone(cb), *c, snapshot)
            })
            .collect()
    }
}

/// In-process [`RemoteStore`]. Callbacks run on the writing thread after the lock is released.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates lost connectivity: every mutation fails while offline.
    pub fn set_offline(&self, offline: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.offline = offline;
        info!("memory store offline: {offline}");
        Ok(())
    }

    /// Current content of a collection.
    pub fn snapshot(&self, collection: Collection) -> Result<Snapshot, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.data.get(&collection).cloned().unwrap_or_default())
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Inner) -> Result<(T, Vec<Collection>), StoreError>,
    ) -> Result<T, StoreError> {
        let pending = {
            let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
            inner.check_online()?;
            let (out, changed) = f(&mut inner)?;
            (out, inner.notifications(&changed))
        };
        let (out, notifications) = pending;
        for (cb, collection, snapshot) in notifications {
            (cb)(collection, snapshot);
        }
        Ok(out)
    }
}

impl RemoteStore for MemoryStore {
    fn subscribe(&self, collection: Collection, on_change: OnChange) -> Result<(), StoreError> {
        let cb = Arc::new(on_change);
        let snapshot = {
            let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
            inner.subscribers.push((collection, Arc::clone(&cb)));
            inner.data.get(&collection).cloned().unwrap_or_default()
        };
        debug!("subscribed to {}", collection.name());
        (cb)(collection, snapshot);
        Ok(())
    }

    fn generate_key(&self, _collection: Collection) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.next_key())
    }

    fn create_with_generated_key(
        &self,
        collection: Collection,
        record: Value,
    ) -> Result<String, StoreError> {
        if !record.is_object() {
            return Err(StoreError::NotARecord {
                path: collection.name().to_string(),
            });
        }
        self.mutate(|inner| {
            let key = inner.next_key();
            inner.collection_mut(collection).insert(key.clone(), record);
            Ok((key, vec![collection]))
        })
    }

    fn update_fields(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        let (collection, key) = parse_path(path)?;
        let key = key.ok_or_else(|| StoreError::NotARecord {
            path: path.to_string(),
        })?;
        self.mutate(|inner| {
            let record = inner
                .collection_mut(collection)
                .get_mut(key)
                .and_then(Value::as_object_mut)
                .ok_or_else(|| StoreError::Missing {
                    path: path.to_string(),
                })?;
            for (k, v) in fields {
                record.insert(k, v);
            }
            Ok(((), vec![collection]))
        })
    }

    fn delete_by_path(&self, path: &str) -> Result<(), StoreError> {
        let (collection, key) = parse_path(path)?;
        self.mutate(|inner| {
            match key {
                Some(key) => {
                    inner.collection_mut(collection).remove(key);
                }
                None => inner.collection_mut(collection).clear(),
            }
            Ok(((), vec![collection]))
        })
    }

    fn multi_path_update(&self, updates: BTreeMap<String, Option<Value>>) -> Result<(), StoreError> {
        // validate every path before touching anything
        let mut parsed = Vec::with_capacity(updates.len());
        for (path, value) in &updates {
            let (collection, key) = parse_path(path)?;
            if key.is_none() && value.as_ref().is_some_and(|v| !v.is_object()) {
                return Err(StoreError::NotARecord { path: path.clone() });
            }
            parsed.push((collection, key.map(str::to_string), value.clone()));
        }

        self.mutate(|inner| {
            let mut changed = Vec::new();
            for (collection, key, value) in parsed {
                let target = inner.collection_mut(collection);
                match (key, value) {
                    (Some(key), Some(value)) => {
                        target.insert(key, value);
                    }
                    (Some(key), None) => {
                        target.remove(&key);
                    }
                    (None, Some(Value::Object(map))) => {
                        *target = map.into_iter().collect();
                    }
                    (None, _) => target.clear(),
                }
                if !changed.contains(&collection) {
                    changed.push(collection);
                }
            }
            Ok(((), changed))
        })
    }
}
