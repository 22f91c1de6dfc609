use thiserror::Error;

/// Failures reported by a [`crate::RemoteStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown collection in path: {path}")]
    UnknownCollection { path: String },

    #[error("path must address a record, got: {path}")]
    NotARecord { path: String },

    #[error("record at {path} does not exist")]
    Missing { path: String },

    #[error("store is offline")]
    Offline,

    #[error("store state is poisoned")]
    Poisoned,

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// User input rejected before any remote mutation is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("item name must not be empty")]
    EmptyItemName,

    #[error("no category selected")]
    NoCategorySelected,

    #[error("category name must not be empty")]
    EmptyCategoryName,

    #[error("category {name} already exists")]
    DuplicateCategory { name: String },
}
