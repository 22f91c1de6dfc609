mod records;
mod state;
mod store;

pub use records::{ArchiveRecord, CategoryRecord, ItemRecord};
pub use state::{Changed, ItemPatch, StateMirror};
pub use store::{parse_path, Collection, MemoryStore, OnChange, RemoteStore, Snapshot};
