//! Persistent store.
//!
//! * [`KeyValueStore`]: the `get` / `set` byte port.
//! * [`FileStore`]: JSON files in a directory, written atomically.
//! * [`MemoryStore`]: in-process map for tests.
//! * [`CollectionStore`]: typed load/save of the `saved_phrases` and
//!   `custom_pictograms` slots.

pub mod collections;
pub mod file;
pub mod port;

pub use collections::{CollectionStore, CUSTOM_PICTOGRAMS_KEY, SAVED_PHRASES_KEY};
pub use file::FileStore;
pub use port::{KeyValueStore, MemoryStore, StoreError};
