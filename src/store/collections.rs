//! Typed access to the two persisted collections.
//!
//! Each collection lives in its own slot as a JSON array.  Loading never
//! fails: a missing, unreadable or malformed slot yields an empty collection
//! and a warning.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::Pictogram;
use crate::favorites::SavedPhrase;

use super::port::{KeyValueStore, StoreError};

/// Slot holding the saved phrases, newest first.
pub const SAVED_PHRASES_KEY: &str = "saved_phrases";
/// Slot holding user-created pictograms in creation order.
pub const CUSTOM_PICTOGRAMS_KEY: &str = "custom_pictograms";

#[derive(Clone)]
pub struct CollectionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn load_phrases(&self) -> Vec<SavedPhrase> {
        self.load(SAVED_PHRASES_KEY)
    }

    /// Entries filed under a virtual category are dropped with a warning.
    pub fn load_custom_pictograms(&self) -> Vec<Pictogram> {
        let mut custom: Vec<Pictogram> = self.load(CUSTOM_PICTOGRAMS_KEY);
        custom.retain(|p| {
            let keep = p.category.is_assignable();
            if !keep {
                log::warn!("store: dropping '{}' filed under {}", p.id, p.category);
            }
            keep
        });
        custom
    }

    pub fn save_phrases(&self, phrases: &[SavedPhrase]) -> Result<(), StoreError> {
        self.save(SAVED_PHRASES_KEY, phrases)
    }

    pub fn save_custom_pictograms(&self, pictograms: &[Pictogram]) -> Result<(), StoreError> {
        self.save(CUSTOM_PICTOGRAMS_KEY, pictograms)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("store: cannot read '{key}' ({e}), starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("store: '{key}' is malformed ({e}), starting empty");
                Vec::new()
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(items)?;
        self.backend.set(key, &bytes)
    }
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{builtin_pictograms, Category, PictogramCatalog};
    use crate::favorites::FavoritesManager;
    use crate::store::{FileStore, MemoryStore};

    #[test]
    fn round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(Arc::new(FileStore::new(dir.path())));

        let mut catalog = PictogramCatalog::default();
        catalog.create("Abuela", "👵", Category::People).unwrap();
        catalog.create("Pizza", "🍕", Category::Food).unwrap();

        let mut favorites = FavoritesManager::default();
        favorites.save(&builtin_pictograms()[..2], Some("Ayuda, baño."));
        favorites.save(&catalog.custom()[..1], Some("Quiero ver a la abuela."));

        store.save_custom_pictograms(catalog.custom()).unwrap();
        store.save_phrases(favorites.list()).unwrap();

        let reopened = CollectionStore::new(Arc::new(FileStore::new(dir.path())));
        assert_eq!(reopened.load_custom_pictograms(), catalog.custom());
        assert_eq!(reopened.load_phrases(), favorites.list());
    }

    #[test]
    fn missing_slots_load_empty() {
        let store = CollectionStore::new(Arc::new(MemoryStore::new()));
        assert!(store.load_phrases().is_empty());
        assert!(store.load_custom_pictograms().is_empty());
    }

    #[test]
    fn malformed_slots_load_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(SAVED_PHRASES_KEY, b"{not json").unwrap();
        backend.set(CUSTOM_PICTOGRAMS_KEY, br#"{"id": "x"}"#).unwrap();

        let store = CollectionStore::new(backend);
        assert!(store.load_phrases().is_empty());
        assert!(store.load_custom_pictograms().is_empty());
    }

    #[test]
    fn reads_legacy_field_names() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(
                CUSTOM_PICTOGRAMS_KEY,
                r#"[{"id":"custom_1700000000000","label":"Abuela","emoji":"👵",
                    "category":"Personas","color":"bg-indigo-600 text-white"}]"#
                    .as_bytes(),
            )
            .unwrap();

        let custom = CollectionStore::new(backend).load_custom_pictograms();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].glyph, "👵");
        assert_eq!(custom[0].category, Category::People);
    }

    #[test]
    fn customs_in_virtual_category_are_dropped() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(
                CUSTOM_PICTOGRAMS_KEY,
                r#"[{"id":"custom_1","label":"Raro","glyph":"❓",
                     "category":"Favoritos","style_tag":"bg-indigo-600 text-white"},
                    {"id":"custom_2","label":"Pizza","glyph":"🍕",
                     "category":"Food","style_tag":"bg-indigo-600 text-white"}]"#
                    .as_bytes(),
            )
            .unwrap();

        let custom = CollectionStore::new(backend).load_custom_pictograms();
        let ids: Vec<&str> = custom.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["custom_2"]);
    }
}
