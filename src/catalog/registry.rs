//! [`PictogramCatalog`]: built-in entries plus the user's custom collection.

use thiserror::Error;

use crate::clock::IdClock;

use super::builtin::builtin_pictograms;
use super::pictogram::{
    custom_id_stamp, is_custom_id, Category, Pictogram, CUSTOM_ID_PREFIX, CUSTOM_STYLE_TAG,
};

// ---------------------------------------------------------------------------
// CatalogError
// ---------------------------------------------------------------------------

/// Reasons a pictogram creation request is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("pictogram label must not be empty")]
    EmptyLabel,

    #[error("pictogram glyph must not be empty")]
    EmptyGlyph,

    #[error("category {0} cannot hold pictograms")]
    VirtualCategory(Category),
}

// ---------------------------------------------------------------------------
// PictogramCatalog
// ---------------------------------------------------------------------------

/// Everything the user can tap.
///
/// Built-ins are process-wide constants; custom entries are owned here and
/// kept in creation order.
#[derive(Debug, Default)]
pub struct PictogramCatalog {
    custom: Vec<Pictogram>,
    ids: IdClock,
}

impl PictogramCatalog {
    /// Build a catalog around a previously persisted custom collection.
    pub fn new(custom: Vec<Pictogram>) -> Self {
        let floor = custom
            .iter()
            .filter_map(|p| custom_id_stamp(&p.id))
            .max()
            .unwrap_or(0);
        Self {
            custom,
            ids: IdClock::starting_after(floor),
        }
    }

    /// User-created pictograms in creation order.
    pub fn custom(&self) -> &[Pictogram] {
        &self.custom
    }

    /// Create and append a custom pictogram.
    ///
    /// Label and glyph are trimmed; either being empty rejects the request
    /// without touching the collection.
    pub fn create(
        &mut self,
        label: &str,
        glyph: &str,
        category: Category,
    ) -> Result<Pictogram, CatalogError> {
        let label = label.trim();
        let glyph = glyph.trim();
        if label.is_empty() {
            return Err(CatalogError::EmptyLabel);
        }
        if glyph.is_empty() {
            return Err(CatalogError::EmptyGlyph);
        }
        if !category.is_assignable() {
            return Err(CatalogError::VirtualCategory(category));
        }

        let stamp = self.ids.next().timestamp_millis();
        let pictogram = Pictogram {
            id: format!("{CUSTOM_ID_PREFIX}{stamp}"),
            label: label.to_string(),
            glyph: glyph.to_string(),
            category,
            style_tag: CUSTOM_STYLE_TAG.to_string(),
        };
        log::debug!("catalog: created {} ({})", pictogram.id, pictogram.label);
        self.custom.push(pictogram.clone());
        Ok(pictogram)
    }

    /// Remove a custom pictogram.  Returns `false` when nothing was removed;
    /// built-in ids never match.
    pub fn delete(&mut self, id: &str) -> bool {
        if !is_custom_id(id) {
            return false;
        }
        let before = self.custom.len();
        self.custom.retain(|p| p.id != id);
        self.custom.len() != before
    }

    /// Built-ins then customs of `category`, each in insertion order.
    pub fn list_by_category(&self, category: Category) -> Vec<&Pictogram> {
        builtin_pictograms()
            .iter()
            .chain(self.custom.iter())
            .filter(|p| p.category == category)
            .collect()
    }

    /// Resolve an id against built-ins first, then customs.
    pub fn find(&self, id: &str) -> Option<&Pictogram> {
        builtin_pictograms()
            .iter()
            .chain(self.custom.iter())
            .find(|p| p.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_blank_fields() {
        let mut catalog = PictogramCatalog::default();
        assert_eq!(
            catalog.create("  ", "🎮", Category::Actions),
            Err(CatalogError::EmptyLabel)
        );
        assert_eq!(
            catalog.create("Play", "", Category::Actions),
            Err(CatalogError::EmptyGlyph)
        );
        assert!(catalog.custom().is_empty());
    }

    #[test]
    fn create_rejects_favorites_category() {
        let mut catalog = PictogramCatalog::default();
        assert_eq!(
            catalog.create("Play", "🎮", Category::Favorites),
            Err(CatalogError::VirtualCategory(Category::Favorites))
        );
        assert!(catalog.custom().is_empty());
    }

    #[test]
    fn create_appends_with_unique_custom_ids() {
        let mut catalog = PictogramCatalog::default();
        let a = catalog.create("Play Station", "🎮", Category::Objects).unwrap();
        let b = catalog.create("Pizza", "🍕", Category::Food).unwrap();

        assert!(a.is_custom() && b.is_custom());
        assert_ne!(a.id, b.id);
        assert_eq!(a.style_tag, CUSTOM_STYLE_TAG);
        assert_eq!(catalog.custom(), &[a, b]);
    }

    #[test]
    fn list_puts_builtins_before_customs() {
        let mut catalog = PictogramCatalog::default();
        let custom = catalog.create("Pizza", "🍕", Category::Food).unwrap();

        let food = catalog.list_by_category(Category::Food);
        let ids: Vec<&str> = food.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["food_1", "food_2", "food_3", "food_4", "food_5", custom.id.as_str()]
        );
    }

    #[test]
    fn favorites_listing_is_empty() {
        let catalog = PictogramCatalog::default();
        assert!(catalog.list_by_category(Category::Favorites).is_empty());
    }

    #[test]
    fn delete_only_touches_customs() {
        let mut catalog = PictogramCatalog::default();
        let custom = catalog.create("Pizza", "🍕", Category::Food).unwrap();

        assert!(!catalog.delete("food_1"));
        assert!(catalog.find("food_1").is_some());

        assert!(catalog.delete(&custom.id));
        assert!(catalog.find(&custom.id).is_none());
        assert!(!catalog.delete(&custom.id));
    }

    #[test]
    fn reloaded_catalog_never_reissues_ids() {
        let far_future = chrono::Utc::now().timestamp_millis() + 3_600_000;
        let existing = Pictogram {
            id: format!("custom_{far_future}"),
            label: "Old".into(),
            glyph: "📦".into(),
            category: Category::Objects,
            style_tag: CUSTOM_STYLE_TAG.into(),
        };
        let mut catalog = PictogramCatalog::new(vec![existing.clone()]);
        let fresh = catalog.create("New", "🆕", Category::Objects).unwrap();
        assert_eq!(fresh.id, format!("custom_{}", far_future + 1));
    }

    #[test]
    fn corrupt_stored_id_does_not_break_creation() {
        let corrupt = Pictogram {
            id: format!("custom_{}", i64::MAX),
            label: "Old".into(),
            glyph: "📦".into(),
            category: Category::Objects,
            style_tag: CUSTOM_STYLE_TAG.into(),
        };
        let mut catalog = PictogramCatalog::new(vec![corrupt.clone()]);
        let fresh = catalog.create("New", "🆕", Category::Objects).unwrap();
        assert_ne!(fresh.id, corrupt.id);
        assert_eq!(catalog.custom().len(), 2);
    }

    #[test]
    fn find_resolves_builtins_and_customs() {
        let mut catalog = PictogramCatalog::default();
        let custom = catalog.create("Pizza", "🍕", Category::Food).unwrap();
        assert_eq!(catalog.find("act_1").map(|p| p.label.as_str()), Some("Quiero"));
        assert_eq!(catalog.find(&custom.id), Some(&custom));
        assert!(catalog.find("missing").is_none());
    }
}
