//! Favorites: snapshot-and-restore of a sequence together with its sentence.
//!
//! [`FavoritesManager`] keeps the collection newest-first, which is also the
//! display order.  Persisting the collection is the session's job; the
//! manager only owns the in-memory list.

pub mod phrase;

pub use phrase::SavedPhrase;

use crate::catalog::Pictogram;
use crate::clock::IdClock;

#[derive(Debug, Default)]
pub struct FavoritesManager {
    phrases: Vec<SavedPhrase>,
    ids: IdClock,
}

impl FavoritesManager {
    /// Wrap a previously persisted collection, kept in its stored order.
    pub fn new(phrases: Vec<SavedPhrase>) -> Self {
        let floor = phrases
            .iter()
            .filter_map(SavedPhrase::id_stamp)
            .max()
            .unwrap_or(0);
        Self {
            phrases,
            ids: IdClock::starting_after(floor),
        }
    }

    /// Snapshot `pictograms` with `text` at the front of the collection.
    ///
    /// Returns `None` without touching the collection when the sequence is
    /// empty or there is no sentence.
    pub fn save(&mut self, pictograms: &[Pictogram], text: Option<&str>) -> Option<&SavedPhrase> {
        let text = text.filter(|t| !t.trim().is_empty())?;
        if pictograms.is_empty() {
            return None;
        }

        let created_at = self.ids.next();
        let phrase = SavedPhrase {
            id: created_at.timestamp_millis().to_string(),
            text: text.to_string(),
            pictograms: pictograms.to_vec(),
            created_at,
        };
        log::debug!(
            "favorites: saved #{} ({} pictograms)",
            phrase.id,
            phrase.pictograms.len()
        );
        self.phrases.insert(0, phrase);
        self.phrases.first()
    }

    /// Remove the phrase with `id`.  Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.phrases.len();
        self.phrases.retain(|p| p.id != id);
        before != self.phrases.len()
    }

    /// The stored sequence and sentence for `id`, ready to be restored.
    pub fn load(&self, id: &str) -> Option<(Vec<Pictogram>, String)> {
        self.get(id)
            .map(|p| (p.pictograms.clone(), p.text.clone()))
    }

    pub fn get(&self, id: &str) -> Option<&SavedPhrase> {
        self.phrases.iter().find(|p| p.id == id)
    }

    /// Newest first.
    pub fn list(&self) -> &[SavedPhrase] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
