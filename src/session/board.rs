//! [`BoardSession`]: the single owner of all board state.
//!
//! Front-ends talk only to the session.  Every method takes `&self`, so a
//! session can sit behind an `Arc` and serve overlapping requests (a second
//! `speak` while the first is still synthesizing, for instance).
//!
//! # Wiring
//!
//! ```text
//! tap_catalog / tap_sequence / clear ──▶ SequenceBuilder
//!                                             │ SequenceEvent
//!                                             ▼
//!                                     TranslationDebouncer ──▶ watch<TranslationState>
//!
//! speak ──ProcessingGuard──▶ SpeechPipeline (settled text only)
//!
//! save / delete / select favorite ──▶ FavoritesManager ──▶ CollectionStore
//! create / delete pictogram       ──▶ PictogramCatalog ──▶ CollectionStore
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::watch;

use crate::catalog::{CatalogError, Category, Pictogram, PictogramCatalog};
use crate::config::AppConfig;
use crate::favorites::{FavoritesManager, SavedPhrase};
use crate::pipeline::{TranslationDebouncer, TranslationState};
use crate::sequence::SequenceBuilder;
use crate::speech::{OutputOpener, SpeechError, SpeechPipeline, SpeechSynthesizer};
use crate::store::{CollectionStore, KeyValueStore};
use crate::translate::Translator;

use super::guard::ProcessingFlag;

// ---------------------------------------------------------------------------
// SpeakError
// ---------------------------------------------------------------------------

/// Why a `speak` request did not start playback.
#[derive(Debug, Error)]
pub enum SpeakError {
    /// No settled, non-empty sentence for the current sequence.
    #[error("no sentence is ready to speak")]
    NotReady,

    /// A previous `speak` is still processing.
    #[error("already speaking")]
    Busy,

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

// ---------------------------------------------------------------------------
// BoardSession
// ---------------------------------------------------------------------------

pub struct BoardSession {
    catalog: Mutex<PictogramCatalog>,
    sequence: Mutex<SequenceBuilder>,
    favorites: Mutex<FavoritesManager>,
    collections: CollectionStore,
    debouncer: TranslationDebouncer,
    speech: SpeechPipeline,
    processing: ProcessingFlag,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BoardSession {
    /// Load both persisted collections and wire the sequence into the
    /// debouncer.  Must be called from within a tokio runtime.
    pub async fn open(
        config: &AppConfig,
        store: Arc<dyn KeyValueStore>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        opener: OutputOpener,
    ) -> Self {
        let collections = CollectionStore::new(store);
        let custom = collections.load_custom_pictograms();
        let phrases = collections.load_phrases();
        log::info!(
            "session: opened with {} custom pictograms, {} saved phrases",
            custom.len(),
            phrases.len()
        );

        let debouncer = TranslationDebouncer::new(
            translator,
            config.quiet_period(),
            tokio::runtime::Handle::current(),
        );
        let mut sequence = SequenceBuilder::new();
        sequence.subscribe(Arc::new(debouncer.clone()));

        Self {
            catalog: Mutex::new(PictogramCatalog::new(custom)),
            sequence: Mutex::new(sequence),
            favorites: Mutex::new(FavoritesManager::new(phrases)),
            collections,
            debouncer,
            speech: SpeechPipeline::new(synthesizer, opener, config.speech.sample_rate),
            processing: ProcessingFlag::default(),
        }
    }

    // -- sequence ----------------------------------------------------------

    /// Append the catalog entry `id` to the sequence.  Unknown ids are a
    /// no-op and return `None`.
    pub fn tap_catalog(&self, id: &str) -> Option<Pictogram> {
        let Some(pictogram) = lock(&self.catalog).find(id).cloned() else {
            log::debug!("session: tap on unknown pictogram '{id}' ignored");
            return None;
        };
        lock(&self.sequence).append(pictogram.clone());
        Some(pictogram)
    }

    /// Remove the sequence tile at `index`; out of range is a no-op.
    pub fn tap_sequence(&self, index: usize) -> Option<Pictogram> {
        lock(&self.sequence).remove_at(index)
    }

    pub fn clear(&self) {
        lock(&self.sequence).clear();
    }

    pub fn sequence(&self) -> Vec<Pictogram> {
        lock(&self.sequence).pictograms().to_vec()
    }

    // -- translation -------------------------------------------------------

    pub fn translation(&self) -> TranslationState {
        self.debouncer.state()
    }

    pub fn subscribe_translation(&self) -> watch::Receiver<TranslationState> {
        self.debouncer.subscribe()
    }

    // -- speech ------------------------------------------------------------

    /// Whether the speak control should be enabled right now.
    pub fn can_speak(&self) -> bool {
        !self.processing.is_set() && self.translation().settled_text().is_some()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_set()
    }

    /// Speak the settled sentence.  Only one request is processed at a time;
    /// overlapping calls fail with [`SpeakError::Busy`] without reaching the
    /// speech service.  Returns the number of samples scheduled.
    pub async fn speak(&self) -> Result<usize, SpeakError> {
        let text = self
            .translation()
            .settled_text()
            .map(str::to_owned)
            .ok_or(SpeakError::NotReady)?;
        let Some(_guard) = self.processing.acquire() else {
            log::debug!("session: speak rejected, still processing");
            return Err(SpeakError::Busy);
        };

        match self.speech.speak(&text).await {
            Ok(samples) => Ok(samples),
            Err(e) => {
                log::warn!("session: speech failed: {e}");
                Err(e.into())
            }
        }
    }

    // -- favorites ---------------------------------------------------------

    /// Save the current sequence with its settled sentence.  `None` when the
    /// sequence is empty or no sentence is settled.
    pub fn save_favorite(&self) -> Option<SavedPhrase> {
        // Edits update the translation under the sequence lock, so reading
        // both while holding it yields a matching pair.
        let (pictograms, text) = {
            let sequence = lock(&self.sequence);
            let text = self.translation().settled_text().map(str::to_owned);
            (sequence.pictograms().to_vec(), text)
        };

        let mut favorites = lock(&self.favorites);
        let saved = favorites.save(&pictograms, text.as_deref())?.clone();
        self.persist_phrases(favorites.list());
        Some(saved)
    }

    pub fn delete_favorite(&self, id: &str) -> bool {
        let mut favorites = lock(&self.favorites);
        if !favorites.delete(id) {
            return false;
        }
        self.persist_phrases(favorites.list());
        true
    }

    /// Restore a saved phrase: its sequence and sentence replace the current
    /// ones together, without a translation request.
    pub fn select_favorite(&self, id: &str) -> bool {
        let Some((pictograms, text)) = lock(&self.favorites).load(id) else {
            return false;
        };
        lock(&self.sequence).replace(pictograms, &text);
        true
    }

    /// Newest first.
    pub fn favorites(&self) -> Vec<SavedPhrase> {
        lock(&self.favorites).list().to_vec()
    }

    // -- catalog -----------------------------------------------------------

    pub fn create_pictogram(
        &self,
        label: &str,
        glyph: &str,
        category: Category,
    ) -> Result<Pictogram, CatalogError> {
        let mut catalog = lock(&self.catalog);
        let created = catalog.create(label, glyph, category).map_err(|e| {
            log::warn!("session: pictogram rejected: {e}");
            e
        })?;
        self.persist_custom(catalog.custom());
        Ok(created)
    }

    /// Delete a custom pictogram.  Sequence tiles and saved phrases that
    /// reference it keep their own copies.
    pub fn delete_pictogram(&self, id: &str) -> bool {
        let mut catalog = lock(&self.catalog);
        if !catalog.delete(id) {
            return false;
        }
        self.persist_custom(catalog.custom());
        true
    }

    pub fn pictograms_in(&self, category: Category) -> Vec<Pictogram> {
        lock(&self.catalog)
            .list_by_category(category)
            .into_iter()
            .cloned()
            .collect()
    }

    // -- lifecycle ---------------------------------------------------------

    /// Cancel the pending debounce timer and release the output context.
    pub fn shutdown(&self) {
        self.debouncer.shutdown();
        self.speech.shutdown();
        log::info!("session: shut down");
    }

    fn persist_phrases(&self, phrases: &[SavedPhrase]) {
        if let Err(e) = self.collections.save_phrases(phrases) {
            log::warn!("session: failed to persist saved phrases: {e}");
        }
    }

    fn persist_custom(&self, pictograms: &[Pictogram]) {
        if let Err(e) = self.collections.save_custom_pictograms(pictograms) {
            log::warn!("session: failed to persist custom pictograms: {e}");
        }
    }
}

impl std::fmt::Debug for BoardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSession")
            .field("sequence", &lock(&self.sequence).len())
            .field("translation", &self.translation())
            .field("processing", &self.processing.is_set())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
