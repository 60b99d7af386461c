//! Translation pipeline: the debouncer that sits between sequence edits and
//! the [`Translator`](crate::translate::Translator), plus the state snapshot it
//! publishes.
//!
//! # Architecture
//!
//! ```text
//! SequenceBuilder ──SequenceEvent──▶ TranslationDebouncer
//!                                        │  quiet-period timer (tokio)
//!                                        ▼
//!                                   Translator::translate   ← spawned task
//!                                        │
//!                                        ▼
//! watch::Receiver<TranslationState> ◀── publish snapshot
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use picto_voice::config::AppConfig;
//! use picto_voice::pipeline::TranslationDebouncer;
//! use picto_voice::translate::{ApiTranslator, FallbackTranslator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = Arc::new(FallbackTranslator::new(ApiTranslator::from_config(
//!         &config.translation,
//!     )));
//!     let debouncer = TranslationDebouncer::new(
//!         translator,
//!         Duration::from_millis(800),
//!         tokio::runtime::Handle::current(),
//!     );
//!
//!     debouncer.sequence_edited(vec!["Quiero".into(), "Agua".into()]);
//!     let mut rx = debouncer.subscribe();
//!     let _ = rx.wait_for(|s| s.settled_text().is_some()).await;
//! }
//! ```

pub mod debouncer;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use debouncer::TranslationDebouncer;
pub use state::{TranslationPhase, TranslationState};
