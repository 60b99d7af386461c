//! Pictogram-to-sentence translation.
//!
//! This module provides:
//! * [`Translator`]: async trait implemented by all translator backends.
//! * [`ApiTranslator`]: Gemini / OpenAI-compatible REST client.
//! * [`FallbackTranslator`]: wraps any translator; settles on
//!   [`FALLBACK_SENTENCE`] on failure.
//! * [`PromptBuilder`]: builds the fixed persona prompt.
//! * [`TranslateError`]: error variants for translation requests.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use picto_voice::config::AppConfig;
//! use picto_voice::translate::{ApiTranslator, FallbackTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = FallbackTranslator::new(ApiTranslator::from_config(&config.translation));
//!
//!     let labels = vec!["Quiero".to_string(), "Agua".to_string()];
//!     let sentence = translator.translate(&labels).await.unwrap();
//!     println!("{sentence}");
//! }
//! ```

pub mod fallback;
pub mod prompt;
pub mod translator;

pub use fallback::{FallbackTranslator, FALLBACK_SENTENCE};
pub use prompt::PromptBuilder;
pub use translator::{ApiTranslator, TranslateError, Translator};
