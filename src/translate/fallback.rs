//! Fallback translator: wraps any [`Translator`] and settles on a fixed
//! sentence on error.
//!
//! When the underlying call fails for any reason (`Request`, `Timeout`,
//! `Parse`, `EmptyResponse`, `Disabled`) [`FallbackTranslator`] returns
//! [`FALLBACK_SENTENCE`] instead of propagating the error, so the board
//! always shows something and the next edit naturally retries.

use async_trait::async_trait;

use crate::translate::translator::{TranslateError, Translator};

/// Sentence shown when no translation could be produced.
pub const FALLBACK_SENTENCE: &str = "No se pudo generar la frase.";

/// A transparent wrapper around any [`Translator`] that never returns an
/// error.
///
/// # Example
/// ```rust
/// use picto_voice::config::TranslationConfig;
/// use picto_voice::translate::{ApiTranslator, FallbackTranslator};
///
/// let inner = ApiTranslator::from_config(&TranslationConfig::default());
/// let translator = FallbackTranslator::new(inner);
/// ```
pub struct FallbackTranslator<T: Translator> {
    inner: T,
}

impl<T: Translator> FallbackTranslator<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Translator> Translator for FallbackTranslator<T> {
    /// This implementation **never** returns `Err(_)`.
    async fn translate(&self, labels: &[String]) -> Result<String, TranslateError> {
        match self.inner.translate(labels).await {
            Ok(sentence) => Ok(sentence),
            Err(err) => {
                log::warn!("translate: failed ({err}), using fallback sentence");
                Ok(FALLBACK_SENTENCE.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
