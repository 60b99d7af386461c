//! Translation state machine types.
//!
//! [`TranslationPhase`] drives the debouncer.  The UI reads the published
//! [`TranslationState`] snapshot to decide what to render and whether the
//! speak control is enabled.

// ---------------------------------------------------------------------------
// TranslationPhase
// ---------------------------------------------------------------------------

/// Phases of the translation debouncer.
///
/// ```text
/// Idle ──edit (non-empty)──▶ Dirty ──arm timer──▶ Waiting
///                                                   │ quiet period elapses
///                                                   ▼
///                                                InFlight ──response──▶ Settled
/// any phase ──edit (non-empty)──▶ Dirty
/// any phase ──edit (empty)──────▶ Idle
/// any phase ──restore──────────▶ Settled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationPhase {
    /// Empty sequence, no sentence.
    #[default]
    Idle,
    /// The sequence changed; a timer is about to be armed.
    Dirty,
    /// Timer armed, waiting for the quiet period to elapse.
    Waiting,
    /// A request for the current sequence is outstanding.
    InFlight,
    /// A sentence for the current sequence is available.
    Settled,
}

impl TranslationPhase {
    /// Returns `true` while a sentence for the current sequence is still
    /// being produced.
    ///
    /// ```
    /// use picto_voice::pipeline::TranslationPhase;
    ///
    /// assert!(!TranslationPhase::Idle.is_pending());
    /// assert!(TranslationPhase::Dirty.is_pending());
    /// assert!(TranslationPhase::Waiting.is_pending());
    /// assert!(TranslationPhase::InFlight.is_pending());
    /// assert!(!TranslationPhase::Settled.is_pending());
    /// ```
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            TranslationPhase::Dirty | TranslationPhase::Waiting | TranslationPhase::InFlight
        )
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            TranslationPhase::Idle => "Idle",
            TranslationPhase::Dirty => "Dirty",
            TranslationPhase::Waiting => "Waiting",
            TranslationPhase::InFlight => "Translating",
            TranslationPhase::Settled => "Ready",
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationState
// ---------------------------------------------------------------------------

/// Snapshot published after every transition.  Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationState {
    pub phase: TranslationPhase,
    /// Sentence for the current sequence; `None` unless `phase` is `Settled`.
    pub text: Option<String>,
}

impl TranslationState {
    pub fn pending(&self) -> bool {
        self.phase.is_pending()
    }

    /// The sentence, only once settled and non-empty.
    pub fn settled_text(&self) -> Option<&str> {
        match self.phase {
            TranslationPhase::Settled => self.text.as_deref().filter(|t| !t.is_empty()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_idle() {
        assert_eq!(TranslationPhase::default(), TranslationPhase::Idle);
        let state = TranslationState::default();
        assert!(!state.pending());
        assert!(state.text.is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(TranslationPhase::Idle.label(), "Idle");
        assert_eq!(TranslationPhase::InFlight.label(), "Translating");
        assert_eq!(TranslationPhase::Settled.label(), "Ready");
    }

    #[test]
    fn settled_text_requires_settled_phase() {
        let waiting = TranslationState {
            phase: TranslationPhase::Waiting,
            text: Some("old".into()),
        };
        assert!(waiting.settled_text().is_none());

        let settled = TranslationState {
            phase: TranslationPhase::Settled,
            text: Some("Quiero agua.".into()),
        };
        assert_eq!(settled.settled_text(), Some("Quiero agua."));

        let blank = TranslationState {
            phase: TranslationPhase::Settled,
            text: Some(String::new()),
        };
        assert!(blank.settled_text().is_none());
    }
}
