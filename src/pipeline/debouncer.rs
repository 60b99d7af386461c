//! Translation debouncer: turns sequence edits into at most one translation
//! request per quiet period.
//!
//! # Flow
//!
//! ```text
//! SequenceEvent::Edited (non-empty)
//!   └─▶ abort pending timer, token += 1, arm new timer        [Waiting]
//!         └─▶ quiet period elapses (token still current)
//!               └─▶ detach timer, translator.translate(labels) [InFlight]
//!                     ├─ token still current → store sentence   [Settled]
//!                     └─ token moved on      → discard result
//!
//! SequenceEvent::Edited (empty)    └─▶ abort timer, token += 1   [Idle]
//! SequenceEvent::Restored          └─▶ abort timer, token += 1   [Settled]
//! ```
//!
//! Only the timer is ever cancelled.  Once a request is in flight it runs to
//! completion and stale answers are dropped by token comparison.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::sequence::{SequenceEvent, SequenceObserver};
use crate::translate::{Translator, FALLBACK_SENTENCE};

use super::state::{TranslationPhase, TranslationState};

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DebounceState {
    phase: TranslationPhase,
    text: Option<String>,
    /// Generation marker; bumped on every sequence event.
    token: u64,
    /// Armed quiet-period timer, `None` once it has fired.
    timer: Option<JoinHandle<()>>,
}

impl DebounceState {
    fn snapshot(&self) -> TranslationState {
        TranslationState {
            phase: self.phase,
            text: self.text.clone(),
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Inner {
    translator: Arc<dyn Translator>,
    quiet_period: Duration,
    runtime: Handle,
    state: Mutex<DebounceState>,
    published: watch::Sender<TranslationState>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &DebounceState) {
        self.published.send_replace(state.snapshot());
    }
}

// ---------------------------------------------------------------------------
// TranslationDebouncer
// ---------------------------------------------------------------------------

/// Trailing-edge debouncer in front of a [`Translator`].
///
/// Cheap to clone; all clones drive the same state machine.  Register it on a
/// [`SequenceBuilder`](crate::sequence::SequenceBuilder) to have edits flow in
/// automatically.
#[derive(Clone)]
pub struct TranslationDebouncer {
    inner: Arc<Inner>,
}

impl TranslationDebouncer {
    /// Create a debouncer whose timers and requests run on `runtime`.
    pub fn new(translator: Arc<dyn Translator>, quiet_period: Duration, runtime: Handle) -> Self {
        let (published, _) = watch::channel(TranslationState::default());
        Self {
            inner: Arc::new(Inner {
                translator,
                quiet_period,
                runtime,
                state: Mutex::new(DebounceState::default()),
                published,
            }),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> TranslationState {
        self.inner.published.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<TranslationState> {
        self.inner.published.subscribe()
    }

    /// React to a new sequence after an edit.
    pub fn sequence_edited(&self, labels: Vec<String>) {
        let mut st = self.inner.lock();
        st.cancel_timer();
        st.token += 1;
        st.text = None;

        if labels.is_empty() {
            log::debug!("debounce: sequence empty → Idle");
            st.phase = TranslationPhase::Idle;
            self.inner.publish(&st);
            return;
        }

        st.phase = TranslationPhase::Dirty;
        let token = st.token;
        let inner = Arc::clone(&self.inner);
        st.timer = Some(
            self.inner
                .runtime
                .spawn(fire_after_quiet_period(inner, token, labels)),
        );
        st.phase = TranslationPhase::Waiting;
        log::debug!("debounce: request #{token} armed");
        self.inner.publish(&st);
    }

    /// Install a known-good sentence without contacting the translator.
    /// Any armed timer is cancelled and in-flight answers become stale.
    pub fn restore(&self, text: &str) {
        let mut st = self.inner.lock();
        st.cancel_timer();
        st.token += 1;
        st.phase = TranslationPhase::Settled;
        st.text = Some(text.to_string());
        log::debug!("debounce: restored sentence (token #{})", st.token);
        self.inner.publish(&st);
    }

    /// Teardown: cancel the armed timer and invalidate in-flight requests.
    pub fn shutdown(&self) {
        let mut st = self.inner.lock();
        st.cancel_timer();
        st.token += 1;
    }
}

impl SequenceObserver for TranslationDebouncer {
    fn on_sequence_event(&self, event: SequenceEvent<'_>) {
        match event {
            SequenceEvent::Edited(pictograms) => {
                self.sequence_edited(pictograms.iter().map(|p| p.label.clone()).collect());
            }
            SequenceEvent::Restored { pictograms, text } => {
                if pictograms.is_empty() {
                    self.sequence_edited(Vec::new());
                } else {
                    self.restore(text);
                }
            }
        }
    }
}

impl std::fmt::Debug for TranslationDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationDebouncer")
            .field("quiet_period", &self.inner.quiet_period)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Timer task
// ---------------------------------------------------------------------------

async fn fire_after_quiet_period(inner: Arc<Inner>, token: u64, labels: Vec<String>) {
    tokio::time::sleep(inner.quiet_period).await;

    {
        let mut st = inner.lock();
        if st.token != token {
            return;
        }
        // Past this point newer edits must not cancel the request.
        st.timer = None;
        st.phase = TranslationPhase::InFlight;
        inner.publish(&st);
    }

    log::debug!("debounce: request #{token} sent ({} labels)", labels.len());
    let sentence = match inner.translator.translate(&labels).await {
        Ok(sentence) => sentence,
        Err(e) => {
            log::warn!("debounce: request #{token} failed ({e}), settling on fallback");
            FALLBACK_SENTENCE.to_string()
        }
    };

    let mut st = inner.lock();
    if st.token != token {
        log::debug!(
            "debounce: request #{token} discarded (stale, current #{})",
            st.token
        );
        return;
    }
    st.phase = TranslationPhase::Settled;
    st.text = Some(sentence);
    inner.publish(&st);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
