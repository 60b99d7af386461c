//! Single-flight guard for the speak control.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "processing" flag.
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag if it is clear.  `None` means someone else holds it.
    pub fn acquire(&self) -> Option<ProcessingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard(Arc::clone(&self.0)))
    }
}

/// Clears the flag when dropped, on every exit path.
#[derive(Debug)]
pub struct ProcessingGuard(Arc<AtomicBool>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
