//! The in-progress utterance and its change notifications.

pub mod builder;

pub use builder::{SequenceBuilder, SequenceEvent, SequenceObserver};
