//! Pictogram voice board core.
//!
//! A user builds an utterance by tapping pictogram tiles; the sequence is
//! turned into a sentence by a remote language model after a quiet period,
//! and the sentence can be spoken aloud or saved as a favorite.
//!
//! [`session::BoardSession`] is the entry point; the other modules are its
//! building blocks.

pub mod audio;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod favorites;
pub mod pipeline;
pub mod sequence;
pub mod session;
pub mod speech;
pub mod store;
pub mod translate;
