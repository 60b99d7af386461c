//! Board session: the facade a front-end drives.

pub mod board;
pub mod guard;

pub use board::{BoardSession, SpeakError};
pub use guard::{ProcessingFlag, ProcessingGuard};
