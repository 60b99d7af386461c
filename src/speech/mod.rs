//! Text-to-speech: synthesis backends and the playback pipeline.
//!
//! This module provides:
//! * [`SpeechSynthesizer`]: async trait implemented by all speech backends.
//! * [`ApiSynthesizer`]: Gemini / OpenAI-compatible REST client returning
//!   raw 24 kHz PCM.
//! * [`SpeechPipeline`]: synthesize → decode → play, with a lazily opened
//!   output context.
//! * [`SpeechError`]: error variants for the whole path.

pub mod pipeline;
pub mod synthesizer;

pub use pipeline::{OutputOpener, SpeechPipeline};
pub use synthesizer::{ApiSynthesizer, SpeechError, SpeechSynthesizer};
