//! Audio output: PCM decoding → resampling → speaker.
//!
//! # Pipeline
//!
//! ```text
//! speech bytes (i16 LE, 24 kHz mono) → decode_pcm16_mono → AudioBuffer
//!           → resample (device rate) → mono_to_interleaved → cpal stream
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use picto_voice::audio::{decode_pcm16_mono, AudioOutput, CpalOutput};
//!
//! let output = CpalOutput::open(24_000).unwrap();
//! let buffer = decode_pcm16_mono(&[0u8; 4_800], 24_000).unwrap();
//! output.play(buffer).unwrap(); // returns immediately
//! ```

pub mod pcm;
pub mod playback;
pub mod resample;

pub use pcm::{decode_pcm16_mono, AudioBuffer, PcmError};
pub use playback::{AudioOutput, CpalOutput, PlaybackError};
pub use resample::{mono_to_interleaved, resample, ResampleError};
