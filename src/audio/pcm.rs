//! Raw PCM decoding.
//!
//! Speech services return headerless signed 16-bit little-endian mono PCM.
//! [`decode_pcm16_mono`] turns those bytes into normalised `f32` samples in
//! `[-1.0, 1.0)` tagged with their sample rate.

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioBuffer
// ---------------------------------------------------------------------------

/// Mono `f32` samples at a known rate, ready for an output device.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PcmError
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PcmError {
    /// Fewer than two bytes: not a single sample.
    #[error("audio payload is empty")]
    Empty,

    #[error("invalid sample rate: {0} Hz")]
    SampleRate(u32),
}

// ---------------------------------------------------------------------------
// decode_pcm16_mono
// ---------------------------------------------------------------------------

/// Decode little-endian `i16` mono PCM into an [`AudioBuffer`].
///
/// Each sample is scaled by `1 / 32768`.  A trailing odd byte cannot form a
/// sample and is dropped.
///
/// # Example
///
/// ```rust
/// use picto_voice::audio::decode_pcm16_mono;
///
/// // 0x4000 = 16384 → 0.5, 0x8000 = -32768 → -1.0
/// let bytes = [0x00, 0x40, 0x00, 0x80];
/// let buffer = decode_pcm16_mono(&bytes, 24_000).unwrap();
/// assert_eq!(buffer.samples, vec![0.5, -1.0]);
/// ```
pub fn decode_pcm16_mono(bytes: &[u8], sample_rate: u32) -> Result<AudioBuffer, PcmError> {
    if sample_rate == 0 {
        return Err(PcmError::SampleRate(sample_rate));
    }
    if bytes.len() < 2 {
        return Err(PcmError::Empty);
    }
    if bytes.len() % 2 != 0 {
        log::warn!("pcm: odd payload length {}, dropping last byte", bytes.len());
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();

    Ok(AudioBuffer {
        samples,
        sample_rate,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_full_range() {
        let bytes: Vec<u8> = [i16::MIN, -16384, 0, 16384, i16::MAX]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let buffer = decode_pcm16_mono(&bytes, 24_000).unwrap();
        assert_eq!(buffer.samples.len(), 5);
        assert_eq!(buffer.samples[0], -1.0);
        assert_eq!(buffer.samples[1], -0.5);
        assert_eq!(buffer.samples[2], 0.0);
        assert_eq!(buffer.samples[3], 0.5);
        assert!((buffer.samples[4] - 32767.0 / 32768.0).abs() < 1e-7);
        assert!(buffer.samples.iter().all(|s| (-1.0..1.0).contains(s)));
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        let buffer = decode_pcm16_mono(&[0x00, 0x40, 0x7f], 24_000).unwrap();
        assert_eq!(buffer.samples, vec![0.5]);
    }

    #[test]
    fn empty_payload_is_an_error() {
        assert_eq!(decode_pcm16_mono(&[], 24_000), Err(PcmError::Empty));
        assert_eq!(decode_pcm16_mono(&[0x01], 24_000), Err(PcmError::Empty));
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert_eq!(
            decode_pcm16_mono(&[0, 0], 0),
            Err(PcmError::SampleRate(0))
        );
    }

    #[test]
    fn one_second_at_24k() {
        let bytes = vec![0u8; 48_000];
        let buffer = decode_pcm16_mono(&bytes, 24_000).unwrap();
        assert_eq!(buffer.samples.len(), 24_000);
        assert!((buffer.duration_secs() - 1.0).abs() < 1e-6);
    }
}
