//! Sample-rate conversion and channel fan-out for playback.
//!
//! Speech arrives as 24 kHz mono.  When the output device cannot run at that
//! rate, [`resample`] converts to the device rate with rubato's FFT
//! resampler, and [`mono_to_interleaved`] duplicates each sample across the
//! device's channels.

use rubato::{FftFixedIn, Resampler};
use thiserror::Error;

/// Frames fed to the resampler per call.
const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("resampler init failed: {0}")]
    Init(String),

    #[error("resampling failed: {0}")]
    Process(String),
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `from_rate` to `to_rate`.
///
/// Equal rates and empty input return the samples unchanged.  The final
/// partial chunk is flushed, so no trailing audio is lost.
///
/// # Example
///
/// ```rust
/// use picto_voice::audio::resample;
///
/// let same = resample(&[0.1, 0.2], 24_000, 24_000).unwrap();
/// assert_eq!(same, vec![0.1, 0.2]);
/// ```
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, ResampleError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, SUB_CHUNKS, 1)
            .map_err(|e| ResampleError::Init(e.to_string()))?;

    let expected = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
    let mut output = Vec::with_capacity(expected + CHUNK_SIZE);

    let mut chunks = samples.chunks_exact(CHUNK_SIZE);
    for chunk in &mut chunks {
        let frames = resampler
            .process(&[chunk], None)
            .map_err(|e| ResampleError::Process(e.to_string()))?;
        output.extend_from_slice(&frames[0]);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let wave_in: &[&[f32]] = &[tail];
        let frames = resampler
            .process_partial(Some(wave_in), None)
            .map_err(|e| ResampleError::Process(e.to_string()))?;
        output.extend_from_slice(&frames[0]);
    }

    // Drain the resampler's internal delay line.
    let frames = resampler
        .process_partial::<&[f32]>(None, None)
        .map_err(|e| ResampleError::Process(e.to_string()))?;
    output.extend_from_slice(&frames[0]);

    // Skip the leading delay so the output lines up with the input.
    let delay = resampler.output_delay().min(output.len());
    output.drain(..delay);
    output.truncate(expected);
    Ok(output)
}

// ---------------------------------------------------------------------------
// mono_to_interleaved
// ---------------------------------------------------------------------------

/// Copy each mono sample into every one of `channels` interleaved slots.
///
/// `channels == 0` yields an empty vector.
pub fn mono_to_interleaved(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => samples
            .iter()
            .flat_map(|&s| std::iter::repeat(s).take(n as usize))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
