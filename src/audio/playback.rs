//! Speaker output via `cpal`.
//!
//! [`AudioOutput`] is the seam the speech pipeline talks to; [`CpalOutput`]
//! is the real device.  Playback is fire-and-forget: [`AudioOutput::play`]
//! returns once the playback thread reports that the stream started (or
//! failed to), and that thread keeps the cpal stream alive until the clip
//! has drained.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SampleRate, SizedSample, StreamConfig};
use thiserror::Error;

use super::pcm::AudioBuffer;
use super::resample::{mono_to_interleaved, resample, ResampleError};

/// Extra time the playback thread waits past the nominal clip length.
const DRAIN_MARGIN: Duration = Duration::from_millis(300);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no output device found on the default audio host")]
    NoDevice,

    #[error("failed to query output configs: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("failed to query default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported output sample format {0:?}")]
    UnsupportedFormat(SampleFormat),

    #[error(transparent)]
    Resample(#[from] ResampleError),

    #[error("failed to spawn playback thread: {0}")]
    Thread(String),
}

// ---------------------------------------------------------------------------
// AudioOutput trait
// ---------------------------------------------------------------------------

/// An opened output context.  Implementations must not block until the clip
/// finishes; they only report whether playback could be started.
pub trait AudioOutput: Send + Sync {
    fn play(&self, buffer: AudioBuffer) -> Result<(), PlaybackError>;
}

// ---------------------------------------------------------------------------
// CpalOutput
// ---------------------------------------------------------------------------

/// Default output device, configured once at open time.
#[derive(Debug, Clone)]
pub struct CpalOutput {
    config: StreamConfig,
    sample_format: SampleFormat,
    device_name: String,
}

/// Callback sample types the output stream can be built with.
fn is_playable(format: SampleFormat) -> bool {
    matches!(format, SampleFormat::F32 | SampleFormat::I16 | SampleFormat::U16)
}

impl CpalOutput {
    /// Open the default output device, preferring a mono then stereo `f32`
    /// configuration that runs natively at `sample_rate`.  Otherwise the
    /// device default is used and clips are resampled on play; a default
    /// whose sample format has no callback here is rejected.
    pub fn open(sample_rate: u32) -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(PlaybackError::NoDevice)?;
        let device_name = device.name().unwrap_or_default();

        let native = |channels: u16| -> Result<Option<StreamConfig>, PlaybackError> {
            Ok(device
                .supported_output_configs()?
                .find(|c| {
                    c.channels() == channels
                        && c.sample_format() == SampleFormat::F32
                        && c.min_sample_rate() <= SampleRate(sample_rate)
                        && c.max_sample_rate() >= SampleRate(sample_rate)
                })
                .map(|c| c.with_sample_rate(SampleRate(sample_rate)).config()))
        };

        let (config, sample_format) = match native(1)? {
            Some(config) => (config, SampleFormat::F32),
            None => match native(2)? {
                Some(config) => (config, SampleFormat::F32),
                None => {
                    let fallback = device.default_output_config()?;
                    (fallback.config(), fallback.sample_format())
                }
            },
        };
        if !is_playable(sample_format) {
            return Err(PlaybackError::UnsupportedFormat(sample_format));
        }

        log::info!(
            "playback: opened '{device_name}' at {} Hz, {} channel(s), {sample_format:?}",
            config.sample_rate.0,
            config.channels
        );

        Ok(Self {
            config,
            sample_format,
            device_name,
        })
    }

    pub fn device_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }
}

impl AudioOutput for CpalOutput {
    fn play(&self, buffer: AudioBuffer) -> Result<(), PlaybackError> {
        let frames = prepare_frames(&buffer, self.device_rate(), self.channels())?;
        if frames.is_empty() {
            return Ok(());
        }

        let config = self.config.clone();
        let format = self.sample_format;
        let clip = Duration::from_secs_f32(buffer.duration_secs());
        log::debug!(
            "playback: {:.2}s clip on '{}'",
            clip.as_secs_f32(),
            self.device_name
        );

        spawn_player(move || start_stream(&config, format, frames, clip))
    }
}

/// Convert a mono clip into interleaved frames at the device rate.
pub fn prepare_frames(
    buffer: &AudioBuffer,
    device_rate: u32,
    channels: u16,
) -> Result<Vec<f32>, PlaybackError> {
    let mono = resample(&buffer.samples, buffer.sample_rate, device_rate)?;
    Ok(mono_to_interleaved(&mono, channels))
}

/// Run `start` on a dedicated playback thread and wait only for its verdict.
///
/// On success `start` hands back the drain step, which owns the stream and
/// blocks the playback thread (never the caller) until the clip has played.
/// A `start` that panics surfaces as [`PlaybackError::Thread`].
fn spawn_player<S, D>(start: S) -> Result<(), PlaybackError>
where
    S: FnOnce() -> Result<D, PlaybackError> + Send + 'static,
    D: FnOnce() + 'static,
{
    let (started_tx, started_rx) = mpsc::sync_channel(1);
    std::thread::Builder::new()
        .name("picto-playback".into())
        .spawn(move || match start() {
            Ok(drain) => {
                let _ = started_tx.send(Ok(()));
                drain();
            }
            Err(e) => {
                let _ = started_tx.send(Err(e));
            }
        })
        .map_err(|e| PlaybackError::Thread(e.to_string()))?;

    started_rx.recv().map_err(|_| {
        PlaybackError::Thread("playback thread exited before starting the stream".into())
    })?
}

/// Build and start the stream.  Runs on the playback thread because
/// `cpal::Stream` is not `Send` on every platform.
fn start_stream(
    config: &StreamConfig,
    format: SampleFormat,
    frames: Vec<f32>,
    clip: Duration,
) -> Result<Box<dyn FnOnce()>, PlaybackError> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or(PlaybackError::NoDevice)?;

    let finished = Arc::new(AtomicBool::new(false));
    let done = Arc::clone(&finished);
    let stream = match format {
        SampleFormat::F32 => build_stream::<f32>(&device, config, &frames, done)?,
        SampleFormat::I16 => build_stream::<i16>(&device, config, &frames, done)?,
        SampleFormat::U16 => build_stream::<u16>(&device, config, &frames, done)?,
        other => return Err(PlaybackError::UnsupportedFormat(other)),
    };
    stream.play()?;

    Ok(Box::new(move || {
        let deadline = Instant::now() + clip + DRAIN_MARGIN;
        while !finished.load(Ordering::Acquire) && Instant::now() < deadline {
            std::thread::sleep(POLL_INTERVAL);
        }
        // Let the last hardware buffer drain.
        std::thread::sleep(POLL_INTERVAL * 5);
        drop(stream);
    }))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    frames: &[f32],
    done: Arc<AtomicBool>,
) -> Result<cpal::Stream, PlaybackError>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    let samples: Vec<T> = frames.iter().map(|&s| T::from_sample(s)).collect();
    let mut position = 0usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for slot in data.iter_mut() {
                *slot = samples.get(position).copied().unwrap_or(T::EQUILIBRIUM);
                position += 1;
            }
            if position >= samples.len() {
                done.store(true, Ordering::Release);
            }
        },
        |err: cpal::StreamError| {
            log::error!("playback: stream error: {err}");
        },
        None,
    )?;
    Ok(stream)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
