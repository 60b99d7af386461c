//! Speech playback pipeline: sentence → synthesized PCM → decoded buffer →
//! output device.
//!
//! The output context is opened lazily on the first `speak` and reused for
//! the rest of the session.  A failure at any step aborts before anything is
//! handed to the device, so there is never partial playback.

use std::sync::{Arc, Mutex, PoisonError};

use crate::audio::{decode_pcm16_mono, AudioOutput, PlaybackError};

use super::synthesizer::{SpeechError, SpeechSynthesizer};

/// Factory for the session's output context.  Called at most once per
/// successful open.
pub type OutputOpener =
    Box<dyn Fn() -> Result<Arc<dyn AudioOutput>, PlaybackError> + Send + Sync>;

pub struct SpeechPipeline {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    opener: OutputOpener,
    context: Mutex<Option<Arc<dyn AudioOutput>>>,
    sample_rate: u32,
}

impl SpeechPipeline {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        opener: OutputOpener,
        sample_rate: u32,
    ) -> Self {
        Self {
            synthesizer,
            opener,
            context: Mutex::new(None),
            sample_rate,
        }
    }

    /// Synthesize `text` and start playing it.  Returns the number of
    /// samples scheduled once playback has started; does not wait for the
    /// clip to finish.
    pub async fn speak(&self, text: &str) -> Result<usize, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let output = self.context()?;
        let bytes = self.synthesizer.synthesize(text).await?;
        if bytes.is_empty() {
            return Err(SpeechError::NoAudio);
        }
        let buffer = decode_pcm16_mono(&bytes, self.sample_rate)?;
        let samples = buffer.samples.len();

        log::info!(
            "speech: playing {:.2}s for \"{text}\"",
            buffer.duration_secs()
        );
        output.play(buffer)?;
        Ok(samples)
    }

    /// Whether the output context has been opened.
    pub fn is_open(&self) -> bool {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Release the output context.  A later `speak` opens a fresh one.
    pub fn shutdown(&self) {
        let released = self
            .context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if released.is_some() {
            log::debug!("speech: output context released");
        }
    }

    fn context(&self) -> Result<Arc<dyn AudioOutput>, PlaybackError> {
        let mut slot = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(output) = slot.as_ref() {
            return Ok(Arc::clone(output));
        }
        let output = (self.opener)()?;
        log::debug!("speech: output context opened at {} Hz", self.sample_rate);
        *slot = Some(Arc::clone(&output));
        Ok(output)
    }
}

impl std::fmt::Debug for SpeechPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechPipeline")
            .field("sample_rate", &self.sample_rate)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::audio::AudioBuffer;

    struct FixedSynth(Vec<u8>);

    #[async_trait]
    impl SpeechSynthesizer for FixedSynth {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SpeechError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSynth;

    #[async_trait]
    impl SpeechSynthesizer for FailingSynth {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SpeechError> {
            Err(SpeechError::NoAudio)
        }
    }

    #[derive(Default)]
    struct RecordingOutput {
        played: Mutex<Vec<AudioBuffer>>,
    }

    impl AudioOutput for RecordingOutput {
        fn play(&self, buffer: AudioBuffer) -> Result<(), PlaybackError> {
            self.played.lock().unwrap().push(buffer);
            Ok(())
        }
    }

    fn pipeline(
        synth: impl SpeechSynthesizer + 'static,
    ) -> (SpeechPipeline, Arc<RecordingOutput>, Arc<AtomicUsize>) {
        let output = Arc::new(RecordingOutput::default());
        let opens = Arc::new(AtomicUsize::new(0));
        let (out, count) = (output.clone(), opens.clone());
        let opener: OutputOpener = Box::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(out.clone() as Arc<dyn AudioOutput>)
        });
        (SpeechPipeline::new(Arc::new(synth), opener, 24_000), output, opens)
    }

    #[tokio::test]
    async fn decodes_and_plays_once() {
        let (pipeline, output, _) = pipeline(FixedSynth(vec![0x00, 0x40, 0x00, 0xc0]));
        let samples = pipeline.speak("Quiero agua.").await.unwrap();
        assert_eq!(samples, 2);

        let played = output.played.lock().unwrap();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].samples, vec![0.5, -0.5]);
        assert_eq!(played[0].sample_rate, 24_000);
    }

    #[tokio::test]
    async fn context_is_opened_once_and_reused() {
        let (pipeline, output, opens) = pipeline(FixedSynth(vec![0, 0]));
        assert!(!pipeline.is_open());
        for _ in 0..3 {
            pipeline.speak("Hola").await.unwrap();
        }
        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert_eq!(output.played.lock().unwrap().len(), 3);

        pipeline.shutdown();
        assert!(!pipeline.is_open());
        pipeline.speak("Hola").await.unwrap();
        assert_eq!(opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_payload_aborts_without_playback() {
        let (pipeline, output, _) = pipeline(FixedSynth(Vec::new()));
        let err = pipeline.speak("Hola").await.unwrap_err();
        assert!(matches!(err, SpeechError::NoAudio));
        assert!(output.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn single_byte_payload_is_a_decode_error() {
        let (pipeline, output, _) = pipeline(FixedSynth(vec![0x7f]));
        let err = pipeline.speak("Hola").await.unwrap_err();
        assert!(matches!(err, SpeechError::Decode(_)));
        assert!(output.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn synth_failure_aborts_without_playback() {
        let (pipeline, output, _) = pipeline(FailingSynth);
        assert!(pipeline.speak("Hola").await.is_err());
        assert!(output.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_text_never_reaches_the_synthesizer() {
        let (pipeline, _, opens) = pipeline(FailingSynth);
        let err = pipeline.speak("  ").await.unwrap_err();
        assert!(matches!(err, SpeechError::EmptyText));
        assert_eq!(opens.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn opener_failure_is_reported_and_retried_next_time() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let count = attempts.clone();
        let opener: OutputOpener = Box::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
            Err(PlaybackError::NoDevice)
        });
        let pipeline = SpeechPipeline::new(Arc::new(FixedSynth(vec![0, 0])), opener, 24_000);

        for _ in 0..2 {
            let err = pipeline.speak("Hola").await.unwrap_err();
            assert!(matches!(err, SpeechError::Playback(PlaybackError::NoDevice)));
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    struct RefusingOutput;

    impl AudioOutput for RefusingOutput {
        fn play(&self, _buffer: AudioBuffer) -> Result<(), PlaybackError> {
            Err(PlaybackError::UnsupportedFormat(cpal::SampleFormat::U8))
        }
    }

    #[tokio::test]
    async fn stream_start_failure_is_reported() {
        let opener: OutputOpener =
            Box::new(|| Ok(Arc::new(RefusingOutput) as Arc<dyn AudioOutput>));
        let pipeline = SpeechPipeline::new(Arc::new(FixedSynth(vec![0, 0])), opener, 24_000);

        let err = pipeline.speak("Hola").await.unwrap_err();
        assert!(matches!(
            err,
            SpeechError::Playback(PlaybackError::UnsupportedFormat(_))
        ));
    }
}
