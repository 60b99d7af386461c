//! `SpeechSynthesizer` trait and the REST-backed `ApiSynthesizer`.
//!
//! Both providers return raw 16-bit little-endian mono PCM:
//!
//! * Gemini `generateContent` with `responseModalities: ["AUDIO"]`; the PCM
//!   arrives base64-encoded at `candidates[0].content.parts[0].inlineData.data`.
//! * OpenAI-compatible `/v1/audio/speech` with `response_format: "pcm"`; the
//!   body is the PCM itself.

use async_trait::async_trait;
use base64::Engine as _;
use thiserror::Error;

use crate::audio::{PcmError, PlaybackError};
use crate::config::{ServiceProvider, SpeechConfig};

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Everything that can go wrong between a sentence and the speaker.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Nothing to say.
    #[error("cannot synthesize empty text")]
    EmptyText,

    /// HTTP transport or connection error, or a non-success status.
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("speech request timed out")]
    Timeout,

    #[error("failed to parse speech response: {0}")]
    Parse(String),

    /// The response carried no audio payload.
    #[error("speech service returned no audio")]
    NoAudio,

    #[error("failed to decode audio: {0}")]
    Decode(#[from] PcmError),

    #[error("playback failed: {0}")]
    Playback(#[from] PlaybackError),
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Turns a sentence into raw PCM bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

// ---------------------------------------------------------------------------
// ApiSynthesizer
// ---------------------------------------------------------------------------

pub struct ApiSynthesizer {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl ApiSynthesizer {
    pub fn from_config(config: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn synthesize_gemini(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let url = self.endpoint(&format!(
            "/v1beta/models/{}:generateContent",
            self.config.model
        ));

        let body = serde_json::json!({
            "contents": [ { "parts": [ { "text": text } ] } ],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.config.voice }
                    }
                }
            }
        });

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = self.api_key() {
            req = req.header("x-goog-api-key", key);
        }

        let response = check_status(req.send().await?).await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SpeechError::Parse(e.to_string()))?;
        inline_audio(&json)
    }

    async fn synthesize_openai(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let url = self.endpoint("/v1/audio/speech");
        let body = serde_json::json!({
            "model":           self.config.model,
            "input":           text,
            "voice":           self.config.voice,
            "response_format": "pcm"
        });

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = self.api_key() {
            req = req.bearer_auth(key);
        }

        let response = check_status(req.send().await?).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(SpeechError::NoAudio);
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for ApiSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyText);
        }
        log::debug!(
            "speech: synthesizing {} chars via {:?}",
            text.chars().count(),
            self.config.provider
        );
        match self.config.provider {
            ServiceProvider::Gemini => self.synthesize_gemini(text).await,
            ServiceProvider::OpenAiCompatible => self.synthesize_openai(text).await,
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SpeechError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(SpeechError::Request(format!("{status}: {detail}")));
    }
    Ok(response)
}

/// Pull the base64 PCM out of a Gemini response.
fn inline_audio(json: &serde_json::Value) -> Result<Vec<u8>, SpeechError> {
    let encoded = json["candidates"][0]["content"]["parts"][0]["inlineData"]["data"]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or(SpeechError::NoAudio)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| SpeechError::Parse(format!("invalid base64 audio: {e}")))?;
    if bytes.is_empty() {
        return Err(SpeechError::NoAudio);
    }
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
