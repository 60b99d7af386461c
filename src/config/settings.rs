//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable consulted when a service section has no `api_key`.
pub const API_KEY_ENV: &str = "PICTO_VOICE_API_KEY";

// ---------------------------------------------------------------------------
// ServiceProvider
// ---------------------------------------------------------------------------

/// Wire format spoken by a remote text or speech service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ServiceProvider {
    /// Google Gemini REST API (`generateContent`).
    Gemini,
    /// Any OpenAI-compatible REST API (OpenAI, Groq, LM Studio, Ollama …).
    OpenAiCompatible,
}

impl Default for ServiceProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

// ---------------------------------------------------------------------------
// TranslationConfig
// ---------------------------------------------------------------------------

/// Settings for turning a pictogram sequence into a sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// When `false` every request settles on the fallback sentence.
    pub enabled: bool,
    /// Which wire format to use.
    pub provider: ServiceProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Gemini: `https://generativelanguage.googleapis.com`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key, or `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
    /// Output language of the generated sentence (`"es"` or `"en"`).
    pub language: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ServiceProvider::default(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-3-flash-preview".into(),
            temperature: 0.1,
            timeout_secs: 15,
            language: "es".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the text-to-speech service and playback format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Which wire format to use.
    pub provider: ServiceProvider,
    /// Base URL of the API endpoint.
    pub base_url: String,
    /// API key, or `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Prebuilt voice name.
    pub voice: String,
    /// Maximum seconds to wait for audio before timing out.
    pub timeout_secs: u64,
    /// Sample rate of the returned 16-bit mono PCM, in Hz.
    pub sample_rate: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: ServiceProvider::default(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-2.5-flash-preview-tts".into(),
            voice: "Kore".into(),
            timeout_secs: 30,
            sample_rate: 24_000,
        }
    }
}

// ---------------------------------------------------------------------------
// DebounceConfig
// ---------------------------------------------------------------------------

/// Trailing-edge debounce applied before each translation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet period after the last sequence edit, in milliseconds.
    pub quiet_period_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: 800,
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Where saved phrases and custom pictograms live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides [`AppPaths::store_dir`] when set.
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Directory the file store should use.
    pub fn resolve_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().store_dir)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use picto_voice::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sentence generation settings.
    pub translation: TranslationConfig,
    /// Speech synthesis settings.
    pub speech: SpeechConfig,
    /// Debounce timing.
    pub debounce: DebounceConfig,
    /// Persistent store location.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.  Missing API keys are filled from [`API_KEY_ENV`].
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&AppPaths::new().settings_file)?
            .with_env_api_key(std::env::var(API_KEY_ENV).ok()))
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fill every absent (or empty) `api_key` with `key`.
    pub fn with_env_api_key(mut self, key: Option<String>) -> Self {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return self;
        };
        for slot in [&mut self.translation.api_key, &mut self.speech.api_key] {
            if slot.as_deref().map_or(true, str::is_empty) {
                *slot = Some(key.clone());
            }
        }
        self
    }

    /// Debounce quiet period as a [`std::time::Duration`].
    pub fn quiet_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce.quiet_period_ms)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
