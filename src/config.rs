use crate::defaults;
use crate::error::{Result, TalkdubError};
use crate::speech::adapter::VoiceAssignment;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub translation: TranslationConfig,
    pub transcription: TranscriptionConfig,
    pub synthesis: SynthesisConfig,
    pub batch: BatchConfig,
    /// Credentials come from the environment only and are never serialized.
    #[serde(skip)]
    pub credentials: Credentials,
}

/// Translation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub provider: ProviderKind,
    pub source_language: String,
    pub target_language: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub gemini_model: String,
    pub timeout_secs: u64,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub model: String,
    pub base_url: String,
    pub fallback_segment_secs: f64,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    pub endpoint: String,
    pub model: String,
    pub voice_a: String,
    pub voice_b: String,
    pub max_concurrent: usize,
}

/// Batch processing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    pub max_concurrent: usize,
}

/// API credentials read from the environment.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub tts_api_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "***"))
            .field("tts_api_key", &self.tts_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Primary translation provider selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Google,
    Openai,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::Openai => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = TalkdubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(ProviderKind::Google),
            "openai" => Ok(ProviderKind::Openai),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(TalkdubError::ConfigInvalidValue {
                key: "translation.provider".to_string(),
                message: format!("unknown provider '{}' (expected google, openai or gemini)", other),
            }),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Google,
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
            openai_model: defaults::OPENAI_MODEL.to_string(),
            openai_base_url: defaults::OPENAI_BASE_URL.to_string(),
            gemini_model: defaults::GEMINI_MODEL.to_string(),
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: defaults::TRANSCRIPTION_MODEL.to_string(),
            base_url: defaults::OPENAI_BASE_URL.to_string(),
            fallback_segment_secs: defaults::FALLBACK_SEGMENT_SECS,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::TTS_ENDPOINT.to_string(),
            model: defaults::TTS_MODEL.to_string(),
            voice_a: defaults::VOICE_A.to_string(),
            voice_b: defaults::VOICE_B.to_string(),
            max_concurrent: defaults::SYNTHESIS_MAX_CONCURRENT,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::BATCH_MAX_CONCURRENT,
        }
    }
}

/// Read a non-empty environment variable.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load `KEY=value` pairs from a `.env` file into the process environment.
///
/// Variables that are already set keep their values. Returns `Ok(false)` when
/// the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(TalkdubError::ConfigInvalidValue {
            key: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

impl Config {
    /// Commented configuration template with every default spelled out,
    /// followed by the environment variables a `.env` file may set.
    pub fn dump_template() -> String {
        format!(
            r#"# talkdub configuration
# Save as {path}

[translation]
# Primary translator: google | openai | gemini
# openai and gemini fall back to google when their API key is missing.
provider = "google"
source_language = "{source}"
target_language = "{target}"
openai_model = "{openai_model}"
openai_base_url = "{openai_base_url}"
gemini_model = "{gemini_model}"
timeout_secs = {timeout}

[transcription]
model = "{stt_model}"
base_url = "{openai_base_url}"
# Length of placeholder segments when transcription is unavailable
fallback_segment_secs = {fallback:.1}

[synthesis]
# OpenAI-compatible /audio/speech endpoint
endpoint = "{tts_endpoint}"
model = "{tts_model}"
# Speaker A (host) and speaker B (guest)
voice_a = "{voice_a}"
voice_b = "{voice_b}"
max_concurrent = {synth_jobs}

[batch]
max_concurrent = {batch_jobs}

# Credentials are read from the environment or a .env file
# in the working directory, never from this file:
#
# OPENAI_API_KEY=
# GEMINI_API_KEY=
# TTS_API_KEY=
#
# Other overrides:
#
# TRANSLATION_PROVIDER=google
# OPENAI_MODEL={openai_model}
# GEMINI_MODEL={gemini_model}
# EDGE_TTS_VOICE_FEMALE={voice_a}
# EDGE_TTS_VOICE_MALE={voice_b}
# TTS_ENDPOINT={tts_endpoint}
# MAX_CONCURRENT_JOBS={batch_jobs}
"#,
            path = Self::default_path().display(),
            source = defaults::SOURCE_LANGUAGE,
            target = defaults::TARGET_LANGUAGE,
            openai_model = defaults::OPENAI_MODEL,
            openai_base_url = defaults::OPENAI_BASE_URL,
            gemini_model = defaults::GEMINI_MODEL,
            timeout = defaults::REQUEST_TIMEOUT_SECS,
            stt_model = defaults::TRANSCRIPTION_MODEL,
            fallback = defaults::FALLBACK_SEGMENT_SECS,
            tts_endpoint = defaults::TTS_ENDPOINT,
            tts_model = defaults::TTS_MODEL,
            voice_a = defaults::VOICE_A,
            voice_b = defaults::VOICE_B,
            synth_jobs = defaults::SYNTHESIS_MAX_CONCURRENT,
            batch_jobs = defaults::BATCH_MAX_CONCURRENT,
        )
    }

    /// Load configuration from a TOML file
    ///
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TalkdubError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                TalkdubError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(TalkdubError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - TRANSLATION_PROVIDER → translation.provider
    /// - OPENAI_API_KEY → OpenAI credential (translation and transcription)
    /// - OPENAI_MODEL → translation.openai_model
    /// - GEMINI_API_KEY, or GOOGLE_API_KEY → Gemini credential
    /// - GEMINI_MODEL → translation.gemini_model
    /// - EDGE_TTS_VOICE_FEMALE → synthesis.voice_a
    /// - EDGE_TTS_VOICE_MALE → synthesis.voice_b
    /// - TTS_ENDPOINT → synthesis.endpoint
    /// - TTS_API_KEY → synthesis credential
    /// - MAX_CONCURRENT_JOBS → batch.max_concurrent
    ///
    /// Empty values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(provider) = env_value("TRANSLATION_PROVIDER") {
            match provider.parse() {
                Ok(kind) => self.translation.provider = kind,
                Err(e) => warn!("Ignoring TRANSLATION_PROVIDER: {}", e),
            }
        }

        if let Some(key) = env_value("OPENAI_API_KEY") {
            self.credentials.openai_api_key = Some(key);
        }

        if let Some(model) = env_value("OPENAI_MODEL") {
            self.translation.openai_model = model;
        }

        if let Some(key) = env_value("GEMINI_API_KEY").or_else(|| env_value("GOOGLE_API_KEY")) {
            self.credentials.gemini_api_key = Some(key);
        }

        if let Some(model) = env_value("GEMINI_MODEL") {
            self.translation.gemini_model = model;
        }

        if let Some(voice) = env_value("EDGE_TTS_VOICE_FEMALE") {
            self.synthesis.voice_a = voice;
        }

        if let Some(voice) = env_value("EDGE_TTS_VOICE_MALE") {
            self.synthesis.voice_b = voice;
        }

        if let Some(endpoint) = env_value("TTS_ENDPOINT") {
            self.synthesis.endpoint = endpoint;
        }

        if let Some(key) = env_value("TTS_API_KEY") {
            self.credentials.tts_api_key = Some(key);
        }

        if let Some(jobs) = env_value("MAX_CONCURRENT_JOBS") {
            match jobs.parse::<usize>() {
                Ok(n) => self.batch.max_concurrent = n,
                Err(_) => warn!("Ignoring MAX_CONCURRENT_JOBS: '{}' is not a number", jobs),
            }
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/talkdub/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("talkdub")
            .join("config.toml")
    }

    /// Validate and freeze the configuration for a run.
    ///
    /// A selected AI provider without a credential downgrades to Google with
    /// a warning rather than failing.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let mut warnings = Vec::new();

        let openai = self
            .credentials
            .openai_api_key
            .as_ref()
            .map(|api_key| AiProviderSettings {
                model: self.translation.openai_model.clone(),
                api_key: api_key.clone(),
            });
        let gemini = self
            .credentials
            .gemini_api_key
            .as_ref()
            .map(|api_key| AiProviderSettings {
                model: self.translation.gemini_model.clone(),
                api_key: api_key.clone(),
            });

        let provider = match self.translation.provider {
            ProviderKind::Openai if openai.is_none() => {
                warnings.push(
                    "translation provider 'openai' selected but OPENAI_API_KEY is not set; using google"
                        .to_string(),
                );
                ProviderKind::Google
            }
            ProviderKind::Gemini if gemini.is_none() => {
                warnings.push(
                    "translation provider 'gemini' selected but GEMINI_API_KEY is not set; using google"
                        .to_string(),
                );
                ProviderKind::Google
            }
            selected => selected,
        };

        if self.credentials.openai_api_key.is_none() {
            warnings.push(
                "OPENAI_API_KEY is not set; transcription will use placeholder segments".to_string(),
            );
        }

        for (key, voice) in [
            ("synthesis.voice_a", &self.synthesis.voice_a),
            ("synthesis.voice_b", &self.synthesis.voice_b),
        ] {
            if voice.trim().is_empty() {
                return Err(TalkdubError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: "voice name must not be empty".to_string(),
                });
            }
        }

        if self.transcription.fallback_segment_secs <= 0.0 {
            return Err(TalkdubError::ConfigInvalidValue {
                key: "transcription.fallback_segment_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        Ok(ResolvedConfig {
            provider,
            openai,
            gemini,
            source_language: self.translation.source_language.clone(),
            target_language: self.translation.target_language.clone(),
            openai_base_url: self.translation.openai_base_url.clone(),
            timeout_secs: self.translation.timeout_secs.max(1),
            transcription: self.transcription.clone(),
            transcription_api_key: self.credentials.openai_api_key.clone(),
            voices: VoiceAssignment::new(
                self.synthesis.voice_a.trim(),
                self.synthesis.voice_b.trim(),
            ),
            tts_endpoint: self.synthesis.endpoint.clone(),
            tts_model: self.synthesis.model.clone(),
            tts_api_key: self.credentials.tts_api_key.clone(),
            synthesis_max_concurrent: self.synthesis.max_concurrent.max(1),
            batch_max_concurrent: self.batch.max_concurrent.max(1),
            warnings,
        })
    }
}

/// Model and credential of an AI translation provider.
#[derive(Clone, PartialEq)]
pub struct AiProviderSettings {
    pub model: String,
    pub api_key: String,
}

impl fmt::Debug for AiProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiProviderSettings")
            .field("model", &self.model)
            .field("api_key", &"***")
            .finish()
    }
}

/// Immutable, validated configuration of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Primary translation provider after credential checks.
    pub provider: ProviderKind,
    pub openai: Option<AiProviderSettings>,
    pub gemini: Option<AiProviderSettings>,
    pub source_language: String,
    pub target_language: String,
    pub openai_base_url: String,
    pub timeout_secs: u64,
    pub transcription: TranscriptionConfig,
    pub transcription_api_key: Option<String>,
    pub voices: VoiceAssignment,
    pub tts_endpoint: String,
    pub tts_model: String,
    pub tts_api_key: Option<String>,
    pub synthesis_max_concurrent: usize,
    pub batch_max_concurrent: usize,
    /// Problems that were corrected during resolution.
    pub warnings: Vec<String>,
}

impl ResolvedConfig {
    /// Replace the voices, keeping any side not given.
    pub fn with_voices(mut self, voice_a: Option<String>, voice_b: Option<String>) -> Self {
        if let Some(a) = voice_a.filter(|v| !v.trim().is_empty()) {
            self.voices.a = a;
        }
        if let Some(b) = voice_b.filter(|v| !v.trim().is_empty()) {
            self.voices.b = b;
        }
        self
    }

    pub fn with_batch_concurrency(mut self, max_concurrent: Option<usize>) -> Self {
        if let Some(n) = max_concurrent {
            self.batch_max_concurrent = n.max(1);
        }
        self
    }
}
