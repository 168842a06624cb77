//! Speech synthesis of one marked-up string into a WAV file.

use crate::defaults;
use crate::error::{Result, TalkdubError};
use async_trait::async_trait;
use log::debug;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Trait for text-to-speech synthesis.
///
/// This trait allows swapping implementations (HTTP service vs mock).
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Render `markup` with `voice` and write a WAV file to `output_path`.
    async fn synthesize(&self, markup: &str, voice: &str, output_path: &Path) -> Result<()>;

    /// Identifier of the synthesis backend.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: Synthesizer + ?Sized> Synthesizer for Arc<T> {
    async fn synthesize(&self, markup: &str, voice: &str, output_path: &Path) -> Result<()> {
        (**self).synthesize(markup, voice, output_path).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Synthesizer backed by an OpenAI-compatible `/audio/speech` endpoint.
///
/// Pointed at a local edge-tts bridge this accepts `zh-TW-*Neural` voices
/// and the SSML subset produced by the prosody annotator.
pub struct OpenAiSpeechSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAiSpeechSynthesizer {
    pub fn new(endpoint: &str, model: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim().to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout,
        }
    }

    fn synthesis_error(voice: &str, message: impl Into<String>) -> TalkdubError {
        TalkdubError::Synthesis {
            voice: voice.to_string(),
            message: message.into(),
        }
    }
}

impl Default for OpenAiSpeechSynthesizer {
    fn default() -> Self {
        Self::new(
            defaults::TTS_ENDPOINT,
            defaults::TTS_MODEL,
            None,
            Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        )
    }
}

#[async_trait]
impl Synthesizer for OpenAiSpeechSynthesizer {
    async fn synthesize(&self, markup: &str, voice: &str, output_path: &Path) -> Result<()> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "model": self.model,
                "voice": voice,
                "input": markup,
                "response_format": "wav",
            }))
            .timeout(self.timeout);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::synthesis_error(voice, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::synthesis_error(
                voice,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::synthesis_error(voice, e.to_string()))?;
        if bytes.is_empty() {
            return Err(Self::synthesis_error(voice, "empty audio response"));
        }

        tokio::fs::write(output_path, &bytes).await?;
        debug!(
            "Synthesized {} bytes with {} to {}",
            bytes.len(),
            voice,
            output_path.display()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "openai-speech"
    }
}

/// Sample rate of the WAV files written by [`MockSynthesizer`].
pub const MOCK_SAMPLE_RATE: u32 = 16000;

/// Mock synthesizer for testing
///
/// Writes a constant-valued mono WAV and records every call.
#[derive(Debug)]
pub struct MockSynthesizer {
    duration_ms: u32,
    fail_on: Option<String>,
    should_fail: bool,
    delay: Duration,
    calls: Mutex<Vec<(String, String)>>,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSynthesizer {
    /// Create a mock that writes 200 ms of audio per call
    pub fn new() -> Self {
        Self {
            duration_ms: 200,
            fail_on: None,
            should_fail: false,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicU32::new(0),
            max_in_flight: AtomicU32::new(0),
        }
    }

    /// Configure the length of the written audio
    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Configure the mock to fail every call
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to fail calls whose markup contains `marker`
    pub fn with_failure_on(mut self, marker: &str) -> Self {
        self.fail_on = Some(marker.to_string());
        self
    }

    /// Configure a per-call delay so overlapping calls can be observed
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `(markup, voice)` pairs received so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Highest number of calls observed running at once
    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn write_wav(&self, output_path: &Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: MOCK_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let samples = (MOCK_SAMPLE_RATE as u64 * self.duration_ms as u64 / 1000) as usize;
        let mut writer = hound::WavWriter::create(output_path, spec)?;
        for _ in 0..samples {
            writer.write_sample(1000i16)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, markup: &str, voice: &str, output_path: &Path) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((markup.to_string(), voice.to_string()));
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let marked_failure = self
            .fail_on
            .as_deref()
            .is_some_and(|marker| markup.contains(marker));
        if self.should_fail || marked_failure {
            return Err(TalkdubError::Synthesis {
                voice: voice.to_string(),
                message: "mock synthesis failure".to_string(),
            });
        }

        self.write_wav(output_path)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_mock_writes_readable_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");
        let synth = MockSynthesizer::new().with_duration_ms(500);

        synth.synthesize("你好", "voice-a", &path).await.unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, MOCK_SAMPLE_RATE);
        assert_eq!(reader.duration(), 8000);
        assert_eq!(
            synth.calls(),
            vec![("你好".to_string(), "voice-a".to_string())]
        );
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");
        let synth = MockSynthesizer::new().with_failure();

        let result = synth.synthesize("你好", "voice-a", &path).await;
        match result {
            Err(TalkdubError::Synthesis { voice, .. }) => assert_eq!(voice, "voice-a"),
            _ => panic!("Expected Synthesis error"),
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_mock_failure_on_marker() {
        let dir = TempDir::new().unwrap();
        let synth = MockSynthesizer::new().with_failure_on("壞");

        assert!(synth.synthesize("好", "v", &dir.path().join("a.wav")).await.is_ok());
        assert!(synth.synthesize("壞了", "v", &dir.path().join("b.wav")).await.is_err());
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let synth = OpenAiSpeechSynthesizer::new(
            " http://localhost:5050/v1/audio/speech ",
            "tts-1",
            Some("  ".to_string()),
            Duration::from_secs(1),
        );
        assert!(synth.api_key.is_none());
        assert_eq!(synth.endpoint, "http://localhost:5050/v1/audio/speech");
        assert_eq!(synth.name(), "openai-speech");
    }
}
