//! OpenAI-compatible transcription API backend.

use crate::dialogue::types::RawSegment;
use crate::error::{Result, TalkdubError};
use crate::stt::transcriber::{Transcriber, Transcription};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// `verbose_json` reply of `/audio/transcriptions`.
#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<VerboseSegment>,
}

#[derive(Debug, Deserialize)]
struct VerboseSegment {
    start: f64,
    end: f64,
    text: String,
}

/// Remote transcriber using segment timestamps from `verbose_json`.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl WhisperApiTranscriber {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/audio/transcriptions",
                base_url.trim().trim_end_matches('/')
            ),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    fn error(message: impl Into<String>) -> TalkdubError {
        TalkdubError::Transcription {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        info!(
            "Transcribing {} ({} bytes) with {}",
            audio_path.display(),
            bytes.len(),
            self.model
        );

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| Self::error(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Self::error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::error(format!("API error {}: {}", status, body)));
        }

        let reply: VerboseTranscription = response
            .json()
            .await
            .map_err(|e| Self::error(format!("malformed response: {}", e)))?;
        let transcription = into_transcription(reply);
        debug!(
            "Transcription returned {} segments",
            transcription.segments.len()
        );
        Ok(transcription)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Keep segments with non-blank text and a positive time span, trimmed.
fn into_transcription(reply: VerboseTranscription) -> Transcription {
    let segments = reply
        .segments
        .into_iter()
        .filter(|s| !s.text.trim().is_empty())
        .filter(|s| {
            let valid = s.start >= 0.0 && s.end > s.start;
            if !valid {
                warn!(
                    "Dropping segment with invalid timing {:.2}s-{:.2}s: {}",
                    s.start,
                    s.end,
                    s.text.trim()
                );
            }
            valid
        })
        .map(|s| RawSegment::new(s.start, s.end, s.text.trim()))
        .collect();

    Transcription {
        text: reply.text.trim().to_string(),
        segments,
        language: reply.language.unwrap_or_else(|| "en".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_base_url() {
        let transcriber = WhisperApiTranscriber::new(
            "https://api.openai.com/v1/",
            "whisper-1",
            "sk-test",
            Duration::from_secs(5),
        );
        assert_eq!(
            transcriber.endpoint,
            "https://api.openai.com/v1/audio/transcriptions"
        );
        assert_eq!(transcriber.model_name(), "whisper-1");
    }

    #[test]
    fn test_verbose_reply_maps_to_segments() {
        let reply: VerboseTranscription = serde_json::from_str(
            r#"{
                "task": "transcribe",
                "language": "english",
                "duration": 6.5,
                "text": " Hello there. What is AI? ",
                "segments": [
                    {"id": 0, "start": 0.0, "end": 2.5, "text": " Hello there."},
                    {"id": 1, "start": 2.5, "end": 3.0, "text": "  "},
                    {"id": 2, "start": 3.0, "end": 6.5, "text": " What is AI?"}
                ]
            }"#,
        )
        .unwrap();

        let transcription = into_transcription(reply);
        assert_eq!(transcription.text, "Hello there. What is AI?");
        assert_eq!(transcription.language, "english");
        assert_eq!(
            transcription.segments,
            vec![
                RawSegment::new(0.0, 2.5, "Hello there."),
                RawSegment::new(3.0, 6.5, "What is AI?"),
            ]
        );
    }

    #[test]
    fn test_segments_without_positive_span_are_dropped() {
        let reply: VerboseTranscription = serde_json::from_str(
            r#"{
                "text": "One. Two. Three.",
                "segments": [
                    {"start": 0.0, "end": 2.0, "text": "One."},
                    {"start": 2.0, "end": 2.0, "text": "Two."},
                    {"start": 5.0, "end": 4.0, "text": "Three."},
                    {"start": 5.0, "end": 6.0, "text": "Four."}
                ]
            }"#,
        )
        .unwrap();

        let transcription = into_transcription(reply);
        assert_eq!(
            transcription.segments,
            vec![
                RawSegment::new(0.0, 2.0, "One."),
                RawSegment::new(5.0, 6.0, "Four."),
            ]
        );
        assert!(transcription.segments.iter().all(|s| s.end > s.start));
    }

    #[test]
    fn test_reply_without_segments() {
        let reply: VerboseTranscription = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        let transcription = into_transcription(reply);
        assert!(transcription.segments.is_empty());
        assert_eq!(transcription.language, "en");
    }
}
