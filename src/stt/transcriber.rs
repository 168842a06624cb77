use crate::dialogue::types::RawSegment;
use crate::error::{Result, TalkdubError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Time-stamped transcription of one audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub segments: Vec<RawSegment>,
    pub language: String,
}

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (remote API vs mock).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a WAV file into time-stamped segments.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription>;

    /// Get the name of the transcription model
    fn model_name(&self) -> &str;
}

/// Implement Transcriber for Arc<T> to allow sharing across files.
#[async_trait]
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        (**self).transcribe(audio_path).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    model_name: String,
    segments: Vec<RawSegment>,
    should_fail: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber returning a single segment
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            segments: vec![RawSegment::new(0.0, 1.0, "mock transcription")],
            should_fail: false,
        }
    }

    /// Configure the mock to return specific segments
    pub fn with_segments(mut self, segments: Vec<RawSegment>) -> Self {
        self.segments = segments;
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<Transcription> {
        if self.should_fail {
            return Err(TalkdubError::Transcription {
                message: "mock transcription failure".to_string(),
            });
        }

        let text = self
            .segments
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Transcription {
            text,
            segments: self.segments.clone(),
            language: "en".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
