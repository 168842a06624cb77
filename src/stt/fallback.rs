//! Placeholder transcription used when no transcription service is usable.

use crate::audio::wav::wav_duration_secs;
use crate::dialogue::types::RawSegment;
use crate::error::{Result, TalkdubError};
use crate::stt::transcriber::{Transcriber, Transcription};
use log::{info, warn};
use std::path::Path;

/// Text of the whole placeholder transcription.
pub const PLACEHOLDER_TEXT: &str = "Transcription unavailable, add the transcript manually.";

/// Evenly spaced placeholder segments covering `duration` seconds.
///
/// Produces `ceil(duration / segment_secs)` segments; the last one ends at
/// `duration` and is never zero-length.
pub fn placeholder_segments(duration: f64, segment_secs: f64) -> Vec<RawSegment> {
    if duration <= 0.0 || segment_secs <= 0.0 {
        return Vec::new();
    }

    let count = (duration / segment_secs).ceil() as usize;
    (0..count)
        .map(|i| {
            let start = i as f64 * segment_secs;
            let end = ((i + 1) as f64 * segment_secs).min(duration);
            RawSegment::new(
                start,
                end,
                format!("[Audio segment {}] transcription unavailable", i + 1),
            )
        })
        .collect()
}

/// Placeholder transcription of the WAV file at `audio_path`.
pub fn fallback_transcription(audio_path: &Path, segment_secs: f64) -> Result<Transcription> {
    let duration = wav_duration_secs(audio_path)?;
    let segments = placeholder_segments(duration, segment_secs);
    if segments.is_empty() {
        return Err(TalkdubError::Transcription {
            message: format!("{} contains no audio", audio_path.display()),
        });
    }

    info!(
        "Fallback transcription: {} placeholder segments over {:.1}s",
        segments.len(),
        duration
    );
    Ok(Transcription {
        text: PLACEHOLDER_TEXT.to_string(),
        segments,
        language: "en".to_string(),
    })
}

/// Transcribe with `transcriber`, or fall back to placeholders when it is
/// absent or fails.
pub async fn transcribe_with_fallback(
    transcriber: Option<&dyn Transcriber>,
    audio_path: &Path,
    segment_secs: f64,
) -> Result<Transcription> {
    match transcriber {
        Some(transcriber) => match transcriber.transcribe(audio_path).await {
            Ok(transcription) => Ok(transcription),
            Err(e) => {
                warn!(
                    "Transcription with {} failed, using placeholder segments: {}",
                    transcriber.model_name(),
                    e
                );
                fallback_transcription(audio_path, segment_secs)
            }
        },
        None => {
            warn!("No transcription service configured, using placeholder segments");
            fallback_transcription(audio_path, segment_secs)
        }
    }
}
