//! The bilingual transcript artifact.

use crate::dialogue::types::{DialogueAct, Speaker, TranslatedSegment};
use crate::error::{Result, TalkdubError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Local time the transcript was written, RFC 3339.
    pub timestamp: String,
    pub total_segments: usize,
    pub segments: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Seconds with two decimals and an `s` suffix, e.g. `"12.50s"`.
    pub start_time: String,
    pub end_time: String,
    pub speaker: Speaker,
    pub original_text: String,
    pub translated_text: String,
    pub dialogue_type: DialogueAct,
}

fn format_seconds(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

impl Transcript {
    pub fn from_segments(segments: &[TranslatedSegment]) -> Self {
        let entries: Vec<TranscriptEntry> = segments
            .iter()
            .map(|segment| TranscriptEntry {
                start_time: format_seconds(segment.start()),
                end_time: format_seconds(segment.end()),
                speaker: segment.speaker(),
                original_text: segment.original_text.clone(),
                translated_text: segment.translated_text.clone(),
                dialogue_type: segment.act(),
            })
            .collect();

        Self {
            timestamp: chrono::Local::now().to_rfc3339(),
            total_segments: entries.len(),
            segments: entries,
        }
    }

    /// Write as pretty-printed UTF-8 JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| TalkdubError::Artifact {
            artifact: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::types::{DialogueSegment, RawSegment};
    use tempfile::TempDir;

    fn segment() -> TranslatedSegment {
        TranslatedSegment {
            dialogue: DialogueSegment {
                index: 0,
                segment: RawSegment::new(1.0, 3.456, "What is AI?"),
                speaker: Speaker::B,
                act: DialogueAct::QUESTION,
            },
            original_text: "What is AI?".to_string(),
            translated_text: "什麼是人工智慧？".to_string(),
        }
    }

    #[test]
    fn test_entry_fields() {
        let transcript = Transcript::from_segments(&[segment()]);

        assert_eq!(transcript.total_segments, 1);
        let entry = &transcript.segments[0];
        assert_eq!(entry.start_time, "1.00s");
        assert_eq!(entry.end_time, "3.46s");
        assert_eq!(entry.speaker, Speaker::B);
        assert!(entry.dialogue_type.is_question);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let transcript = Transcript::from_segments(&[]);
        assert!(chrono::DateTime::parse_from_rfc3339(&transcript.timestamp).is_ok());
        assert_eq!(transcript.total_segments, 0);
    }

    #[test]
    fn test_written_json_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transcript.json");
        Transcript::from_segments(&[segment()]).write(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("什麼是人工智慧？"));

        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["total_segments"], 1);
        assert_eq!(json["segments"][0]["speaker"], "B");
        assert_eq!(json["segments"][0]["dialogue_type"]["is_question"], true);
        assert_eq!(json["segments"][0]["dialogue_type"]["is_transition"], false);
    }

    #[test]
    fn test_write_to_missing_dir_is_artifact_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("transcript.json");
        assert!(matches!(
            Transcript::from_segments(&[]).write(&path),
            Err(TalkdubError::Artifact { .. })
        ));
    }
}
