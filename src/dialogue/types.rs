//! Segment types for each stage of the dialogue pipeline.
//!
//! Every stage wraps the output of the previous one instead of mutating it:
//! `RawSegment` → `DialogueSegment` → `TranslatedSegment` → `AnnotatedSegment`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A time-stamped utterance as produced by transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Original-language text.
    pub text: String,
}

impl RawSegment {
    /// Creates a new raw segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Source duration of the utterance in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One of the two conversational roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    A,
    B,
}

impl Speaker {
    /// The other speaker.
    pub fn other(self) -> Self {
        match self {
            Speaker::A => Speaker::B,
            Speaker::B => Speaker::A,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::A => "A",
            Speaker::B => "B",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heuristic conversational function of an utterance.
///
/// The flags are independent and may all be set at once. Consumers that need
/// a single answer use [`DialogueAct::primary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueAct {
    pub is_question: bool,
    pub is_response: bool,
    pub is_transition: bool,
}

/// The single act honored when several flags are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActKind {
    Question,
    Response,
    Transition,
}

impl DialogueAct {
    pub const QUESTION: Self = Self {
        is_question: true,
        is_response: false,
        is_transition: false,
    };
    pub const RESPONSE: Self = Self {
        is_question: false,
        is_response: true,
        is_transition: false,
    };
    pub const TRANSITION: Self = Self {
        is_question: false,
        is_response: false,
        is_transition: true,
    };

    /// First set flag in priority order question, response, transition.
    pub fn primary(&self) -> Option<ActKind> {
        if self.is_question {
            Some(ActKind::Question)
        } else if self.is_response {
            Some(ActKind::Response)
        } else if self.is_transition {
            Some(ActKind::Transition)
        } else {
            None
        }
    }
}

/// A segment with its dialogue act and speaker resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueSegment {
    /// Position in the original sequence.
    pub index: usize,
    pub segment: RawSegment,
    pub speaker: Speaker,
    pub act: DialogueAct,
}

impl DialogueSegment {
    pub fn text(&self) -> &str {
        &self.segment.text
    }
}

/// A dialogue segment with its naturalized Chinese translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedSegment {
    pub dialogue: DialogueSegment,
    /// Unmodified copy of the source text at translation time.
    pub original_text: String,
    /// Translation after the naturalization pass.
    pub translated_text: String,
}

impl TranslatedSegment {
    pub fn index(&self) -> usize {
        self.dialogue.index
    }

    pub fn speaker(&self) -> Speaker {
        self.dialogue.speaker
    }

    pub fn act(&self) -> DialogueAct {
        self.dialogue.act
    }

    pub fn start(&self) -> f64 {
        self.dialogue.segment.start
    }

    pub fn end(&self) -> f64 {
        self.dialogue.segment.end
    }
}

/// A translated segment carrying synthesis markup.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSegment {
    pub translated: TranslatedSegment,
    pub markup: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_segment_duration() {
        let segment = RawSegment::new(1.5, 4.0, "hello");
        assert!((segment.duration() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_speaker_other_flips() {
        assert_eq!(Speaker::A.other(), Speaker::B);
        assert_eq!(Speaker::B.other(), Speaker::A);
    }

    #[test]
    fn test_speaker_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Speaker::A).unwrap(), "\"A\"");
        assert_eq!(Speaker::B.to_string(), "B");
    }

    #[test]
    fn test_primary_prefers_question() {
        let act = DialogueAct {
            is_question: true,
            is_response: true,
            is_transition: true,
        };
        assert_eq!(act.primary(), Some(ActKind::Question));
    }

    #[test]
    fn test_primary_response_over_transition() {
        let act = DialogueAct {
            is_question: false,
            is_response: true,
            is_transition: true,
        };
        assert_eq!(act.primary(), Some(ActKind::Response));
    }

    #[test]
    fn test_primary_none_when_no_flags() {
        assert_eq!(DialogueAct::default().primary(), None);
        assert_eq!(DialogueAct::TRANSITION.primary(), Some(ActKind::Transition));
    }
}
