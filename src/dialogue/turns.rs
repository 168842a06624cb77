//! Speaker-turn tracking from dialogue acts.
//!
//! A two-state machine over {A, B}. Without acoustic diarization the only
//! signals are the current segment's dialogue act, the previous speaker and
//! the utterance length.

use crate::dialogue::act::classify;
use crate::dialogue::types::{DialogueSegment, RawSegment, Speaker};
use log::debug;

/// Segments longer than this many characters are treated as a new turn when
/// no dialogue-act rule applies.
pub const LONG_UTTERANCE_CHARS: usize = 100;

/// Running speaker state across an ordered segment sequence.
#[derive(Debug, Default)]
pub struct TurnTracker {
    previous: Option<Speaker>,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one segment and decide its speaker.
    ///
    /// Rules, first match wins:
    /// 1. first segment → A
    /// 2. question after A → B
    /// 3. response after B → A
    /// 4. otherwise keep the previous speaker, flipping on long utterances
    ///
    /// Rule 4 splits long monologues into false turns. That is a known
    /// limitation of the heuristic.
    pub fn next(&mut self, index: usize, segment: RawSegment) -> DialogueSegment {
        let act = classify(&segment.text);

        let speaker = match self.previous {
            None => Speaker::A,
            Some(Speaker::A) if act.is_question => Speaker::B,
            Some(Speaker::B) if act.is_response => Speaker::A,
            Some(previous) => {
                if segment.text.trim().chars().count() > LONG_UTTERANCE_CHARS {
                    previous.other()
                } else {
                    previous
                }
            }
        };

        self.previous = Some(speaker);

        DialogueSegment {
            index,
            segment,
            speaker,
            act,
        }
    }
}

/// Attach dialogue acts and speakers to an ordered sequence of segments.
///
/// Output order and length match the input.
pub fn assign_speakers(segments: Vec<RawSegment>) -> Vec<DialogueSegment> {
    let mut tracker = TurnTracker::new();
    let assigned: Vec<DialogueSegment> = segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| tracker.next(index, segment))
        .collect();

    let speaker_b_turns = assigned.iter().filter(|s| s.speaker == Speaker::B).count();
    debug!(
        "Dialogue analysis: {} segments, {} assigned to speaker B",
        assigned.len(),
        speaker_b_turns
    );

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> RawSegment {
        RawSegment::new(0.0, 1.0, text)
    }

    fn speakers(texts: &[&str]) -> Vec<Speaker> {
        assign_speakers(texts.iter().map(|t| raw(t)).collect())
            .into_iter()
            .map(|s| s.speaker)
            .collect()
    }

    #[test]
    fn first_segment_is_always_a() {
        assert_eq!(speakers(&["What is AI?"]), vec![Speaker::A]);
        assert_eq!(speakers(&["Plain statement."]), vec![Speaker::A]);
    }

    #[test]
    fn question_after_a_switches_to_b() {
        assert_eq!(
            speakers(&["Hello there.", "What do you think?"]),
            vec![Speaker::A, Speaker::B]
        );
    }

    #[test]
    fn response_after_b_switches_to_a() {
        assert_eq!(
            speakers(&["Hi.", "What is it?", "Well, it's complicated."]),
            vec![Speaker::A, Speaker::B, Speaker::A]
        );
    }

    #[test]
    fn question_after_b_stays_b() {
        assert_eq!(
            speakers(&["Hi.", "What is it?", "Why is it?"]),
            vec![Speaker::A, Speaker::B, Speaker::B]
        );
    }

    #[test]
    fn neutral_segment_keeps_previous_speaker() {
        assert_eq!(
            speakers(&["Hi.", "Nice to meet you.", "Thanks for having me."]),
            vec![Speaker::A, Speaker::A, Speaker::A]
        );
    }

    #[test]
    fn long_neutral_segment_flips_speaker() {
        let long = "a".repeat(LONG_UTTERANCE_CHARS + 1);
        assert_eq!(speakers(&["Hi.", long.as_str()]), vec![Speaker::A, Speaker::B]);
    }

    #[test]
    fn exactly_threshold_length_does_not_flip() {
        let exact = "a".repeat(LONG_UTTERANCE_CHARS);
        assert_eq!(speakers(&["Hi.", exact.as_str()]), vec![Speaker::A, Speaker::A]);
    }

    #[test]
    fn long_first_segment_is_still_a() {
        let long = "b".repeat(300);
        assert_eq!(speakers(&[long.as_str()]), vec![Speaker::A]);
    }

    #[test]
    fn long_response_after_b_returns_to_a() {
        let long_response = format!("Well, {}", "b".repeat(200));
        assert_eq!(
            speakers(&["Hi.", "What is it?", long_response.as_str()]),
            vec![Speaker::A, Speaker::B, Speaker::A]
        );
    }

    #[test]
    fn long_response_after_a_flips_to_b() {
        // Rule 3 needs previous = B, so rule 4 applies and flips A to B
        let long_response = format!("Yeah, {}", "b".repeat(200));
        assert_eq!(
            speakers(&["Hi.", long_response.as_str()]),
            vec![Speaker::A, Speaker::B]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 60 CJK characters are 180 bytes but only 60 characters
        let cjk = "字".repeat(60);
        assert_eq!(speakers(&["Hi.", cjk.as_str()]), vec![Speaker::A, Speaker::A]);
    }

    #[test]
    fn output_preserves_order_and_length() {
        let texts = ["One.", "What two?", "Well three.", "Four.", "Five?"];
        let assigned = assign_speakers(texts.iter().map(|t| raw(t)).collect());

        assert_eq!(assigned.len(), texts.len());
        for (i, segment) in assigned.iter().enumerate() {
            assert_eq!(segment.index, i);
            assert_eq!(segment.text(), texts[i]);
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(assign_speakers(Vec::new()).is_empty());
    }
}
