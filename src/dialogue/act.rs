//! Lexical dialogue-act classification.

use crate::dialogue::types::DialogueAct;

/// Interrogative words that mark a question anywhere in the utterance.
const QUESTION_WORDS: [&str; 6] = ["what", "how", "why", "when", "where", "who"];

/// Discourse markers typical of a reply.
const RESPONSE_MARKERS: [&str; 6] = ["well", "actually", "so", "yeah", "right", "exactly"];

/// Phrases that introduce a new topic.
const TRANSITION_PHRASES: [&str; 4] = ["speaking of", "by the way", "another thing", "also"];

/// Classify an utterance from lexical cues.
///
/// Matching is case-insensitive substring matching, so "so" also fires on
/// "also" and "how" on "show". The classifier is a fixed heuristic and these
/// overlaps are part of its behavior.
pub fn classify(text: &str) -> DialogueAct {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();

    DialogueAct {
        is_question: trimmed.ends_with('?') || contains_any(&lower, &QUESTION_WORDS),
        is_response: contains_any(&lower, &RESPONSE_MARKERS),
        is_transition: contains_any(&lower, &TRANSITION_PHRASES),
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
