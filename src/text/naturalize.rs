//! Rule-based rewrite of a raw translation into spoken Chinese.

use crate::dialogue::types::{ActKind, DialogueAct};

/// Openers that already make a question sound conversational.
const QUESTION_OPENERS: [&str; 4] = ["那麼", "所以", "那", "嗯"];

/// Interrogatives ("what", "how") that get a natural opener.
const QUESTION_WORDS: [&str; 2] = ["什麼", "怎麼"];

/// Opener prepended to interrogative questions.
const QUESTION_OPENER: &str = "那";

/// Openers that already mark a reply.
const RESPONSE_OPENERS: [&str; 5] = ["嗯", "對", "是的", "沒錯", "確實"];

/// Opener prepended to replies.
const RESPONSE_OPENER: &str = "嗯，";

/// Phrases that already mark a topic change.
const TRANSITION_PHRASES: [&str; 4] = ["說到這個", "順便說一下", "另外", "還有"];

/// Phrase prepended to topic changes.
const TRANSITION_OPENER: &str = "說到這個，";

/// Full-width comma used as the clause separator.
const COMMA: char = '，';

/// Sentence-internal particle attached to the first clause of long sentences.
const CLAUSE_PARTICLE: &str = "呢";

/// Sentences longer than this many characters get the clause particle.
pub const LONG_SENTENCE_CHARS: usize = 50;

/// Rewrite a translation so it reads as natural spoken dialogue.
///
/// Only one dialogue-act branch runs, chosen by question, response, transition
/// priority. The long-sentence particle pass runs afterwards regardless of
/// branch, so it can attach to an opener the branch just prepended.
pub fn naturalize(translated: &str, act: DialogueAct) -> String {
    let mut text = translated.to_string();

    match act.primary() {
        Some(ActKind::Question) => {
            if !text.ends_with('？') && !text.ends_with('?') {
                text.push('？');
            }
            if !starts_with_any(&text, &QUESTION_OPENERS) && contains_any(&text, &QUESTION_WORDS)
            {
                text.insert_str(0, QUESTION_OPENER);
            }
        }
        Some(ActKind::Response) => {
            if !starts_with_any(&text, &RESPONSE_OPENERS) {
                text.insert_str(0, RESPONSE_OPENER);
            }
        }
        Some(ActKind::Transition) => {
            if !contains_any(&text, &TRANSITION_PHRASES) {
                text.insert_str(0, TRANSITION_OPENER);
            }
        }
        None => {}
    }

    add_clause_particle(&text)
}

/// Append the particle to the first clause of a long, multi-clause sentence.
fn add_clause_particle(text: &str) -> String {
    if text.chars().count() <= LONG_SENTENCE_CHARS || !text.contains(COMMA) {
        return text.to_string();
    }

    let mut parts: Vec<String> = text.split(COMMA).map(str::to_string).collect();
    if let Some(first) = parts.first_mut() {
        first.push_str(CLAUSE_PARTICLE);
    }
    parts.join(&COMMA.to_string())
}

fn starts_with_any(text: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| text.starts_with(prefix))
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
