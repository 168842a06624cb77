//! SSML pause and intonation markup keyed to dialogue act.

use crate::dialogue::types::DialogueAct;

const QUESTION_BREAK: &str = r#"<break time="500ms"/>"#;
const COMMA_BREAK: &str = r#"<break time="300ms"/>"#;
const PERIOD_BREAK: &str = r#"<break time="500ms"/>"#;

const QUESTION_PROSODY_OPEN: &str = r#"<prosody rate="0.9" pitch="+5%">"#;
const RESPONSE_PROSODY_OPEN: &str = r#"<prosody rate="1.0" pitch="-2%">"#;
const PROSODY_CLOSE: &str = "</prosody>";

/// Annotate naturalized text with pauses and an act-specific prosody wrapper.
///
/// Questions get a pause before every question mark (full- or half-width).
/// Every `，` and `。` is followed by a pause. Markup characters in the text
/// are escaped. Questions are wrapped with a slower, higher contour; responses
/// (that are not questions) with a neutral, slightly lower one.
pub fn annotate(text: &str, act: DialogueAct) -> String {
    let mut marked = String::with_capacity(text.len() * 2);

    for ch in text.chars() {
        if act.is_question && (ch == '？' || ch == '?') {
            marked.push_str(QUESTION_BREAK);
        }
        match ch {
            '&' => marked.push_str("&amp;"),
            '<' => marked.push_str("&lt;"),
            '>' => marked.push_str("&gt;"),
            _ => marked.push(ch),
        }
        match ch {
            '，' => marked.push_str(COMMA_BREAK),
            '。' => marked.push_str(PERIOD_BREAK),
            _ => {}
        }
    }

    if act.is_question {
        format!("{QUESTION_PROSODY_OPEN}{marked}{PROSODY_CLOSE}")
    } else if act.is_response {
        format!("{RESPONSE_PROSODY_OPEN}{marked}{PROSODY_CLOSE}")
    } else {
        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(
            annotate("AT&T 的 <新> 方案。", DialogueAct::default()),
            r#"AT&amp;T 的 &lt;新&gt; 方案。<break time="500ms"/>"#
        );
    }

    #[test]
    fn escaped_text_inside_question_wrapper() {
        assert_eq!(
            annotate("R&D 呢？", DialogueAct::QUESTION),
            r#"<prosody rate="0.9" pitch="+5%">R&amp;D 呢<break time="500ms"/>？</prosody>"#
        );
    }

    #[test]
    fn question_gets_break_before_mark_and_wrapper() {
        assert_eq!(
            annotate("你好嗎？", DialogueAct::QUESTION),
            r#"<prosody rate="0.9" pitch="+5%">你好嗎<break time="500ms"/>？</prosody>"#
        );
    }

    #[test]
    fn half_width_question_mark_also_gets_break() {
        let marked = annotate("真的?", DialogueAct::QUESTION);
        assert!(marked.contains(r#"真的<break time="500ms"/>?"#));
    }

    #[test]
    fn question_mark_without_question_act_gets_no_break() {
        assert_eq!(annotate("什麼？", DialogueAct::default()), "什麼？");
    }

    #[test]
    fn comma_and_period_get_pauses() {
        assert_eq!(
            annotate("你好，歡迎。", DialogueAct::default()),
            r#"你好，<break time="300ms"/>歡迎。<break time="500ms"/>"#
        );
    }

    #[test]
    fn response_gets_lower_contour() {
        assert_eq!(
            annotate("嗯，對。", DialogueAct::RESPONSE),
            r#"<prosody rate="1.0" pitch="-2%">嗯，<break time="300ms"/>對。<break time="500ms"/></prosody>"#
        );
    }

    #[test]
    fn question_wrapper_wins_over_response() {
        let act = DialogueAct {
            is_question: true,
            is_response: true,
            is_transition: false,
        };
        let marked = annotate("是嗎？", act);
        assert!(marked.starts_with(QUESTION_PROSODY_OPEN));
        assert_eq!(marked.matches(PROSODY_CLOSE).count(), 1);
    }

    #[test]
    fn transition_gets_no_wrapper() {
        assert_eq!(
            annotate("說到這個，", DialogueAct::TRANSITION),
            r#"說到這個，<break time="300ms"/>"#
        );
    }

    #[test]
    fn every_question_mark_gets_a_break() {
        let marked = annotate("是嗎？真的?", DialogueAct::QUESTION);
        assert_eq!(marked.matches(QUESTION_BREAK).count(), 2);
    }
}
