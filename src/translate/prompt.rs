//! Prompt construction for the AI translation providers.

use crate::dialogue::types::{ActKind, Speaker};
use crate::translate::provider::TranslationContext;

/// Persona shared by every AI provider.
pub const SYSTEM_PROMPT: &str = "你是一個專業的英文到繁體中文翻譯專家，專門處理 Podcast 對話內容。

翻譯要求：
1. 保持對話的自然性和口語化特色
2. 根據說話者角色調整語氣（主持人 vs 嘉賓）
3. 保留對話中的語氣詞和轉折詞
4. 使用台灣繁體中文的表達習慣
5. 對於專業術語，提供自然的中文表達

請直接返回翻譯結果，不要添加任何解釋。";

const QUESTION_NOTE: &str = "注意：這是一個問句，請確保翻譯後保持疑問語氣。";
const RESPONSE_NOTE: &str = "注意：這是對前面問題的回應，請使用自然的回答語氣。";
const TRANSITION_NOTE: &str = "注意：這是話題轉換，請使用適當的轉場表達。";

/// Context addendum for the segment's primary dialogue act, if any.
pub fn context_note(context: &TranslationContext) -> Option<&'static str> {
    context.act.primary().map(|kind| match kind {
        ActKind::Question => QUESTION_NOTE,
        ActKind::Response => RESPONSE_NOTE,
        ActKind::Transition => TRANSITION_NOTE,
    })
}

fn role_label(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::A => "主持人",
        Speaker::B => "嘉賓",
    }
}

/// User message: the source text, the speaker role and at most one act note.
pub fn user_prompt(text: &str, context: &TranslationContext) -> String {
    let mut prompt = format!(
        "請將以下英文對話翻譯成自然的繁體中文（說話者：{}）：\n\n{}",
        role_label(context.speaker),
        text
    );
    if let Some(note) = context_note(context) {
        prompt.push_str("\n\n");
        prompt.push_str(note);
    }
    prompt
}

/// Single-turn prompt for providers without a separate system role.
pub fn combined_prompt(text: &str, context: &TranslationContext) -> String {
    format!("{}\n\n{}", SYSTEM_PROMPT, user_prompt(text, context))
}
