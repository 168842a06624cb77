//! Prompted translation through the Gemini `generateContent` API.

use crate::translate::prompt::combined_prompt;
use crate::translate::provider::{ProviderError, TranslationContext, TranslationProvider};
use async_trait::async_trait;
use log::debug;
use serde_json::{Value, json};
use std::time::Duration;

const API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiTranslator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiTranslator {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_ROOT, self.model)
    }
}

fn request_body(text: &str, context: &TranslationContext) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": combined_prompt(text, context) }]
        }],
        "generationConfig": { "temperature": 0.3 }
    })
}

#[async_trait]
impl TranslationProvider for GeminiTranslator {
    async fn translate(
        &self,
        text: &str,
        context: &TranslationContext,
    ) -> Result<String, ProviderError> {
        debug!("Sending translation request to Gemini ({})", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(text, context))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        parse_response(&json)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Text of the first part of the first candidate.
fn parse_response(json: &Value) -> Result<String, ProviderError> {
    let text = json
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::Malformed("no candidate text in response".to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::types::{DialogueAct, Speaker};

    #[test]
    fn test_endpoint_includes_model() {
        let translator = GeminiTranslator::new("key", "gemini-2.0-flash", Duration::from_secs(5));
        assert_eq!(
            translator.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_carries_prompt() {
        let context = TranslationContext::new(DialogueAct::RESPONSE, Speaker::A);
        let body = request_body("Well, yes.", &context);
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Well, yes."));
        assert!(prompt.contains("回應"));
    }

    #[test]
    fn test_parse_first_candidate() {
        let reply = json!({
            "candidates": [
                {"content": {"parts": [{"text": " 嗯，是的。 "}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        });
        assert_eq!(parse_response(&reply).unwrap(), "嗯，是的。");
    }

    #[test]
    fn test_parse_blocked_response_is_malformed() {
        let reply = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert!(matches!(
            parse_response(&reply),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_blank_text_is_empty() {
        let reply = json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]});
        assert!(matches!(parse_response(&reply), Err(ProviderError::Empty)));
    }
}
