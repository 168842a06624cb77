//! Baseline machine translation through the public Google Translate endpoint.

use crate::defaults;
use crate::translate::provider::{ProviderError, TranslationContext, TranslationProvider};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Context-free translator used as the chain's baseline.
pub struct GoogleTranslator {
    client: reqwest::Client,
    source: String,
    target: String,
    timeout: Duration,
}

impl GoogleTranslator {
    pub fn new(source: &str, target: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            source: source.to_string(),
            target: target.to_string(),
            timeout,
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new(
            defaults::SOURCE_LANGUAGE,
            defaults::TARGET_LANGUAGE,
            Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        )
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        _context: &TranslationContext,
    ) -> Result<String, ProviderError> {
        let url = reqwest::Url::parse_with_params(
            ENDPOINT,
            &[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ProviderError::Other(format!("invalid translate URL: {}", e)))?;

        let response = self
            .client
            .get(url)
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

        let json: Value = response.json().await?;
        let translated = parse_response(&json)?;
        debug!("Google translated {} chars", text.chars().count());
        Ok(translated)
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Join the translated sentence chunks of a `translate_a/single` reply.
///
/// The reply is a nested array whose first element lists
/// `[translated, original, ...]` entries, one per source sentence.
fn parse_response(json: &Value) -> Result<String, ProviderError> {
    let sentences = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Malformed("missing sentence list".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    let translated = translated.trim();
    if translated.is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(translated.to_string())
}
