//! The translation provider seam.

use crate::dialogue::types::{DialogueAct, Speaker};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Why a single provider call did not produce a translation.
///
/// These never leave the chain: every variant is absorbed by falling back.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("empty translation")]
    Empty,

    #[error("{0}")]
    Other(String),
}

/// Dialogue context passed alongside the text to context-aware providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationContext {
    pub act: DialogueAct,
    pub speaker: Speaker,
}

impl TranslationContext {
    pub fn new(act: DialogueAct, speaker: Speaker) -> Self {
        Self { act, speaker }
    }
}

/// One translation backend.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate `text` into the target language.
    async fn translate(
        &self,
        text: &str,
        context: &TranslationContext,
    ) -> std::result::Result<String, ProviderError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: TranslationProvider + ?Sized> TranslationProvider for Arc<T> {
    async fn translate(
        &self,
        text: &str,
        context: &TranslationContext,
    ) -> std::result::Result<String, ProviderError> {
        (**self).translate(text, context).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Mock provider for testing
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    response: Option<String>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock that echoes its input with a `[name]` prefix
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response: None,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Configure the mock to return a fixed translation
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    /// Configure the mock to fail every call
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of translate calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        _context: &TranslationContext,
    ) -> std::result::Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(ProviderError::Other(format!(
                "mock provider {} failure",
                self.name
            )));
        }
        Ok(match &self.response {
            Some(response) => response.clone(),
            None => format!("[{}] {}", self.name, text),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
