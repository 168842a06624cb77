//! Primary + baseline composition that always yields a translation.

use crate::translate::provider::{TranslationContext, TranslationProvider};
use log::{debug, warn};
use std::sync::Arc;

/// An optional context-aware primary provider backed by a baseline.
///
/// A failed primary falls back to the baseline; a failed baseline returns the
/// source text unchanged. [`ProviderChain::translate`] therefore never fails.
#[derive(Clone)]
pub struct ProviderChain {
    primary: Option<Arc<dyn TranslationProvider>>,
    baseline: Arc<dyn TranslationProvider>,
}

impl ProviderChain {
    pub fn new(
        primary: Option<Arc<dyn TranslationProvider>>,
        baseline: Arc<dyn TranslationProvider>,
    ) -> Self {
        Self { primary, baseline }
    }

    /// Chain with the baseline only.
    pub fn baseline_only(baseline: Arc<dyn TranslationProvider>) -> Self {
        Self::new(None, baseline)
    }

    /// Name of the provider tried first.
    pub fn primary_name(&self) -> &str {
        match &self.primary {
            Some(primary) => primary.name(),
            None => self.baseline.name(),
        }
    }

    pub async fn translate(&self, text: &str, context: &TranslationContext) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        if let Some(primary) = &self.primary {
            match primary.translate(text, context).await {
                Ok(translated) if !translated.trim().is_empty() => return translated,
                Ok(_) => warn!(
                    "{} returned an empty translation, falling back to {}",
                    primary.name(),
                    self.baseline.name()
                ),
                Err(e) => warn!(
                    "{} translation failed, falling back to {}: {}",
                    primary.name(),
                    self.baseline.name(),
                    e
                ),
            }
        }

        match self.baseline.translate(text, context).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => {
                warn!(
                    "{} returned an empty translation, keeping source text",
                    self.baseline.name()
                );
                text.to_string()
            }
            Err(e) => {
                warn!(
                    "{} translation failed, keeping source text: {}",
                    self.baseline.name(),
                    e
                );
                text.to_string()
            }
        }
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("primary", &self.primary.as_ref().map(|p| p.name().to_string()))
            .field("baseline", &self.baseline.name())
            .finish()
    }
}
