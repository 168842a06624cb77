//! Translation providers and the fallback chain.

pub mod chain;
pub mod gemini;
pub mod google;
pub mod openai;
pub mod prompt;
pub mod provider;

pub use chain::ProviderChain;
pub use gemini::GeminiTranslator;
pub use google::GoogleTranslator;
pub use openai::OpenAiTranslator;
pub use provider::{MockProvider, ProviderError, TranslationContext, TranslationProvider};
