//! talkdub - Chinese dubbing for English two-host dialogue audio
//!
//! Transcribes a podcast-style recording, infers speaker turns and dialogue
//! acts, translates each utterance into spoken Taiwan Mandarin and resynthesizes
//! the conversation with one voice per speaker.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod batch;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod dialogue;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod speech;
pub mod stt;
pub mod text;
pub mod translate;

// Seams (swap real services for mocks)
pub use pipeline::processor::FileProcessor;
pub use speech::synthesizer::Synthesizer;
pub use stt::transcriber::Transcriber;
pub use translate::provider::TranslationProvider;

// Pipeline
pub use batch::coordinator::BatchCoordinator;
pub use pipeline::processor::{DialoguePipeline, ProcessOutcome};
pub use translate::chain::ProviderChain;

// Error handling
pub use error::{Result, TalkdubError};

// Config
pub use config::{Config, ResolvedConfig};
