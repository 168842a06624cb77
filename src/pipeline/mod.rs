//! Per-file processing: the dialogue pipeline and its transcript artifact.

pub mod processor;
pub mod transcript;

pub use processor::{DialoguePipeline, FileProcessor, ProcessOutcome, validate_input};
pub use transcript::{Transcript, TranscriptEntry};
