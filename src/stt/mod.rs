pub mod fallback;
pub mod transcriber;
pub mod whisper_api;

pub use fallback::transcribe_with_fallback;
pub use transcriber::{MockTranscriber, Transcriber, Transcription};
pub use whisper_api::WhisperApiTranscriber;
