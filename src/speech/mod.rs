//! Speech synthesis: prosody markup, the synthesis seam and per-segment driving.

pub mod adapter;
pub mod prosody;
pub mod synthesizer;

pub use adapter::{AudioSegmentRecord, SegmentSynthesizer, VoiceAssignment, annotate_segment};
pub use prosody::annotate;
pub use synthesizer::{MockSynthesizer, OpenAiSpeechSynthesizer, Synthesizer};
