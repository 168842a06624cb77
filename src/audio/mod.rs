//! WAV I/O and final recording assembly.

pub mod assembler;
pub mod wav;

pub use assembler::{AssembledAudio, assemble, gap_ms};
pub use wav::{WavClip, read_wav, wav_duration_secs, write_wav};
