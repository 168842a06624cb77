//! Default configuration constants for talkdub.
//!
//! Shared by the configuration types, the CLI and the pipeline stages so the
//! same value is never spelled twice.

/// Default voice for speaker A (female, Taiwan Mandarin).
pub const VOICE_A: &str = "zh-TW-HsiaoChenNeural";

/// Default voice for speaker B (male, Taiwan Mandarin).
pub const VOICE_B: &str = "zh-TW-YunJheNeural";

/// Source language code passed to translation providers.
pub const SOURCE_LANGUAGE: &str = "en";

/// Target language code passed to translation providers.
pub const TARGET_LANGUAGE: &str = "zh-TW";

/// Default OpenAI chat model used for prompted translation.
pub const OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default Gemini model used for prompted translation.
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// OpenAI-compatible API root used for chat completions and transcription.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Transcription model name sent to the transcription endpoint.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Length of each placeholder segment when transcription is unavailable.
pub const FALLBACK_SEGMENT_SECS: f64 = 30.0;

/// OpenAI-compatible speech endpoint. The default points at a local
/// edge-tts bridge, which accepts the `zh-TW-*Neural` voice names.
pub const TTS_ENDPOINT: &str = "http://localhost:5050/v1/audio/speech";

/// Speech model name sent to the synthesis endpoint.
pub const TTS_MODEL: &str = "tts-1";

/// Per-file limit on in-flight synthesis calls.
pub const SYNTHESIS_MAX_CONCURRENT: usize = 4;

/// Number of whole-file pipelines allowed to run at once in batch mode.
pub const BATCH_MAX_CONCURRENT: usize = 2;

/// Timeout for a single translation, transcription or synthesis request.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Shortest silence inserted between two consecutive turns.
pub const MIN_GAP_MS: u64 = 300;

/// Longest silence inserted between two consecutive turns.
pub const MAX_GAP_MS: u64 = 1000;

/// Milliseconds of silence per second of the preceding utterance.
pub const GAP_MS_PER_SEC: f64 = 100.0;

/// File name of the merged output recording.
pub const FINAL_AUDIO_FILE: &str = "chinese_podcast_final.wav";

/// File name of the transcript written by a full run.
pub const TRANSCRIPT_FILE: &str = "transcript.json";

/// File name of the transcript written in preview mode.
pub const PREVIEW_TRANSCRIPT_FILE: &str = "transcript_preview.json";

/// Directory (inside a file's output directory) holding per-segment audio.
pub const SEGMENTS_DIR: &str = "segments";

/// File name of the batch report.
pub const BATCH_REPORT_FILE: &str = "batch_report.json";

/// File name of the batch summary report.
pub const SUMMARY_REPORT_FILE: &str = "summary_report.json";

/// Default output directory for a single-file run.
pub const OUTPUT_DIR: &str = "output";

/// Default output directory for a batch run.
pub const BATCH_OUTPUT_DIR: &str = "batch_output";
