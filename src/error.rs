//! Error types for talkdub.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalkdubError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Input validation errors
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Unsupported input format for {path}: only .wav files are accepted")]
    UnsupportedInput { path: String },

    #[error("Invalid WAV input {path}: {message}")]
    InvalidAudio { path: String, message: String },

    // Transcription errors
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    // Synthesis errors
    #[error("Speech synthesis failed for voice {voice}: {message}")]
    Synthesis { voice: String, message: String },

    // Assembly errors
    #[error("Audio assembly failed: {message}")]
    Assembly { message: String },

    // Artifact errors
    #[error("Failed to write {artifact}: {message}")]
    Artifact { artifact: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TalkdubError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_invalid_value_display() {
        let error = TalkdubError::ConfigInvalidValue {
            key: "batch.max_concurrent".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for batch.max_concurrent: must be at least 1"
        );
    }

    #[test]
    fn test_unsupported_input_display() {
        let error = TalkdubError::UnsupportedInput {
            path: "episode.mp3".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported input format for episode.mp3: only .wav files are accepted"
        );
    }

    #[test]
    fn test_synthesis_display() {
        let error = TalkdubError::Synthesis {
            voice: "zh-TW-YunJheNeural".to_string(),
            message: "HTTP 503".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Speech synthesis failed for voice zh-TW-YunJheNeural: HTTP 503"
        );
    }

    #[test]
    fn test_assembly_display() {
        let error = TalkdubError::Assembly {
            message: "no audio segments".to_string(),
        };
        assert_eq!(error.to_string(), "Audio assembly failed: no audio segments");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: TalkdubError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_error = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let error: TalkdubError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_from_json_error_keeps_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: TalkdubError = json_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<TalkdubError>();
        assert_sync::<TalkdubError>();
    }
}
