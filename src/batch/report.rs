//! Batch result records and the JSON reports written at the end of a batch.

use crate::error::{Result, TalkdubError};
use crate::pipeline::processor::ProcessOutcome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error text recorded for files that were never admitted.
pub const CANCELLED: &str = "cancelled before processing started";

/// How one file of a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// The pipeline produced a result.
    Success,
    /// The pipeline ran but produced nothing.
    Failed,
    /// The pipeline raised, panicked, or never ran.
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub processed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_audio: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<PathBuf>,
}

fn now() -> String {
    chrono::Local::now().to_rfc3339()
}

impl BatchResult {
    fn base(input_file: &Path, output_dir: &Path, status: BatchStatus) -> Self {
        Self {
            input_file: input_file.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            status,
            error: None,
            processed_at: now(),
            segments_count: None,
            total_duration: None,
            chinese_audio: None,
            transcript: None,
        }
    }

    pub fn success(input_file: &Path, output_dir: &Path, outcome: &ProcessOutcome) -> Self {
        Self {
            segments_count: Some(outcome.segments_count),
            total_duration: Some(outcome.total_duration),
            chinese_audio: outcome.chinese_audio.clone(),
            transcript: Some(outcome.transcript.clone()),
            ..Self::base(input_file, output_dir, BatchStatus::Success)
        }
    }

    pub fn failed(input_file: &Path, output_dir: &Path) -> Self {
        Self {
            error: Some("Processing failed".to_string()),
            ..Self::base(input_file, output_dir, BatchStatus::Failed)
        }
    }

    pub fn error(input_file: &Path, output_dir: &Path, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::base(input_file, output_dir, BatchStatus::Error)
        }
    }

    /// A file the batch was cancelled before reaching.
    pub fn cancelled(input_file: &Path, output_dir: &Path) -> Self {
        Self::error(input_file, output_dir, CANCELLED)
    }

    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Success
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BatchStatus::Error && self.error.as_deref() == Some(CANCELLED)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub total_files: usize,
    pub successful: usize,
    /// Files with status `failed` or `error`.
    pub failed: usize,
    pub max_concurrent: usize,
    pub started_at: String,
    /// In completion order.
    pub results: Vec<BatchResult>,
}

impl BatchReport {
    pub fn new(
        started_at: chrono::DateTime<chrono::Local>,
        input_directory: &Path,
        output_directory: &Path,
        total_files: usize,
        max_concurrent: usize,
        results: Vec<BatchResult>,
    ) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        Self {
            batch_id: started_at.format("%Y%m%d_%H%M%S").to_string(),
            input_directory: input_directory.to_path_buf(),
            output_directory: output_directory.to_path_buf(),
            total_files,
            successful,
            failed: results.len() - successful,
            max_concurrent,
            started_at: started_at.to_rfc3339(),
            results,
        }
    }

    /// Files never started because the batch was cancelled.
    pub fn cancelled(&self) -> usize {
        self.results.iter().filter(|r| r.is_cancelled()).count()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub summary: SummaryStats,
    pub files: Vec<SummaryFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_processed_files: usize,
    pub total_audio_duration: String,
    pub total_segments: usize,
    pub average_duration_per_file: String,
    pub average_segments_per_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFile {
    pub filename: String,
    pub duration: String,
    pub segments: usize,
    pub chinese_audio: String,
    pub transcript: String,
}

impl SummaryReport {
    /// Summarize the successful results, or `None` if there are none.
    pub fn from_results(results: &[BatchResult]) -> Option<Self> {
        let successful: Vec<&BatchResult> = results.iter().filter(|r| r.is_success()).collect();
        if successful.is_empty() {
            return None;
        }

        let count = successful.len();
        let total_duration: f64 = successful.iter().filter_map(|r| r.total_duration).sum();
        let total_segments: usize = successful.iter().filter_map(|r| r.segments_count).sum();

        let files = successful
            .iter()
            .map(|r| SummaryFile {
                filename: r
                    .input_file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                duration: format!("{:.2}s", r.total_duration.unwrap_or(0.0)),
                segments: r.segments_count.unwrap_or(0),
                chinese_audio: display_or_empty(r.chinese_audio.as_deref()),
                transcript: display_or_empty(r.transcript.as_deref()),
            })
            .collect();

        Some(Self {
            summary: SummaryStats {
                total_processed_files: count,
                total_audio_duration: format!("{:.2} seconds", total_duration),
                total_segments,
                average_duration_per_file: format!("{:.2} seconds", total_duration / count as f64),
                average_segments_per_file: format!("{:.1}", total_segments as f64 / count as f64),
            },
            files,
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

fn display_or_empty(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| TalkdubError::Artifact {
        artifact: path.display().to_string(),
        message: e.to_string(),
    })
}
