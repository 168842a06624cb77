//! Bounded-concurrency batch execution of the per-file pipeline.

use crate::batch::report::{BatchReport, BatchResult, SummaryReport};
use crate::defaults;
use crate::error::Result;
use crate::pipeline::processor::FileProcessor;
use log::{error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Stops admission of new files into a running batch.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    gate: Arc<Semaphore>,
}

impl CancelHandle {
    /// Close the admission gate. Files already running finish normally.
    pub fn cancel(&self) {
        self.gate.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.gate.is_closed()
    }
}

/// Runs a [`FileProcessor`] over many files with at most `max_concurrent`
/// in flight.
pub struct BatchCoordinator {
    processor: Arc<dyn FileProcessor>,
    gate: Arc<Semaphore>,
    max_concurrent: usize,
}

impl BatchCoordinator {
    pub fn new(processor: Arc<dyn FileProcessor>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            processor,
            gate: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            gate: self.gate.clone(),
        }
    }

    /// Process `files`, writing each into its own directory under
    /// `output_base`, then write the batch and summary reports.
    pub async fn run(
        &self,
        input_directory: &Path,
        files: &[PathBuf],
        output_base: &Path,
    ) -> Result<BatchReport> {
        let started_at = chrono::Local::now();
        tokio::fs::create_dir_all(output_base).await?;

        info!(
            "Processing {} files with up to {} concurrent",
            files.len(),
            self.max_concurrent
        );

        let results = self.process_all(files, output_base).await;

        let report = BatchReport::new(
            started_at,
            input_directory,
            output_base,
            files.len(),
            self.max_concurrent,
            results,
        );
        report.write(&output_base.join(defaults::BATCH_REPORT_FILE))?;

        if let Some(summary) = SummaryReport::from_results(&report.results) {
            summary.write(&output_base.join(defaults::SUMMARY_REPORT_FILE))?;
        }

        info!(
            "Batch {} finished: {} succeeded, {} failed",
            report.batch_id, report.successful, report.failed
        );
        Ok(report)
    }

    /// Run every file through the processor; results are in completion order.
    pub async fn process_all(&self, files: &[PathBuf], output_base: &Path) -> Vec<BatchResult> {
        let mut tasks = JoinSet::new();

        for (input, output_dir) in files.iter().zip(output_dirs(files, output_base)) {
            let input = input.clone();
            let gate = self.gate.clone();
            let processor = self.processor.clone();

            tasks.spawn(async move {
                let Ok(permit) = gate.acquire_owned().await else {
                    warn!("Not processing {}: batch cancelled", input.display());
                    return BatchResult::cancelled(&input, &output_dir);
                };

                info!("Processing {} -> {}", input.display(), output_dir.display());
                let task_input = input.clone();
                let task_output = output_dir.clone();
                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    processor.process(&task_input, &task_output).await
                });

                match handle.await {
                    Ok(Ok(Some(outcome))) => {
                        info!("Finished {}", input.display());
                        BatchResult::success(&input, &output_dir, &outcome)
                    }
                    Ok(Ok(None)) => {
                        warn!("{} produced no result", input.display());
                        BatchResult::failed(&input, &output_dir)
                    }
                    Ok(Err(e)) => {
                        error!("{} failed: {}", input.display(), e);
                        BatchResult::error(&input, &output_dir, e.to_string())
                    }
                    Err(e) => {
                        error!("{} panicked: {}", input.display(), e);
                        BatchResult::error(&input, &output_dir, format!("task panicked: {}", e))
                    }
                }
            });
        }

        let mut results = Vec::with_capacity(files.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => error!("Batch task failed: {}", e),
            }
        }
        results
    }
}

/// One output directory per input, named after the file stem.
///
/// Repeated stems get `_2`, `_3`, ... suffixes in input order.
pub fn output_dirs(files: &[PathBuf], output_base: &Path) -> Vec<PathBuf> {
    let mut used = HashSet::new();
    files
        .iter()
        .map(|file| {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());

            let mut name = stem.clone();
            let mut suffix = 2;
            while !used.insert(name.clone()) {
                name = format!("{}_{}", stem, suffix);
                suffix += 1;
            }
            output_base.join(name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::report::{BatchStatus, CANCELLED};
    use crate::error::TalkdubError;
    use crate::pipeline::processor::ProcessOutcome;
    use async_trait::async_trait;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Processor whose behavior is chosen by the input file stem.
    struct ScriptedProcessor;

    #[async_trait]
    impl FileProcessor for ScriptedProcessor {
        async fn process(&self, input: &Path, output_dir: &Path) -> Result<Option<ProcessOutcome>> {
            let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            tokio::time::sleep(Duration::from_millis(10)).await;
            match stem {
                "empty" => Ok(None),
                "broken" => Err(TalkdubError::Assembly {
                    message: "segment missing".to_string(),
                }),
                "panics" => panic!("processor exploded"),
                _ => Ok(Some(ProcessOutcome {
                    input_file: input.to_path_buf(),
                    output_dir: output_dir.to_path_buf(),
                    chinese_audio: Some(output_dir.join("chinese_podcast_final.wav")),
                    transcript: output_dir.join("transcript.json"),
                    segments_count: 2,
                    total_duration: 4.0,
                    segments: Vec::new(),
                })),
            }
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("in/{}.wav", n))).collect()
    }

    fn status_of(results: &[BatchResult], stem: &str) -> BatchStatus {
        results
            .iter()
            .find(|r| r.input_file.file_stem().and_then(|s| s.to_str()) == Some(stem))
            .map(|r| r.status)
            .unwrap()
    }

    #[test]
    fn test_output_dirs_deduplicate_stems() {
        let files = vec![
            PathBuf::from("a/talk.wav"),
            PathBuf::from("b/talk.wav"),
            PathBuf::from("c/other.wav"),
            PathBuf::from("d/talk.wav"),
        ];
        let dirs = output_dirs(&files, Path::new("out"));
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("out/talk"),
                PathBuf::from("out/talk_2"),
                PathBuf::from("out/other"),
                PathBuf::from("out/talk_3"),
            ]
        );
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let coordinator = BatchCoordinator::new(Arc::new(ScriptedProcessor), 0);
        assert_eq!(coordinator.max_concurrent(), 1);
    }

    #[tokio::test]
    async fn test_statuses_map_from_processor_outcomes() {
        let dir = TempDir::new().unwrap();
        let coordinator = BatchCoordinator::new(Arc::new(ScriptedProcessor), 2);
        let files = paths(&["good", "empty", "broken", "panics"]);

        let results = coordinator.process_all(&files, dir.path()).await;

        assert_eq!(results.len(), 4);
        assert_eq!(status_of(&results, "good"), BatchStatus::Success);
        assert_eq!(status_of(&results, "empty"), BatchStatus::Failed);
        assert_eq!(status_of(&results, "broken"), BatchStatus::Error);
        assert_eq!(status_of(&results, "panics"), BatchStatus::Error);

        let panicked = results
            .iter()
            .find(|r| r.input_file.ends_with("panics.wav"))
            .unwrap();
        assert!(panicked.error.as_deref().unwrap().contains("panicked"));
    }

    #[tokio::test]
    async fn test_panic_does_not_leak_permit() {
        let dir = TempDir::new().unwrap();
        let coordinator = BatchCoordinator::new(Arc::new(ScriptedProcessor), 1);
        let files = paths(&["panics", "good", "good2"]);

        let results = coordinator.process_all(&files, dir.path()).await;
        assert_eq!(results.len(), 3);
        assert_eq!(status_of(&results, "good2"), BatchStatus::Success);
    }

    #[tokio::test]
    async fn test_cancel_before_run_marks_all_cancelled() {
        let dir = TempDir::new().unwrap();
        let coordinator = BatchCoordinator::new(Arc::new(ScriptedProcessor), 2);
        coordinator.cancel_handle().cancel();
        assert!(coordinator.cancel_handle().is_cancelled());

        let results = coordinator.process_all(&paths(&["a", "b"]), dir.path()).await;

        assert!(results.iter().all(|r| r.status == BatchStatus::Error));
        assert!(results.iter().all(|r| r.error.as_deref() == Some(CANCELLED)));
    }

    /// Signals each admission, then behaves like [`ScriptedProcessor`].
    struct SignallingProcessor {
        admitted: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl FileProcessor for SignallingProcessor {
        async fn process(&self, input: &Path, output_dir: &Path) -> Result<Option<ProcessOutcome>> {
            self.admitted.notify_one();
            tokio::time::sleep(Duration::from_millis(50)).await;
            ScriptedProcessor.process(input, output_dir).await
        }
    }

    #[tokio::test]
    async fn test_cancel_mid_run_lets_running_file_finish() {
        let dir = TempDir::new().unwrap();
        let admitted = Arc::new(tokio::sync::Notify::new());
        let coordinator = BatchCoordinator::new(
            Arc::new(SignallingProcessor {
                admitted: admitted.clone(),
            }),
            1,
        );
        let cancel = coordinator.cancel_handle();
        let files = paths(&["ep1", "ep2", "ep3"]);

        let (report, ()) = tokio::join!(
            coordinator.run(Path::new("in"), &files, dir.path()),
            async {
                admitted.notified().await;
                cancel.cancel();
            }
        );
        let report = report.unwrap();

        assert!(cancel.is_cancelled());
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.successful, 1);
        assert_eq!(report.cancelled(), 2);
        let reported: HashSet<&PathBuf> = report.results.iter().map(|r| &r.input_file).collect();
        assert_eq!(reported.len(), 3);
        assert!(dir.path().join("batch_report.json").exists());
    }

    #[tokio::test]
    async fn test_run_writes_reports() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("batch_output");
        let coordinator = BatchCoordinator::new(Arc::new(ScriptedProcessor), 2);

        let report = coordinator
            .run(Path::new("in"), &paths(&["good", "empty"]), &output)
            .await
            .unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.successful, 1);
        assert_eq!(report.failed, 1);
        assert!(output.join("batch_report.json").exists());
        assert!(output.join("summary_report.json").exists());
    }

    #[tokio::test]
    async fn test_run_without_success_skips_summary() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("batch_output");
        let coordinator = BatchCoordinator::new(Arc::new(ScriptedProcessor), 2);

        let report = coordinator
            .run(Path::new("in"), &paths(&["empty", "broken"]), &output)
            .await
            .unwrap();

        assert_eq!(report.successful, 0);
        assert!(output.join("batch_report.json").exists());
        assert!(!output.join("summary_report.json").exists());
    }
}
