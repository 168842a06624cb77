//! Directory batch processing with an admission gate.

pub mod coordinator;
pub mod discover;
pub mod report;

pub use coordinator::{BatchCoordinator, CancelHandle, output_dirs};
pub use discover::find_wav_files;
pub use report::{BatchReport, BatchResult, BatchStatus, CANCELLED, SummaryReport};
