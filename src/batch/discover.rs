//! Input discovery for batch runs.

use crate::error::{Result, TalkdubError};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// All `.wav` files under `input_dir`, recursively, sorted and de-duplicated.
///
/// `skip_dir` (typically the batch output directory) is not descended into
/// when it lies inside `input_dir`.
pub fn find_wav_files(input_dir: &Path, skip_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(TalkdubError::InputNotFound {
            path: input_dir.display().to_string(),
        });
    }

    let skip = skip_dir.and_then(|dir| dir.canonicalize().ok());
    let walker = WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry, skip.as_deref()));

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", input_dir.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_wav_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    let mut seen = HashSet::new();
    files.retain(|path| seen.insert(path.clone()));

    debug!("Found {} .wav files in {}", files.len(), input_dir.display());
    Ok(files)
}

fn is_skipped(entry: &DirEntry, skip: Option<&Path>) -> bool {
    let Some(skip) = skip else {
        return false;
    };
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let skipped = entry.path().canonicalize().is_ok_and(|path| path == skip);
    if skipped {
        debug!("Not scanning output directory {}", entry.path().display());
    }
    skipped
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}
