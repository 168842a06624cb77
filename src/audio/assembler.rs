//! Concatenates per-segment audio into one recording with inter-turn silence.

use crate::audio::wav::{WavClip, read_wav, write_wav};
use crate::defaults::{GAP_MS_PER_SEC, MAX_GAP_MS, MIN_GAP_MS};
use crate::error::{Result, TalkdubError};
use crate::speech::adapter::AudioSegmentRecord;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Summary of an assembled recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledAudio {
    pub path: PathBuf,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub segments: usize,
}

/// Silence inserted after an utterance of the given source duration.
///
/// 100 ms per second of speech, clamped to 300..=1000 ms.
pub fn gap_ms(duration_secs: f64) -> u64 {
    let gap = (duration_secs.max(0.0) * GAP_MS_PER_SEC).round() as u64;
    gap.clamp(MIN_GAP_MS, MAX_GAP_MS)
}

/// Concatenate the records in index order and write the result.
///
/// The first record fixes the output rate and channel count. A gap follows
/// every record except the last.
pub fn assemble(records: &[AudioSegmentRecord], output_path: &Path) -> Result<AssembledAudio> {
    let mut ordered: Vec<&AudioSegmentRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.index);

    let Some(first) = ordered.first() else {
        return Err(TalkdubError::Assembly {
            message: "no audio segments to assemble".to_string(),
        });
    };

    let first_clip = load(first)?;
    let sample_rate = first_clip.sample_rate;
    let channels = first_clip.channels;

    let mut samples = first_clip.samples;
    let mut previous = *first;
    for record in ordered.iter().skip(1) {
        let gap = gap_ms(previous.duration);
        let silent_frames = (sample_rate as u64 * gap / 1000) as usize;
        samples.extend(std::iter::repeat_n(0i16, silent_frames * channels as usize));
        debug!("Gap of {}ms after segment {}", gap, previous.index);

        let clip = load(record)?.conform(sample_rate, channels);
        samples.extend(clip.samples);
        previous = *record;
    }

    let output = WavClip {
        sample_rate,
        channels,
        samples,
    };
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    write_wav(output_path, &output).map_err(|e| TalkdubError::Assembly {
        message: format!("failed to write {}: {}", output_path.display(), e),
    })?;

    let assembled = AssembledAudio {
        path: output_path.to_path_buf(),
        duration_secs: output.duration_secs(),
        sample_rate,
        channels,
        segments: ordered.len(),
    };
    info!(
        "Assembled {} segments into {} ({:.1}s)",
        assembled.segments,
        output_path.display(),
        assembled.duration_secs
    );
    Ok(assembled)
}

fn load(record: &AudioSegmentRecord) -> Result<WavClip> {
    if !record.file.exists() {
        return Err(TalkdubError::Assembly {
            message: format!("segment file missing: {}", record.file.display()),
        });
    }
    read_wav(&record.file).map_err(|e| TalkdubError::Assembly {
        message: format!("segment {} unreadable: {}", record.index, e),
    })
}
