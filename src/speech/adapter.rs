//! Per-segment synthesis: markup, voice selection and file naming.

use crate::defaults;
use crate::dialogue::types::{AnnotatedSegment, Speaker, TranslatedSegment};
use crate::error::{Result, TalkdubError};
use crate::speech::prosody::annotate;
use crate::speech::synthesizer::Synthesizer;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Voice name per speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceAssignment {
    pub a: String,
    pub b: String,
}

impl VoiceAssignment {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn voice_for(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::A => &self.a,
            Speaker::B => &self.b,
        }
    }
}

impl Default for VoiceAssignment {
    fn default() -> Self {
        Self::new(defaults::VOICE_A, defaults::VOICE_B)
    }
}

/// One successfully synthesized segment, consumed by the assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSegmentRecord {
    pub index: usize,
    pub file: PathBuf,
    pub start: f64,
    pub end: f64,
    pub speaker: Speaker,
    /// Source utterance duration (`end - start`), not the synthesized length.
    pub duration: f64,
}

/// File name of a segment's synthesized audio.
pub fn segment_file_name(index: usize, speaker: Speaker) -> String {
    format!("segment_{:03}_{}.wav", index, speaker)
}

/// Attach synthesis markup to a translated segment.
pub fn annotate_segment(translated: TranslatedSegment) -> AnnotatedSegment {
    let markup = annotate(&translated.translated_text, translated.act());
    AnnotatedSegment { translated, markup }
}

/// Drives a [`Synthesizer`] over the segments of one file.
#[derive(Clone)]
pub struct SegmentSynthesizer {
    synthesizer: Arc<dyn Synthesizer>,
    voices: Arc<VoiceAssignment>,
    max_concurrent: usize,
}

impl SegmentSynthesizer {
    pub fn new(
        synthesizer: Arc<dyn Synthesizer>,
        voices: VoiceAssignment,
        max_concurrent: usize,
    ) -> Self {
        Self {
            synthesizer,
            voices: Arc::new(voices),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Synthesize one segment into `work_dir`.
    pub async fn synthesize(
        &self,
        segment: &TranslatedSegment,
        work_dir: &Path,
    ) -> Result<AudioSegmentRecord> {
        let annotated = annotate_segment(segment.clone());
        self.synthesize_annotated(&annotated, work_dir).await
    }

    async fn synthesize_annotated(
        &self,
        annotated: &AnnotatedSegment,
        work_dir: &Path,
    ) -> Result<AudioSegmentRecord> {
        let translated = &annotated.translated;
        let speaker = translated.speaker();
        let voice = self.voices.voice_for(speaker);
        let file = work_dir.join(segment_file_name(translated.index(), speaker));

        debug!(
            "Synthesizing segment {} ({}, {})",
            translated.index(),
            speaker,
            voice
        );
        self.synthesizer
            .synthesize(&annotated.markup, voice, &file)
            .await?;

        Ok(AudioSegmentRecord {
            index: translated.index(),
            file,
            start: translated.start(),
            end: translated.end(),
            speaker,
            duration: translated.end() - translated.start(),
        })
    }

    /// Synthesize every segment, skipping the ones that fail.
    ///
    /// At most `max_concurrent` calls run at once. The records come back
    /// sorted by segment index regardless of completion order.
    pub async fn synthesize_all(
        &self,
        segments: &[TranslatedSegment],
        work_dir: &Path,
    ) -> Result<Vec<AudioSegmentRecord>> {
        tokio::fs::create_dir_all(work_dir).await?;

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for segment in segments {
            let annotated = annotate_segment(segment.clone());
            let this = self.clone();
            let semaphore = semaphore.clone();
            let work_dir = work_dir.to_path_buf();

            tasks.spawn(async move {
                let index = annotated.translated.index();
                let _permit = semaphore.acquire_owned().await.map_err(|e| {
                    TalkdubError::Other(format!("synthesis gate closed: {}", e))
                })?;
                match this.synthesize_annotated(&annotated, &work_dir).await {
                    Ok(record) => Ok(Some(record)),
                    Err(e) => {
                        warn!("Skipping segment {}: {}", index, e);
                        Ok::<_, TalkdubError>(None)
                    }
                }
            });
        }

        let mut records = Vec::with_capacity(segments.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(Some(record))) => records.push(record),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => warn!("Segment synthesis aborted: {}", e),
                Err(e) => warn!("Segment synthesis task panicked: {}", e),
            }
        }

        records.sort_by_key(|record| record.index);
        info!(
            "Synthesized {}/{} segments",
            records.len(),
            segments.len()
        );
        Ok(records)
    }
}
