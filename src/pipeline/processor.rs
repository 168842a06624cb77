//! The per-file dialogue pipeline.
//!
//! transcribe → assign speakers → translate → naturalize → annotate →
//! synthesize → assemble, plus a preview mode that stops after translation.

use crate::audio::assembler::assemble;
use crate::config::{ProviderKind, ResolvedConfig};
use crate::defaults;
use crate::dialogue::turns::assign_speakers;
use crate::dialogue::types::{DialogueSegment, TranslatedSegment};
use crate::error::{Result, TalkdubError};
use crate::pipeline::transcript::Transcript;
use crate::speech::adapter::SegmentSynthesizer;
use crate::speech::synthesizer::{OpenAiSpeechSynthesizer, Synthesizer};
use crate::stt::fallback::transcribe_with_fallback;
use crate::stt::transcriber::Transcriber;
use crate::stt::whisper_api::WhisperApiTranscriber;
use crate::text::naturalize::naturalize;
use crate::translate::chain::ProviderChain;
use crate::translate::gemini::GeminiTranslator;
use crate::translate::google::GoogleTranslator;
use crate::translate::openai::OpenAiTranslator;
use crate::translate::provider::{TranslationContext, TranslationProvider};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Artifacts and statistics of one processed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessOutcome {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    /// Merged recording; absent in preview mode or when no segment could be
    /// synthesized.
    pub chinese_audio: Option<PathBuf>,
    pub transcript: PathBuf,
    pub segments_count: usize,
    /// Sum of source segment durations in seconds.
    pub total_duration: f64,
    #[serde(skip)]
    pub segments: Vec<TranslatedSegment>,
}

/// Something that turns one input file into artifacts in a directory.
///
/// `Ok(None)` means the file was processed but produced nothing usable.
#[async_trait]
pub trait FileProcessor: Send + Sync {
    async fn process(&self, input: &Path, output_dir: &Path) -> Result<Option<ProcessOutcome>>;
}

#[async_trait]
impl<T: FileProcessor + ?Sized> FileProcessor for Arc<T> {
    async fn process(&self, input: &Path, output_dir: &Path) -> Result<Option<ProcessOutcome>> {
        (**self).process(input, output_dir).await
    }
}

/// Check that `path` is an existing, readable `.wav` file.
pub fn validate_input(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(TalkdubError::InputNotFound {
            path: path.display().to_string(),
        });
    }

    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if !is_wav {
        return Err(TalkdubError::UnsupportedInput {
            path: path.display().to_string(),
        });
    }

    hound::WavReader::open(path).map_err(|e| TalkdubError::InvalidAudio {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

pub struct DialoguePipeline {
    transcriber: Option<Arc<dyn Transcriber>>,
    chain: ProviderChain,
    synthesizer: SegmentSynthesizer,
    fallback_segment_secs: f64,
}

impl DialoguePipeline {
    pub fn new(
        transcriber: Option<Arc<dyn Transcriber>>,
        chain: ProviderChain,
        synthesizer: SegmentSynthesizer,
    ) -> Self {
        Self {
            transcriber,
            chain,
            synthesizer,
            fallback_segment_secs: defaults::FALLBACK_SEGMENT_SECS,
        }
    }

    pub fn with_fallback_segment_secs(mut self, secs: f64) -> Self {
        self.fallback_segment_secs = secs;
        self
    }

    /// Build the production pipeline from a resolved configuration.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);

        let baseline: Arc<dyn TranslationProvider> = Arc::new(GoogleTranslator::new(
            &config.source_language,
            &config.target_language,
            timeout,
        ));
        let primary: Option<Arc<dyn TranslationProvider>> = match config.provider {
            ProviderKind::Google => None,
            ProviderKind::Openai => config.openai.as_ref().map(|settings| {
                Arc::new(OpenAiTranslator::new(
                    &config.openai_base_url,
                    &settings.api_key,
                    &settings.model,
                    timeout,
                )) as Arc<dyn TranslationProvider>
            }),
            ProviderKind::Gemini => config.gemini.as_ref().map(|settings| {
                Arc::new(GeminiTranslator::new(
                    &settings.api_key,
                    &settings.model,
                    timeout,
                )) as Arc<dyn TranslationProvider>
            }),
        };

        let transcriber = config.transcription_api_key.as_ref().map(|api_key| {
            Arc::new(WhisperApiTranscriber::new(
                &config.transcription.base_url,
                &config.transcription.model,
                api_key,
                timeout,
            )) as Arc<dyn Transcriber>
        });

        let synthesizer: Arc<dyn Synthesizer> = Arc::new(OpenAiSpeechSynthesizer::new(
            &config.tts_endpoint,
            &config.tts_model,
            config.tts_api_key.clone(),
            timeout,
        ));

        Self::new(
            transcriber,
            ProviderChain::new(primary, baseline),
            SegmentSynthesizer::new(
                synthesizer,
                config.voices.clone(),
                config.synthesis_max_concurrent,
            ),
        )
        .with_fallback_segment_secs(config.transcription.fallback_segment_secs)
    }

    /// Translate and naturalize dialogue segments in order.
    pub async fn translate_segments(&self, segments: Vec<DialogueSegment>) -> Vec<TranslatedSegment> {
        let total = segments.len();
        let mut translated = Vec::with_capacity(total);

        for dialogue in segments {
            let context = TranslationContext::new(dialogue.act, dialogue.speaker);
            let original_text = dialogue.text().to_string();
            let raw = self.chain.translate(&original_text, &context).await;
            let translated_text = naturalize(&raw, dialogue.act);
            debug!(
                "Segment {}/{} [{}]: {}",
                dialogue.index + 1,
                total,
                dialogue.speaker,
                translated_text
            );
            translated.push(TranslatedSegment {
                dialogue,
                original_text,
                translated_text,
            });
        }

        translated
    }

    /// Validate, transcribe, assign speakers and translate.
    pub async fn analyze(&self, input: &Path) -> Result<Vec<TranslatedSegment>> {
        validate_input(input)?;

        let transcription = transcribe_with_fallback(
            self.transcriber.as_deref(),
            input,
            self.fallback_segment_secs,
        )
        .await?;
        info!(
            "Transcribed {} segments from {}",
            transcription.segments.len(),
            input.display()
        );

        let dialogue = assign_speakers(transcription.segments);
        info!(
            "Translating {} segments with {}",
            dialogue.len(),
            self.chain.primary_name()
        );
        Ok(self.translate_segments(dialogue).await)
    }

    /// Run everything up to translation and write the preview transcript.
    pub async fn preview(&self, input: &Path, output_dir: &Path) -> Result<ProcessOutcome> {
        let segments = self.analyze(input).await?;
        tokio::fs::create_dir_all(output_dir).await?;

        let transcript = output_dir.join(defaults::PREVIEW_TRANSCRIPT_FILE);
        Transcript::from_segments(&segments).write(&transcript)?;

        Ok(outcome(input, output_dir, None, transcript, segments))
    }

    /// Run the full pipeline for one file.
    pub async fn run(&self, input: &Path, output_dir: &Path) -> Result<Option<ProcessOutcome>> {
        let segments = self.analyze(input).await?;
        if segments.is_empty() {
            warn!("No speech segments found in {}", input.display());
            return Ok(None);
        }

        tokio::fs::create_dir_all(output_dir).await?;
        let transcript = output_dir.join(defaults::TRANSCRIPT_FILE);
        Transcript::from_segments(&segments).write(&transcript)?;

        let work_dir = output_dir.join(defaults::SEGMENTS_DIR);
        let records = self.synthesizer.synthesize_all(&segments, &work_dir).await?;

        let chinese_audio = if records.is_empty() {
            warn!(
                "No segment of {} could be synthesized, skipping assembly",
                input.display()
            );
            None
        } else {
            let final_path = output_dir.join(defaults::FINAL_AUDIO_FILE);
            let assembled = tokio::task::spawn_blocking(move || assemble(&records, &final_path))
                .await
                .map_err(|e| TalkdubError::Assembly {
                    message: format!("assembly task panicked: {}", e),
                })??;
            Some(assembled.path)
        };

        Ok(Some(outcome(
            input,
            output_dir,
            chinese_audio,
            transcript,
            segments,
        )))
    }
}

fn outcome(
    input: &Path,
    output_dir: &Path,
    chinese_audio: Option<PathBuf>,
    transcript: PathBuf,
    segments: Vec<TranslatedSegment>,
) -> ProcessOutcome {
    ProcessOutcome {
        input_file: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        chinese_audio,
        transcript,
        segments_count: segments.len(),
        total_duration: segments.iter().map(|s| s.end() - s.start()).sum(),
        segments,
    }
}

#[async_trait]
impl FileProcessor for DialoguePipeline {
    async fn process(&self, input: &Path, output_dir: &Path) -> Result<Option<ProcessOutcome>> {
        self.run(input, output_dir).await
    }
}
