use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use talkdub::audio::{WavClip, assemble, read_wav, write_wav};
use talkdub::dialogue::{DialogueAct, DialogueSegment, RawSegment, Speaker};
use talkdub::pipeline::DialoguePipeline;
use talkdub::speech::{AudioSegmentRecord, MockSynthesizer, SegmentSynthesizer, VoiceAssignment};
use talkdub::stt::{MockTranscriber, Transcriber};
use talkdub::translate::{
    MockProvider, ProviderChain, ProviderError, TranslationContext, TranslationProvider,
};
use tempfile::TempDir;

/// Returns its input unchanged.
struct IdentityProvider;

#[async_trait]
impl TranslationProvider for IdentityProvider {
    async fn translate(
        &self,
        text: &str,
        _context: &TranslationContext,
    ) -> Result<String, ProviderError> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

fn write_silence(path: &Path, seconds: f64) {
    write_wav(
        path,
        &WavClip {
            sample_rate: 16000,
            channels: 1,
            samples: vec![0; (16000.0 * seconds) as usize],
        },
    )
    .unwrap();
}

fn pipeline_with(
    transcriber: MockTranscriber,
    chain: ProviderChain,
    synth: Arc<MockSynthesizer>,
) -> DialoguePipeline {
    DialoguePipeline::new(
        Some(Arc::new(transcriber) as Arc<dyn Transcriber>),
        chain,
        SegmentSynthesizer::new(synth, VoiceAssignment::default(), 2),
    )
}

#[tokio::test]
async fn transition_then_question_is_naturalized() {
    let pipeline = pipeline_with(
        MockTranscriber::new("mock"),
        ProviderChain::baseline_only(Arc::new(IdentityProvider)),
        Arc::new(MockSynthesizer::new()),
    );

    let segments = vec![
        DialogueSegment {
            index: 0,
            segment: RawSegment::new(0.0, 2.0, "Hello, welcome."),
            speaker: Speaker::A,
            act: DialogueAct::TRANSITION,
        },
        DialogueSegment {
            index: 1,
            segment: RawSegment::new(2.0, 4.0, "What do you think?"),
            speaker: Speaker::B,
            act: DialogueAct::QUESTION,
        },
    ];

    let translated = pipeline.translate_segments(segments).await;

    assert_eq!(translated.len(), 2);
    assert!(translated[0].translated_text.starts_with("說到這個，"));
    assert!(translated[0].translated_text.ends_with("Hello, welcome."));
    let question = &translated[1].translated_text;
    assert!(question.ends_with('?') || question.ends_with('？'));
    assert_eq!(translated[0].speaker(), Speaker::A);
    assert_eq!(translated[1].speaker(), Speaker::B);
    assert_eq!(translated[1].original_text, "What do you think?");
}

#[tokio::test]
async fn run_assigns_speakers_and_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("episode.wav");
    write_silence(&input, 1.0);
    let output = dir.path().join("out");

    let synth = Arc::new(MockSynthesizer::new());
    let pipeline = pipeline_with(
        MockTranscriber::new("mock").with_segments(vec![
            RawSegment::new(0.0, 2.0, "By the way, hello and welcome."),
            RawSegment::new(2.0, 4.0, "What do you think?"),
        ]),
        ProviderChain::baseline_only(Arc::new(IdentityProvider)),
        synth.clone(),
    );

    let outcome = pipeline.run(&input, &output).await.unwrap().unwrap();

    assert_eq!(outcome.segments_count, 2);
    assert_eq!(outcome.segments[0].speaker(), Speaker::A);
    assert_eq!(outcome.segments[1].speaker(), Speaker::B);
    assert!(outcome.segments[0].translated_text.starts_with("說到這個，"));

    let transcript: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&outcome.transcript).unwrap()).unwrap();
    assert_eq!(transcript["total_segments"], 2);
    assert_eq!(transcript["segments"][0]["speaker"], "A");
    assert_eq!(transcript["segments"][1]["speaker"], "B");
    assert_eq!(transcript["segments"][1]["start_time"], "2.00s");

    let voices: Vec<String> = synth.calls().into_iter().map(|(_, voice)| voice).collect();
    let defaults = VoiceAssignment::default();
    assert!(voices.contains(&defaults.a));
    assert!(voices.contains(&defaults.b));
    assert!(outcome.chinese_audio.unwrap().exists());
}

#[tokio::test]
async fn failed_primary_falls_back_to_baseline() {
    let pipeline = pipeline_with(
        MockTranscriber::new("mock"),
        ProviderChain::new(
            Some(Arc::new(MockProvider::new("openai").with_failure())),
            Arc::new(MockProvider::new("google").with_response("大家好")),
        ),
        Arc::new(MockSynthesizer::new()),
    );

    let segments = talkdub::dialogue::assign_speakers(vec![RawSegment::new(
        0.0,
        1.0,
        "Nice to meet everyone.",
    )]);
    let translated = pipeline.translate_segments(segments).await;

    assert_eq!(translated[0].translated_text, "大家好");
}

#[test]
fn three_two_second_segments_get_minimum_gaps() {
    let dir = TempDir::new().unwrap();
    let records: Vec<AudioSegmentRecord> = (0..3)
        .map(|index| {
            let speaker = if index % 2 == 0 { Speaker::A } else { Speaker::B };
            let file: PathBuf = dir.path().join(format!("segment_{:03}_{}.wav", index, speaker));
            write_silence(&file, 2.0);
            AudioSegmentRecord {
                index,
                file,
                start: index as f64 * 2.0,
                end: index as f64 * 2.0 + 2.0,
                speaker,
                duration: 2.0,
            }
        })
        .collect();

    let output = dir.path().join("final.wav");
    let assembled = assemble(&records, &output).unwrap();

    let clip = read_wav(&output).unwrap();
    // 3 x 2s of speech plus 2 x 300ms of silence at 16 kHz
    assert_eq!(clip.frames(), 3 * 32000 + 2 * 4800);
    assert_eq!(assembled.segments, 3);
    assert!((assembled.duration_secs - 6.6).abs() < 1e-6);
}
