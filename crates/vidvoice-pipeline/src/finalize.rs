//! One finalization pass: settled frames in, published commentary out.

use crate::error::FinalizeError;
use std::future::Future;
use tracing::info;
use vidvoice_core::{CommentaryResult, CommentarySettings, Frame, SceneDescription};
use vidvoice_gemini::{GeminiClient, GeminiError, ScriptOutput};

/// Produces the narration script and subtitle cues from the analyzed
/// timeline.
pub trait ScriptGenerator: Send + Sync {
    fn generate(
        &self,
        scenes: &[SceneDescription],
        settings: &CommentarySettings,
    ) -> impl Future<Output = Result<ScriptOutput, GeminiError>> + Send;
}

/// Produces encoded speech for a narration script.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(
        &self,
        text: &str,
        settings: &CommentarySettings,
    ) -> impl Future<Output = Result<Vec<u8>, GeminiError>> + Send;
}

impl ScriptGenerator for GeminiClient {
    async fn generate(
        &self,
        scenes: &[SceneDescription],
        settings: &CommentarySettings,
    ) -> Result<ScriptOutput, GeminiError> {
        self.generate_commentary(scenes, settings).await
    }
}

impl SpeechSynthesizer for GeminiClient {
    async fn synthesize(
        &self,
        text: &str,
        settings: &CommentarySettings,
    ) -> Result<Vec<u8>, GeminiError> {
        self.synthesize_speech(text, settings).await
    }
}

/// Usable (timestamp, description) pairs in extraction order.
fn valid_scenes(frames: &[Frame]) -> Vec<SceneDescription> {
    frames
        .iter()
        .filter(|f| f.has_valid_description())
        .map(|f| SceneDescription::new(f.time, f.description.clone().unwrap_or_default()))
        .collect()
}

/// Run one finalization pass over a settled batch.
///
/// All-or-nothing: a failure at any step publishes nothing, and script
/// output already obtained is discarded when synthesis fails.
pub async fn run_finalization<G, S>(
    frames: &[Frame],
    settings: &CommentarySettings,
    generator: &G,
    synthesizer: &S,
) -> Result<CommentaryResult, FinalizeError>
where
    G: ScriptGenerator,
    S: SpeechSynthesizer,
{
    let scenes = valid_scenes(frames);
    if scenes.is_empty() {
        // Distinguish a video that produced nothing from a batch where every
        // frame individually failed
        return Err(if frames.is_empty() {
            FinalizeError::NoFrames
        } else {
            FinalizeError::AllFramesFailed
        });
    }

    info!("Generating narration from {} scene descriptions", scenes.len());
    let script = generator
        .generate(&scenes, settings)
        .await
        .map_err(|e| classify(e, FinalizeError::Script))?;

    info!(
        "Synthesizing speech for {} characters of narration",
        script.script.len()
    );
    let audio = synthesizer
        .synthesize(&script.script, settings)
        .await
        .map_err(|e| classify(e, FinalizeError::Speech))?;

    Ok(CommentaryResult {
        subtitles: script.subtitles(),
        text: script.script,
        audio: Some(audio),
    })
}

fn classify(error: GeminiError, wrap: fn(String) -> FinalizeError) -> FinalizeError {
    if error.is_auth_error() {
        FinalizeError::InvalidApiKey
    } else {
        wrap(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{FinalizationController, Phase};
    use crate::queue::{AnalysisQueue, FrameAnalyzer};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use vidvoice_core::{QuotaStats, QuotaStore, SubtitleCue};

    struct FakeGenerator {
        fail_with: Option<fn() -> GeminiError>,
        calls: AtomicU32,
        seen_scenes: Mutex<Vec<SceneDescription>>,
    }

    impl FakeGenerator {
        fn ok() -> Self {
            Self {
                fail_with: None,
                calls: AtomicU32::new(0),
                seen_scenes: Mutex::new(Vec::new()),
            }
        }

        fn failing(f: fn() -> GeminiError) -> Self {
            Self {
                fail_with: Some(f),
                ..Self::ok()
            }
        }
    }

    impl ScriptGenerator for FakeGenerator {
        async fn generate(
            &self,
            scenes: &[SceneDescription],
            _settings: &CommentarySettings,
        ) -> Result<ScriptOutput, GeminiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_scenes.lock().unwrap() = scenes.to_vec();

            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            Ok(ScriptOutput {
                script: "A quiet morning unfolds.".to_string(),
                cues: vec![SubtitleCue {
                    start: 0.0,
                    end: 3.0,
                    text: "A quiet morning".to_string(),
                }],
            })
        }
    }

    struct FakeSynthesizer {
        fail: bool,
        calls: AtomicU32,
    }

    impl FakeSynthesizer {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl SpeechSynthesizer for FakeSynthesizer {
        async fn synthesize(
            &self,
            _text: &str,
            _settings: &CommentarySettings,
        ) -> Result<Vec<u8>, GeminiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GeminiError::NoAudio);
            }
            Ok(vec![0x01, 0x02, 0x03])
        }
    }

    fn settled(id: u32, time: f64, description: &str) -> Frame {
        let mut frame = Frame::new(id, time, vec![]);
        frame.complete(description);
        frame
    }

    #[tokio::test]
    async fn test_success_publishes_combined_result() {
        let frames = vec![
            settled(0, 0.0, "A street at dawn."),
            settled(1, 1.0, "A cyclist passes."),
        ];
        let generator = FakeGenerator::ok();
        let synthesizer = FakeSynthesizer::ok();

        let result = run_finalization(
            &frames,
            &CommentarySettings::default(),
            &generator,
            &synthesizer,
        )
        .await
        .unwrap();

        assert_eq!(result.text, "A quiet morning unfolds.");
        assert!(result.subtitles.unwrap().contains("00:00:03,000"));
        assert_eq!(result.audio, Some(vec![0x01, 0x02, 0x03]));
    }

    #[tokio::test]
    async fn test_error_frames_are_filtered_in_order() {
        let frames = vec![
            settled(0, 0.0, "A street at dawn."),
            settled(1, 1.0, "Error: analysis request failed"),
            settled(2, 2.0, "A cyclist passes."),
        ];
        let generator = FakeGenerator::ok();
        let synthesizer = FakeSynthesizer::ok();

        run_finalization(
            &frames,
            &CommentarySettings::default(),
            &generator,
            &synthesizer,
        )
        .await
        .unwrap();

        let scenes = generator.seen_scenes.lock().unwrap().clone();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].time, 0.0);
        assert_eq!(scenes[1].time, 2.0);
        assert_eq!(scenes[1].text, "A cyclist passes.");
    }

    #[tokio::test]
    async fn test_empty_batch_is_distinct_from_all_failed() {
        let generator = FakeGenerator::ok();
        let synthesizer = FakeSynthesizer::ok();
        let settings = CommentarySettings::default();

        let err = run_finalization(&[], &settings, &generator, &synthesizer)
            .await
            .unwrap_err();
        assert!(matches!(err, FinalizeError::NoFrames));

        let frames = vec![
            settled(0, 0.0, "Error: analysis request failed"),
            settled(1, 1.0, "Error: analysis request failed"),
        ];
        let err = run_finalization(&frames, &settings, &generator, &synthesizer)
            .await
            .unwrap_err();
        assert!(matches!(err, FinalizeError::AllFramesFailed));

        // Neither case reached a collaborator
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_script_failure_aborts_before_synthesis() {
        let frames = vec![settled(0, 0.0, "A street at dawn.")];
        let generator = FakeGenerator::failing(|| GeminiError::ApiError {
            status: 500,
            message: "backend overloaded".to_string(),
        });
        let synthesizer = FakeSynthesizer::ok();

        let err = run_finalization(
            &frames,
            &CommentarySettings::default(),
            &generator,
            &synthesizer,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FinalizeError::Script(_)));
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_credential_failures_are_recognized() {
        let frames = vec![settled(0, 0.0, "A street at dawn.")];
        let generator = FakeGenerator::failing(|| GeminiError::ApiError {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".to_string(),
        });

        let err = run_finalization(
            &frames,
            &CommentarySettings::default(),
            &generator,
            &FakeSynthesizer::ok(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FinalizeError::InvalidApiKey));
    }

    #[tokio::test]
    async fn test_speech_failure_publishes_nothing() {
        let frames = vec![settled(0, 0.0, "A street at dawn.")];
        let generator = FakeGenerator::ok();
        let synthesizer = FakeSynthesizer::failing();

        let err = run_finalization(
            &frames,
            &CommentarySettings::default(),
            &generator,
            &synthesizer,
        )
        .await
        .unwrap_err();

        // The script was generated, but the half-formed result is discarded
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, FinalizeError::Speech(_)));
    }

    // Full batch flow: queue drain -> controller transition -> finalization.

    #[derive(Clone)]
    struct EchoAnalyzer;

    impl FrameAnalyzer for EchoAnalyzer {
        async fn describe(&self, image: &[u8]) -> String {
            format!("scene {}", image[0])
        }
    }

    #[derive(Clone)]
    struct OpenQuota(Arc<AtomicU32>);

    impl QuotaStore for OpenQuota {
        fn read(&self) -> QuotaStats {
            QuotaStats::for_usage(self.0.load(Ordering::SeqCst), 1000)
        }
        fn increment(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn reset(&self) {
            self.0.store(0, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_batch_settles_and_finalizes_exactly_once() {
        let frames: Vec<Frame> = (0..4)
            .map(|id| Frame::new(id, id as f64, vec![id as u8]))
            .collect();

        let (queue, mut events) = AnalysisQueue::new(
            EchoAnalyzer,
            OpenQuota(Arc::new(AtomicU32::new(0))),
            Duration::ZERO,
        );

        let mut controller = FinalizationController::new();
        controller.begin_batch(frames.clone());
        queue.enqueue(frames);

        let mut passes = 0;
        while controller.phase() != Phase::Finalizing {
            let event = events.recv().await.unwrap();
            controller.apply_event(event);
            if controller.poll_transition() {
                passes += 1;
            }
        }
        assert_eq!(passes, 1);
        assert_eq!(controller.settled_count(), 4);

        let outcome = run_finalization(
            controller.frames(),
            &CommentarySettings::default(),
            &FakeGenerator::ok(),
            &FakeSynthesizer::ok(),
        )
        .await
        .unwrap();
        controller.complete(outcome);

        assert_eq!(controller.phase(), Phase::Done);
        assert!(controller.result().unwrap().audio.is_some());
        assert!(!controller.poll_transition());
    }
}
