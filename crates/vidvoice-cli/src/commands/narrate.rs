//! Narrate command - the full analysis and synthesis pipeline.

use super::{get_config, get_database, parse_settings};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::debug;
use vidvoice_config::Config;
use vidvoice_core::{CommentaryResult, CommentarySettings, Frame, QuotaStore};
use vidvoice_db::DailyQuota;
use vidvoice_gemini::GeminiClient;
use vidvoice_pipeline::{
    run_finalization, AnalysisQueue, FinalizationController, FinalizeError, Phase,
};

#[allow(clippy::too_many_arguments)]
pub fn run(
    video: &Path,
    language: &str,
    theme: &str,
    tone: &str,
    voice: &str,
    context: &str,
    movie_title: Option<String>,
    character: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    let settings = parse_settings(language, theme, tone, voice, context, movie_title, character)?;
    debug!("Narration settings: {:?}", settings);
    let config = get_config()?;

    if config.gemini.api_key.is_empty() {
        anyhow::bail!(
            "No API key configured. Run 'vidvoice config set gemini.api_key <KEY>' first."
        );
    }

    let db = get_database()?;
    let quota = DailyQuota::new(db, config.analysis.daily_frame_limit);
    let client =
        GeminiClient::from_config(&config.gemini).context("Failed to create Gemini client")?;

    // Sample frames up front; the analysis queue takes it from there
    println!("{} {}", "Extracting frames from".cyan(), video.display());
    let frames = vidvoice_media::extract_frames(
        video,
        config.extraction.interval_seconds,
        config.extraction.jpeg_quality,
    )?;

    if frames.is_empty() {
        anyhow::bail!("{}", FinalizeError::NoFrames.user_message());
    }
    println!("  {} {} frames sampled", "✓".green(), frames.len());

    let rt = Runtime::new().context("Failed to create async runtime")?;
    let result = rt.block_on(drive_batch(
        frames,
        &settings,
        &config,
        client,
        quota.clone(),
    ))?;

    let out_dir = out.unwrap_or_else(|| default_out_dir(video));
    write_outputs(&out_dir, &result)?;

    let stats = quota.read();
    println!(
        "{} {} / {} frames of today's quota used",
        "Quota:".dimmed(),
        stats.used,
        stats.limit
    );

    Ok(())
}

/// Drain the analysis queue into the state machine, then finalize once the
/// batch settles.
async fn drive_batch(
    frames: Vec<Frame>,
    settings: &CommentarySettings,
    config: &Config,
    client: GeminiClient,
    quota: DailyQuota,
) -> Result<CommentaryResult> {
    let total = frames.len() as u64;

    let (queue, mut events) = AnalysisQueue::new(
        client.clone(),
        quota,
        config.analysis.request_interval(),
    );

    let mut controller = FinalizationController::new();
    controller.begin_batch(frames.clone());
    queue.enqueue(frames);

    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} frames")?
            .progress_chars("=>-"),
    );

    loop {
        let event = events
            .recv()
            .await
            .context("Analysis queue closed unexpectedly")?;
        controller.apply_event(event);
        bar.set_position(controller.settled_count() as u64);

        if controller.poll_transition() {
            bar.finish();
            break;
        }
        if controller.phase() == Phase::Errored {
            bar.abandon();
            break;
        }
    }

    if let Some(error) = controller.error() {
        anyhow::bail!("{}", error.user_message());
    }

    println!("{}", "Synthesizing narrative & subtitles...".cyan());
    match run_finalization(controller.frames(), settings, &client, &client).await {
        Ok(result) => {
            controller.complete(result.clone());
            Ok(result)
        }
        Err(error) => {
            let message = error.user_message();
            controller.fail(error);
            anyhow::bail!("{}", message);
        }
    }
}

fn default_out_dir(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    PathBuf::from(format!("{}-commentary", stem))
}

fn write_outputs(out_dir: &Path, result: &CommentaryResult) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let narration = out_dir.join("narration.txt");
    std::fs::write(&narration, &result.text)?;
    println!("  {} {}", "✓".green(), narration.display());

    if let Some(subtitles) = &result.subtitles {
        let srt = out_dir.join("subtitles.srt");
        std::fs::write(&srt, subtitles)?;
        println!("  {} {}", "✓".green(), srt.display());
    }

    if let Some(audio) = &result.audio {
        let wav = out_dir.join("commentary.wav");
        std::fs::write(
            &wav,
            vidvoice_media::wrap_pcm(
                audio,
                vidvoice_media::SPEECH_SAMPLE_RATE,
                vidvoice_media::SPEECH_CHANNELS,
            ),
        )?;
        println!("  {} {}", "✓".green(), wav.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_out_dir_uses_video_stem() {
        assert_eq!(
            default_out_dir(Path::new("/tmp/holiday.mp4")),
            PathBuf::from("holiday-commentary")
        );
        assert_eq!(
            default_out_dir(Path::new("clip.webm")),
            PathBuf::from("clip-commentary")
        );
    }

    #[test]
    fn test_write_outputs_skips_absent_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");

        let result = CommentaryResult {
            text: "A cat dreams.".to_string(),
            subtitles: None,
            audio: Some(vec![0u8; 16]),
        };
        write_outputs(&out, &result).unwrap();

        assert!(out.join("narration.txt").exists());
        assert!(!out.join("subtitles.srt").exists());
        assert!(out.join("commentary.wav").exists());

        // WAV wrapping adds the 44-byte header
        let wav = std::fs::read(out.join("commentary.wav")).unwrap();
        assert_eq!(wav.len(), 44 + 16);
    }
}
