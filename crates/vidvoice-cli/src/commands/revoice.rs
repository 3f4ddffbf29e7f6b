//! Revoice command - re-synthesize speech for an edited narration script.
//!
//! Only the audio file is replaced; an existing subtitle track keeps the
//! cues from the original pass. On failure nothing is touched.

use super::get_config;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use vidvoice_core::{CommentarySettings, Tone, VoiceGender};
use vidvoice_gemini::GeminiClient;

pub fn run(dir: &Path, script: Option<PathBuf>, voice: &str, tone: &str) -> Result<()> {
    let config = get_config()?;

    let script_path = script.unwrap_or_else(|| dir.join("narration.txt"));
    let text = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read {}", script_path.display()))?;
    if text.trim().is_empty() {
        anyhow::bail!("Narration script is empty; nothing to voice.");
    }

    let settings = CommentarySettings {
        voice_gender: VoiceGender::from_str(voice)
            .ok_or_else(|| anyhow::anyhow!("Unknown voice gender '{}' (male, female)", voice))?,
        tone: Tone::from_str(tone).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown tone '{}' (assertive, excited, calm, sarcastic, dramatic, asmr)",
                tone
            )
        })?,
        ..Default::default()
    };

    let client =
        GeminiClient::from_config(&config.gemini).context("Failed to create Gemini client")?;
    let rt = Runtime::new().context("Failed to create async runtime")?;

    println!("{}", "Regenerating voice-over...".cyan());
    let audio = rt
        .block_on(client.synthesize_speech(&text, &settings))
        .context("Failed to regenerate audio; the previous files are unchanged")?;

    let wav_path = dir.join("commentary.wav");
    std::fs::write(
        &wav_path,
        vidvoice_media::wrap_pcm(
            &audio,
            vidvoice_media::SPEECH_SAMPLE_RATE,
            vidvoice_media::SPEECH_CHANNELS,
        ),
    )?;
    println!("  {} {}", "✓".green(), wav_path.display());

    if dir.join("subtitles.srt").exists() {
        println!(
            "  {}",
            "subtitles.srt left unchanged; it may drift from the edited script".dimmed()
        );
    }

    Ok(())
}
