//! Vidvoice Media - media processing for the narration pipeline.
//!
//! This crate provides:
//! - Video probing and frame sampling (via the FFmpeg CLI)
//! - WAV container wrapping for synthesized PCM speech
//!
//! Frame sampling relies on `ffmpeg` and `ffprobe` being installed on the
//! system.

mod error;
mod ffmpeg;
mod wav;

pub use error::{MediaError, MediaResult};
pub use ffmpeg::{extract_frames, probe, sampling_interval, VideoInfo};
pub use wav::{wrap_pcm, SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};

/// Check if required external tools are available.
pub fn check_dependencies() -> Vec<(&'static str, bool)> {
    vec![
        ("ffmpeg", which::which("ffmpeg").is_ok()),
        ("ffprobe", which::which("ffprobe").is_ok()),
    ]
}
