//! FFmpeg integration for video probing and frame sampling.

use crate::error::{MediaError, MediaResult};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};
use vidvoice_core::Frame;

/// Information about a video file.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    /// Duration in seconds.
    pub duration: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Video codec.
    pub video_codec: Option<String>,
    /// Frame rate.
    pub fps: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

fn require_tool(tool: &str) -> MediaResult<()> {
    if which::which(tool).is_err() {
        return Err(MediaError::ToolNotFound {
            tool: tool.to_string(),
        });
    }
    Ok(())
}

/// Get information about a video file.
pub fn probe(path: &Path) -> MediaResult<VideoInfo> {
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }
    require_tool("ffprobe")?;

    let output = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::FfmpegError(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let probe: FfprobeOutput = serde_json::from_str(&json_str)
        .map_err(|e| MediaError::ParseError(format!("Failed to parse ffprobe output: {}", e)))?;

    let video_stream = probe.streams.iter().find(|s| s.codec_type == "video");

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let (width, height) = video_stream
        .map(|s| (s.width.unwrap_or(0), s.height.unwrap_or(0)))
        .unwrap_or((0, 0));

    let fps = video_stream
        .and_then(|s| s.r_frame_rate.as_ref())
        .and_then(|r| {
            let parts: Vec<&str> = r.split('/').collect();
            if parts.len() == 2 {
                let num: f64 = parts[0].parse().ok()?;
                let den: f64 = parts[1].parse().ok()?;
                if den > 0.0 {
                    Some(num / den)
                } else {
                    None
                }
            } else {
                r.parse().ok()
            }
        });

    Ok(VideoInfo {
        duration,
        width,
        height,
        video_codec: video_stream.and_then(|s| s.codec_name.clone()),
        fps,
    })
}

/// Seconds between sampled frames for a video of the given duration:
/// 1 fps for short clips, one frame every 2 s up to five minutes, one frame
/// every 5 s beyond that.
pub fn sampling_interval(duration: f64) -> u64 {
    if duration > 300.0 {
        5
    } else if duration > 60.0 {
        2
    } else {
        1
    }
}

/// Sample frames from a video at regular intervals.
///
/// Frames are downscaled to half resolution and JPEG-compressed, then loaded
/// into memory with ids assigned in time order starting at 0. `interval`
/// overrides the duration-based default when set.
pub fn extract_frames(
    video_path: &Path,
    interval: Option<u64>,
    jpeg_quality: u32,
) -> MediaResult<Vec<Frame>> {
    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }
    require_tool("ffmpeg")?;

    let info = probe(video_path)?;
    let interval = interval
        .unwrap_or_else(|| sampling_interval(info.duration))
        .max(1);

    let dir = tempfile::tempdir()?;
    let pattern = dir.path().join("frame_%04d.jpg");

    info!(
        "Sampling frames from {:?} every {}s ({}s total)",
        video_path, interval, info.duration
    );

    let output = Command::new("ffmpeg")
        .args(["-i"])
        .arg(video_path)
        .args([
            "-vf",
            &format!("fps=1/{},scale=iw/2:ih/2", interval),
            "-q:v",
            &jpeg_quality.to_string(),
            "-y",
        ])
        .arg(&pattern)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::FfmpegError(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    // Collect the numbered output files until the sequence stops
    let mut frames = Vec::new();
    let mut index: u32 = 1;
    loop {
        let frame_path = dir.path().join(format!("frame_{:04}.jpg", index));
        if !frame_path.exists() {
            break;
        }

        let image = std::fs::read(&frame_path)?;
        let id = index - 1;
        frames.push(Frame::new(id, (id as u64 * interval) as f64, image));
        index += 1;
    }

    debug!("Sampled {} frames", frames.len());
    Ok(frames)
}
