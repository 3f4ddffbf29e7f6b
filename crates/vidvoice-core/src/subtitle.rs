//! SRT subtitle rendering.

use crate::types::SubtitleCue;

/// Format a seconds value as an SRT timestamp, `HH:MM:SS,mmm`.
pub fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let s = (total_ms / 1000) % 60;
    let m = (total_ms / 60_000) % 60;
    let h = total_ms / 3_600_000;
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

/// Render cues as an SRT track: 1-based index, `start --> end` line, text,
/// blocks separated by blank lines.
pub fn render_srt(cues: &[SubtitleCue]) -> String {
    cues.iter()
        .enumerate()
        .map(|(index, cue)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                index + 1,
                format_srt_time(cue.start),
                format_srt_time(cue.end),
                cue.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
