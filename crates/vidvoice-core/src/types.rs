//! Frame, quota, and result types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Identifier of a frame, unique within one extraction batch.
pub type FrameId = u32;

/// Prefix carried by descriptions substituted for a failed analysis call.
/// A frame whose description contains this marker still settles into a
/// terminal status, but is skipped when the narration script is assembled.
pub const ANALYSIS_ERROR_MARKER: &str = "Error";

/// Processing status of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    #[default]
    Pending,
    Analyzing,
    Completed,
    Error,
}

impl FrameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameStatus::Pending => "pending",
            FrameStatus::Analyzing => "analyzing",
            FrameStatus::Completed => "completed",
            FrameStatus::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(FrameStatus::Pending),
            "analyzing" => Some(FrameStatus::Analyzing),
            "completed" => Some(FrameStatus::Completed),
            "error" => Some(FrameStatus::Error),
            _ => None,
        }
    }

    /// A terminal frame never transitions again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FrameStatus::Completed | FrameStatus::Error)
    }
}

impl std::fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sampled video instant.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: FrameId,
    /// Timestamp in seconds from the start of the video.
    pub time: f64,
    /// JPEG image payload.
    pub image: Vec<u8>,
    pub description: Option<String>,
    pub status: FrameStatus,
}

impl Frame {
    pub fn new(id: FrameId, time: f64, image: Vec<u8>) -> Self {
        Self {
            id,
            time,
            image,
            description: None,
            status: FrameStatus::Pending,
        }
    }

    /// Settle the frame with the analysis outcome. The description may carry
    /// the error marker; the status is terminal either way.
    pub fn complete(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
        self.status = FrameStatus::Completed;
    }

    /// True when the frame carries a usable scene description: non-empty and
    /// not a substituted error marker.
    pub fn has_valid_description(&self) -> bool {
        match &self.description {
            Some(d) => !d.is_empty() && !d.contains(ANALYSIS_ERROR_MARKER),
            None => false,
        }
    }
}

/// A scene description paired with its timestamp, in extraction order.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub time: f64,
    pub text: String,
}

impl SceneDescription {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
        }
    }
}

/// One subtitle cue, ordered by start time within a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// The published output of one finalization pass.
///
/// A manual script edit replaces `text` and `audio` only; `subtitles` keeps
/// the cues from the original pass even if they drift out of sync.
#[derive(Debug, Clone, Default)]
pub struct CommentaryResult {
    /// Narration script.
    pub text: String,
    /// Rendered SRT track, absent when the generator produced no cues.
    pub subtitles: Option<String>,
    /// Raw PCM speech payload (s16le, 24 kHz mono).
    pub audio: Option<Vec<u8>>,
}

/// Snapshot of the persistent daily analysis quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStats {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
    /// Human description of when the counter rolls over.
    pub resets: String,
}

impl QuotaStats {
    pub fn for_usage(used: u32, limit: u32) -> Self {
        Self {
            used,
            limit,
            remaining: limit.saturating_sub(used),
            resets: "midnight local time".to_string(),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Persistent, process-wide counter of frames analyzed today.
///
/// Implementations never surface storage failures: a missing or corrupted
/// record is treated as a fresh zero record for the current day. The store is
/// injected into the analysis queue so tests can substitute an in-memory
/// fake.
pub trait QuotaStore: Send + Sync {
    /// Current-day usage, applying the lazy day rollover.
    fn read(&self) -> QuotaStats;

    /// Add one analyzed frame to today's count. The rollover check runs
    /// first, so the first increment of a new day starts from zero.
    fn increment(&self);

    /// Force today's count back to zero, regardless of elapsed time.
    fn reset(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_settles_terminal() {
        let mut frame = Frame::new(0, 1.0, vec![0xff, 0xd8]);
        assert_eq!(frame.status, FrameStatus::Pending);
        assert!(!frame.status.is_terminal());

        frame.complete("A dog runs across a field.");
        assert!(frame.status.is_terminal());
        assert!(frame.has_valid_description());
    }

    #[test]
    fn test_error_marker_description_is_invalid() {
        let mut frame = Frame::new(3, 3.0, vec![]);
        frame.complete("Error: analysis request failed");
        assert!(frame.status.is_terminal());
        assert!(!frame.has_valid_description());
    }

    #[test]
    fn test_quota_stats_remaining_saturates() {
        let stats = QuotaStats::for_usage(120, 100);
        assert_eq!(stats.remaining, 0);
        assert!(stats.exhausted());

        let stats = QuotaStats::for_usage(10, 100);
        assert_eq!(stats.remaining, 90);
        assert!(!stats.exhausted());
    }

    #[test]
    fn test_frame_status_roundtrip() {
        assert_eq!(FrameStatus::from_str("completed"), Some(FrameStatus::Completed));
        assert_eq!(FrameStatus::from_str("PENDING"), Some(FrameStatus::Pending));
        assert_eq!(FrameStatus::from_str("unknown"), None);
        assert_eq!(FrameStatus::Error.to_string(), "error");
    }
}
