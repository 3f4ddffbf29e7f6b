//! Classified errors for the finalization pipeline.

use thiserror::Error;

/// Errors surfaced when a batch cannot be finalized.
#[derive(Error, Debug)]
pub enum FinalizeError {
    /// The daily analysis quota ran out mid-batch and the backlog was
    /// abandoned.
    #[error("daily analysis quota exceeded; remaining frames were not analyzed")]
    QuotaExhausted,

    /// The batch contained no frames at all.
    #[error("no frames were extracted to analyze")]
    NoFrames,

    /// Every frame in a non-empty batch failed analysis.
    #[error("analysis failed for all frames")]
    AllFramesFailed,

    /// The API rejected the configured credentials.
    #[error("the provided API key was rejected")]
    InvalidApiKey,

    /// Script generation failed; no audio was produced.
    #[error("script generation failed: {0}")]
    Script(String),

    /// Speech synthesis failed; the script and subtitles are discarded.
    #[error("speech synthesis failed: {0}")]
    Speech(String),
}

impl FinalizeError {
    /// One user-facing line per error class. Unclassified collaborator
    /// failures collapse to a generic message instead of leaking raw error
    /// text.
    pub fn user_message(&self) -> &'static str {
        match self {
            FinalizeError::QuotaExhausted => {
                "You have reached your daily API quota limit. Please come back tomorrow!"
            }
            FinalizeError::NoFrames => "Video Error: Could not extract frames from this video.",
            FinalizeError::AllFramesFailed => {
                "Analysis Failed: The API could not interpret the frames. \
                 Please check your internet connection."
            }
            FinalizeError::InvalidApiKey => {
                "API Key Error: The provided API key is invalid or expired."
            }
            FinalizeError::Script(_) | FinalizeError::Speech(_) => {
                "Failed to generate final commentary."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_distinct_per_class() {
        let quota = FinalizeError::QuotaExhausted.user_message();
        let none = FinalizeError::NoFrames.user_message();
        let all = FinalizeError::AllFramesFailed.user_message();
        let key = FinalizeError::InvalidApiKey.user_message();

        assert_ne!(quota, none);
        assert_ne!(none, all);
        assert_ne!(all, key);
    }

    #[test]
    fn test_unclassified_failures_stay_generic() {
        let script = FinalizeError::Script("socket hang up at 10.0.0.2".to_string());
        assert_eq!(script.user_message(), "Failed to generate final commentary.");
        assert!(!script.user_message().contains("10.0.0.2"));

        let speech = FinalizeError::Speech("boom".to_string());
        assert_eq!(speech.user_message(), script.user_message());
    }
}
