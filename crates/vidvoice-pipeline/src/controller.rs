//! The finalization state machine.

use crate::error::FinalizeError;
use crate::queue::FrameEvent;
use vidvoice_core::{CommentaryResult, Frame};

/// Observable phase of the finalization state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingFrames,
    ReadyToFinalize,
    Finalizing,
    Done,
    Errored,
}

/// Drives exactly-once finalization over a batch of frames.
///
/// Queue events update the frame collection; `poll_transition` is the single
/// transition function and may be invoked redundantly; the `attempted`
/// latch guarantees one finalization per settled batch until `regenerate`
/// arms it again.
#[derive(Default)]
pub struct FinalizationController {
    frames: Vec<Frame>,
    phase: Phase,
    attempted: bool,
    result: Option<CommentaryResult>,
    error: Option<FinalizeError>,
}

impl FinalizationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a fresh batch, discarding any previous frames, result, and
    /// error.
    pub fn begin_batch(&mut self, frames: Vec<Frame>) {
        self.phase = if frames.is_empty() {
            Phase::Idle
        } else {
            Phase::AwaitingFrames
        };
        self.frames = frames;
        self.attempted = false;
        self.result = None;
        self.error = None;
    }

    /// Fold one queue event into the frame collection.
    pub fn apply_event(&mut self, event: FrameEvent) {
        match event {
            FrameEvent::Completed { id, description } => {
                if let Some(frame) = self.frames.iter_mut().find(|f| f.id == id) {
                    frame.complete(description);
                }
            }
            FrameEvent::QuotaExhausted => {
                self.error = Some(FinalizeError::QuotaExhausted);
                self.phase = Phase::Errored;
            }
        }
    }

    /// The transition function. Returns true exactly once per armed batch,
    /// at the moment every frame is terminal and nothing blocks a run. The
    /// latch is set before any asynchronous work starts, so re-entry is
    /// impossible regardless of how often state changes re-trigger the poll.
    pub fn poll_transition(&mut self) -> bool {
        let has_frames = !self.frames.is_empty();
        let all_terminal = self.frames.iter().all(|f| f.status.is_terminal());

        if has_frames
            && all_terminal
            && self.result.is_none()
            && self.error.is_none()
            && self.phase != Phase::Finalizing
            && !self.attempted
        {
            self.attempted = true;
            self.phase = Phase::Finalizing;
            return true;
        }

        if has_frames && all_terminal && self.phase == Phase::AwaitingFrames {
            self.phase = Phase::ReadyToFinalize;
        }
        false
    }

    /// Record a successful pass.
    pub fn complete(&mut self, result: CommentaryResult) {
        self.result = Some(result);
        self.phase = Phase::Done;
    }

    /// Record a failed pass.
    pub fn fail(&mut self, error: FinalizeError) {
        self.error = Some(error);
        self.phase = Phase::Errored;
    }

    /// Clear the published result (and any prior failure) and re-arm the
    /// transition for exactly one more pass over the same frames.
    pub fn regenerate(&mut self) {
        self.result = None;
        self.error = None;
        self.attempted = false;
        self.phase = if self.frames.is_empty() {
            Phase::Idle
        } else {
            Phase::ReadyToFinalize
        };
    }

    /// Apply a manual script edit: only the narration text and its audio are
    /// replaced. Subtitles keep the cues of the original pass, even if they
    /// drift out of sync with the edited text.
    pub fn apply_edit(&mut self, text: impl Into<String>, audio: Vec<u8>) {
        if let Some(result) = &mut self.result {
            result.text = text.into();
            result.audio = Some(audio);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn result(&self) -> Option<&CommentaryResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&FinalizeError> {
        self.error.as_ref()
    }

    /// Frames that have reached a terminal status so far.
    pub fn settled_count(&self) -> usize {
        self.frames.iter().filter(|f| f.status.is_terminal()).count()
    }
}
