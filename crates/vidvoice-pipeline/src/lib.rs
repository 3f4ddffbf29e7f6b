//! Vidvoice Pipeline - the frame analysis queue and finalization pipeline.
//!
//! Frames flow through an ordered analysis backlog that respects a minimum
//! inter-request interval and the persistent daily quota, settle into
//! terminal statuses through a typed event stream, and - once the whole
//! batch is terminal - trigger exactly one finalization pass that turns the
//! scene descriptions into a narration script, subtitle cues, and speech.

mod controller;
mod error;
mod finalize;
mod queue;

pub use controller::{FinalizationController, Phase};
pub use error::FinalizeError;
pub use finalize::{run_finalization, ScriptGenerator, SpeechSynthesizer};
pub use queue::{AnalysisQueue, FrameAnalyzer, FrameEvent};
