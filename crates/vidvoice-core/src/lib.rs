//! Vidvoice Core - domain types for the video narration pipeline.

mod settings;
mod subtitle;
mod types;

pub use settings::*;
pub use subtitle::{format_srt_time, render_srt};
pub use types::*;
