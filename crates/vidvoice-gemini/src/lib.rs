//! Vidvoice Gemini - Gemini API integration.
//!
//! This crate provides the async client for the three model calls the
//! pipeline makes: per-frame scene descriptions, narration script plus
//! subtitle generation, and speech synthesis.

mod client;
mod error;
mod prompt;
mod types;
mod voice;

pub use client::{parse_script_response, GeminiClient};
pub use error::{GeminiError, GeminiResult};
pub use types::*;
