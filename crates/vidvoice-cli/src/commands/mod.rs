//! CLI command implementations.

pub mod config;
pub mod init;
pub mod narrate;
pub mod quota;
pub mod revoice;

use anyhow::{Context, Result};
use vidvoice_config::{AppPaths, Config};
use vidvoice_core::{
    CommentarySettings, Language, MovieConfig, Theme, Tone, VoiceGender,
};
use vidvoice_db::Database;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Get a database connection, ensuring vidvoice is initialized.
pub fn get_database() -> Result<Database> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("Vidvoice is not initialized. Run 'vidvoice init' first.");
    }

    Database::open(&paths.database_file).context("Failed to open database")
}

/// Load the configuration from its default location.
pub fn get_config() -> Result<Config> {
    Config::load().context("Failed to load configuration")
}

/// Build a settings snapshot from command-line flags.
#[allow(clippy::too_many_arguments)]
pub fn parse_settings(
    language: &str,
    theme: &str,
    tone: &str,
    voice: &str,
    context: &str,
    movie_title: Option<String>,
    character: Option<String>,
) -> Result<CommentarySettings> {
    let language = Language::from_str(language)
        .ok_or_else(|| anyhow::anyhow!("Unknown language '{}' (en-US, hi-IN, ur-PK, ps-AF)", language))?;
    let theme = Theme::from_str(theme).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown theme '{}' (standard, movie, documentary, sports, horror, comedy)",
            theme
        )
    })?;
    let tone = Tone::from_str(tone).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown tone '{}' (assertive, excited, calm, sarcastic, dramatic, asmr)",
            tone
        )
    })?;
    let voice_gender = VoiceGender::from_str(voice)
        .ok_or_else(|| anyhow::anyhow!("Unknown voice gender '{}' (male, female)", voice))?;

    Ok(CommentarySettings {
        language,
        theme,
        tone,
        voice_gender,
        video_context: context.to_string(),
        movie: MovieConfig {
            title: movie_title.unwrap_or_default(),
            character: character.unwrap_or_default(),
        },
    })
}
