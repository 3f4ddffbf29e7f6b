//! Config command - show, edit, and set configuration values.

use super::{get_config, get_paths};
use anyhow::{Context, Result};
use colored::Colorize;
use vidvoice_config::Config;

pub fn show() -> Result<()> {
    let paths = get_paths()?;
    let mut config = get_config()?;

    // Never echo the key itself
    if !config.gemini.api_key.is_empty() {
        config.gemini.api_key = "(set)".to_string();
    }

    println!("{}", "Vidvoice Configuration".cyan().bold());
    println!("{} {}", "File:".dimmed(), paths.config_file.display());
    println!("{}", "─".repeat(50));
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn edit() -> Result<()> {
    let paths = get_paths()?;

    if !paths.config_file.exists() {
        anyhow::bail!("No config file found. Run 'vidvoice init' first.");
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = std::process::Command::new(&editor)
        .arg(&paths.config_file)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
        anyhow::bail!("Editor exited with an error");
    }

    // Validate the result so a broken file is caught now, not mid-narration
    Config::load_from(&paths.config_file).context("Edited config does not parse")?;
    println!("{} Config updated.", "✓".green());
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let mut config = get_config()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if key == "gemini.api_key" { "(set)" } else { value };
    println!("{} {} = {}", "✓".green(), key, shown);
    Ok(())
}
