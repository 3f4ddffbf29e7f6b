//! Initialize Vidvoice.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use vidvoice_config::Config;
use vidvoice_db::Database;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    // Check if already initialized
    if paths.is_initialized() {
        println!("{} Vidvoice is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Database: {}", paths.database_file.display());
        return Ok(());
    }

    println!("{}", "Initializing Vidvoice...".cyan().bold());

    // Create directories
    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    // Create config file
    Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    // Initialize database
    let _db = Database::open(&paths.database_file).context("Failed to initialize database")?;
    println!(
        "  {} Created database: {}",
        "✓".green(),
        paths.database_file.display()
    );

    println!();
    println!("{}", "External tools".white().bold());
    for (tool, available) in vidvoice_media::check_dependencies() {
        if available {
            println!("  {} {}", "✓".green(), tool);
        } else {
            println!("  {} {} (install it before narrating)", "✗".red(), tool);
        }
    }

    println!();
    println!("{}", "Vidvoice initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set your API key: {}",
        "vidvoice config set gemini.api_key <KEY>".cyan()
    );
    println!(
        "  2. Narrate a video: {}",
        "vidvoice narrate clip.mp4".cyan()
    );
    println!("  3. Check your quota: {}", "vidvoice quota show".cyan());

    Ok(())
}
