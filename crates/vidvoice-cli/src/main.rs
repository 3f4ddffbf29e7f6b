//! Vidvoice CLI - AI voice-over narration for your videos

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Vidvoice - AI voice-over narration for your videos
#[derive(Parser)]
#[command(name = "vidvoice")]
#[command(version)]
#[command(about = "AI voice-over narration for your videos", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Vidvoice (create config and database)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show or reset the daily analysis quota
    #[command(subcommand)]
    Quota(QuotaCommands),

    /// Narrate a video: analyze frames, generate a script, synthesize speech
    Narrate {
        /// Path to the video file
        video: PathBuf,

        /// Narration language (en-US, hi-IN, ur-PK, ps-AF)
        #[arg(short, long, default_value = "en-US")]
        language: String,

        /// Narration theme (standard, movie, documentary, sports, horror,
        /// comedy)
        #[arg(short, long, default_value = "standard")]
        theme: String,

        /// Narration tone (assertive, excited, calm, sarcastic, dramatic,
        /// asmr)
        #[arg(long, default_value = "assertive")]
        tone: String,

        /// Voice gender (male, female)
        #[arg(long, default_value = "male")]
        voice: String,

        /// Free-text context about the footage, e.g. "a vlog"
        #[arg(short, long, default_value = "")]
        context: String,

        /// Movie title (movie theme only)
        #[arg(long)]
        movie_title: Option<String>,

        /// Lead character name (movie theme only)
        #[arg(long)]
        character: Option<String>,

        /// Output directory for narration.txt, subtitles.srt, commentary.wav
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Re-synthesize speech for an edited narration script
    Revoice {
        /// Output directory of a previous narrate run
        dir: PathBuf,

        /// Narration text file to voice (defaults to narration.txt in DIR)
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Voice gender (male, female)
        #[arg(long, default_value = "male")]
        voice: String,

        /// Narration tone used for voice selection
        #[arg(long, default_value = "assertive")]
        tone: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open config file in editor
    Edit,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., gemini.api_key)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Subcommand)]
enum QuotaCommands {
    /// Show today's usage against the daily limit
    Show,

    /// Zero today's usage counter
    Reset,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vidvoice=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vidvoice=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Honor the color switch before any command prints
    if let Ok(config) = vidvoice_config::Config::load() {
        if !config.ui.color {
            colored::control::set_override(false);
        }
    }

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Edit => commands::config::edit(),
            ConfigCommands::Set { key, value } => commands::config::set(&key, &value),
        },
        Commands::Quota(cmd) => match cmd {
            QuotaCommands::Show => commands::quota::show(),
            QuotaCommands::Reset => commands::quota::reset(),
        },
        Commands::Narrate {
            video,
            language,
            theme,
            tone,
            voice,
            context,
            movie_title,
            character,
            out,
        } => commands::narrate::run(
            &video,
            &language,
            &theme,
            &tone,
            &voice,
            &context,
            movie_title,
            character,
            out,
        ),
        Commands::Revoice {
            dir,
            script,
            voice,
            tone,
        } => commands::revoice::run(&dir, script, &voice, &tone),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
