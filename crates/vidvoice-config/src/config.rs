//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&paths.config_file)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        let default_config = Self::default_config_string();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config)?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Vidvoice Configuration
# AI voice-over narration for your videos

[gemini]
# Google Generative Language API endpoint
host = "https://generativelanguage.googleapis.com"

# API key used for all Gemini calls
api_key = ""

# Vision model for per-frame scene descriptions
flash_model = "gemini-2.5-flash"

# Language model for script and subtitle generation
pro_model = "gemini-3-pro-preview"

# Text-to-speech model
tts_model = "gemini-2.5-flash-preview-tts"

# Request timeout in seconds
timeout_seconds = 120

[analysis]
# Frame description requests per minute
rate_limit_rpm = 25

# Frames analyzed per calendar day before the queue refuses new work
daily_frame_limit = 50000

[extraction]
# JPEG quality handed to ffmpeg (2 = best, 31 = worst)
jpeg_quality = 7

# Seconds between sampled frames; leave unset to pick automatically
# from the video duration (1s short, 2s medium, 5s long)
# interval_seconds = 2

[ui]
# Enable colored output
color = true
"#
        .to_string()
    }

    /// Set a configuration value by dotted key, e.g. `gemini.api_key`.
    pub fn set(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        match key {
            "gemini.host" => self.gemini.host = value.to_string(),
            "gemini.api_key" => self.gemini.api_key = value.to_string(),
            "gemini.flash_model" => self.gemini.flash_model = value.to_string(),
            "gemini.pro_model" => self.gemini.pro_model = value.to_string(),
            "gemini.tts_model" => self.gemini.tts_model = value.to_string(),
            "gemini.timeout_seconds" => {
                self.gemini.timeout_seconds = parse_number(key, value)?;
            }
            "analysis.rate_limit_rpm" => {
                self.analysis.rate_limit_rpm = parse_number(key, value)?;
            }
            "analysis.daily_frame_limit" => {
                self.analysis.daily_frame_limit = parse_number(key, value)?;
            }
            "extraction.jpeg_quality" => {
                self.extraction.jpeg_quality = parse_number(key, value)?;
            }
            "extraction.interval_seconds" => {
                self.extraction.interval_seconds = Some(parse_number(key, value)?);
            }
            "ui.color" => {
                self.ui.color = value
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("{} expects true/false", key)))?;
            }
            _ => return Err(ConfigError::Invalid(format!("unknown key: {}", key))),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} expects a number, got '{}'", key, value)))
}

/// Gemini API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub host: String,
    pub api_key: String,
    pub flash_model: String,
    pub pro_model: String,
    pub tts_model: String,
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            host: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            flash_model: "gemini-2.5-flash".to_string(),
            pro_model: "gemini-3-pro-preview".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// Frame analysis throttling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rate_limit_rpm: u32,
    pub daily_frame_limit: u32,
}

impl AnalysisConfig {
    /// Minimum spacing between consecutive frame requests. A small margin is
    /// added on top of the per-minute budget so bursts never trip the limit.
    pub fn request_interval(&self) -> Duration {
        let rpm = self.rate_limit_rpm.max(1) as u64;
        Duration::from_millis(60_000 / rpm + 100)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rate_limit_rpm: 25,
            daily_frame_limit: 50_000,
        }
    }
}

/// Frame extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// JPEG quality handed to ffmpeg (2 = best, 31 = worst).
    pub jpeg_quality: u32,
    /// Fixed sampling interval; `None` picks one from the video duration.
    pub interval_seconds: Option<u64>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 7,
            interval_seconds: None,
        }
    }
}

/// UI/Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.host, "https://generativelanguage.googleapis.com");
        assert_eq!(config.analysis.rate_limit_rpm, 25);
        assert_eq!(config.analysis.daily_frame_limit, 50_000);
        assert!(config.ui.color);
    }

    #[test]
    fn test_request_interval_from_rpm() {
        let analysis = AnalysisConfig {
            rate_limit_rpm: 25,
            daily_frame_limit: 50_000,
        };
        assert_eq!(analysis.request_interval(), Duration::from_millis(2500));

        let analysis = AnalysisConfig {
            rate_limit_rpm: 60,
            daily_frame_limit: 50_000,
        };
        assert_eq!(analysis.request_interval(), Duration::from_millis(1100));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.gemini.flash_model, deserialized.gemini.flash_model);
        assert_eq!(
            config.analysis.daily_frame_limit,
            deserialized.analysis.daily_frame_limit
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [analysis]
            rate_limit_rpm = 10
            "#
        )
        .unwrap();

        let path = temp_file.path().to_path_buf();
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.analysis.rate_limit_rpm, 10);
        // Defaults should still work
        assert_eq!(config.analysis.daily_frame_limit, 50_000);
        assert_eq!(config.gemini.timeout_seconds, 120);
    }

    #[test]
    fn test_set_by_key() {
        let mut config = Config::default();
        config.set("gemini.api_key", "secret").unwrap();
        config.set("analysis.rate_limit_rpm", "12").unwrap();

        assert_eq!(config.gemini.api_key, "secret");
        assert_eq!(config.analysis.rate_limit_rpm, 12);

        assert!(config.set("analysis.rate_limit_rpm", "fast").is_err());
        assert!(config.set("nope.key", "x").is_err());
    }
}
