//! User-facing narration settings.

use serde::{Deserialize, Serialize};

/// Narration language. Each language carries a display label and the
/// fragment inserted into the generation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "hi-IN")]
    HiIn,
    #[serde(rename = "ur-PK")]
    UrPk,
    #[serde(rename = "ps-AF")]
    PsAf,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::EnUs,
        Language::HiIn,
        Language::UrPk,
        Language::PsAf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::EnUs => "en-US",
            Language::HiIn => "hi-IN",
            Language::UrPk => "ur-PK",
            Language::PsAf => "ps-AF",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en-us" => Some(Language::EnUs),
            "hi-in" => Some(Language::HiIn),
            "ur-pk" => Some(Language::UrPk),
            "ps-af" => Some(Language::PsAf),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::EnUs => "English (US)",
            Language::HiIn => "Hindi (हिंदी)",
            Language::UrPk => "Urdu (اردو)",
            Language::PsAf => "Pashto (پښتو)",
        }
    }

    /// Fragment handed to the generation prompt.
    pub fn prompt_fragment(&self) -> &'static str {
        match self {
            Language::EnUs => "English",
            Language::HiIn => "Hindi (Devanagari script)",
            Language::UrPk => "Urdu",
            Language::PsAf => "Pashto",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Narration theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Standard,
    Movie,
    Documentary,
    Sports,
    Horror,
    Comedy,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Standard,
        Theme::Movie,
        Theme::Documentary,
        Theme::Sports,
        Theme::Horror,
        Theme::Comedy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Standard => "standard",
            Theme::Movie => "movie",
            Theme::Documentary => "documentary",
            Theme::Sports => "sports",
            Theme::Horror => "horror",
            Theme::Comedy => "comedy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Some(Theme::Standard),
            "movie" => Some(Theme::Movie),
            "documentary" => Some(Theme::Documentary),
            "sports" => Some(Theme::Sports),
            "horror" => Some(Theme::Horror),
            "comedy" => Some(Theme::Comedy),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Standard => "Standard Narration",
            Theme::Movie => "Movie / Cinematic",
            Theme::Documentary => "Nature Documentary",
            Theme::Sports => "Sports Commentary",
            Theme::Horror => "Horror / Thriller",
            Theme::Comedy => "Comedy / Roasting",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Narration tone. The asmr tone forces slower pacing and a soft voice
/// regardless of the other tone-derived choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Assertive,
    Excited,
    Calm,
    Sarcastic,
    Dramatic,
    Asmr,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Assertive,
        Tone::Excited,
        Tone::Calm,
        Tone::Sarcastic,
        Tone::Dramatic,
        Tone::Asmr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Assertive => "assertive",
            Tone::Excited => "excited",
            Tone::Calm => "calm",
            Tone::Sarcastic => "sarcastic",
            Tone::Dramatic => "dramatic",
            Tone::Asmr => "asmr",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "assertive" => Some(Tone::Assertive),
            "excited" => Some(Tone::Excited),
            "calm" => Some(Tone::Calm),
            "sarcastic" => Some(Tone::Sarcastic),
            "dramatic" => Some(Tone::Dramatic),
            "asmr" => Some(Tone::Asmr),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Assertive => "Assertive & Deep",
            Tone::Excited => "Excited & High Energy",
            Tone::Calm => "Calm & Soothing",
            Tone::Sarcastic => "Sarcastic & Witty",
            Tone::Dramatic => "Dramatic & Intense",
            Tone::Asmr => "ASMR / Soft Whisper",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Voice gender for speech synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    #[default]
    Male,
    Female,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Male => "male",
            VoiceGender::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(VoiceGender::Male),
            "female" => Some(VoiceGender::Female),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extra context for the movie theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MovieConfig {
    pub title: String,
    pub character: String,
}

/// Immutable settings snapshot for one finalization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommentarySettings {
    pub language: Language,
    pub theme: Theme,
    pub tone: Tone,
    pub voice_gender: VoiceGender,
    /// Free-text hint about the footage, e.g. "a vlog" or "CCTV footage".
    #[serde(default)]
    pub video_context: String,
    /// Consulted only when `theme` is `Movie`.
    #[serde(default)]
    pub movie: MovieConfig,
}
