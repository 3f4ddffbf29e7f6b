//! Voice profile selection for speech synthesis.

use vidvoice_core::{CommentarySettings, Tone, VoiceGender};

/// Map settings to a prebuilt voice. The asmr tone always resolves to the
/// softest available voice for the selected gender.
pub(crate) fn voice_for(settings: &CommentarySettings) -> &'static str {
    match settings.voice_gender {
        VoiceGender::Female => "Kore",
        VoiceGender::Male => match settings.tone {
            Tone::Asmr | Tone::Calm => "Charon",
            Tone::Excited => "Puck",
            _ => "Fenrir",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(gender: VoiceGender, tone: Tone) -> CommentarySettings {
        CommentarySettings {
            voice_gender: gender,
            tone,
            ..Default::default()
        }
    }

    #[test]
    fn test_female_voices() {
        for tone in Tone::ALL {
            assert_eq!(voice_for(&settings(VoiceGender::Female, tone)), "Kore");
        }
    }

    #[test]
    fn test_male_voices() {
        assert_eq!(voice_for(&settings(VoiceGender::Male, Tone::Assertive)), "Fenrir");
        assert_eq!(voice_for(&settings(VoiceGender::Male, Tone::Dramatic)), "Fenrir");
        assert_eq!(voice_for(&settings(VoiceGender::Male, Tone::Sarcastic)), "Fenrir");
        assert_eq!(voice_for(&settings(VoiceGender::Male, Tone::Excited)), "Puck");
        assert_eq!(voice_for(&settings(VoiceGender::Male, Tone::Calm)), "Charon");
        assert_eq!(voice_for(&settings(VoiceGender::Male, Tone::Asmr)), "Charon");
    }
}
