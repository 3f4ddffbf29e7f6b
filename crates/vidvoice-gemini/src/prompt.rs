//! Narration prompt construction.

use vidvoice_core::{CommentarySettings, Language, SceneDescription, Theme, Tone};

const ASMR_STYLE: &str = r#"STYLE: ASMR.
- Speak slowly, clearly, and softly, as if whispering.
- Describe the scene in detail, including visual elements, motion, and subtle ambient details.
- Add sensory words (e.g., "gentle rustle," "soft glow," "delicate movement").
- Include slight pauses or phrasing that encourages a relaxed, immersive listening experience.
- Avoid sudden loud words or abrupt statements."#;

const INFERENCE_CONTEXT: &str = r#"CONTEXT INFERENCE:
- Analyze the provided frame descriptions to infer the setting (e.g., indoors, nature, city), the mood (e.g., calm, chaotic, joyful), and the flow of action.
- Use this inferred context to build a coherent narrative structure."#;

/// Narration pace in words per second; asmr speaks noticeably slower.
fn words_per_second(tone: Tone) -> f64 {
    if tone == Tone::Asmr {
        1.5
    } else {
        2.2
    }
}

/// Target script length for a video of `duration` seconds, clamped to a
/// range that keeps very short and very long videos usable.
pub(crate) fn target_word_count(duration: f64, tone: Tone) -> usize {
    ((duration * words_per_second(tone)).floor() as i64).clamp(30, 800) as usize
}

/// Context instruction, picked in priority order: the asmr style block, the
/// movie setup, the user's free-text hint, or context inference.
pub(crate) fn context_instruction(settings: &CommentarySettings) -> String {
    if settings.tone == Tone::Asmr {
        ASMR_STYLE.to_string()
    } else if settings.theme == Theme::Movie {
        format!(
            "CONTEXT: Cinematic Movie \"{}\" starring \"{}\". Narrate plot details.",
            settings.movie.title, settings.movie.character
        )
    } else if !settings.video_context.is_empty() {
        format!("CONTEXT: {}", settings.video_context)
    } else {
        INFERENCE_CONTEXT.to_string()
    }
}

/// Build the script-generation prompt from the analyzed timeline and the
/// user's settings.
pub(crate) fn build_script_prompt(
    scenes: &[SceneDescription],
    settings: &CommentarySettings,
) -> String {
    let duration = scenes.last().map(|s| s.time).unwrap_or(60.0);
    let target_words = target_word_count(duration, settings.tone);

    let timeline = scenes
        .iter()
        .map(|s| format!("[{}s]: {}", s.time, s.text))
        .collect::<Vec<_>>()
        .join("\n");

    let mut lang_instruction = format!(
        "Output strictly in {}.",
        settings.language.prompt_fragment()
    );
    if settings.language == Language::PsAf {
        lang_instruction.push_str(" Use Peshawari (Pakistani) dialect Pashto/Pukhto.");
    }

    format!(
        r#"ROLE: Expert video narrator.
TASK: Generate a JSON response containing a cohesive voice-over script and a subtitle segmentation.

INPUT DATA (Timeline):
{timeline}

SETTINGS:
- Language: {lang_instruction}
- Tone: {tone}
- Theme: {theme}
- Length: ~{target_words} words
- Context Instruction: {context}

INSTRUCTIONS:
1. Infer the story, mood, and setting from the input frames.
2. Create a continuous 'script' text for the voice over.
3. Create 'segments' for subtitles. Each segment must have a start time (seconds), end time (seconds), and text.
4. Align segments roughly with the input timeline provided.

IMPORTANT:
- The output MUST be valid JSON.
- Do not include markdown code blocks (like ```json). Just the raw JSON object.

OUTPUT FORMAT (JSON ONLY):
{{
  "script": "Full narration text...",
  "segments": [
    {{ "start": 0, "end": 3, "text": "..." }}
  ]
}}"#,
        timeline = timeline,
        lang_instruction = lang_instruction,
        tone = settings.tone.label(),
        theme = settings.theme,
        target_words = target_words,
        context = context_instruction(settings),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidvoice_core::MovieConfig;

    #[test]
    fn test_target_word_count_clamps() {
        // Short videos still get a usable script
        assert_eq!(target_word_count(5.0, Tone::Assertive), 30);
        // Standard pace
        assert_eq!(target_word_count(60.0, Tone::Assertive), 132);
        // ASMR slows down
        assert_eq!(target_word_count(100.0, Tone::Asmr), 150);
        // Long videos cap out
        assert_eq!(target_word_count(1000.0, Tone::Excited), 800);
    }

    #[test]
    fn test_context_instruction_priority() {
        let mut settings = CommentarySettings {
            tone: Tone::Asmr,
            theme: Theme::Movie,
            video_context: "a vlog".to_string(),
            ..Default::default()
        };
        // ASMR wins over everything
        assert!(context_instruction(&settings).contains("STYLE: ASMR"));

        settings.tone = Tone::Calm;
        let movie = context_instruction(&settings);
        assert!(movie.starts_with("CONTEXT: Cinematic Movie"));

        settings.theme = Theme::Standard;
        assert_eq!(context_instruction(&settings), "CONTEXT: a vlog");

        settings.video_context.clear();
        assert!(context_instruction(&settings).contains("CONTEXT INFERENCE"));
    }

    #[test]
    fn test_movie_context_includes_title_and_character() {
        let settings = CommentarySettings {
            theme: Theme::Movie,
            movie: MovieConfig {
                title: "Night Train".to_string(),
                character: "Ana".to_string(),
            },
            ..Default::default()
        };
        let context = context_instruction(&settings);
        assert!(context.contains("\"Night Train\""));
        assert!(context.contains("\"Ana\""));
    }

    #[test]
    fn test_prompt_carries_timeline_and_language() {
        let scenes = vec![
            SceneDescription::new(0.0, "A street at dawn."),
            SceneDescription::new(2.0, "A cyclist passes."),
        ];
        let settings = CommentarySettings {
            language: Language::PsAf,
            ..Default::default()
        };

        let prompt = build_script_prompt(&scenes, &settings);
        assert!(prompt.contains("[0s]: A street at dawn."));
        assert!(prompt.contains("[2s]: A cyclist passes."));
        assert!(prompt.contains("Output strictly in Pashto."));
        assert!(prompt.contains("Peshawari"));
        assert!(prompt.contains("OUTPUT FORMAT (JSON ONLY):"));
    }
}
