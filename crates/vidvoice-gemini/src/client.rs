//! Gemini HTTP client.

use crate::error::{GeminiError, GeminiResult};
use crate::prompt;
use crate::types::*;
use crate::voice;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use vidvoice_config::GeminiConfig;
use vidvoice_core::{
    CommentarySettings, SceneDescription, SubtitleCue, ANALYSIS_ERROR_MARKER,
};

const FRAME_PROMPT: &str =
    "Describe this scene in one short sentence. Focus on action, setting, or key objects.";

/// Client for the Gemini generateContent API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    host: String,
    api_key: String,
    flash_model: String,
    pro_model: String,
    tts_model: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &GeminiConfig) -> GeminiResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GeminiError::Http)?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            flash_model: config.flash_model.clone(),
            pro_model: config.pro_model.clone(),
            tts_model: config.tts_model.clone(),
            timeout,
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.host, model, self.api_key
        );
        debug!("Calling model {}", model);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GeminiError::Connection {
                        host: self.host.clone(),
                    }
                } else if e.is_timeout() {
                    GeminiError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    GeminiError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let response: GenerateContentResponse = response.json().await?;
        Ok(response)
    }

    /// Describe a single frame in one short sentence.
    ///
    /// Failures never propagate: the returned string carries the error
    /// marker instead, so the frame still settles into a terminal status.
    pub async fn describe_frame(&self, jpeg: &[u8]) -> String {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_data("image/jpeg", BASE64_STANDARD.encode(jpeg)),
                    Part::text(FRAME_PROMPT),
                ],
            }],
            generation_config: None,
        };

        match self.generate_content(&self.flash_model, &request).await {
            Ok(response) => match response.text() {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => "Analysis failed.".to_string(),
            },
            Err(e) => {
                warn!("Frame analysis failed: {}", e);
                format!("{}: analysis request failed", ANALYSIS_ERROR_MARKER)
            }
        }
    }

    /// Generate the narration script and subtitle cues from the analyzed
    /// timeline.
    pub async fn generate_commentary(
        &self,
        scenes: &[SceneDescription],
        settings: &CommentarySettings,
    ) -> GeminiResult<ScriptOutput> {
        let request = GenerateContentRequest::from_text(prompt::build_script_prompt(
            scenes, settings,
        ))
        .with_config(GenerationConfig::json());

        let response = self.generate_content(&self.pro_model, &request).await?;
        let raw = response.text().unwrap_or("{}");
        Ok(parse_script_response(raw))
    }

    /// Synthesize narration into raw PCM speech (s16le, 24 kHz mono).
    pub async fn synthesize_speech(
        &self,
        text: &str,
        settings: &CommentarySettings,
    ) -> GeminiResult<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(GeminiError::EmptyScript);
        }

        let voice_name = voice::voice_for(settings);
        debug!("Synthesizing speech with voice {}", voice_name);

        let request = GenerateContentRequest::from_text(text)
            .with_config(GenerationConfig::audio(voice_name));

        let response = self.generate_content(&self.tts_model, &request).await?;
        let data = response.inline_data().ok_or(GeminiError::NoAudio)?;
        Ok(BASE64_STANDARD.decode(&data.data)?)
    }
}

#[derive(Debug, Deserialize)]
struct RawScriptResponse {
    script: Option<String>,
    segments: Option<Vec<SubtitleCue>>,
}

/// Parse the model's structured script response.
///
/// Markdown code fences are stripped before parsing. When the result still
/// is not valid JSON, the entire raw response becomes the narration with no
/// cues.
pub fn parse_script_response(raw: &str) -> ScriptOutput {
    let clean = raw.replace("```json", "").replace("```", "");
    match serde_json::from_str::<RawScriptResponse>(clean.trim()) {
        Ok(parsed) => ScriptOutput {
            script: parsed
                .script
                .unwrap_or_else(|| "Generation failed".to_string()),
            cues: parsed.segments.unwrap_or_default(),
        },
        Err(e) => {
            warn!("Commentary response was not valid JSON: {}", e);
            ScriptOutput {
                script: raw.to_string(),
                cues: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = GeminiConfig::default();
        let client = GeminiClient::from_config(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_parse_well_formed_response() {
        let raw = r#"{
            "script": "A quiet street wakes up.",
            "segments": [
                { "start": 0, "end": 3, "text": "A quiet street" },
                { "start": 3, "end": 6, "text": "wakes up" }
            ]
        }"#;

        let output = parse_script_response(raw);
        assert_eq!(output.script, "A quiet street wakes up.");
        assert_eq!(output.cues.len(), 2);
        assert_eq!(output.cues[0].text, "A quiet street");
        assert!(output.subtitles().unwrap().contains("00:00:03,000"));
    }

    #[test]
    fn test_parse_strips_markdown_fences() {
        let raw = "```json\n{ \"script\": \"Hello.\", \"segments\": [] }\n```";
        let output = parse_script_response(raw);
        assert_eq!(output.script, "Hello.");
        assert!(output.cues.is_empty());
        assert!(output.subtitles().is_none());
    }

    #[test]
    fn test_parse_falls_back_to_raw_text() {
        let raw = "Here is your narration: once upon a time...";
        let output = parse_script_response(raw);
        assert_eq!(output.script, raw);
        assert!(output.cues.is_empty());
    }

    #[test]
    fn test_parse_missing_script_field() {
        let output = parse_script_response("{}");
        assert_eq!(output.script, "Generation failed");
        assert!(output.cues.is_empty());
    }

    #[tokio::test]
    async fn test_synthesize_rejects_empty_text() {
        let client = GeminiClient::from_config(&GeminiConfig::default()).unwrap();
        let settings = CommentarySettings::default();

        let err = client.synthesize_speech("   ", &settings).await.unwrap_err();
        assert!(matches!(err, GeminiError::EmptyScript));
    }
}
