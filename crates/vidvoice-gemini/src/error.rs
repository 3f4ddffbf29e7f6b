//! Error types for Gemini operations.

use thiserror::Error;

/// Errors that can occur when calling the Gemini API.
#[derive(Error, Debug)]
pub enum GeminiError {
    /// Connection error - unable to reach the API endpoint.
    #[error("Connection error: could not reach {host}")]
    Connection { host: String },

    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Speech synthesis was asked to voice an empty script.
    #[error("Cannot synthesize speech: narration text is empty")]
    EmptyScript,

    /// The TTS response carried no audio payload.
    #[error("No audio data received from the API")]
    NoAudio,

    /// The audio payload could not be decoded.
    #[error("Failed to decode audio payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeminiError {
    /// True when the failure points at a rejected or missing API key.
    pub fn is_auth_error(&self) -> bool {
        match self {
            GeminiError::ApiError { status, message } => {
                matches!(status, 401 | 403) || message.contains("API key")
            }
            _ => false,
        }
    }
}

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_classification() {
        let err = GeminiError::ApiError {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".to_string(),
        };
        assert!(err.is_auth_error());

        let err = GeminiError::ApiError {
            status: 403,
            message: "permission denied".to_string(),
        };
        assert!(err.is_auth_error());

        let err = GeminiError::ApiError {
            status: 500,
            message: "internal".to_string(),
        };
        assert!(!err.is_auth_error());

        assert!(!GeminiError::EmptyScript.is_auth_error());
    }
}
