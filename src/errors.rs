use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Result alias used across the voice profile library
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors surfaced to callers. Missing profile sections are never errors;
/// they resolve to fallbacks inside the extractor.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("Unknown modification type: {0}")]
    UnknownModificationType(String),

    #[error("Invalid platform '{0}'. Valid options: chatgpt, claude, copilot, gemini, generic")]
    UnknownPlatform(String),

    #[error("Unknown writing mode: {0}")]
    UnknownWritingMode(String),

    #[error("Invalid voice mode '{0}'. Must be A, B, or C")]
    UnknownVoiceMode(String),

    #[error("Unknown rule type '{0}'. Expected avoid or prefer")]
    UnknownRuleType(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("No writing samples provided")]
    NoSamples,

    #[error("Message is required")]
    EmptyMessage,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VoiceError {
    /// True when the error is a caller contract violation rather than a
    /// failure on our side.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            VoiceError::Config(_) | VoiceError::Io(_) | VoiceError::Serialization(_)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for VoiceError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
