use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Speech endpoint errors with their HTTP status codes
///
/// Validation variants are the caller's fault and map to 400. Everything
/// else is an upstream or internal failure and maps to 500, with the
/// failure's own description as the client message.
#[derive(Debug, Error)]
pub enum TtsError {
    /// `text` missing or falsy
    #[error("No text provided")]
    NoText,

    /// `text` longer than the hard character ceiling
    #[error("Text too long (max 30000 chars). Please split.")]
    TextTooLong,

    /// A field has the wrong JSON type
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The synthesis service answered without audio
    #[error("Polly returned no audio")]
    NoAudio,

    /// The synthesis call failed
    #[error("{0}")]
    Synthesis(String),

    /// Uploading the audio failed
    #[error("{0}")]
    Storage(String),

    /// Generating the presigned URL failed
    #[error("{0}")]
    Signing(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TtsError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoText | Self::TextTooLong | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoAudio | Self::Synthesis(_) | Self::Storage(_) | Self::Signing(_) | Self::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable category, used in logs and metric attributes
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::NoText | Self::TextTooLong | Self::InvalidRequest(_) => "invalid_request_error",
            Self::NoAudio | Self::Synthesis(_) => "synthesis_error",
            Self::Storage(_) | Self::Signing(_) => "storage_error",
            Self::ConfigError(_) => "internal_error",
        }
    }

    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Error body: `{ "error": "..." }`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.to_string() };

        (self.status_code(), Json(body)).into_response()
    }
}
