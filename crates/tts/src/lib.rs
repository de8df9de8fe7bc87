#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod aws;
mod error;
pub mod format;
mod metrics;
mod provider;
mod request;
mod server;
mod storage;
mod types;

use std::{sync::Arc, time::Instant};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

pub use error::{Result, TtsError};
pub use provider::{SpeechSynthesizer, polly::PollySynthesizer};
pub use request::{BODY_LIMIT_BYTES, ExtractBody};
pub use server::{Server, TtsServerBuilder};
pub use storage::{ObjectStore, s3::S3ObjectStore};
pub use types::{DEFAULT_FORMAT, DEFAULT_VOICE, MAX_TEXT_CHARS, SpeechResponse, SynthesisRequest, SynthesizedAudio};

/// Path of the speech endpoint
pub const SPEECH_PATH: &str = "/v1/speech";

/// Build the speech server from configuration, backed by Polly and S3
pub async fn build_server(config: &voxdrop_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TtsServerBuilder::new(config)
            .build()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for speech synthesis
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route(SPEECH_PATH, post(synthesize).options(preflight))
}

/// Handle speech synthesis requests
///
/// Every failure is turned into a JSON error response here, including
/// body rejections; nothing propagates past this boundary.
async fn synthesize(
    State(server): State<Arc<Server>>,
    body: std::result::Result<ExtractBody, TtsError>,
) -> Result<Json<SpeechResponse>> {
    let start = Instant::now();

    let result = match body {
        Ok(ExtractBody(body)) => {
            tracing::debug!("speech handler called, body_len={}", body.len());
            server.handle(&body).await
        }
        Err(rejection) => Err(rejection),
    };

    server.metrics().record_request(result.as_ref().map(|_| ()), start);

    match &result {
        Ok(response) => tracing::debug!(key = %response.key, "speech request complete"),
        Err(error) if error.is_client_error() => {
            tracing::warn!(error_type = error.error_type(), "rejected speech request: {error}");
        }
        Err(error) => {
            tracing::error!(error_type = error.error_type(), error = ?error, "error synthesizing speech: {error}");
        }
    }

    result.map(Json)
}

/// Answer browser preflight requests; the CORS headers are added by the router layer
async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
