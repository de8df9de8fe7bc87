use serde::{Deserialize, Serialize};

/// Voice used when the request names none
pub const DEFAULT_VOICE: &str = "Joanna";

/// Public format used when the request names none
pub const DEFAULT_FORMAT: &str = "mp3";

/// Hard ceiling on input length, in characters
pub const MAX_TEXT_CHARS: usize = 30_000;

/// Validated speech synthesis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Text to synthesize, non-empty and within `MAX_TEXT_CHARS`
    pub text: String,
    /// Voice identifier (e.g. "Joanna", "Matthew")
    pub voice: String,
    /// Public format as requested (e.g. "mp3", "ogg", "pcm")
    pub format: String,
}

/// Audio produced by a synthesis provider
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Raw audio bytes
    pub audio: Vec<u8>,
    /// Service format identifier the audio was requested in
    pub format: String,
}

/// Success body: presigned download URL and the object key it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub url: String,
    pub key: String,
}
