//! Mapping between public formats, service formats, extensions and content types

use std::fmt;

use uuid::Uuid;

/// Translate a public format into the speech service's identifier
///
/// Lowercases the input. Only `ogg` is renamed (to `ogg_vorbis`); anything
/// else is passed through and left for the service to accept or reject.
pub fn normalize_format(format: &str) -> String {
    let format = format.to_lowercase();

    if format == "ogg" { "ogg_vorbis".to_string() } else { format }
}

/// File extension for stored audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioExtension {
    Mp3,
    Ogg,
    Wav,
}

impl AudioExtension {
    /// Pick the extension for a normalized service format
    ///
    /// Substring match, `mp3` before `ogg`, with `wav` as the catch-all.
    /// `pcm` therefore lands on `wav` even though raw PCM carries no WAV
    /// header.
    pub fn from_service_format(format: &str) -> Self {
        if format.contains("mp3") {
            Self::Mp3
        } else if format.contains("ogg") {
            Self::Ogg
        } else {
            Self::Wav
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
        }
    }

    /// Content type stored alongside the object
    pub fn content_type(self) -> &'static str {
        content_type_for_extension(self.as_str())
    }
}

impl fmt::Display for AudioExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content type for a file extension, `application/octet-stream` if unknown
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// Generate a fresh object key: `<prefix>/<uuid v4>.<ext>`
pub fn object_key(prefix: &str, extension: AudioExtension) -> String {
    format!("{prefix}/{}.{extension}", Uuid::new_v4())
}
