pub mod polly;

use async_trait::async_trait;

use crate::types::SynthesizedAudio;

/// Trait for speech synthesis services
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with `voice` in the service format `format`
    ///
    /// Returns `Ok(None)` when the service answers without any audio.
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        format: &str,
    ) -> crate::error::Result<Option<SynthesizedAudio>>;

    /// Get the provider name
    fn name(&self) -> &str;
}
