//! Amazon Polly synthesizer

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_polly::Client as PollyClient;
use aws_sdk_polly::types::{Engine, OutputFormat, VoiceId};
use aws_smithy_types::error::display::DisplayErrorContext;
use voxdrop_config::SynthesisConfig;

use super::SpeechSynthesizer;
use crate::{error::TtsError, types::SynthesizedAudio};

/// Speech synthesizer backed by Amazon Polly's `SynthesizeSpeech`
pub struct PollySynthesizer {
    client: PollyClient,
    engine: Option<Engine>,
}

impl PollySynthesizer {
    pub fn new(sdk_config: &SdkConfig, config: &SynthesisConfig) -> Self {
        let mut builder = aws_sdk_polly::config::Builder::from(sdk_config);

        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Self {
            client: PollyClient::from_conf(builder.build()),
            engine: config.engine.map(|engine| Engine::from(engine.as_str())),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        format: &str,
    ) -> crate::error::Result<Option<SynthesizedAudio>> {
        tracing::debug!(voice, format, input_len = text.len(), "Polly synthesize request");

        let output = self
            .client
            .synthesize_speech()
            .text(text)
            .voice_id(VoiceId::from(voice))
            .output_format(OutputFormat::from(format))
            .set_engine(self.engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Polly synthesize_speech failed");
                TtsError::Synthesis(DisplayErrorContext(&e).to_string())
            })?;

        let audio = output.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = ?e, "failed to read Polly audio stream");
            TtsError::Synthesis(format!("failed to read Polly audio stream: {e}"))
        })?;

        let audio = audio.into_bytes();

        if audio.is_empty() {
            tracing::error!("no audio in Polly response");
            return Ok(None);
        }

        tracing::debug!("Polly synthesis complete, {} bytes", audio.len());

        Ok(Some(SynthesizedAudio {
            audio: audio.to_vec(),
            format: format.to_string(),
        }))
    }

    fn name(&self) -> &str {
        "polly"
    }
}
