use std::{sync::Arc, time::Duration};

use voxdrop_config::DEFAULT_KEY_PREFIX;

use crate::{
    aws,
    error::TtsError,
    format::{AudioExtension, normalize_format, object_key},
    metrics::SpeechMetrics,
    provider::{SpeechSynthesizer, polly::PollySynthesizer},
    storage::{ObjectStore, s3::S3ObjectStore},
    types::{SpeechResponse, SynthesisRequest},
};

/// Speech server: synthesizes text, stores the audio, hands back a link
///
/// Holds its collaborators read-only, so one instance serves any number
/// of concurrent requests.
pub struct Server {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: Arc<dyn ObjectStore>,
    url_ttl: Duration,
    key_prefix: String,
    metrics: SpeechMetrics,
}

impl Server {
    /// Parse a raw request body and run it through `synthesize`
    pub async fn handle(&self, body: &[u8]) -> crate::error::Result<SpeechResponse> {
        let request = SynthesisRequest::from_body(body)?;
        self.synthesize(request).await
    }

    /// Synthesize a validated request, upload the audio and sign a URL
    ///
    /// Each step runs only if the previous one succeeded: empty audio
    /// never reaches the store and a failed upload is never signed.
    pub async fn synthesize(&self, request: SynthesisRequest) -> crate::error::Result<SpeechResponse> {
        let format = normalize_format(&request.format);

        tracing::debug!(
            provider = self.synthesizer.name(),
            voice = %request.voice,
            format = %format,
            input_chars = request.text.chars().count(),
            "synthesizing speech"
        );

        let audio = self
            .synthesizer
            .synthesize(&request.text, &request.voice, &format)
            .await?
            .ok_or(TtsError::NoAudio)?;

        self.metrics.record_audio_size(&audio.format, audio.audio.len());

        let extension = AudioExtension::from_service_format(&format);
        let key = object_key(&self.key_prefix, extension);
        let size = audio.audio.len();

        self.store.put(&key, audio.audio, extension.content_type()).await?;

        let url = self.store.sign_url(&key, self.url_ttl).await?;

        tracing::info!(bucket = self.store.bucket(), key = %key, size, "speech stored");

        Ok(SpeechResponse { url, key })
    }

    pub(crate) const fn metrics(&self) -> &SpeechMetrics {
        &self.metrics
    }
}

/// Builder for constructing the speech server from configuration
///
/// Collaborators not supplied explicitly are built from the AWS settings
/// in the configuration.
pub struct TtsServerBuilder<'a> {
    config: &'a voxdrop_config::Config,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    store: Option<Arc<dyn ObjectStore>>,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a voxdrop_config::Config) -> Self {
        Self {
            config,
            synthesizer: None,
            store: None,
        }
    }

    /// Use this synthesizer instead of Polly
    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Use this object store instead of S3
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn build(self) -> crate::error::Result<Server> {
        let storage = &self.config.storage;

        let (synthesizer, store) = match (self.synthesizer, self.store) {
            (Some(synthesizer), Some(store)) => (synthesizer, store),
            (synthesizer, store) => {
                let sdk_config = aws::load_sdk_config(&self.config.aws).await;

                let synthesizer: Arc<dyn SpeechSynthesizer> = match synthesizer {
                    Some(synthesizer) => synthesizer,
                    None => {
                        tracing::debug!("Initializing Polly synthesizer");
                        Arc::new(PollySynthesizer::new(&sdk_config, &self.config.synthesis))
                    }
                };

                let store: Arc<dyn ObjectStore> = match store {
                    Some(store) => store,
                    None => {
                        if storage.bucket.trim().is_empty() {
                            return Err(TtsError::ConfigError("storage bucket is not configured".to_string()));
                        }

                        tracing::debug!("Initializing S3 object store for bucket: {}", storage.bucket);
                        Arc::new(S3ObjectStore::new(&sdk_config, storage))
                    }
                };

                (synthesizer, store)
            }
        };

        let key_prefix = if storage.key_prefix.is_empty() {
            DEFAULT_KEY_PREFIX.to_string()
        } else {
            storage.key_prefix.clone()
        };

        tracing::debug!(
            bucket = store.bucket(),
            url_ttl_secs = storage.expire_seconds,
            "speech server initialized"
        );

        Ok(Server {
            synthesizer,
            store,
            url_ttl: storage.url_ttl(),
            key_prefix,
            metrics: SpeechMetrics::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use voxdrop_config::{Config, StorageConfig};

    use super::*;
    use crate::types::SynthesizedAudio;

    #[derive(Default)]
    struct FakeSynthesizer {
        calls: Mutex<Vec<(String, String, String)>>,
        silent: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeSynthesizer {
        async fn synthesize(
            &self,
            text: &str,
            voice: &str,
            format: &str,
        ) -> crate::error::Result<Option<SynthesizedAudio>> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), voice.to_string(), format.to_string()));

            if self.silent {
                return Ok(None);
            }

            Ok(Some(SynthesizedAudio {
                audio: b"ID3fake-audio".to_vec(),
                format: format.to_string(),
            }))
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[derive(Default)]
    struct FakeStore {
        puts: Mutex<Vec<(String, Vec<u8>, String)>>,
        signed: Mutex<Vec<(String, Duration)>>,
        /// Number of upcoming `put` calls that fail
        put_failures: AtomicUsize,
        /// Number of upcoming `sign_url` calls that fail
        sign_failures: AtomicUsize,
    }

    fn take_failure(remaining: &AtomicUsize) -> bool {
        remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> crate::error::Result<()> {
            if take_failure(&self.put_failures) {
                return Err(TtsError::Storage("Access Denied".to_string()));
            }
            self.puts
                .lock()
                .unwrap()
                .push((key.to_string(), body, content_type.to_string()));
            Ok(())
        }

        async fn sign_url(&self, key: &str, ttl: Duration) -> crate::error::Result<String> {
            if take_failure(&self.sign_failures) {
                return Err(TtsError::Signing("signing key unavailable".to_string()));
            }
            self.signed.lock().unwrap().push((key.to_string(), ttl));
            Ok(format!("https://audio.example/{key}?X-Amz-Expires={}", ttl.as_secs()))
        }

        fn bucket(&self) -> &str {
            "audio"
        }
    }

    fn config() -> Config {
        Config {
            storage: StorageConfig {
                bucket: "audio".to_string(),
                ..StorageConfig::default()
            },
            ..Config::default()
        }
    }

    async fn server(synthesizer: Arc<FakeSynthesizer>, store: Arc<FakeStore>) -> Server {
        TtsServerBuilder::new(&config())
            .with_synthesizer(synthesizer)
            .with_store(store)
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn hello_world_end_to_end() {
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let store = Arc::new(FakeStore::default());
        let server = server(Arc::clone(&synthesizer), Arc::clone(&store)).await;

        let response = server
            .handle(br#"{"text": "Hello world", "voice": "Joanna", "format": "mp3"}"#)
            .await
            .unwrap();

        assert_eq!(
            synthesizer.calls.lock().unwrap().as_slice(),
            &[("Hello world".to_string(), "Joanna".to_string(), "mp3".to_string())]
        );

        let puts = store.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        let (key, body, content_type) = &puts[0];
        assert!(key.starts_with("tts-output/") && key.ends_with(".mp3"));
        assert_eq!(body, b"ID3fake-audio");
        assert_eq!(content_type, "audio/mpeg");

        assert_eq!(&response.key, key);
        assert_eq!(response.url, format!("https://audio.example/{key}?X-Amz-Expires=3600"));
    }

    #[tokio::test]
    async fn ogg_maps_to_ogg_vorbis() {
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let store = Arc::new(FakeStore::default());
        let server = server(Arc::clone(&synthesizer), Arc::clone(&store)).await;

        let response = server.handle(br#"{"text": "Hi", "format": "ogg"}"#).await.unwrap();

        assert_eq!(synthesizer.calls.lock().unwrap()[0].2, "ogg_vorbis");
        assert!(response.key.ends_with(".ogg"));
        assert_eq!(store.puts.lock().unwrap()[0].2, "audio/ogg");
    }

    #[tokio::test]
    async fn pcm_is_stored_as_wav() {
        let store = Arc::new(FakeStore::default());
        let server = server(Arc::new(FakeSynthesizer::default()), Arc::clone(&store)).await;

        let response = server.handle(br#"{"text": "Hi", "format": "PCM"}"#).await.unwrap();

        assert!(response.key.ends_with(".wav"));
        assert_eq!(store.puts.lock().unwrap()[0].2, "audio/wav");
    }

    #[tokio::test]
    async fn validation_failures_skip_collaborators() {
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let store = Arc::new(FakeStore::default());
        let server = server(Arc::clone(&synthesizer), Arc::clone(&store)).await;

        let missing = server.handle(br#"{"voice": "Joanna"}"#).await.unwrap_err();
        assert!(matches!(missing, TtsError::NoText));

        let too_long = format!(r#"{{"text": "{}"}}"#, "a".repeat(30_001));
        let too_long = server.handle(too_long.as_bytes()).await.unwrap_err();
        assert!(matches!(too_long, TtsError::TextTooLong));

        assert!(synthesizer.calls.lock().unwrap().is_empty());
        assert!(store.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_audio_is_an_internal_error() {
        let synthesizer = Arc::new(FakeSynthesizer {
            silent: true,
            ..FakeSynthesizer::default()
        });
        let store = Arc::new(FakeStore::default());
        let server = server(synthesizer, Arc::clone(&store)).await;

        let err = server.handle(br#"{"text": "Hi"}"#).await.unwrap_err();

        assert!(matches!(err, TtsError::NoAudio));
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_is_never_signed() {
        let store = Arc::new(FakeStore {
            put_failures: AtomicUsize::new(1),
            ..FakeStore::default()
        });
        let server = server(Arc::new(FakeSynthesizer::default()), Arc::clone(&store)).await;

        let err = server.handle(br#"{"text": "Hi"}"#).await.unwrap_err();

        assert_eq!(err.to_string(), "Access Denied");
        assert!(store.signed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn signing_failure_surfaces_its_message() {
        let store = Arc::new(FakeStore {
            sign_failures: AtomicUsize::new(1),
            ..FakeStore::default()
        });
        let server = server(Arc::new(FakeSynthesizer::default()), store).await;

        let err = server.handle(br#"{"text": "Hi"}"#).await.unwrap_err();

        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "signing key unavailable");
    }

    #[tokio::test]
    async fn storage_failure_does_not_affect_next_request() {
        let store = Arc::new(FakeStore {
            put_failures: AtomicUsize::new(1),
            ..FakeStore::default()
        });
        let server = server(Arc::new(FakeSynthesizer::default()), Arc::clone(&store)).await;

        let err = server.handle(br#"{"text": "Hi"}"#).await.unwrap_err();
        assert_eq!(err.to_string(), "Access Denied");

        let response = server.handle(br#"{"text": "Hi"}"#).await.unwrap();
        let puts = store.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, response.key);
    }

    #[tokio::test]
    async fn signing_failure_does_not_affect_next_request() {
        let store = Arc::new(FakeStore {
            sign_failures: AtomicUsize::new(1),
            ..FakeStore::default()
        });
        let server = server(Arc::new(FakeSynthesizer::default()), Arc::clone(&store)).await;

        let first = server.handle(br#"{"text": "Hi"}"#).await.unwrap_err();
        assert_eq!(first.to_string(), "signing key unavailable");

        let second = server.handle(br#"{"text": "Hi"}"#).await.unwrap();
        let signed = store.signed.lock().unwrap();
        assert_eq!(signed.len(), 1);
        assert_eq!(signed[0].0, second.key);

        // The object from the failed request was stored under a different key
        let puts = store.puts.lock().unwrap();
        assert_eq!(puts.len(), 2);
        assert_ne!(puts[0].0, second.key);
    }

    #[tokio::test]
    async fn oversized_text_with_bad_voice_reports_length() {
        let server = server(Arc::new(FakeSynthesizer::default()), Arc::new(FakeStore::default())).await;

        let body = format!(r#"{{"text": "{}", "voice": 7}}"#, "a".repeat(30_001));
        let err = server.handle(body.as_bytes()).await.unwrap_err();

        assert!(matches!(err, TtsError::TextTooLong));
    }

    #[tokio::test]
    async fn identical_requests_get_distinct_keys() {
        let server = server(Arc::new(FakeSynthesizer::default()), Arc::new(FakeStore::default())).await;

        let body = br#"{"text": "Same text"}"#;
        let first = server.handle(body).await.unwrap();
        let second = server.handle(body).await.unwrap();

        assert_ne!(first.key, second.key);
        assert_ne!(first.url, second.url);
    }

    #[tokio::test]
    async fn configured_ttl_and_prefix_are_used() {
        let store = Arc::new(FakeStore::default());
        let config = Config {
            storage: StorageConfig {
                bucket: "audio".to_string(),
                expire_seconds: 120,
                key_prefix: "speech/generated".to_string(),
                ..StorageConfig::default()
            },
            ..Config::default()
        };
        let server = TtsServerBuilder::new(&config)
            .with_synthesizer(Arc::new(FakeSynthesizer::default()))
            .with_store(Arc::clone(&store) as Arc<dyn ObjectStore>)
            .build()
            .await
            .unwrap();

        let response = server.handle(br#"{"text": "Hi"}"#).await.unwrap();

        assert!(response.key.starts_with("speech/generated/"));
        assert_eq!(store.signed.lock().unwrap()[0].1, Duration::from_secs(120));
    }
}
