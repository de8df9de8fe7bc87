//! In-memory stand-ins for Polly and S3 that record every call

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tts::{ObjectStore, SpeechSynthesizer, SynthesizedAudio, TtsError};

/// A recorded `synthesize` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisCall {
    pub text: String,
    pub voice: String,
    pub format: String,
}

/// How the fake synthesizer answers
#[derive(Debug, Clone)]
pub enum SynthesisBehavior {
    /// Return these bytes
    Audio(Vec<u8>),
    /// Answer without any audio
    Silent,
    /// Fail with this message
    Fail(String),
}

/// Fake synthesizer
pub struct FakeSynthesizer {
    behavior: SynthesisBehavior,
    calls: Mutex<Vec<SynthesisCall>>,
}

impl FakeSynthesizer {
    pub fn new(behavior: SynthesisBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Synthesizer answering with a few bytes of fake MP3
    pub fn audio() -> Arc<Self> {
        Self::new(SynthesisBehavior::Audio(vec![0xFF, 0xFB, 0x90, 0x44]))
    }

    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str, format: &str) -> tts::Result<Option<SynthesizedAudio>> {
        self.calls.lock().unwrap().push(SynthesisCall {
            text: text.to_owned(),
            voice: voice.to_owned(),
            format: format.to_owned(),
        });

        match &self.behavior {
            SynthesisBehavior::Audio(bytes) => Ok(Some(SynthesizedAudio {
                audio: bytes.clone(),
                format: format.to_owned(),
            })),
            SynthesisBehavior::Silent => Ok(None),
            SynthesisBehavior::Fail(message) => Err(TtsError::Synthesis(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// A recorded `put` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutCall {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Failures injected into the next `remaining` calls of one operation
#[derive(Default)]
struct InjectedFailure {
    message: String,
    remaining: AtomicUsize,
}

impl InjectedFailure {
    fn new(message: &str, times: usize) -> Self {
        Self {
            message: message.to_owned(),
            remaining: AtomicUsize::new(times),
        }
    }

    /// Consume one failure, returning its message if any were left
    fn take(&self) -> Option<String> {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .ok()
            .map(|_| self.message.clone())
    }
}

/// Fake object store producing predictable URLs
#[derive(Default)]
pub struct FakeStore {
    put_failure: InjectedFailure,
    sign_failure: InjectedFailure,
    puts: Mutex<Vec<PutCall>>,
    signs: Mutex<Vec<(String, Duration)>>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store whose uploads always fail with `message`
    pub fn failing_put(message: &str) -> Arc<Self> {
        Self::failing_puts(message, usize::MAX)
    }

    /// Store whose first `times` uploads fail with `message`
    pub fn failing_puts(message: &str, times: usize) -> Arc<Self> {
        Arc::new(Self {
            put_failure: InjectedFailure::new(message, times),
            ..Self::default()
        })
    }

    /// Store whose signing always fails with `message`
    pub fn failing_sign(message: &str) -> Arc<Self> {
        Self::failing_signs(message, usize::MAX)
    }

    /// Store whose first `times` signing calls fail with `message`
    pub fn failing_signs(message: &str, times: usize) -> Arc<Self> {
        Arc::new(Self {
            sign_failure: InjectedFailure::new(message, times),
            ..Self::default()
        })
    }

    pub fn puts(&self) -> Vec<PutCall> {
        self.puts.lock().unwrap().clone()
    }

    pub fn signs(&self) -> Vec<(String, Duration)> {
        self.signs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> tts::Result<()> {
        if let Some(message) = self.put_failure.take() {
            return Err(TtsError::Storage(message));
        }

        self.puts.lock().unwrap().push(PutCall {
            key: key.to_owned(),
            body,
            content_type: content_type.to_owned(),
        });
        Ok(())
    }

    async fn sign_url(&self, key: &str, ttl: Duration) -> tts::Result<String> {
        if let Some(message) = self.sign_failure.take() {
            return Err(TtsError::Signing(message));
        }

        self.signs.lock().unwrap().push((key.to_owned(), ttl));
        Ok(format!("https://test-audio.s3.example/{key}?X-Amz-Expires={}", ttl.as_secs()))
    }

    fn bucket(&self) -> &str {
        "test-audio"
    }
}
