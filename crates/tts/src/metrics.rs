use std::time::Instant;

use voxdrop_telemetry::{
    Counter, Histogram, KeyValue,
    metrics::{SPEECH_AUDIO_SIZE, SPEECH_REQUEST_COUNT, SPEECH_REQUEST_DURATION, record_duration},
};

use crate::error::TtsError;

/// Instruments for the speech endpoint
pub struct SpeechMetrics {
    requests: Counter<u64>,
    duration: Histogram<f64>,
    audio_size: Histogram<u64>,
}

impl SpeechMetrics {
    pub fn new() -> Self {
        let meter = voxdrop_telemetry::meter();

        Self {
            requests: meter
                .u64_counter(SPEECH_REQUEST_COUNT)
                .with_description("Speech requests handled")
                .build(),
            duration: meter
                .f64_histogram(SPEECH_REQUEST_DURATION)
                .with_description("Speech request latency")
                .with_unit("s")
                .build(),
            audio_size: meter
                .u64_histogram(SPEECH_AUDIO_SIZE)
                .with_description("Synthesized audio size")
                .with_unit("By")
                .build(),
        }
    }

    /// Record the outcome of one request
    pub fn record_request(&self, outcome: Result<(), &TtsError>, start: Instant) {
        let attributes = match outcome {
            Ok(()) => vec![KeyValue::new("status", 200_i64)],
            Err(error) => vec![
                KeyValue::new("status", i64::from(error.status_code().as_u16())),
                KeyValue::new("error.type", error.error_type()),
            ],
        };

        self.requests.add(1, &attributes);
        record_duration(&self.duration, start, &attributes);
    }

    /// Record the size of a synthesized clip
    pub fn record_audio_size(&self, format: &str, bytes: usize) {
        self.audio_size
            .record(u64::try_from(bytes).unwrap_or(u64::MAX), &[KeyValue::new("format", format.to_string())]);
    }
}

impl Default for SpeechMetrics {
    fn default() -> Self {
        Self::new()
    }
}
