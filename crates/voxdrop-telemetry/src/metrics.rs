//! Metric names and recording helpers for the speech endpoint

use std::time::Instant;

use opentelemetry::metrics::Histogram;

/// Instrumentation scope for every voxdrop meter
pub const METER_NAME: &str = "voxdrop";

/// Requests handled, labelled by response status
pub const SPEECH_REQUEST_COUNT: &str = "speech.request.count";
/// End-to-end handler latency in seconds
pub const SPEECH_REQUEST_DURATION: &str = "speech.request.duration";
/// Size of synthesized audio in bytes
pub const SPEECH_AUDIO_SIZE: &str = "speech.audio.size";

/// Record the time elapsed since `start` on a histogram, in seconds
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}
