use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge,
    register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("quiz_requests_total", "Total number of quiz requests").unwrap();
    pub static ref GENERATION_ATTEMPTS: Counter = register_counter!(
        "quiz_generation_attempts_total",
        "Generator calls made by retry loops"
    )
    .unwrap();
    pub static ref GENERATOR_FAILURES: Counter =
        register_counter!("quiz_generator_failures_total", "Failed generator calls").unwrap();
    pub static ref DUPLICATES_DROPPED: Counter = register_counter!(
        "quiz_duplicates_dropped_total",
        "Parsed questions dropped as already served"
    )
    .unwrap();
    pub static ref UNIQUE_QUESTIONS: Counter =
        register_counter!("quiz_unique_questions_total", "Unique questions returned").unwrap();
    pub static ref TRANSLATION_FAILURES: Counter = register_counter!(
        "quiz_translation_failures_total",
        "Fields whose translation degraded to an error message"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "quiz_request_latency_seconds",
        "Quiz request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("quiz_cache_size", "Fingerprints in the question cache").unwrap();
}

/// All registered metrics in the Prometheus text format.
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| e.to_string())?;
    String::from_utf8(buffer).map_err(|e| e.to_string())
}
