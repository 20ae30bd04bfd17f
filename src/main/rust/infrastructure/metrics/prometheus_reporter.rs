use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};

use crate::domain::ports::MetricsReporter;
use crate::domain::value_objects::ConnectionState;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Connection state (0=Disconnected, 1=Connecting, 2=Connected, 3=Stopped)
    pub static ref CONNECTION_STATE: Gauge = Gauge::new(
        "ingest_connection_state",
        "Current ingestion connection state"
    ).expect("metric can be created");

    // Total reconnection attempts
    pub static ref RECONNECT_ATTEMPTS: IntCounter = IntCounter::new(
        "reconnect_attempts_total",
        "Total number of failed connect attempts"
    ).expect("metric can be created");

    // Frames pulled from the source into the cache
    pub static ref FRAMES_INGESTED: IntCounter = IntCounter::new(
        "frames_ingested_total",
        "Total number of frames written to the cache"
    ).expect("metric can be created");

    // Parts emitted to push-stream clients (placeholders included)
    pub static ref FRAMES_PUBLISHED: IntCounter = IntCounter::new(
        "frames_published_total",
        "Total number of MJPEG parts emitted to clients"
    ).expect("metric can be created");

    // Ingestion uptime
    pub static ref UPTIME_SECONDS: Gauge = Gauge::new(
        "ingest_uptime_seconds",
        "Time since ingestion first connected"
    ).expect("metric can be created");
}

pub struct PrometheusReporter;

impl PrometheusReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn init_metrics() -> Result<(), prometheus::Error> {
        REGISTRY.register(Box::new(CONNECTION_STATE.clone()))?;
        REGISTRY.register(Box::new(RECONNECT_ATTEMPTS.clone()))?;
        REGISTRY.register(Box::new(FRAMES_INGESTED.clone()))?;
        REGISTRY.register(Box::new(FRAMES_PUBLISHED.clone()))?;
        REGISTRY.register(Box::new(UPTIME_SECONDS.clone()))?;
        Ok(())
    }

    pub fn gather_metrics() -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = REGISTRY.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return b"# Error encoding metrics\n".to_vec();
        }
        buffer
    }
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for PrometheusReporter {
    fn report_state_change(&self, state: &ConnectionState) {
        CONNECTION_STATE.set(state.as_metric());
    }

    fn report_reconnect_attempt(&self) {
        RECONNECT_ATTEMPTS.inc();
    }

    fn report_frame_ingested(&self) {
        FRAMES_INGESTED.inc();
    }

    fn report_frame_published(&self) {
        FRAMES_PUBLISHED.inc();
    }

    fn report_uptime(&self, uptime_secs: f64) {
        UPTIME_SECONDS.set(uptime_secs);
    }
}
