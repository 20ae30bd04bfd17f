use pipeline_rtsp_to_web::{
    create_source, ConnectionState, DomainError, Frame, FrameCache, FrameSource, HealthStatus,
    IngestLifecycle, IngestService, MetricsReporter, MjpegPublisher, PipelineBuilder, PixelFormat,
    PublishConfig, RealtimeFeed, Result, RetryPolicy, SourceConfig,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[test]
fn test_source_config_validation() {
    // Valid RTSP config
    let result = SourceConfig::new(
        "rtsp://localhost:8554/cam1".to_string(),
        Duration::from_millis(66),
        640,
        480,
    );
    assert!(result.is_ok());

    // Stub scheme is accepted
    let result = SourceConfig::new(
        "stub://pattern".to_string(),
        Duration::from_millis(66),
        640,
        480,
    );
    assert!(result.is_ok());

    // Unknown scheme
    let result = SourceConfig::new(
        "http://localhost:8554/cam1".to_string(),
        Duration::from_millis(66),
        640,
        480,
    );
    assert!(result.is_err());
}

#[test]
fn test_build_pipeline_string_contains_elements() {
    let config = SourceConfig::new(
        "rtsp://localhost:8554/cam1".to_string(),
        Duration::from_millis(66),
        640,
        480,
    )
    .unwrap();

    let pipeline = PipelineBuilder::build_pipeline_string(&config);

    assert!(pipeline.contains("rtspsrc"));
    assert!(pipeline.contains("location=rtsp://localhost:8554/cam1"));
    assert!(pipeline.contains("decodebin"));
    assert!(pipeline.contains("videoconvert"));
    assert!(pipeline.contains("video/x-raw,format=RGB"));
    assert!(pipeline.contains("appsink"));
}

#[test]
fn test_retry_policy_budget() {
    let policy = RetryPolicy::new(Duration::from_millis(10), 2).unwrap();

    assert!(!policy.budget_exhausted(1));
    assert!(!policy.budget_exhausted(2));
    assert!(policy.budget_exhausted(3));
}

#[test]
fn test_retry_policy_rejects_zero_interval() {
    assert!(RetryPolicy::new(Duration::ZERO, 5).is_err());
}

#[test]
fn test_lifecycle_transitions_and_counter_reset() {
    let mut lifecycle = IngestLifecycle::new();
    assert_eq!(lifecycle.current_state(), ConnectionState::Disconnected);

    lifecycle.transition_to_connecting();
    assert_eq!(lifecycle.record_connect_failure(), 1);
    assert_eq!(lifecycle.record_connect_failure(), 2);

    lifecycle.transition_to_connected();
    assert_eq!(lifecycle.current_state(), ConnectionState::Connected);
    assert_eq!(lifecycle.consecutive_failures(), 0);
}

#[test]
fn test_health_status_for_every_state() {
    let cases = [
        (ConnectionState::Disconnected, HealthStatus::Unhealthy),
        (ConnectionState::Connecting, HealthStatus::Unhealthy),
        (ConnectionState::Connected, HealthStatus::Healthy),
        (ConnectionState::Stopped, HealthStatus::Unhealthy),
    ];

    for (state, expected) in cases {
        assert_eq!(HealthStatus::from(state), expected, "state {}", state);
    }
}

#[test]
fn test_frame_cache_read_is_none_until_first_write() {
    let cache = FrameCache::new();
    assert!(cache.latest().is_none());

    cache.write(Frame::blank(8, 8));
    assert!(cache.latest().is_some());
}

#[test]
fn test_frame_cache_latest_wins() {
    let cache = FrameCache::new();
    let first = Frame::new(vec![1u8; 8 * 8 * 3], 8, 8, PixelFormat::Rgb24).unwrap();
    let second = Frame::new(vec![2u8; 8 * 8 * 3], 8, 8, PixelFormat::Rgb24).unwrap();

    cache.write(first);
    cache.write(second.clone());

    assert_eq!(*cache.latest().unwrap(), second);
}

#[test]
fn test_mjpeg_placeholder_without_frames() {
    let cache = Arc::new(FrameCache::new());
    let publisher = MjpegPublisher::new(cache, PublishConfig::default());

    let (part, delay) = publisher.next_chunk();

    assert!(part.starts_with(b"--frame\r\nContent-Type: image/jpeg\r\n"));
    assert_eq!(delay, Duration::from_millis(500));

    // The payload is a real JPEG (SOI marker after the part header)
    let header_end = part.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
    assert_eq!(&part[header_end + 4..header_end + 6], &[0xFF, 0xD8]);
}

#[test]
fn test_realtime_feed_blank_without_frames() {
    let cache = Arc::new(FrameCache::new());
    let feed = RealtimeFeed::new(cache.clone(), &PublishConfig::default());

    for _ in 0..5 {
        let sample = feed.next_sample();
        assert_eq!(sample.width(), 640);
        assert_eq!(sample.height(), 480);
    }

    cache.write(Frame::blank(320, 240));
    assert_eq!(feed.next_sample().width(), 320);
}

#[test]
fn test_stub_source_roundtrip() {
    let config =
        SourceConfig::new("stub://pattern".to_string(), Duration::from_millis(1), 64, 48).unwrap();
    let mut source = create_source(config).unwrap();

    source.connect().unwrap();
    let frame = source.read_frame().unwrap();
    assert_eq!(frame.width(), 64);
    assert_eq!(frame.height(), 48);

    source.close();
    source.close(); // idempotent
}

// ---------------------------------------------------------------------------
// End-to-end reconnect scenarios with a scripted source
// ---------------------------------------------------------------------------

struct ScriptedSource {
    config: SourceConfig,
    connect_script: Mutex<VecDeque<bool>>,
    read_script: Mutex<VecDeque<bool>>,
    connect_calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(connects: Vec<bool>, reads: Vec<bool>, connect_calls: Arc<AtomicUsize>) -> Self {
        Self {
            config: SourceConfig::new(
                "stub://scripted".to_string(),
                Duration::from_millis(1),
                16,
                16,
            )
            .unwrap(),
            connect_script: Mutex::new(connects.into()),
            read_script: Mutex::new(reads.into()),
            connect_calls,
        }
    }
}

impl FrameSource for ScriptedSource {
    fn connect(&mut self) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        match self.connect_script.lock().unwrap().pop_front() {
            Some(true) => Ok(()),
            _ => Err(DomainError::ConnectFailed("scripted failure".to_string())),
        }
    }

    fn read_frame(&mut self) -> Result<Frame> {
        match self.read_script.lock().unwrap().pop_front() {
            Some(true) => Frame::new(vec![5u8; 16 * 16 * 3], 16, 16, PixelFormat::Rgb24),
            _ => Err(DomainError::ReadFailed("scripted stream end".to_string())),
        }
    }

    fn close(&mut self) {}

    fn config(&self) -> &SourceConfig {
        &self.config
    }
}

struct NullMetrics;

impl MetricsReporter for NullMetrics {
    fn report_state_change(&self, _state: &ConnectionState) {}
    fn report_reconnect_attempt(&self) {}
    fn report_frame_ingested(&self) {}
    fn report_frame_published(&self) {}
    fn report_uptime(&self, _uptime_secs: f64) {}
}

fn scripted_service(
    connects: Vec<bool>,
    reads: Vec<bool>,
    max_attempts: u32,
) -> (IngestService, Arc<FrameCache>, Arc<AtomicUsize>) {
    let connect_calls = Arc::new(AtomicUsize::new(0));
    let source = ScriptedSource::new(connects, reads, connect_calls.clone());
    let cache = Arc::new(FrameCache::new());
    let service = IngestService::new(
        Box::new(source),
        RetryPolicy::new(Duration::from_millis(10), max_attempts).unwrap(),
        cache.clone(),
        Arc::new(NullMetrics),
    );
    (service, cache, connect_calls)
}

#[test]
fn test_always_failing_source_stops_after_budget() {
    // Source always fails connect, max-attempts=2, retry-interval=10ms:
    // after 3 attempts total the loop is Stopped.
    let (mut service, cache, connect_calls) = scripted_service(vec![], vec![], 2);

    let result = service.run_with_reconnect();

    assert!(matches!(
        result,
        Err(DomainError::ReconnectBudgetExhausted { attempts: 3 })
    ));
    assert_eq!(service.current_state(), ConnectionState::Stopped);
    assert_eq!(connect_calls.load(Ordering::SeqCst), 3);
    assert!(!cache.has_frame());

    // No 4th attempt occurs even after waiting
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(connect_calls.load(Ordering::SeqCst), 3);

    // Readers still get placeholder output from the untouched cache
    assert_eq!(service.health_reporter().status(), HealthStatus::Unhealthy);
}

#[test]
fn test_fail_fail_success_reaches_connected_on_third_attempt() {
    // Fail, fail, success with max-attempts=5: Connected on the 3rd
    // attempt, the counter resets, health flips to Healthy. The single
    // scripted good frame is followed by a read failure; the fresh budget
    // of 6 further attempts proves the reset before the loop stops.
    let (mut service, cache, connect_calls) =
        scripted_service(vec![false, false, true], vec![true], 5);

    let health = service.health_reporter();
    assert_eq!(health.status(), HealthStatus::Unhealthy);

    let result = service.run_with_reconnect();
    assert!(matches!(
        result,
        Err(DomainError::ReconnectBudgetExhausted { attempts: 6 })
    ));

    // Health per transition across the first three attempts:
    // Unhealthy (fail), Unhealthy (fail), Healthy (Connected)
    let history = service.lifecycle().history();
    let connected_index = history
        .iter()
        .position(|t| t.to == ConnectionState::Connected)
        .expect("never connected");
    assert_eq!(
        HealthStatus::from(history[connected_index].to),
        HealthStatus::Healthy
    );
    assert!(history[..connected_index]
        .iter()
        .all(|t| HealthStatus::from(t.to) == HealthStatus::Unhealthy));

    // 3 scripted attempts + 6 post-reset failures
    assert_eq!(connect_calls.load(Ordering::SeqCst), 9);

    // The good frame survives in the cache after Stopped
    assert!(cache.has_frame());
    assert_eq!(cache.latest().unwrap().width(), 16);
}

#[test]
fn test_stopped_cache_still_feeds_publishers() {
    let (mut service, cache, _connect_calls) =
        scripted_service(vec![true], vec![true], 0);

    let _ = service.run_with_reconnect();
    assert_eq!(service.current_state(), ConnectionState::Stopped);

    // Push-stream variant serves the stale frame, not an error
    let publisher = MjpegPublisher::new(cache.clone(), PublishConfig::default());
    let (part, _) = publisher.next_chunk();
    assert!(part.starts_with(b"--frame\r\n"));

    // Real-time variant serves the stale frame too
    let feed = RealtimeFeed::new(cache, &PublishConfig::default());
    assert_eq!(feed.next_sample().width(), 16);
}
