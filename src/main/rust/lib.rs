pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenience
pub use application::publishers::{MjpegPublisher, RealtimeFeed};
pub use application::services::{HealthReporter, IngestService};
pub use config::Config;
pub use domain::entities::{FrameCache, IngestLifecycle, StateTransition};
pub use domain::errors::{DomainError, Result};
pub use domain::ports::{FrameSource, MetricsReporter};
pub use domain::value_objects::{
    ConnectionState, Frame, HealthStatus, PixelFormat, PublishConfig, RetryPolicy, SourceConfig,
};
pub use infrastructure::gstreamer::PipelineBuilder;
#[cfg(feature = "rtsp-gstreamer")]
pub use infrastructure::gstreamer::RtspFrameSource;
pub use infrastructure::metrics::PrometheusReporter;
pub use infrastructure::source::{create_source, StubFrameSource};
pub use infrastructure::web::serve_web;
