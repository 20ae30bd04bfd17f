mod frame_source;
mod metrics_reporter;

pub use frame_source::FrameSource;
pub use metrics_reporter::MetricsReporter;
