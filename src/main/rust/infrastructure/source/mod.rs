mod stub;

pub use stub::StubFrameSource;

use crate::domain::errors::Result;
use crate::domain::ports::FrameSource;
use crate::domain::value_objects::SourceConfig;

/// Pick a source backend from the URL scheme: `stub://` is always
/// available, `rtsp://` needs the GStreamer backend compiled in.
pub fn create_source(config: SourceConfig) -> Result<Box<dyn FrameSource>> {
    if config.is_stub() {
        return Ok(Box::new(StubFrameSource::new(config)));
    }

    #[cfg(feature = "rtsp-gstreamer")]
    {
        Ok(Box::new(
            crate::infrastructure::gstreamer::RtspFrameSource::new(config),
        ))
    }

    #[cfg(not(feature = "rtsp-gstreamer"))]
    {
        Err(crate::domain::errors::DomainError::SourceUnavailable(
            "RTSP ingest requires the rtsp-gstreamer feature".to_string(),
        ))
    }
}
