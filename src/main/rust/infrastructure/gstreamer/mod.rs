mod pipeline_builder;
#[cfg(feature = "rtsp-gstreamer")]
mod rtsp_source;

pub use pipeline_builder::PipelineBuilder;
#[cfg(feature = "rtsp-gstreamer")]
pub use rtsp_source::RtspFrameSource;
