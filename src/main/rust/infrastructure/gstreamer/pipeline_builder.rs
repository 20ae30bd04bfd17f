use crate::domain::value_objects::SourceConfig;

/// Name of the appsink element frames are pulled from
pub const APPSINK_NAME: &str = "sink";

pub struct PipelineBuilder;

impl PipelineBuilder {
    /// Build the GStreamer pipeline string for RTSP frame extraction.
    /// decodebin handles whatever codec the camera negotiates; videoconvert
    /// normalizes to packed RGB for the appsink.
    pub fn build_pipeline_string(config: &SourceConfig) -> String {
        // max-buffers=1 drop=true keeps only the newest decoded frame in
        // the sink; sync=false pulls as fast as the source delivers, the
        // ingestion loop does its own pacing.
        format!(
            "rtspsrc location={} latency=200 protocols=tcp ! \
             decodebin ! \
             videoconvert ! \
             video/x-raw,format=RGB ! \
             appsink name={} sync=false max-buffers=1 drop=true",
            config.url(),
            APPSINK_NAME
        )
    }
}
