use std::time::Duration;

use anyhow::Context;
use gstreamer::prelude::*;

use super::pipeline_builder::{PipelineBuilder, APPSINK_NAME};
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::FrameSource;
use crate::domain::value_objects::{Frame, PixelFormat, SourceConfig};

/// How long connect waits for the pipeline to reach Playing
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// GStreamer-backed RTSP frame source.
///
/// The pipeline is built lazily on `connect` and torn down on `close`, so
/// the ingestion loop's teardown-then-reopen cycle maps onto a fresh
/// pipeline per connect.
pub struct RtspFrameSource {
    config: SourceConfig,
    pipeline: Option<gstreamer::Pipeline>,
    appsink: Option<gstreamer_app::AppSink>,
}

impl RtspFrameSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            pipeline: None,
            appsink: None,
        }
    }

    fn build_pipeline(&self) -> anyhow::Result<(gstreamer::Pipeline, gstreamer_app::AppSink)> {
        let pipeline_str = PipelineBuilder::build_pipeline_string(&self.config);
        tracing::debug!("creating pipeline: {}", pipeline_str);

        let pipeline = gstreamer::parse::launch(&pipeline_str)
            .context("parse RTSP pipeline")?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| anyhow::anyhow!("parsed element is not a Pipeline"))?;

        let appsink = pipeline
            .by_name(APPSINK_NAME)
            .context("appsink element missing from pipeline")?
            .downcast::<gstreamer_app::AppSink>()
            .map_err(|_| anyhow::anyhow!("appsink element has unexpected type"))?;

        let caps = gstreamer::Caps::builder("video/x-raw")
            .field("format", "RGB")
            .build();
        appsink.set_caps(Some(&caps));
        appsink.set_max_buffers(1);
        appsink.set_drop(true);
        appsink.set_sync(false);

        Ok((pipeline, appsink))
    }

    /// Drain pending bus messages; an Error or Eos fails the current read
    fn drain_bus(&self) -> Result<()> {
        let Some(bus) = self.pipeline.as_ref().and_then(|p| p.bus()) else {
            return Ok(());
        };

        while let Some(msg) = bus.timed_pop(gstreamer::ClockTime::ZERO) {
            use gstreamer::MessageView;
            match msg.view() {
                MessageView::Error(err) => {
                    return Err(DomainError::ReadFailed(format!(
                        "gstreamer error from {:?}: {}",
                        err.src().map(|s| s.path_string()),
                        err.error()
                    )));
                }
                MessageView::Eos(..) => {
                    return Err(DomainError::ReadFailed("stream ended".to_string()));
                }
                MessageView::Warning(warn) => {
                    tracing::warn!(
                        "gstreamer warning from {:?}: {}",
                        warn.src().map(|s| s.path_string()),
                        warn.error()
                    );
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Four frame intervals, floored at half a second: a slow source yields
    /// fewer updates, a dead one fails the read
    fn pull_timeout(&self) -> Duration {
        (self.config.frame_interval() * 4).max(Duration::from_millis(500))
    }
}

impl FrameSource for RtspFrameSource {
    fn connect(&mut self) -> Result<()> {
        let (pipeline, appsink) = self
            .build_pipeline()
            .map_err(|e| DomainError::ConnectFailed(e.to_string()))?;

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| DomainError::ConnectFailed(e.to_string()))?;

        // rtspsrc connects asynchronously; wait (bounded) for Playing so a
        // bad address or rejected credentials surface here, not on read.
        let timeout = gstreamer::ClockTime::from_seconds(CONNECT_TIMEOUT_SECS);
        let (state_result, _, _) = pipeline.state(timeout);
        if let Err(e) = state_result {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(DomainError::ConnectFailed(format!(
                "pipeline did not reach Playing: {}",
                e
            )));
        }

        self.pipeline = Some(pipeline);
        self.appsink = Some(appsink);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame> {
        self.drain_bus()?;

        let appsink = self
            .appsink
            .as_ref()
            .ok_or_else(|| DomainError::ReadFailed("source not connected".to_string()))?;

        let timeout_ms = self.pull_timeout().as_millis() as u64;
        let sample = appsink
            .try_pull_sample(gstreamer::ClockTime::from_mseconds(timeout_ms))
            .ok_or_else(|| DomainError::ReadFailed("stream stalled".to_string()))?;

        sample_to_frame(&sample)
    }

    fn close(&mut self) {
        self.appsink = None;
        if let Some(pipeline) = self.pipeline.take() {
            let _ = pipeline.set_state(gstreamer::State::Null);
        }
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl Drop for RtspFrameSource {
    fn drop(&mut self) {
        self.close();
    }
}

fn sample_to_frame(sample: &gstreamer::Sample) -> Result<Frame> {
    let map_err = |msg: &str| DomainError::ReadFailed(msg.to_string());

    let buffer = sample.buffer().ok_or_else(|| map_err("sample missing buffer"))?;
    let caps = sample.caps().ok_or_else(|| map_err("sample missing caps"))?;
    let info = gstreamer_video::VideoInfo::from_caps(caps)
        .map_err(|e| DomainError::ReadFailed(format!("parse caps as video info: {}", e)))?;

    let width = info.width();
    let height = info.height();
    let row_bytes = width as usize * PixelFormat::Rgb24.bytes_per_pixel();
    let stride = info.stride()[0] as usize;

    let map = buffer
        .map_readable()
        .map_err(|e| DomainError::ReadFailed(format!("map buffer: {}", e)))?;
    let data = map.as_slice();

    let pixels = if stride == row_bytes {
        data.get(..row_bytes * height as usize)
            .ok_or_else(|| map_err("buffer shorter than frame"))?
            .to_vec()
    } else {
        // Stride padding: compact row by row
        let mut pixels = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            let end = start + row_bytes;
            pixels.extend_from_slice(
                data.get(start..end)
                    .ok_or_else(|| map_err("buffer row out of bounds"))?,
            );
        }
        pixels
    };

    Frame::new(pixels, width, height, PixelFormat::Rgb24)
}
