use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::FrameSource;
use crate::domain::value_objects::{Frame, PixelFormat, SourceConfig};

/// Synthetic frame source for `stub://` URLs.
///
/// Always connectable, produces a deterministic moving gradient at the
/// configured fallback dimensions. Used by the demo path and tests so the
/// full ingest/publish pipeline runs without a camera or GStreamer.
pub struct StubFrameSource {
    config: SourceConfig,
    connected: bool,
    frame_count: u64,
}

impl StubFrameSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            connected: false,
            frame_count: 0,
        }
    }

    fn generate_pixels(&self) -> Vec<u8> {
        let width = self.config.fallback_width() as usize;
        let height = self.config.fallback_height() as usize;
        let mut pixels = vec![0u8; width * height * PixelFormat::Rgb24.bytes_per_pixel()];

        // Diagonal gradient drifting one step per frame
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.frame_count) % 256) as u8;
        }

        pixels
    }
}

impl FrameSource for StubFrameSource {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        tracing::info!(url = %self.config.url(), "connected (synthetic)");
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame> {
        if !self.connected {
            return Err(DomainError::ReadFailed("source not connected".to_string()));
        }

        self.frame_count += 1;
        Frame::new(
            self.generate_pixels(),
            self.config.fallback_width(),
            self.config.fallback_height(),
            PixelFormat::Rgb24,
        )
    }

    fn close(&mut self) {
        self.connected = false;
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }
}
