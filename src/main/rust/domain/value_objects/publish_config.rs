use std::time::Duration;

use crate::domain::errors::{DomainError, Result};

/// Configuration shared by the publisher variants: placeholder dimensions,
/// JPEG quality and pacing intervals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    frame_width: u32,
    frame_height: u32,
    jpeg_quality: u8,
    frame_interval: Duration,
    idle_interval: Duration,
}

impl PublishConfig {
    pub fn new(
        frame_width: u32,
        frame_height: u32,
        jpeg_quality: u8,
        frame_interval: Duration,
        idle_interval: Duration,
    ) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 {
            return Err(DomainError::InvalidDimensions {
                width: frame_width,
                height: frame_height,
            });
        }

        if jpeg_quality == 0 || jpeg_quality > 100 {
            return Err(DomainError::InvalidJpegQuality(jpeg_quality));
        }

        if frame_interval.is_zero() {
            return Err(DomainError::InvalidFrameInterval);
        }

        Ok(Self {
            frame_width,
            frame_height,
            jpeg_quality,
            frame_interval,
            idle_interval,
        })
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Pacing between parts while frames are available
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Pacing between placeholder parts while the cache is empty
    pub fn idle_interval(&self) -> Duration {
        self.idle_interval
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            frame_width: 640,
            frame_height: 480,
            jpeg_quality: 80,
            frame_interval: Duration::from_millis(66),
            idle_interval: Duration::from_millis(500),
        }
    }
}
