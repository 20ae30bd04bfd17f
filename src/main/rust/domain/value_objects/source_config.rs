use std::time::Duration;

use crate::domain::errors::{DomainError, Result};

/// Configuration for the camera frame source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    url: String,
    frame_interval: Duration,
    fallback_width: u32,
    fallback_height: u32,
}

impl SourceConfig {
    pub fn new(
        url: String,
        frame_interval: Duration,
        fallback_width: u32,
        fallback_height: u32,
    ) -> Result<Self> {
        Self::validate_url(&url)?;

        if frame_interval.is_zero() {
            return Err(DomainError::InvalidFrameInterval);
        }

        if fallback_width == 0 || fallback_height == 0 {
            return Err(DomainError::InvalidDimensions {
                width: fallback_width,
                height: fallback_height,
            });
        }

        Ok(Self {
            url,
            frame_interval,
            fallback_width,
            fallback_height,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Target pacing between reads; a slow source simply yields fewer updates
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Dimensions used for synthetic frames when the source has none to offer
    pub fn fallback_width(&self) -> u32 {
        self.fallback_width
    }

    pub fn fallback_height(&self) -> u32 {
        self.fallback_height
    }

    pub fn is_stub(&self) -> bool {
        self.url.starts_with("stub://")
    }

    fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("rtsp://") && !url.starts_with("stub://") {
            return Err(DomainError::InvalidSourceUrl(url.to_string()));
        }
        Ok(())
    }
}
