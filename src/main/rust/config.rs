use std::time::Duration;

use clap::Parser;

use crate::domain::value_objects::{PublishConfig, RetryPolicy, SourceConfig};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pipeline-rtsp-to-web",
    version = "0.1.0",
    about = "RTSP camera to MJPEG/real-time web republisher with automatic reconnection"
)]
pub struct Config {
    /// RTSP source URL (use stub:// for a synthetic test pattern)
    #[arg(
        long,
        env = "RTSP_URL",
        default_value = "rtsp://127.0.0.1:8554/cam1"
    )]
    pub rtsp_url: String,

    /// HTTP server port (stream, health and metrics)
    #[arg(long, env = "HTTP_PORT", default_value = "8080")]
    pub http_port: u16,

    /// Target frame rate in frames per second
    #[arg(long, env = "FRAME_RATE", default_value = "15")]
    pub frame_rate: u32,

    /// Delay between reconnection attempts in seconds
    #[arg(long, env = "RETRY_INTERVAL", default_value = "5")]
    pub retry_interval: u64,

    /// Maximum consecutive failed connect attempts before ingestion stops
    #[arg(long, env = "RECONNECT_ATTEMPTS", default_value = "5")]
    pub reconnect_attempts: u32,

    /// Placeholder/blank frame width in pixels
    #[arg(long, env = "FRAME_WIDTH", default_value = "640")]
    pub frame_width: u32,

    /// Placeholder/blank frame height in pixels
    #[arg(long, env = "FRAME_HEIGHT", default_value = "480")]
    pub frame_height: u32,

    /// JPEG quality for the push stream (1-100)
    #[arg(long, env = "JPEG_QUALITY", default_value = "80")]
    pub jpeg_quality: u8,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Minimum allowed port (ports below 1024 are privileged)
const MIN_USER_PORT: u16 = 1024;

/// Pacing for placeholder parts while no frame has ever arrived
const IDLE_INTERVAL: Duration = Duration::from_millis(500);

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.rtsp_url.starts_with("rtsp://") && !self.rtsp_url.starts_with("stub://") {
            anyhow::bail!("Source URL must start with rtsp:// or stub://");
        }

        Self::validate_port(self.http_port, "http")?;

        if self.frame_rate == 0 {
            anyhow::bail!("Frame rate cannot be 0");
        }

        if self.retry_interval == 0 {
            anyhow::bail!("Retry interval cannot be 0");
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            anyhow::bail!(
                "Invalid frame dimensions: {}x{}",
                self.frame_width,
                self.frame_height
            );
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            anyhow::bail!("JPEG quality must be between 1 and 100");
        }

        Ok(())
    }

    fn validate_port(port: u16, name: &str) -> anyhow::Result<()> {
        if port == 0 {
            anyhow::bail!("Invalid {} port: port cannot be 0", name);
        }
        if port < MIN_USER_PORT {
            anyhow::bail!(
                "Invalid {} port: {} is a privileged port (< {}). Use a port >= {}",
                name,
                port,
                MIN_USER_PORT,
                MIN_USER_PORT
            );
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate as f64)
    }

    pub fn to_source_config(&self) -> crate::domain::errors::Result<SourceConfig> {
        SourceConfig::new(
            self.rtsp_url.clone(),
            self.frame_interval(),
            self.frame_width,
            self.frame_height,
        )
    }

    pub fn to_retry_policy(&self) -> crate::domain::errors::Result<RetryPolicy> {
        RetryPolicy::new(
            Duration::from_secs(self.retry_interval),
            self.reconnect_attempts,
        )
    }

    pub fn to_publish_config(&self) -> crate::domain::errors::Result<PublishConfig> {
        PublishConfig::new(
            self.frame_width,
            self.frame_height,
            self.jpeg_quality,
            self.frame_interval(),
            IDLE_INTERVAL,
        )
    }
}
