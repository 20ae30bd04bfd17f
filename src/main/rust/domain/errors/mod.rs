use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid source URL: {0} (expected rtsp:// or stub://)")]
    InvalidSourceUrl(String),

    #[error("Invalid retry interval: interval cannot be zero")]
    InvalidRetryInterval,

    #[error("Invalid frame interval: interval cannot be zero")]
    InvalidFrameInterval,

    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid JPEG quality: {0} (expected 1..=100)")]
    InvalidJpegQuality(u8),

    #[error("Frame buffer size mismatch: expected {expected} bytes, got {got}")]
    FrameSizeMismatch { expected: usize, got: usize },

    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    #[error("Frame read failed: {0}")]
    ReadFailed(String),

    #[error("Reconnect budget exhausted after {attempts} attempts")]
    ReconnectBudgetExhausted { attempts: u32 },

    #[error("Source backend unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Frame encode failed: {0}")]
    EncodeFailed(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
