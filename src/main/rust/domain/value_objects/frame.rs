use std::time::Instant;

use bytes::Bytes;

use crate::domain::errors::{DomainError, Result};

/// Pixel layout of a decoded frame. Sources normalize everything to
/// packed RGB before handing frames over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb24,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb24 => 3,
        }
    }
}

/// One decoded raster image sample from the video source.
///
/// Immutable once produced; shared with readers as `Arc<Frame>`, so a cache
/// write is a pointer swap and a read is a reference bump.
#[derive(Debug, Clone)]
pub struct Frame {
    data: Bytes,
    width: u32,
    height: u32,
    format: PixelFormat,
    captured_at: Instant,
}

impl Frame {
    pub fn new(data: impl Into<Bytes>, width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let data = data.into();
        let expected = Self::expected_len(width, height, format);

        if data.len() != expected {
            return Err(DomainError::FrameSizeMismatch {
                expected,
                got: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            format,
            captured_at: Instant::now(),
        })
    }

    /// Synthesize an all-black frame of the given dimensions
    pub fn blank(width: u32, height: u32) -> Self {
        let format = PixelFormat::Rgb24;
        Self {
            data: Bytes::from(vec![0u8; Self::expected_len(width, height, format)]),
            width,
            height,
            format,
            captured_at: Instant::now(),
        }
    }

    pub fn expected_len(width: u32, height: u32, format: PixelFormat) -> usize {
        width as usize * height as usize * format.bytes_per_pixel()
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

// Capture instants are incidental; two frames are the same sample if their
// pixels and geometry match.
impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.format == other.format
            && self.data == other.data
    }
}

impl Eq for Frame {}
