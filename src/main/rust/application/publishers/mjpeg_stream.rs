use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::domain::entities::FrameCache;
use crate::domain::errors::{DomainError, Result};
use crate::domain::value_objects::{Frame, PublishConfig};

/// Multipart boundary token; clients see it in the content type and before
/// every part
const BOUNDARY: &str = "frame";

/// Push-stream publisher: turns the latest cached frame into an indefinite
/// sequence of JPEG parts for a `multipart/x-mixed-replace` response.
///
/// A pure cache reader. When no frame has ever been written it emits a
/// pre-encoded black placeholder part instead of stalling, paced at the
/// idle interval so an empty cache never busy-loops a client connection.
pub struct MjpegPublisher {
    cache: Arc<FrameCache>,
    config: PublishConfig,
    placeholder: Bytes,
}

impl MjpegPublisher {
    pub const CONTENT_TYPE: &'static str = "multipart/x-mixed-replace; boundary=frame";

    pub fn new(cache: Arc<FrameCache>, config: PublishConfig) -> Self {
        let blank = Frame::blank(config.frame_width(), config.frame_height());
        let placeholder = match encode_jpeg(&blank, config.jpeg_quality()) {
            Ok(jpeg) => multipart_part(&jpeg),
            // A blank RGB buffer always encodes; keep the stream well-formed
            // even if it somehow does not.
            Err(e) => {
                tracing::error!("placeholder encode failed: {}", e);
                multipart_part(&[])
            }
        };

        Self {
            cache,
            config,
            placeholder,
        }
    }

    /// Produce the next part of the sequence plus the pacing delay the
    /// caller should wait before asking again
    pub fn next_chunk(&self) -> (Bytes, Duration) {
        match self.cache.latest() {
            Some(frame) => match encode_jpeg(&frame, self.config.jpeg_quality()) {
                Ok(jpeg) => (multipart_part(&jpeg), self.config.frame_interval()),
                Err(e) => {
                    tracing::warn!("frame encode failed, serving placeholder: {}", e);
                    (self.placeholder.clone(), self.config.frame_interval())
                }
            },
            None => (self.placeholder.clone(), self.config.idle_interval()),
        }
    }

    /// Consume the publisher into a paced async chunk stream suitable for a
    /// streaming response body. The sequence is conceptually infinite; a
    /// client disconnect simply drops the stream.
    pub fn into_chunk_stream(self) -> impl Stream<Item = std::result::Result<Bytes, Infallible>> {
        futures::stream::unfold(self, |publisher| async move {
            let (chunk, delay) = publisher.next_chunk();
            tokio::time::sleep(delay).await;
            Some((Ok(chunk), publisher))
        })
    }
}

fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>> {
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder
        .encode(
            frame.data(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| DomainError::EncodeFailed(e.to_string()))?;
    Ok(jpeg)
}

fn multipart_part(jpeg: &[u8]) -> Bytes {
    let header = format!(
        "--{}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        BOUNDARY,
        jpeg.len()
    );

    let mut part = Vec::with_capacity(header.len() + jpeg.len() + 2);
    part.extend_from_slice(header.as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    Bytes::from(part)
}
