use std::sync::Arc;

use crate::domain::entities::FrameCache;
use crate::domain::value_objects::{Frame, PublishConfig};

/// Real-time media publisher: one frame per callback tick.
///
/// The media-session layer constructs one feed per peer connection and
/// calls `next_sample` once per outgoing frame. When the cache is empty a
/// pre-built black frame of the configured dimensions is returned, so the
/// downstream pipeline's one-frame-per-tick contract is never violated.
/// Timestamps are assigned by the media-session layer, not here. Session
/// teardown is just dropping the feed.
#[derive(Debug, Clone)]
pub struct RealtimeFeed {
    cache: Arc<FrameCache>,
    blank: Arc<Frame>,
}

impl RealtimeFeed {
    pub fn new(cache: Arc<FrameCache>, config: &PublishConfig) -> Self {
        Self {
            cache,
            blank: Arc::new(Frame::blank(config.frame_width(), config.frame_height())),
        }
    }

    /// Latest cached frame, or the blank fallback; never blocks, never fails
    pub fn next_sample(&self) -> Arc<Frame> {
        self.cache.latest().unwrap_or_else(|| self.blank.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::PixelFormat;

    fn feed() -> (RealtimeFeed, Arc<FrameCache>) {
        let cache = Arc::new(FrameCache::new());
        (RealtimeFeed::new(cache.clone(), &PublishConfig::default()), cache)
    }

    #[test]
    fn test_empty_cache_yields_blank_of_expected_dimensions() {
        let (feed, _cache) = feed();

        for _ in 0..3 {
            let sample = feed.next_sample();
            assert_eq!(sample.width(), 640);
            assert_eq!(sample.height(), 480);
            assert!(sample.data().iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_cached_frame_takes_over_from_blank() {
        let (feed, cache) = feed();
        assert!(feed.next_sample().data().iter().all(|&b| b == 0));

        let frame = Frame::new(vec![9u8; 640 * 480 * 3], 640, 480, PixelFormat::Rgb24).unwrap();
        cache.write(frame.clone());

        assert_eq!(*feed.next_sample(), frame);
    }
}
