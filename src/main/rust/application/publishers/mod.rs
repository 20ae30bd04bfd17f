mod mjpeg_stream;
mod realtime_feed;

pub use mjpeg_stream::MjpegPublisher;
pub use realtime_feed::RealtimeFeed;
