pub mod gstreamer;
pub mod metrics;
pub mod source;
pub mod web;
