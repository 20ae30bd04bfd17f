mod frame_cache;
mod ingest_lifecycle;

pub use frame_cache::FrameCache;
pub use ingest_lifecycle::{IngestLifecycle, StateTransition};
