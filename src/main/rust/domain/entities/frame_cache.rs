use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::value_objects::Frame;

/// Single-slot holder for the most recently decoded frame.
///
/// The ingestion loop is the sole writer; any number of publisher or health
/// readers snapshot the slot concurrently. The critical section is one
/// `Arc` swap or clone, never I/O, so readers observe either the entirely
/// old or entirely new frame.
#[derive(Debug, Default)]
pub struct FrameCache {
    slot: Mutex<Option<Arc<Frame>>>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new frame, superseding any previous one
    pub fn write(&self, frame: Frame) {
        *self.lock() = Some(Arc::new(frame));
    }

    /// Snapshot of the latest frame; `None` until the first write
    pub fn latest(&self) -> Option<Arc<Frame>> {
        self.lock().clone()
    }

    pub fn has_frame(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<Frame>>> {
        // A poisoned lock still holds a fully written slot; recover it.
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
