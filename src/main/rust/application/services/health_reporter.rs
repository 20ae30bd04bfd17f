use tokio::sync::watch;

use crate::domain::value_objects::{ConnectionState, HealthStatus};

/// Read-only view of the ingestion connection state for external polling.
///
/// Cheap to clone and safe to call concurrently and unboundedly often; a
/// status check is a lock-free borrow of the watch channel, never I/O.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    state_rx: watch::Receiver<ConnectionState>,
}

impl HealthReporter {
    pub fn new(state_rx: watch::Receiver<ConnectionState>) -> Self {
        Self { state_rx }
    }

    pub fn status(&self) -> HealthStatus {
        HealthStatus::from(*self.state_rx.borrow())
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }
}
