use std::time::Instant;

use crate::domain::value_objects::ConnectionState;

/// State transition record
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: ConnectionState,
    pub to: ConnectionState,
    pub timestamp: Instant,
    pub reason: Option<String>,
}

/// Domain entity tracking the ingestion connection lifecycle: the current
/// state, the transition history and the consecutive-failure counter that
/// drives the reconnect budget.
#[derive(Debug)]
pub struct IngestLifecycle {
    current_state: ConnectionState,
    state_history: Vec<StateTransition>,
    consecutive_failures: u32,
    connected_at: Option<Instant>,
}

impl IngestLifecycle {
    pub fn new() -> Self {
        Self {
            current_state: ConnectionState::Disconnected,
            state_history: Vec::new(),
            consecutive_failures: 0,
            connected_at: None,
        }
    }

    pub fn current_state(&self) -> ConnectionState {
        self.current_state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn uptime(&self) -> Option<std::time::Duration> {
        self.connected_at.map(|start| start.elapsed())
    }

    pub fn transition_count(&self) -> usize {
        self.state_history.len()
    }

    pub fn last_transition(&self) -> Option<&StateTransition> {
        self.state_history.last()
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.state_history
    }

    /// Record a failed connect attempt and return the running count
    pub fn record_connect_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    pub fn transition_to_connecting(&mut self) {
        self.record_transition(ConnectionState::Connecting, None);
    }

    /// Successful connect: the failure counter resets to zero
    pub fn transition_to_connected(&mut self) {
        self.consecutive_failures = 0;
        self.record_transition(ConnectionState::Connected, None);

        if self.connected_at.is_none() {
            self.connected_at = Some(Instant::now());
        }
    }

    pub fn transition_to_disconnected(&mut self, reason: Option<String>) {
        self.record_transition(ConnectionState::Disconnected, reason);
    }

    /// Terminal transition; no further attempts follow
    pub fn transition_to_stopped(&mut self, reason: Option<String>) {
        self.record_transition(ConnectionState::Stopped, reason);
    }

    fn record_transition(&mut self, new_state: ConnectionState, reason: Option<String>) {
        let transition = StateTransition {
            from: self.current_state,
            to: new_state,
            timestamp: Instant::now(),
            reason,
        };

        self.state_history.push(transition);
        self.current_state = new_state;
    }
}

impl Default for IngestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
