use std::fmt;

use serde::Serialize;

use crate::domain::value_objects::ConnectionState;

/// Binary health classification derived from the connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl From<ConnectionState> for HealthStatus {
    fn from(state: ConnectionState) -> Self {
        if state.is_connected() {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}
