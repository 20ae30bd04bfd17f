mod connection_state;
mod frame;
mod health_status;
mod publish_config;
mod retry_policy;
mod source_config;

pub use connection_state::ConnectionState;
pub use frame::{Frame, PixelFormat};
pub use health_status::HealthStatus;
pub use publish_config::PublishConfig;
pub use retry_policy::RetryPolicy;
pub use source_config::SourceConfig;
