use crate::domain::value_objects::ConnectionState;

/// Port for metrics reporting
pub trait MetricsReporter: Send + Sync {
    fn report_state_change(&self, state: &ConnectionState);
    fn report_reconnect_attempt(&self);
    fn report_frame_ingested(&self);
    fn report_frame_published(&self);
    fn report_uptime(&self, uptime_secs: f64);
}
