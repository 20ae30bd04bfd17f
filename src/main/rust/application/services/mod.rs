mod health_reporter;
mod ingest_service;

pub use health_reporter::HealthReporter;
pub use ingest_service::IngestService;
