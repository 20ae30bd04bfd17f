use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::oneshot;
use tracing::{error, info};

use pipeline_rtsp_to_web::{
    create_source, serve_web, Config, FrameCache, IngestService, PrometheusReporter,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();
    config.validate()?;

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Initialize GStreamer (infrastructure concern)
    #[cfg(feature = "rtsp-gstreamer")]
    gstreamer::init()?;

    // Initialize metrics
    PrometheusReporter::init_metrics()?;

    info!("Starting RTSP to web pipeline");
    info!("  Source:     {}", config.rtsp_url);
    info!("  Frame rate: {} fps", config.frame_rate);
    info!("  Stream:     http://0.0.0.0:{}/stream", config.http_port);
    info!("  Health:     http://0.0.0.0:{}/health", config.http_port);
    info!("  Metrics:    http://0.0.0.0:{}/metrics", config.http_port);

    // Convert CLI config to domain configs
    let source_config = config.to_source_config().map_err(|e| anyhow::anyhow!("{}", e))?;
    let retry_policy = config.to_retry_policy().map_err(|e| anyhow::anyhow!("{}", e))?;
    let publish_config = config.to_publish_config().map_err(|e| anyhow::anyhow!("{}", e))?;

    // Create infrastructure implementations (dependency injection)
    let source = create_source(source_config).map_err(|e| anyhow::anyhow!("{}", e))?;
    let metrics_reporter = Arc::new(PrometheusReporter::new());
    let cache = Arc::new(FrameCache::new());

    // Create application service
    let mut ingest_service = IngestService::new(
        source,
        retry_policy,
        cache.clone(),
        metrics_reporter.clone(),
    );
    let running = ingest_service.running_flag();
    let health = ingest_service.health_reporter();

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    // Handle Ctrl+C
    let running_for_signal = running.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl+c");
        info!("Received shutdown signal");
        running_for_signal.store(false, Ordering::SeqCst);
        let _ = shutdown_tx.send(());
    });

    // Run ingestion in a blocking thread (the transport uses synchronous APIs).
    // A terminal Stopped state only ends this task; the HTTP surface keeps
    // serving the last cached frame and an unhealthy status.
    let ingest_handle = tokio::task::spawn_blocking(move || {
        if let Err(e) = ingest_service.run_with_reconnect() {
            error!("Ingestion ended: {}", e);
        }
    });

    // Serve clients until the shutdown signal fires
    serve_web(
        config.http_port,
        cache,
        publish_config,
        health,
        metrics_reporter,
        shutdown_rx,
    )
    .await;

    // Signal the ingest loop and join it
    running.store(false, Ordering::SeqCst);
    ingest_handle.await?;

    info!("Pipeline shutdown complete");
    Ok(())
}
