use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::oneshot;
use warp::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use warp::http::{HeaderValue, Response, StatusCode};
use warp::hyper::Body;
use warp::Filter;

use crate::application::publishers::MjpegPublisher;
use crate::application::services::HealthReporter;
use crate::domain::entities::FrameCache;
use crate::domain::ports::MetricsReporter;
use crate::domain::value_objects::{HealthStatus, PublishConfig};
use crate::infrastructure::metrics::PrometheusReporter;

/// Health check response structure
#[derive(serde::Serialize)]
struct HealthResponse {
    status: HealthStatus,
    service: &'static str,
    version: &'static str,
}

/// Serve the client-facing HTTP surface: the MJPEG push stream plus
/// health, liveness and metrics endpoints, all on one port.
pub async fn serve_web(
    port: u16,
    cache: Arc<FrameCache>,
    publish: PublishConfig,
    health: HealthReporter,
    metrics: Arc<dyn MetricsReporter>,
    shutdown: oneshot::Receiver<()>,
) {
    // CORS configuration for browser access
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec!["Content-Type"]);

    let stream_route = warp::path("stream").and(warp::get()).map(move || {
        let publisher = MjpegPublisher::new(cache.clone(), publish.clone());
        let metrics = metrics.clone();
        let body = Body::wrap_stream(
            publisher
                .into_chunk_stream()
                .inspect(move |_| metrics.report_frame_published()),
        );

        let mut response = Response::new(body);
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static(MjpegPublisher::CONTENT_TYPE),
        );
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        response
    });

    let health_route = warp::path("health").map(move || {
        let status = health.status();
        let code = if status.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        let response = HealthResponse {
            status,
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        };
        warp::reply::with_status(warp::reply::json(&response), code)
    });

    // Liveness probe endpoint (minimal check - is the process running?)
    let liveness_route =
        warp::path("livez").map(|| warp::reply::with_status("OK", StatusCode::OK));

    let metrics_route = warp::path("metrics").map(|| {
        let body = PrometheusReporter::gather_metrics();
        warp::reply::with_header(body, "content-type", "text/plain; version=0.0.4; charset=utf-8")
    });

    let routes = stream_route
        .or(health_route)
        .or(liveness_route)
        .or(metrics_route)
        .with(cors);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async {
            shutdown.await.ok();
        });

    tracing::info!("HTTP server listening on http://{}", addr);
    server.await;
}
