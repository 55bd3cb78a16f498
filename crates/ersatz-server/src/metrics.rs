//! Prometheus metrics for ersatz.
//!
//! Tracks dispatch outcomes, which response tier served a route, and how
//! much simulated latency was applied.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

lazy_static! {
    /// Total number of requests dispatched
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "ersatz_requests_total",
        "Total number of requests dispatched",
        &["method", "status"]
    )
    .unwrap();

    /// Route matches by response tier
    pub static ref ROUTE_MATCHES_TOTAL: CounterVec = register_counter_vec!(
        "ersatz_route_matches_total",
        "Number of requests served per route and response tier",
        &["route", "tier"]  // tier: conditional|default|legacy
    )
    .unwrap();

    /// Requests no route matched
    pub static ref UNMATCHED_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "ersatz_unmatched_requests_total",
        "Number of requests that matched no route",
        &["method"]
    )
    .unwrap();

    /// Simulated delay applied before responding
    pub static ref SIMULATED_DELAY_MS: HistogramVec = register_histogram_vec!(
        "ersatz_simulated_delay_ms",
        "Histogram of simulated response delay in milliseconds",
        &["route"],
        vec![10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap();

    /// Time spent selecting and rendering a response (excludes simulated delay)
    pub static ref DISPATCH_DURATION_MS: HistogramVec = register_histogram_vec!(
        "ersatz_dispatch_duration_ms",
        "Histogram of dispatch time in milliseconds, excluding simulated delay",
        &["method"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 25.0, 50.0]
    )
    .unwrap();
}

/// Collect and return all metrics in Prometheus text format
pub fn collect_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Method label with bounded cardinality: standard methods by name, any
/// other token as `OTHER`.
pub fn method_label(method: &str) -> &'static str {
    const STANDARD: [&str; 9] = [
        "GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "CONNECT", "TRACE",
    ];
    STANDARD
        .iter()
        .find(|m| m.eq_ignore_ascii_case(method))
        .copied()
        .unwrap_or("OTHER")
}

pub fn record_request(method: &str, status: u16) {
    REQUESTS_TOTAL
        .with_label_values(&[method_label(method), &status.to_string()])
        .inc();
}

pub fn record_route_match(route: &str, tier: &str) {
    ROUTE_MATCHES_TOTAL.with_label_values(&[route, tier]).inc();
}

pub fn record_unmatched(method: &str) {
    UNMATCHED_REQUESTS_TOTAL
        .with_label_values(&[method_label(method)])
        .inc();
}

pub fn record_simulated_delay(route: &str, delay_ms: u64) {
    SIMULATED_DELAY_MS
        .with_label_values(&[route])
        .observe(delay_ms as f64);
}

pub fn record_dispatch_duration(method: &str, duration_ms: f64) {
    DISPATCH_DURATION_MS
        .with_label_values(&[method_label(method)])
        .observe(duration_ms);
}

/// Serve `GET /metrics` on its own listener so it never shadows mock routes.
pub async fn serve_metrics(addr: SocketAddr) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind(addr).await?;
    info!("Metrics listening on http://{}/metrics", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            let service = service_fn(handle_metrics_request);
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Metrics connection error: {}", e);
            }
        });
    }
}

async fn handle_metrics_request(
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (status, body) = match (req.method(), req.uri().path()) {
        (&Method::GET, "/metrics") => (StatusCode::OK, collect_metrics()),
        _ => (StatusCode::NOT_FOUND, "Not found".to_string()),
    };

    Ok(Response::builder()
        .status(status)
        .header("content-type", "text/plain; version=0.0.4")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error")))))
}
