use super::percentile_ns;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::Ordering;
use std::time::Instant;

const METRIC_SUBSYSTEM: &str = "funil";
const METRIC_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let mut body = String::new();

    let counts = state.metrics.counts.lock().await.clone();
    let ordered: BTreeMap<(String, u16), u64> = counts.into_iter().collect();
    for ((route, status), count) in &ordered {
        let _ = writeln!(
            body,
            "funil_requests_total{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\",route=\"{route}\",status=\"{status}\"}} {count}",
        );
    }

    let latency = state.metrics.latency_ns.lock().await.clone();
    let ordered_latency: BTreeMap<String, Vec<u64>> = latency.into_iter().collect();
    for (route, samples) in &ordered_latency {
        for (label, pct) in [("p50", 0.5), ("p95", 0.95), ("p99", 0.99)] {
            let _ = writeln!(
                body,
                "funil_request_latency_{label}_ns{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\",route=\"{route}\"}} {}",
                percentile_ns(samples, pct),
            );
        }
    }

    let _ = writeln!(
        body,
        "funil_leads_created_total{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\"}} {}",
        state.metrics.leads_created.load(Ordering::Relaxed),
    );
    let _ = writeln!(
        body,
        "funil_store_write_failures_total{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\"}} {}",
        state.metrics.store_write_failures.load(Ordering::Relaxed),
    );
    let _ = writeln!(
        body,
        "funil_ready{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\"}} {}",
        u8::from(state.ready.load(Ordering::Relaxed)),
    );

    let response = (StatusCode::OK, body).into_response();
    state
        .metrics
        .observe_request("/metrics", StatusCode::OK, started.elapsed())
        .await;
    response
}
