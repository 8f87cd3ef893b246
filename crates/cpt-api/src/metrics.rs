//! Prometheus metrics: HTTP traffic plus a few domain counters.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use cpt_core::models::{ProgressStatus, SkillLevel};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("static regex")
});

static NUMBER_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("static regex"));

/// Install the Prometheus recorder.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .set_buckets_for_metric(
            Matcher::Full("plan_pool_size".to_string()),
            &[3.0, 15.0, 30.0, 90.0, 180.0, 360.0, 720.0, 1095.0],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware recording request count, latency and in-flight requests.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let in_flight = gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone());
    in_flight.increment(1.0);

    let response = next.run(req).await;

    in_flight.decrement(1.0);

    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Replace ids in a path with `:id` to keep label cardinality bounded.
fn normalize_path(path: &str) -> String {
    let without_uuids = UUID_SEGMENT.replace_all(path, ":id");
    NUMBER_SEGMENT
        .replace_all(&without_uuids, "/:id")
        .into_owned()
}

pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

pub fn record_plan_created(level: SkillLevel, days: u32, pool_size: usize) {
    counter!("study_plans_created_total", "level" => level.as_str()).increment(1);
    histogram!("plan_pool_size", "level" => level.as_str()).record(pool_size as f64);
    histogram!("plan_duration_days").record(f64::from(days));
}

pub fn record_status_toggle(to: ProgressStatus) {
    counter!("problem_status_toggles_total", "to" => to.as_str()).increment(1);
}

pub fn record_auth_event(event_type: &'static str, success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!(
        "auth_events_total",
        "type" => event_type,
        "status" => status
    )
    .increment(1);
}
