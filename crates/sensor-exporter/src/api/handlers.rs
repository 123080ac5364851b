use std::sync::Arc;

use error_stack::Report;
use poem::handler;
use poem::http::StatusCode;
use poem::web::Data;
use poem::Response;
use sensor::SensorError;
use tracing::error;
use tracing::warn;

use super::FailurePolicy;
use super::ScrapeContext;
use crate::bridge::CollectionError;

/// One line summary of a collection failure, including the sensor cause if any.
pub fn failure_reason(report: &Report<CollectionError>) -> String {
    match report.downcast_ref::<SensorError>() {
        Some(cause) => format!("{}: {cause}", report.current_context()),
        None => report.current_context().to_string(),
    }
}

fn plain_text(status: StatusCode, body: String) -> Response {
    Response::builder()
        .status(status)
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

/// Take a fresh reading from every collector and encode it
#[handler]
pub async fn get_metrics(context: Data<&Arc<ScrapeContext>>) -> Response {
    let outcomes = context.registry.gather().await;

    let mut batches = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(batch) => batches.push(batch),
            Err(report) => {
                warn!(policy = %context.policy, "Collection failed: {report:?}");
                failures.push(failure_reason(&report));
            }
        }
    }

    if !failures.is_empty() && context.policy == FailurePolicy::Fail {
        return plain_text(StatusCode::SERVICE_UNAVAILABLE, failures.join("\n") + "\n");
    }

    match context.encoder.encode(&batches) {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .content_type(context.encoder.content_type())
            .body(body),
        Err(report) => {
            error!("Failed to encode metrics: {report:?}");
            plain_text(
                StatusCode::INTERNAL_SERVER_ERROR,
                report.current_context().to_string() + "\n",
            )
        }
    }
}

/// Liveness probe
#[handler]
pub async fn healthz() -> &'static str {
    "ok"
}
