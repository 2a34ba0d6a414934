//! Per-request HTTP metrics.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response, StatusCode},
    middleware::Next,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Label used for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Labels shared by every series a single request contributes to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteLabels {
    method: String,
    route: String,
}

impl RouteLabels {
    fn new(request: &Request<Body>, matched_path: Option<&MatchedPath>) -> Self {
        Self {
            method: request.method().as_str().to_owned(),
            route: matched_path
                .map(|p| p.as_str().to_owned())
                .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned()),
        }
    }

    fn record(self, status: StatusCode, elapsed_secs: f64) {
        let code = status.as_u16().to_string();

        histogram!(
            "http_request_duration_seconds",
            "method" => self.method.clone(),
            "path" => self.route.clone()
        )
        .record(elapsed_secs);

        counter!(
            "http_requests_total",
            "method" => self.method.clone(),
            "path" => self.route.clone(),
            "status" => code.clone(),
            "status_class" => status_class(status)
        )
        .increment(1);

        if status.is_client_error() || status.is_server_error() {
            counter!(
                "http_requests_errors_total",
                "method" => self.method,
                "path" => self.route,
                "status" => code
            )
            .increment(1);
        }
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() / 100 {
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "other",
    }
}

/// Records request count, latency and error count for every response.
///
/// Routes are labelled by their matched template (`/api/product/v1/{sku}`),
/// never by the raw URI; anything that matched no route is labelled
/// [`UNMATCHED_ROUTE`].
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/", get(handler))
///     .layer(axum::middleware::from_fn(observability::middleware::metrics_middleware));
/// ```
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let labels = RouteLabels::new(&request, matched_path.as_ref());
    let started = Instant::now();

    let response = next.run(request).await;

    labels.record(response.status(), started.elapsed().as_secs_f64());
    response
}
