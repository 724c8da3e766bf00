//! Request handlers: metrics scrape and landing page.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};

use crate::http::server::AppState;

/// Handler for GET on the telemetry path.
///
/// Lets the refresh strategy probe first (on-demand mode), then gathers the
/// registry and encodes it in the Prometheus text format.
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    state.strategy.prepare().await;

    let encoder = TextEncoder::new();
    let families = state.registry.gather();
    let mut buffer = Vec::new();

    match encoder.encode(&families, &mut buffer) {
        Ok(()) => (
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            buffer,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}

/// Handler for GET /.
pub async fn landing_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.landing.to_string())
}

/// Static landing page linking to the metrics path.
pub fn landing_page(title: &str, metrics_path: &str) -> String {
    format!(
        "<html>
<head><title>{title}</title></head>
<body>
<h1>{title}</h1>
<p><a href='{metrics_path}'>Metrics</a></p>
</body>
</html>
"
    )
}
