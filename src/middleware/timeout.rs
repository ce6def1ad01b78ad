use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Fails a request that runs longer than the configured timeout with the
/// usual `{"error": ...}` body and status 408
pub async fn timeout_middleware(
    State(timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri().clone();
    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(uri = %uri, timeout_ms = timeout.as_millis() as u64, "Request timed out");
            AppError::Timeout.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use axum_test::TestServer;
    use serde_json::json;

    fn server(timeout: Duration) -> TestServer {
        let app = Router::new()
            .route("/fast", get(|| async { "done" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .layer(middleware::from_fn_with_state(timeout, timeout_middleware));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_fast_request_passes_through() {
        let response = server(Duration::from_secs(1)).get("/fast").await;
        response.assert_status_ok();
        response.assert_text("done");
    }

    #[tokio::test]
    async fn test_slow_request_gets_json_timeout_error() {
        let response = server(Duration::from_millis(20)).get("/slow").await;
        response.assert_status(axum::http::StatusCode::REQUEST_TIMEOUT);
        response.assert_json(&json!({ "error": "Request timed out" }));
    }
}
