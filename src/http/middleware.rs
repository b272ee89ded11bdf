//! Quota enforcement middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::debug;

use crate::ratelimit::{RateLimiterBackend, Verdict};

/// Axum middleware that checks the caller's quota before the handler runs.
///
/// Admitted requests pass through with an `x-ratelimit-remaining` header on
/// the response. Denied requests short-circuit with `429 Too Many Requests`,
/// a JSON error body carrying the limiter's configured message, and a
/// `retry-after` header in seconds.
pub async fn enforce_quota(
    State(limiter): State<Arc<dyn RateLimiterBackend>>,
    request: Request,
    next: Next,
) -> Response {
    match limiter.check(request.headers()) {
        Verdict::Admitted { remaining, .. } => {
            let mut response = next.run(request).await;
            if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
                response.headers_mut().insert("x-ratelimit-remaining", value);
            }
            response
        }
        Verdict::Denied {
            message,
            reset_time,
        } => {
            debug!("denying request over quota");
            deny_response(&message, reset_time)
        }
    }
}

fn deny_response(message: &str, reset_time: Instant) -> Response {
    let retry_after = reset_time
        .saturating_duration_since(Instant::now())
        .as_secs()
        .max(1);

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": message })),
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert("retry-after", value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deny_response_shape() {
        let response = deny_response("slow down", Instant::now() + Duration::from_secs(30));

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap();
        assert!((1..=30).contains(&retry_after));
    }

    #[test]
    fn test_deny_response_retry_after_floor() {
        // An already-elapsed reset still advertises at least one second.
        let response = deny_response("slow down", Instant::now());
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert_eq!(retry_after, "1");
    }
}
