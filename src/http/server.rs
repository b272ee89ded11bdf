//! HTTP server setup and lifecycle.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;

use super::middleware::enforce_quota;
use crate::error::Result;
use crate::ratelimit::RateLimiterBackend;

/// HTTP server exposing the rate-limit check endpoint.
pub struct HttpServer {
    listen_addr: SocketAddr,
    limiter: Arc<dyn RateLimiterBackend>,
}

impl HttpServer {
    /// Create a new HTTP server with the given limiter backend.
    pub fn new(listen_addr: SocketAddr, limiter: Arc<dyn RateLimiterBackend>) -> Self {
        Self {
            listen_addr,
            limiter,
        }
    }

    /// Build the router.
    ///
    /// `/v1/check` consumes one unit of the caller's quota per hit and reports
    /// the verdict; `/healthz` is liveness only and is never rate limited.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/v1/check", get(check))
            .route_layer(middleware::from_fn_with_state(
                self.limiter.clone(),
                enforce_quota,
            ))
            .route("/healthz", get(healthz))
    }

    /// Bind and serve until the shutdown future resolves.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.listen_addr).await?;
        info!(listen_addr = %self.listen_addr, "HTTP server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

/// Reached only when the quota middleware admitted the request; the remaining
/// quota travels in the response headers it stamps.
async fn check() -> Json<serde_json::Value> {
    Json(json!({ "allowed": true }))
}

async fn healthz() -> &'static str {
    "ok"
}
