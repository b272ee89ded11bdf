//! Rate limiter trait for abstracting over backend implementations.

use axum::http::HeaderMap;

use super::limiter::{RequestRateLimiter, Verdict};

/// Trait for rate limiter backends.
///
/// The HTTP layer works against this trait rather than the concrete
/// `RequestRateLimiter`, leaving room for an implementation backed by a shared
/// external store if quota enforcement ever needs to span processes.
pub trait RateLimiterBackend: Send + Sync {
    /// Decide whether the request identified by `headers` is within quota.
    fn check(&self, headers: &HeaderMap) -> Verdict;
}

impl RateLimiterBackend for RequestRateLimiter {
    fn check(&self, headers: &HeaderMap) -> Verdict {
        RequestRateLimiter::check(self, headers)
    }
}
