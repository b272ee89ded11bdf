//! Tollgate - Per-Client Request Rate Limiting
//!
//! This crate implements fixed-window request rate limiting keyed by client
//! origin. The core limiter tracks one counting window per client and answers
//! admit/deny as a plain value; an axum middleware and a small check service
//! translate deny verdicts into HTTP 429 responses.

pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
