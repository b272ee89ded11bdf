//! Rate limiting logic and state management.

mod backend;
mod client;
mod limiter;
mod window;

pub use backend::RateLimiterBackend;
pub use client::{client_key, UNKNOWN_CLIENT};
pub use limiter::{
    LimiterConfig, RequestRateLimiter, Verdict, DEFAULT_MAX_REQUESTS, DEFAULT_MESSAGE,
    DEFAULT_WINDOW_MS,
};
pub use window::WindowEntry;
