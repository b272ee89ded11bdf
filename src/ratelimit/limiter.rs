//! Core rate limiter implementation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use parking_lot::RwLock;
use rand::Rng;
use tracing::{debug, trace};

use super::client::client_key;
use super::window::WindowEntry;

/// Default window length: 15 minutes.
pub const DEFAULT_WINDOW_MS: u64 = 900_000;
/// Default number of requests admitted per client per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;
/// Default text carried by a deny verdict.
pub const DEFAULT_MESSAGE: &str = "Too many requests, please try again later.";

/// Chance per check that expired entries are swept from the store. Bounds
/// memory growth without a background task.
const SWEEP_PROBABILITY: f64 = 0.1;

/// Configuration for a limiter instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimiterConfig {
    /// Length of the quota window.
    pub window: Duration,
    /// Maximum requests admitted per client within one window.
    pub max_requests: u32,
    /// Text returned to denied clients.
    pub message: String,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(DEFAULT_WINDOW_MS),
            max_requests: DEFAULT_MAX_REQUESTS,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// Outcome of a rate limit check.
///
/// A check never fails: denial is a value, not an error, and the caller
/// decides how to surface it (the HTTP layer turns it into a 429).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The request is within quota.
    Admitted {
        /// Requests left in the current window after this one.
        remaining: u32,
        /// When the current window ends.
        reset_time: Instant,
    },
    /// The request exceeds the client's quota for the current window.
    Denied {
        /// Configured denial text.
        message: String,
        /// When the current window ends and the quota resets.
        reset_time: Instant,
    },
}

impl Verdict {
    /// Whether the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admitted { .. })
    }

    /// When the window this verdict was issued under ends.
    pub fn reset_time(&self) -> Instant {
        match self {
            Verdict::Admitted { reset_time, .. } | Verdict::Denied { reset_time, .. } => {
                *reset_time
            }
        }
    }
}

/// Fixed-window per-client request rate limiter.
///
/// Each instance owns its store, so independent limiters (and tests) never
/// interfere with one another. Thread-safe: the whole read-modify-write of a
/// check happens under one write guard.
pub struct RequestRateLimiter {
    config: LimiterConfig,
    /// Active windows indexed by client key.
    entries: RwLock<HashMap<String, WindowEntry>>,
}

impl RequestRateLimiter {
    /// Create a limiter with the given configuration.
    pub fn new(config: LimiterConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// General-traffic tier: 100 requests per 15 minutes.
    pub fn lenient() -> Self {
        Self::new(LimiterConfig::default())
    }

    /// Sensitive-endpoint tier: 10 requests per 15 minutes.
    pub fn strict() -> Self {
        Self::new(LimiterConfig {
            max_requests: 10,
            message: "Too many requests to this endpoint, please slow down.".to_string(),
            ..LimiterConfig::default()
        })
    }

    /// Authentication tier: 5 attempts per 15 minutes.
    pub fn auth() -> Self {
        Self::new(LimiterConfig {
            max_requests: 5,
            message: "Too many authentication attempts, please try again later.".to_string(),
            ..LimiterConfig::default()
        })
    }

    /// This limiter's configuration.
    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Check the quota for the client identified by the request headers.
    pub fn check(&self, headers: &HeaderMap) -> Verdict {
        self.check_key(&client_key(headers))
    }

    /// Check the quota for a pre-resolved client key.
    ///
    /// Consumes one unit of quota when admitted. Expired entries are replaced,
    /// not merged, so a client always holds at most one active window.
    pub fn check_key(&self, key: &str) -> Verdict {
        let now = Instant::now();
        let mut entries = self.entries.write();

        if rand::thread_rng().gen::<f64>() < SWEEP_PROBABILITY {
            entries.retain(|_, entry| !entry.is_expired(now));
        }

        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                let count = entry.record_hit();
                let reset_time = entry.reset_time();

                if count > self.config.max_requests {
                    debug!(client = key, count, "quota exceeded");
                    Verdict::Denied {
                        message: self.config.message.clone(),
                        reset_time,
                    }
                } else {
                    trace!(client = key, count, "request admitted");
                    Verdict::Admitted {
                        remaining: self.config.max_requests.saturating_sub(count),
                        reset_time,
                    }
                }
            }
            _ => {
                trace!(client = key, "opening new window");
                let entry = WindowEntry::open(self.config.window, now);
                let reset_time = entry.reset_time();
                entries.insert(key.to_string(), entry);

                Verdict::Admitted {
                    remaining: self.config.max_requests.saturating_sub(1),
                    reset_time,
                }
            }
        }
    }

    /// Drop every expired entry from the store and return how many were
    /// removed. `check` does this opportunistically; this forces it.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of client keys currently tracked, expired entries included.
    pub fn tracked_clients(&self) -> usize {
        self.entries.read().len()
    }

    /// Clear all tracked windows.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for RequestRateLimiter {
    fn default() -> Self {
        Self::lenient()
    }
}
