//! HTTP surface: enforcement middleware and the check service.

mod middleware;
mod server;

pub use middleware::enforce_quota;
pub use server::HttpServer;
