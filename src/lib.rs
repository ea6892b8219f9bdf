//! Request-time geo-router for CDN edge triggers.
//!
//! Reads the CDN-resolved viewer country and decides, per request, whether to
//! forward to a regional origin, redirect to a regional host, or deny.

pub mod config;
pub mod edge;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::GeoConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{GeoRouter, RoutingDecision};
