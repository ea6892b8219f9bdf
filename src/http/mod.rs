//! Local edge host.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → POST /_edge/invoke: event JSON → edge::handle_event → result JSON
//!     → any other request:
//!         request.rs (request ID, convert to IncomingRequest)
//!         → routing::GeoRouter::route
//!         → 302 / 403 answered here, or relay.rs to the regional origin
//! ```

pub mod relay;
pub mod request;
pub mod server;

pub use request::{EdgeRequestId, X_REQUEST_ID};
pub use server::{HttpServer, ServerError, HEALTH_PATH, INVOKE_PATH};
