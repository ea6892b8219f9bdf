//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile GeoRouter → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Shutdown::trigger or Ctrl+C (signals.rs) → Stop accepting → Drain → Exit
//! ```
//!
//! # Design Decisions
//! - Routing tables are built before the listener binds, so no request ever
//!   sees a partially loaded configuration
//! - In-flight requests finish on shutdown; decisions themselves never block

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_shutdown;
