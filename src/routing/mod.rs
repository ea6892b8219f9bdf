//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! IncomingRequest (uri, querystring, headers)
//!     → country.rs (viewer country: known code or unknown)
//!     → table.rs (country → region, region → origin)
//!     → router.rs (policy: forward / redirect / deny)
//!     → path.rs (path + query for redirect targets)
//!     → Return: RoutingDecision plus its Resolution
//!
//! Table Compilation (at startup):
//!     GeoConfig
//!     → Region country lists, then overrides
//!     → Freeze as immutable GeoRouter
//! ```
//!
//! # Design Decisions
//! - Tables compiled at startup, immutable at runtime
//! - Exact, case-sensitive country lookup
//! - Deterministic: same input always yields the same decision
//! - Explicit fallback region rather than map-order defaults

pub mod country;
pub mod decision;
pub mod path;
pub mod router;
pub mod table;

pub use country::{extract_viewer_country, ViewerCountry, VIEWER_COUNTRY_HEADER};
pub use decision::{Outcome, Resolution, Routed, RoutingDecision};
pub use path::reconstruct_path;
pub use router::{GeoRouter, RouterError, RoutingPolicy};
pub use table::{CountryCode, OriginDescriptor, OriginTable, RegionId, RoutingTable};
