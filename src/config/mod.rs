//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, or JSON from deployment templates)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GeoConfig (validated, immutable)
//!     → compiled once into routing::GeoRouter, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields except the regions have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GeoConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::OriginScheme;
pub use schema::RegionConfig;
pub use schema::RoutingMode;
pub use schema::ServerConfig;
pub use schema::UnmatchedPolicy;
