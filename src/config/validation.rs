//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (the fallback region is deployed)
//! - Validate origin descriptors (hostnames, ports, path prefixes)
//! - Detect countries claimed by more than one region
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GeoConfig → Result<(), Vec<ValidationError>>
//! - A default region or override naming an undeployed region is allowed;
//!   those resolve through the fallback region at request time and are
//!   reported by [`undeployed_references`] instead

use std::collections::HashMap;

use thiserror::Error;
use url::Url;

use crate::config::schema::{GeoConfig, RegionConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no regions configured")]
    NoRegions,

    #[error("region identifiers must not be empty")]
    EmptyRegionId,

    #[error("default_region must not be empty")]
    EmptyDefaultRegion,

    #[error("region '{region}': invalid origin address '{address}'")]
    InvalidAddress { region: String, address: String },

    #[error("region '{0}': port must be non-zero")]
    InvalidPort(String),

    #[error("region '{region}': path_prefix '{prefix}' must be empty or start with '/' and not end with '/'")]
    InvalidPathPrefix { region: String, prefix: String },

    #[error("'{context}': country code '{code}' is not two uppercase ASCII letters")]
    InvalidCountryCode { context: String, code: String },

    #[error("country '{country}' is listed by both '{first}' and '{second}'")]
    DuplicateCountry {
        country: String,
        first: String,
        second: String,
    },

    #[error("fallback region '{0}' is not a deployed region")]
    UnknownFallbackRegion(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GeoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.regions.is_empty() {
        errors.push(ValidationError::NoRegions);
    }

    if config.default_region.trim().is_empty() {
        errors.push(ValidationError::EmptyDefaultRegion);
    }

    let mut claimed: HashMap<&str, &str> = HashMap::new();
    for (id, region) in &config.regions {
        if id.trim().is_empty() {
            errors.push(ValidationError::EmptyRegionId);
        }
        validate_region(id, region, &mut errors);

        for code in &region.countries {
            if !is_country_code(code) {
                errors.push(ValidationError::InvalidCountryCode {
                    context: id.clone(),
                    code: code.clone(),
                });
                continue;
            }
            if let Some(first) = claimed.insert(code.as_str(), id.as_str()) {
                if first != id {
                    errors.push(ValidationError::DuplicateCountry {
                        country: code.clone(),
                        first: first.to_string(),
                        second: id.clone(),
                    });
                }
            }
        }
    }

    for code in config.country_overrides.keys() {
        if !is_country_code(code) {
            errors.push(ValidationError::InvalidCountryCode {
                context: "country_overrides".to_string(),
                code: code.clone(),
            });
        }
    }

    let fallback = config.effective_fallback_region();
    if !fallback.trim().is_empty() && !config.regions.contains_key(fallback) {
        errors.push(ValidationError::UnknownFallbackRegion(fallback.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Region identifiers referenced by the default region or by overrides that
/// have no deployed origin, paired with the referencing setting.
pub fn undeployed_references(config: &GeoConfig) -> Vec<(String, String)> {
    let mut refs = Vec::new();
    if !config.default_region.is_empty() && !config.regions.contains_key(&config.default_region) {
        refs.push(("default_region".to_string(), config.default_region.clone()));
    }
    for (country, region) in &config.country_overrides {
        if !config.regions.contains_key(region) {
            refs.push((format!("country_overrides.{}", country), region.clone()));
        }
    }
    refs
}

/// Two uppercase ASCII letters, the only form the routing table can match.
pub fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}

fn validate_region(id: &str, region: &RegionConfig, errors: &mut Vec<ValidationError>) {
    if !is_valid_host(region) {
        errors.push(ValidationError::InvalidAddress {
            region: id.to_string(),
            address: region.address.clone(),
        });
    }

    if region.port == Some(0) {
        errors.push(ValidationError::InvalidPort(id.to_string()));
    }

    let prefix = &region.path_prefix;
    if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
        errors.push(ValidationError::InvalidPathPrefix {
            region: id.to_string(),
            prefix: prefix.clone(),
        });
    }
}

// The address must parse as a bare host: no port, path, query or userinfo.
fn is_valid_host(region: &RegionConfig) -> bool {
    let address = region.address.trim();
    if address.is_empty() || address != region.address {
        return false;
    }
    match Url::parse(&format!("{}://{}", region.scheme, address)) {
        Ok(url) => url
            .host_str()
            .map(|host| host.eq_ignore_ascii_case(address))
            .unwrap_or(false),
        Err(_) => false,
    }
}
