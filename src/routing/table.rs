//! Routing and origin tables.
//!
//! # Responsibilities
//! - Map viewer country codes to region identifiers (RoutingTable)
//! - Map region identifiers to origin descriptors (OriginTable)
//!
//! # Design Decisions
//! - Built once from configuration, never mutated afterwards
//! - Country lookup is exact and case-sensitive; no prefix or fuzzy match
//! - Region lists are applied in region-id order, then overrides, so the
//!   resulting table never depends on hash iteration order

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use crate::config::schema::{GeoConfig, OriginScheme, RegionConfig};
use crate::config::validation::is_country_code;

/// Opaque key naming a deployed origin cluster (e.g. "ireland").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A two-letter country code, case preserved as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    /// Accepts exactly two ASCII letters; anything else is malformed.
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() == 2 && value.bytes().all(|b| b.is_ascii_alphabetic()) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CountryCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a region's traffic is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginDescriptor {
    pub host: String,
    pub port: u16,
    pub scheme: OriginScheme,
    pub path_prefix: String,
}

impl OriginDescriptor {
    pub fn from_region(region: &RegionConfig) -> Self {
        Self {
            host: region.address.clone(),
            port: region.effective_port(),
            scheme: region.scheme,
            path_prefix: region.path_prefix.clone(),
        }
    }

    /// `host`, or `host:port` when the port is not the scheme's default.
    pub fn authority(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// `scheme://authority` followed by the path prefix.
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.authority(), self.path_prefix)
    }
}

/// Immutable country → region mapping.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    entries: HashMap<CountryCode, RegionId>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile the region country lists and overrides of a configuration.
    pub fn from_config(config: &GeoConfig) -> Self {
        let mut table = Self::new();
        for (id, region) in &config.regions {
            for code in region.countries.iter().filter(|c| is_country_code(c)) {
                table
                    .entries
                    .entry(CountryCode(code.clone()))
                    .or_insert_with(|| RegionId::new(id.as_str()));
            }
        }
        for (code, region) in config.country_overrides.iter().filter(|(c, _)| is_country_code(c)) {
            table.insert(CountryCode(code.clone()), RegionId::new(region.as_str()));
        }
        table
    }

    /// Add or replace a mapping, returning the previous region.
    pub fn insert(&mut self, country: CountryCode, region: RegionId) -> Option<RegionId> {
        self.entries.insert(country, region)
    }

    pub fn lookup(&self, country: &str) -> Option<&RegionId> {
        self.entries.get(country)
    }

    pub fn contains(&self, country: &str) -> bool {
        self.entries.contains_key(country)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, &RegionId)> {
        self.entries.iter()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RoutingTable {
    /// Pairs whose country is not a valid code are skipped.
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (country, region) in iter {
            if let Some(code) = CountryCode::parse(country) {
                table.insert(code, RegionId::new(region));
            }
        }
        table
    }
}

/// Immutable region → origin mapping.
#[derive(Debug, Clone, Default)]
pub struct OriginTable {
    origins: HashMap<RegionId, OriginDescriptor>,
}

impl OriginTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GeoConfig) -> Self {
        let mut table = Self::new();
        for (id, region) in &config.regions {
            table.insert(RegionId::new(id.as_str()), OriginDescriptor::from_region(region));
        }
        table
    }

    pub fn insert(&mut self, region: RegionId, origin: OriginDescriptor) -> Option<OriginDescriptor> {
        self.origins.insert(region, origin)
    }

    pub fn get(&self, region: &str) -> Option<&OriginDescriptor> {
        self.origins.get(region)
    }

    pub fn contains(&self, region: &str) -> bool {
        self.origins.contains_key(region)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &OriginDescriptor)> {
        self.origins.iter()
    }
}
