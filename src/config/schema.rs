//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files. The
//! JSON spellings emitted by deployment templates (`defaultRegion`,
//! `unmatchedPolicy`, ...) are accepted as aliases.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration for the geo-router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GeoConfig {
    /// Deployed regions keyed by region identifier.
    pub regions: BTreeMap<String, RegionConfig>,

    /// Region used when the viewer country is absent or unmapped.
    #[serde(alias = "defaultRegion")]
    pub default_region: String,

    /// Region whose origin serves requests resolved to an undeployed region.
    /// Falls back to `default_region` when unset.
    #[serde(alias = "fallbackRegion")]
    pub fallback_region: Option<String>,

    /// Whether decisions rewrite the origin or redirect the viewer.
    pub mode: RoutingMode,

    /// What happens to a country that no region claims.
    #[serde(alias = "unmatchedPolicy")]
    pub unmatched_policy: UnmatchedPolicy,

    /// Explicit country → region entries, applied after the region lists.
    #[serde(alias = "countryOverrides")]
    pub country_overrides: BTreeMap<String, String>,

    /// Local edge host settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GeoConfig {
    /// The region named as the explicit origin fallback.
    pub fn effective_fallback_region(&self) -> &str {
        self.fallback_region
            .as_deref()
            .unwrap_or(&self.default_region)
    }
}

/// A deployed regional origin and the countries it serves.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegionConfig {
    /// Origin hostname (e.g., "alb-ireland.example.com").
    pub address: String,

    /// ISO 3166-1 alpha-2 codes routed to this region.
    #[serde(default)]
    pub countries: Vec<String>,

    /// Origin scheme (default: https).
    #[serde(default)]
    pub scheme: OriginScheme,

    /// Origin port; defaults to the scheme's well-known port.
    #[serde(default)]
    pub port: Option<u16>,

    /// Path prepended to every request sent to this origin.
    #[serde(default, alias = "pathPrefix")]
    pub path_prefix: String,
}

impl RegionConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            countries: Vec::new(),
            scheme: OriginScheme::default(),
            port: None,
            path_prefix: String::new(),
        }
    }

    pub fn with_countries(mut self, countries: &[&str]) -> Self {
        self.countries = countries.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }
}

/// Protocol used to reach an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OriginScheme {
    Http,
    #[default]
    Https,
}

impl OriginScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginScheme::Http => "http",
            OriginScheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            OriginScheme::Http => 80,
            OriginScheme::Https => 443,
        }
    }
}

impl fmt::Display for OriginScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a resolved region is handed back to the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Rewrite the request's origin and let the CDN fetch from it.
    Forward,
    /// Answer with a 302 pointing at the regional host.
    #[default]
    Redirect,
}

/// Treatment of a well-formed country code missing from the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedPolicy {
    /// Route it to the default region.
    #[default]
    DefaultRegion,
    /// Answer 403; the routing table doubles as an allow-list.
    Deny,
}

/// Local edge host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total time allowed per request, including the origin relay.
    pub request_timeout_secs: u64,

    /// Largest request body accepted for relay or invocation.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 5,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: GeoConfig = toml::from_str(
            r#"
            default_region = "singapore"

            [regions.singapore]
            address = "alb-singapore.example.com"
            countries = ["SG"]
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, RoutingMode::Redirect);
        assert_eq!(config.unmatched_policy, UnmatchedPolicy::DefaultRegion);
        assert_eq!(config.effective_fallback_region(), "singapore");

        let region = &config.regions["singapore"];
        assert_eq!(region.scheme, OriginScheme::Https);
        assert_eq!(region.effective_port(), 443);
        assert!(region.path_prefix.is_empty());
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_json_aliases() {
        let config: GeoConfig = serde_json::from_str(
            r#"{
                "defaultRegion": "ireland",
                "fallbackRegion": "singapore",
                "mode": "forward",
                "unmatchedPolicy": "deny",
                "regions": {
                    "ireland": { "address": "alb-ie.example.com", "countries": ["IE"], "scheme": "http" },
                    "singapore": { "address": "alb-sg.example.com", "pathPrefix": "/wp" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_region, "ireland");
        assert_eq!(config.effective_fallback_region(), "singapore");
        assert_eq!(config.mode, RoutingMode::Forward);
        assert_eq!(config.unmatched_policy, UnmatchedPolicy::Deny);
        assert_eq!(config.regions["ireland"].effective_port(), 80);
        assert_eq!(config.regions["singapore"].path_prefix, "/wp");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result: Result<GeoConfig, _> = toml::from_str(r#"unmatched_policy = "block""#);
        assert!(result.is_err());
    }
}
