//! Geo decision and dispatch.
//!
//! # Responsibilities
//! - Hold the compiled routing and origin tables
//! - Resolve a request's viewer country to a region and origin
//! - Produce a forward, redirect or deny decision per policy
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Total: every request yields a decision, no error path
//! - Origin-table misses go to an explicit named fallback region whose
//!   origin is captured at construction, never to an arbitrary entry
//! - No I/O, no clocks, no logging in the decision path; callers observe
//!   the returned Resolution instead

use thiserror::Error;

use crate::config::schema::{GeoConfig, RoutingMode, UnmatchedPolicy};
use crate::config::validation::undeployed_references;
use crate::edge::request::IncomingRequest;
use crate::routing::country::{
    extract_viewer_country, ViewerCountry, UNKNOWN_COUNTRY, VIEWER_COUNTRY_HEADER,
};
use crate::routing::decision::{
    Resolution, Routed, RoutingDecision, ROUTED_REGION_HEADER, VIEWER_COUNTRY_ECHO_HEADER,
};
use crate::routing::path::request_target;
use crate::routing::table::{OriginDescriptor, OriginTable, RegionId, RoutingTable};

/// Deployment-time routing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutingPolicy {
    pub mode: RoutingMode,
    pub unmatched: UnmatchedPolicy,
}

/// Errors building a router.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("fallback region '{0}' has no origin")]
    MissingFallbackOrigin(String),
}

/// The immutable geo-routing configuration and decision function.
#[derive(Debug, Clone)]
pub struct GeoRouter {
    routes: RoutingTable,
    origins: OriginTable,
    default_region: RegionId,
    fallback_region: RegionId,
    fallback_origin: OriginDescriptor,
    policy: RoutingPolicy,
}

impl GeoRouter {
    /// Assemble a router from prebuilt tables.
    ///
    /// Fails only when the fallback region has no origin, since that is the
    /// one lookup every other miss relies on.
    pub fn new(
        routes: RoutingTable,
        origins: OriginTable,
        default_region: RegionId,
        fallback_region: RegionId,
        policy: RoutingPolicy,
    ) -> Result<Self, RouterError> {
        let fallback_origin = origins
            .get(fallback_region.as_str())
            .cloned()
            .ok_or_else(|| RouterError::MissingFallbackOrigin(fallback_region.to_string()))?;

        Ok(Self {
            routes,
            origins,
            default_region,
            fallback_region,
            fallback_origin,
            policy,
        })
    }

    /// Compile a validated configuration.
    pub fn from_config(config: &GeoConfig) -> Result<Self, RouterError> {
        for (setting, region) in undeployed_references(config) {
            tracing::warn!(
                setting = %setting,
                region = %region,
                fallback = %config.effective_fallback_region(),
                "Configured region has no origin; requests will use the fallback region"
            );
        }

        let router = Self::new(
            RoutingTable::from_config(config),
            OriginTable::from_config(config),
            RegionId::new(config.default_region.as_str()),
            RegionId::new(config.effective_fallback_region()),
            RoutingPolicy {
                mode: config.mode,
                unmatched: config.unmatched_policy,
            },
        )?;

        tracing::info!(
            countries = router.routes.len(),
            regions = router.origins.len(),
            default_region = %router.default_region,
            fallback_region = %router.fallback_region,
            mode = ?router.policy.mode,
            unmatched_policy = ?router.policy.unmatched,
            "Routing tables compiled"
        );

        Ok(router)
    }

    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    pub fn origins(&self) -> &OriginTable {
        &self.origins
    }

    pub fn default_region(&self) -> &RegionId {
        &self.default_region
    }

    pub fn fallback_region(&self) -> &RegionId {
        &self.fallback_region
    }

    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    /// Decide what to do with a request.
    pub fn decide(&self, request: IncomingRequest) -> RoutingDecision {
        self.route(request).decision
    }

    /// Decide what to do with a request, keeping the resolution for audit.
    pub fn route(&self, mut request: IncomingRequest) -> Routed {
        let country = extract_viewer_country(&request);
        let mapped = country
            .code()
            .and_then(|code| self.routes.lookup(code.as_str()))
            .cloned();
        let matched = mapped.is_some();

        // Only a well-formed code can be outside the allow-list; an absent
        // or malformed signal still takes the default region.
        if !matched
            && self.policy.unmatched == UnmatchedPolicy::Deny
            && matches!(country, ViewerCountry::Known(_))
        {
            return finish(
                Resolution {
                    country,
                    matched,
                    region: None,
                    served_by: None,
                },
                RoutingDecision::deny(),
            );
        }

        let region = mapped.unwrap_or_else(|| self.default_region.clone());
        let (served_by, origin) = match self.origins.get(region.as_str()) {
            Some(origin) => (region.clone(), origin),
            None => (self.fallback_region.clone(), &self.fallback_origin),
        };

        let decision = match self.policy.mode {
            RoutingMode::Redirect => {
                RoutingDecision::redirect(format!("{}{}", origin.base_url(), request_target(&request)))
            }
            RoutingMode::Forward => {
                // The echo carries the header as sent, even when malformed.
                let echoed = request
                    .header(VIEWER_COUNTRY_HEADER)
                    .filter(|value| !value.is_empty())
                    .unwrap_or(UNKNOWN_COUNTRY)
                    .to_string();
                request.set_custom_origin(origin);
                request.set_header(ROUTED_REGION_HEADER, served_by.as_str());
                request.set_header(VIEWER_COUNTRY_ECHO_HEADER, echoed);
                RoutingDecision::Forward {
                    origin: origin.clone(),
                    request,
                }
            }
        };

        finish(
            Resolution {
                country,
                matched,
                region: Some(region),
                served_by: Some(served_by),
            },
            decision,
        )
    }
}

fn finish(resolution: Resolution, decision: RoutingDecision) -> Routed {
    Routed {
        resolution,
        outcome: decision.outcome(),
        decision,
    }
}
