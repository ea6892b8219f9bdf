//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Run edge invocations (`POST /_edge/invoke`)
//! - Run live requests through the geo decision and act on it
//! - Observability (decision audit, latency metrics)

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{GeoConfig, ServerConfig};
use crate::edge;
use crate::http::relay;
use crate::http::request::{request_id, to_incoming, EdgeRequestId};
use crate::lifecycle::wait_for_shutdown;
use crate::observability::{self, metrics};
use crate::routing::{GeoRouter, OriginDescriptor, RouterError, RoutingDecision};
use crate::edge::IncomingRequest;

/// Path of the edge invocation endpoint.
pub const INVOKE_PATH: &str = "/_edge/invoke";

/// Path of the liveness endpoint.
pub const HEALTH_PATH: &str = "/_edge/healthz";

/// Errors building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Router(#[from] RouterError),

    #[error("failed to build origin client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<GeoRouter>,
    pub client: reqwest::Client,
    pub max_body_bytes: usize,
}

/// Local edge host running the geo decision per request.
pub struct HttpServer {
    app: Router,
    config: GeoConfig,
}

impl HttpServer {
    /// Compile the routing tables and build the server.
    pub fn new(config: GeoConfig) -> Result<Self, ServerError> {
        let router = Arc::new(GeoRouter::from_config(&config)?);
        Self::with_router(config, router)
    }

    /// Build the server around already compiled routing tables.
    pub fn with_router(config: GeoConfig, router: Arc<GeoRouter>) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.server.request_timeout_secs))
            .build()?;

        let state = AppState {
            router,
            client,
            max_body_bytes: config.server.max_body_bytes,
        };

        let app = Self::build_router(&config.server, state);
        Ok(Self { app, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The body limit wraps the timeout (`Timeout` needs a `Default`
    /// response body). Elapsed requests answer 504.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route(INVOKE_PATH, post(invoke_handler))
            .route(HEALTH_PATH, get(health_handler))
            .fallback(edge_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(EdgeRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::GATEWAY_TIMEOUT,
                        Duration::from_secs(config.request_timeout_secs),
                    )),
            )
    }

    /// The assembled router, for embedding or in-process tests.
    pub fn into_router(self) -> Router {
        self.app
    }

    /// Run the server until Ctrl+C or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.mode,
            unmatched_policy = ?self.config.unmatched_policy,
            "Edge host starting"
        );

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("Edge host stopped");
        Ok(())
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Edge invocation: event JSON in, edge result JSON out.
async fn invoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    match edge::handle_event_json(&state.router, &body) {
        Ok(routed) => {
            observability::audit(&request_id, routed.outcome, &routed.resolution);
            metrics::record_request(routed.outcome, StatusCode::OK.as_u16(), start);
            Json(routed.decision).into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected edge invocation");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Live request: decide, then redirect, deny or relay to the origin.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(request.headers());
    let (parts, body) = request.into_parts();
    let client_ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let routed = state.router.route(to_incoming(&parts, client_ip));
    observability::audit(&request_id, routed.outcome, &routed.resolution);

    let response = match routed.decision {
        RoutingDecision::Redirect { location, status } => {
            (status, [(header::LOCATION, location)]).into_response()
        }
        RoutingDecision::Deny { status, body } => {
            (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
        }
        RoutingDecision::Forward { origin, request } => {
            forward(&state, parts.method, &origin, &request, body, &request_id).await
        }
    };

    metrics::record_request(routed.outcome, response.status().as_u16(), start);
    response
}

async fn forward(
    state: &AppState,
    method: axum::http::Method,
    origin: &OriginDescriptor,
    request: &IncomingRequest,
    body: Body,
    request_id: &str,
) -> Response {
    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    match relay::relay(&state.client, method, origin, request, bytes).await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            tracing::error!(request_id = %request_id, origin = %origin.authority(), "Origin timed out");
            (StatusCode::GATEWAY_TIMEOUT, "Origin timed out").into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                origin = %origin.authority(),
                error = %e,
                "Origin request failed"
            );
            (StatusCode::BAD_GATEWAY, "Origin request failed").into_response()
        }
    }
}
