//! HTTP gateway (Axum) for phrase matching.
//!
//! Routes:
//! - `POST /process` form-encoded match request
//! - `GET /healthz` liveness
//! - `GET /ready` embedder and cache status

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::process_handler;
pub use state::HandlerState;

use crate::constants::{SEMFIND_STATUS_HEADER, SEMFIND_STATUS_HEALTHY, SEMFIND_STATUS_READY};
use crate::embedding::Embedder;

pub fn create_router_with_state<E>(state: HandlerState<E>, max_body_bytes: usize) -> Router
where
    E: Embedder + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E>))
        .route("/process", post(process_handler::<E>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    /// `loaded` or `lazy` (loads on first request).
    pub embedding: &'static str,
    /// `stub`, `real`, or `unknown` before the first load.
    pub embedder_mode: &'static str,
    pub cache_entries: u64,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SEMFIND_STATUS_HEADER,
        HeaderValue::from_static(SEMFIND_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Always 200: a lazy embedder is ready to load on demand.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<E>(State(state): State<HandlerState<E>>) -> Response
where
    E: Embedder + 'static,
{
    let embedder = state.service.engine().embedder();
    let loaded = embedder.is_loaded();

    let embedder_mode = match (loaded, embedder.is_stub()) {
        (false, _) => "unknown",
        (true, true) => "stub",
        (true, false) => "real",
    };

    let components = ComponentStatus {
        http: SEMFIND_STATUS_READY,
        embedding: if loaded { "loaded" } else { "lazy" },
        embedder_mode,
        cache_entries: state.service.cache().len(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        SEMFIND_STATUS_HEADER,
        HeaderValue::from_static(SEMFIND_STATUS_READY),
    );

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
