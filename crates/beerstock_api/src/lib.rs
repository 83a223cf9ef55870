//! HTTP transport for the beer stock core.
//!
//! - `config.rs`: environment-driven server settings
//! - `dto.rs`: wire payloads
//! - `errors.rs`: failure to response mapping
//! - `routes.rs`: handlers
//! - `state.rs`: shared connection and blocking bridge

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::info;
use std::time::Instant;

pub mod config;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Base path of the beer resource.
pub const BEERS_BASE_PATH: &str = "/api/v1/beers";

/// Builds the full HTTP router over the given state.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .merge(routes::router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=api method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
