//! scorecap-cv library - scoring service
//!
//! Turns screenshot bytes into scenario/score pairs for the gateway.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use scorecap_common::TypeSniffer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod scoring;

/// Largest accepted image body
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone, Default)]
pub struct AppState {
    /// Content gate applied to every received image
    pub sniffer: TypeSniffer,
}

impl AppState {
    pub fn new(sniffer: TypeSniffer) -> Self {
        Self { sniffer }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;
    use scorecap_common::wire::PROCESS_PATH;

    Router::new()
        .route(PROCESS_PATH, post(api::process_image))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
