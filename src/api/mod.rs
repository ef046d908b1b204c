//! HTTP API module
//! 
//! The bridge the browser page uses to read the countdown, trigger the
//! celebration and receive fired cues.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/countdown", get(countdown_handler))
        .route("/celebration/start", post(start_handler))
        .route("/celebration/test", post(test_handler))
        .route("/celebration/skip", post(skip_handler))
        .route("/celebration/reset", post(reset_handler))
        .route("/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
