//! HTTP surface: two generation endpoints, a health probe and static
//! serving of the generated audio.

pub mod error;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use pipeline::{Pipeline, Settings};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

/// Routes the service exposes. `output_dir` is served under `static_prefix`.
pub fn build_router(state: AppState, output_dir: &Path, static_prefix: &str, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/generate-music/", post(routes::generate_music))
        .route("/generate-music", post(routes::generate_music))
        .route("/generate-music-from-image/", post(routes::generate_music_from_image))
        .route("/generate-music-from-image", post(routes::generate_music_from_image))
        .nest_service(static_prefix, ServeDir::new(output_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn router_from_settings(state: AppState, settings: &Settings) -> Router {
    build_router(state, &settings.output_dir, &settings.static_prefix, settings.max_upload_bytes)
}
