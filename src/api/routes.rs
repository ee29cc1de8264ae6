use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::scratch::Janitor;
use crate::tts::TtsService;

pub struct AppState {
    pub tts: TtsService,
    pub janitor: Janitor,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // The front-end is a static site hosted elsewhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(handlers::home))
        .route("/gerar-audio", post(handlers::generate_audio))
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::health))
        .route("/cleanup", get(handlers::cleanup))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
