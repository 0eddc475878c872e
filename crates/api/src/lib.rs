pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Manual submission routes
    let manual_routes = Router::new()
        .route("/transcribe", post(routes::manual::transcribe))
        .route("/status/{job_id}", get(routes::manual::status))
        .route("/batch", post(routes::manual::batch));

    Router::new()
        .route("/webhook", post(routes::webhook::receive))
        .route("/transcript/quality/{job_id}", get(routes::quality::check))
        .nest("/manual", manual_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
