mod error;
mod links;
pub mod validation;

pub use error::ApiError;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // JSON surface for the bot
    let api_routes = Router::new().route("/generate-link", post(links::generate_link));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .merge(crate::ui::create_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
