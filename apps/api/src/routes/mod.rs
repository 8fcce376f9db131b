pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::enhance::handlers::{handle_enhance, handle_method_not_allowed};
use crate::enhance::protocol::ENHANCE_PATH;
use crate::export::handlers::handle_export;
use crate::preview::handlers::handle_preview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            ENHANCE_PATH,
            post(handle_enhance).fallback(handle_method_not_allowed),
        )
        .route("/api/preview", post(handle_preview))
        .route("/api/export", post(handle_export))
        .with_state(state)
}
