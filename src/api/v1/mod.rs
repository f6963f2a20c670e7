//! v1 API endpoints

pub mod codegen;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/codegen/generate", post(codegen::generate_code))
        .route("/codegen/layers", get(codegen::list_layer_kinds))
}
