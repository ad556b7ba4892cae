use std::sync::Arc;

use axum::{
    Router,
    routing::post,
};

use shared_database::AppState;

use crate::handlers;

pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/auth/validate", post(handlers::validate_token))
        .route("/auth/verify", post(handlers::verify_token))
        .with_state(state)
}
