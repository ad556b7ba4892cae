use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    middleware,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn physician_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_physicians).post(handlers::create_physician))
        .route(
            "/{physician_id}",
            get(handlers::get_physician)
                .put(handlers::update_physician)
                .delete(handlers::delete_physician),
        )
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
