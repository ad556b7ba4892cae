use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
    body::Body,
};
use tracing::warn;

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_config::AppConfig;

use crate::jwt::validate_token;

/// Pulls the raw token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: Option<&str>) -> Result<&str, AppError> {
    let auth_value = header_value
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    auth_value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

// Middleware for authentication
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = match request.headers().get("Authorization") {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?,
        ),
        None => None,
    };

    let token = bearer_token(header_value)?;

    let user = validate_token(token, &config.jwt_secret, &config.jwt_issuer)
        .map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            AppError::Auth(e.to_string())
        })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

// Function to extract user from request extensions
pub fn extract_user<B>(request: &Request<B>) -> Result<User, AppError> {
    request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))
}
