use std::sync::Arc;

use axum::{
    extract::{State, Json},
    http::HeaderMap,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::{LoginRequest, TokenResponse, TokenValidationResponse};
use shared_models::error::AppError;
use shared_utils::extractor::bearer_token;
use shared_utils::jwt;

use crate::models::AuthError;
use crate::services::CredentialService;

fn header_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = match headers.get("Authorization") {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?,
        ),
        None => None,
    };
    bearer_token(value)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let service = CredentialService::new(&state);
    Ok(Json(service.login(request).await?))
}

pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenValidationResponse>, AppError> {
    debug!("Validating token");

    let token = header_token(&headers)?;
    let user = jwt::validate_token(token, &state.config.jwt_secret, &state.config.jwt_issuer)
        .map_err(AuthError::from)?;

    Ok(Json(TokenValidationResponse {
        valid: true,
        login: user.login,
        expires_at: user.expires_at,
    }))
}

pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    debug!("Verifying token");

    let token = header_token(&headers)?;
    let valid = jwt::validate_token(token, &state.config.jwt_secret, &state.config.jwt_issuer).is_ok();

    Ok(Json(json!({ "valid": valid })))
}
