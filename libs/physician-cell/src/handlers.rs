use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::pagination::{Page, PageRequest};
use shared_models::physician::Physician;

use crate::models::{CreatePhysicianRequest, PhysicianListItem, UpdatePhysicianRequest};
use crate::services::PhysicianService;

#[axum::debug_handler]
pub async fn create_physician(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreatePhysicianRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("{} registering physician", user.login);
    let service = PhysicianService::new(&state);

    let physician = service.register(request).await?;
    let location = format!("/physicians/{}", physician.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(physician)))
}

#[axum::debug_handler]
pub async fn list_physicians(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<PhysicianListItem>>, AppError> {
    let service = PhysicianService::new(&state);
    Ok(Json(service.list(&page).await?))
}

#[axum::debug_handler]
pub async fn get_physician(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Path(physician_id): Path<Uuid>,
) -> Result<Json<Physician>, AppError> {
    let service = PhysicianService::new(&state);
    Ok(Json(service.get(physician_id).await?))
}

#[axum::debug_handler]
pub async fn update_physician(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(physician_id): Path<Uuid>,
    Json(request): Json<UpdatePhysicianRequest>,
) -> Result<Json<Physician>, AppError> {
    debug!("{} updating physician {}", user.login, physician_id);
    let service = PhysicianService::new(&state);
    Ok(Json(service.update(physician_id, request).await?))
}

#[axum::debug_handler]
pub async fn delete_physician(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(physician_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    debug!("{} deactivating physician {}", user.login, physician_id);
    let service = PhysicianService::new(&state);
    service.deactivate(physician_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
