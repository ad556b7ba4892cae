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
use shared_models::patient::Patient;

use crate::models::{CreatePatientRequest, PatientListItem, UpdatePatientRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("{} registering patient", user.login);
    let service = PatientService::new(&state);

    let patient = service.register(request).await?;
    let location = format!("/patients/{}", patient.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(patient)))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<PatientListItem>>, AppError> {
    let service = PatientService::new(&state);
    Ok(Json(service.list(&page).await?))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&state);
    Ok(Json(service.get(patient_id).await?))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    debug!("{} updating patient {}", user.login, patient_id);
    let service = PatientService::new(&state);
    Ok(Json(service.update(patient_id, request).await?))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    debug!("{} deactivating patient {}", user.login, patient_id);
    let service = PatientService::new(&state);
    service.deactivate(patient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
