// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use shared_database::{AppState, RepositoryError};
use shared_models::appointment::Appointment;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AppointmentError, CancelAppointmentRequest, CancelRequest, ScheduleRequest};
use crate::services::{AppointmentCanceller, AppointmentScheduler};

#[axum::debug_handler]
pub async fn schedule_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<ScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("{} booking appointment for patient {}", user.login, request.patient_id);
    let scheduler = AppointmentScheduler::from_state(&state);

    let summary = scheduler.schedule(request).await?;
    let location = format!("/appointments/{}", summary.appointment_id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(summary)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state
        .appointments
        .get(appointment_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound { .. } => AppointmentError::UnknownAppointment(appointment_id),
            other => other.into(),
        })?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<StatusCode, AppError> {
    debug!("{} cancelling appointment {}", user.login, appointment_id);
    let canceller = AppointmentCanceller::from_state(&state);

    canceller
        .cancel(CancelRequest { appointment_id, reason: request.reason })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
