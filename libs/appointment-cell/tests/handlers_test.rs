use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    extract::{Extension, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use appointment_cell::handlers::*;
use appointment_cell::models::{AppointmentSummary, CancelAppointmentRequest, ScheduleRequest};
use shared_config::AppConfig;
use shared_database::{AppState, AppointmentRepository, MemoryDatabase, PatientRepository, PhysicianRepository};
use shared_models::appointment::{AppointmentStatus, CancellationReason};
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::physician::Specialty;
use shared_utils::test_utils::{Fixtures, TestConfig, TestUser};

fn create_test_state(config: AppConfig) -> (Arc<AppState>, Arc<MemoryDatabase>) {
    let db = Arc::new(MemoryDatabase::new());
    let state = AppState::with_memory_database(Arc::new(config), db.clone());
    (Arc::new(state), db)
}

fn user_extension() -> Extension<User> {
    Extension(TestUser::default().to_user())
}

#[tokio::test]
async fn test_schedule_returns_created_summary() {
    let (state, db) = create_test_state(TestConfig::default().to_app_config());
    let patient = Fixtures::patient("Maria Silva");
    let physician = Fixtures::physician("Dr. Cardio", Specialty::Cardiology);
    PatientRepository::insert(db.as_ref(), patient.clone()).await.unwrap();
    PhysicianRepository::insert(db.as_ref(), physician.clone()).await.unwrap();

    let request = ScheduleRequest {
        patient_id: patient.id,
        physician_id: None,
        specialty: Some(Specialty::Cardiology),
        date_time: Utc::now() + Duration::days(3),
    };
    let response = schedule_appointment(State(state), user_extension(), Json(request))
        .await
        .unwrap()
        .into_response();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let summary: AppointmentSummary = serde_json::from_slice(&body).unwrap();
    assert_eq!(location, format!("/appointments/{}", summary.appointment_id));
    assert_eq!(summary.physician_id, physician.id);
}

#[tokio::test]
async fn test_schedule_without_specialty_is_bad_request() {
    let (state, db) = create_test_state(TestConfig::default().to_app_config());
    let patient = Fixtures::patient("Maria Silva");
    PatientRepository::insert(db.as_ref(), patient.clone()).await.unwrap();

    let request = ScheduleRequest {
        patient_id: patient.id,
        physician_id: None,
        specialty: None,
        date_time: Utc::now() + Duration::days(3),
    };
    let result = schedule_appointment(State(state), user_extension(), Json(request)).await.map(|_| ());

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_get_appointment_detail_and_not_found() {
    let (state, db) = create_test_state(TestConfig::default().to_app_config());
    let appointment = Fixtures::appointment(Uuid::new_v4(), Uuid::new_v4(), Utc::now() + Duration::days(1));
    AppointmentRepository::save(db.as_ref(), appointment.clone()).await.unwrap();

    let Json(found) = get_appointment(State(state.clone()), user_extension(), Path(appointment.id))
        .await
        .unwrap();
    assert_eq!(found, appointment);

    let missing = get_appointment(State(state), user_extension(), Path(Uuid::new_v4())).await;
    assert_matches!(missing, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn test_cancel_uses_configured_lead_time() {
    let config = AppConfig {
        cancellation_notice_minutes: 10,
        ..TestConfig::default().to_app_config()
    };
    let (state, db) = create_test_state(config);
    let appointment = Fixtures::appointment(Uuid::new_v4(), Uuid::new_v4(), Utc::now() + Duration::minutes(30));
    AppointmentRepository::save(db.as_ref(), appointment.clone()).await.unwrap();

    let status = cancel_appointment(
        State(state.clone()),
        user_extension(),
        Path(appointment.id),
        Json(CancelAppointmentRequest { reason: CancellationReason::PhysicianCancelled }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let stored = AppointmentRepository::get(db.as_ref(), appointment.id).await.unwrap();
    assert_eq!(stored.status, AppointmentStatus::Cancelled);

    let again = cancel_appointment(
        State(state),
        user_extension(),
        Path(appointment.id),
        Json(CancelAppointmentRequest { reason: CancellationReason::Other }),
    )
    .await;
    assert_matches!(again, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn test_cancel_too_late_is_bad_request() {
    let (state, db) = create_test_state(TestConfig::default().to_app_config());
    let appointment = Fixtures::appointment(Uuid::new_v4(), Uuid::new_v4(), Utc::now() + Duration::minutes(30));
    AppointmentRepository::save(db.as_ref(), appointment.clone()).await.unwrap();

    let result = cancel_appointment(
        State(state),
        user_extension(),
        Path(appointment.id),
        Json(CancelAppointmentRequest { reason: CancellationReason::PatientCancelled }),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg.contains("120 minutes"));
}
