use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_database::rest::{
    SupabaseAppointmentRepository, SupabasePatientRepository, SupabasePhysicianRepository,
};
use shared_database::supabase::SupabaseClient;
use shared_database::{AppointmentRepository, PatientRepository, PhysicianRepository, RepositoryError};
use shared_models::physician::Specialty;
use shared_utils::test_utils::{Fixtures, MockSupabaseResponses, TestConfig};

fn client_for(mock_server: &MockServer) -> Arc<SupabaseClient> {
    let config = AppConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default().to_app_config()
    };
    Arc::new(SupabaseClient::new(&config))
}

#[tokio::test]
async fn test_patient_get_and_exists() {
    let mock_server = MockServer::start().await;
    let patient = Fixtures::patient("Maria Silva");

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient.id)))
        .and(header("apikey", "test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_response(&patient)
        ])))
        .mount(&mock_server)
        .await;

    let repository = SupabasePatientRepository::new(client_for(&mock_server));

    let fetched = repository.get(patient.id).await.unwrap();
    assert_eq!(fetched.id, patient.id);
    assert_eq!(fetched.name, "Maria Silva");
    assert!(repository.exists(patient.id).await.unwrap());
}

#[tokio::test]
async fn test_missing_patient_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let repository = SupabasePatientRepository::new(client_for(&mock_server));
    let id = Uuid::new_v4();

    assert!(!repository.exists(id).await.unwrap());
    assert_matches!(repository.get(id).await, Err(RepositoryError::NotFound { entity: "patient", .. }));
}

#[tokio::test]
async fn test_candidates_filter_out_booked_physicians() {
    let mock_server = MockServer::start().await;
    let at = Utc.with_ymd_and_hms(2030, 3, 1, 10, 0, 0).unwrap();

    let free = Fixtures::physician("Free Cardio", Specialty::Cardiology);
    let booked = Fixtures::physician("Booked Cardio", Specialty::Cardiology);

    Mock::given(method("GET"))
        .and(path("/rest/v1/physicians"))
        .and(query_param("specialty", "eq.cardiology"))
        .and(query_param("active", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::physician_response(&free),
            MockSupabaseResponses::physician_response(&booked),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date_time", "eq.2030-03-01T10:00:00Z"))
        .and(query_param("status", "eq.scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "physician_id": booked.id }
        ])))
        .mount(&mock_server)
        .await;

    let repository = SupabasePhysicianRepository::new(client_for(&mock_server));
    let candidates = repository
        .find_available_candidates(Specialty::Cardiology, at)
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, free.id);
}

#[tokio::test]
async fn test_save_appointment_returns_id() {
    let mock_server = MockServer::start().await;
    let appointment = Fixtures::appointment(Uuid::new_v4(), Uuid::new_v4(), Utc::now());

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment_response(&appointment)
        ])))
        .mount(&mock_server)
        .await;

    let repository = SupabaseAppointmentRepository::new(client_for(&mock_server));
    assert_eq!(repository.save(appointment.clone()).await.unwrap(), appointment.id);
}

#[tokio::test]
async fn test_unique_violation_maps_to_conflict() {
    let mock_server = MockServer::start().await;
    let appointment = Fixtures::appointment(Uuid::new_v4(), Uuid::new_v4(), Utc::now());

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("duplicate key value violates unique constraint", "23505"),
        ))
        .mount(&mock_server)
        .await;

    let repository = SupabaseAppointmentRepository::new(client_for(&mock_server));
    assert_matches!(repository.save(appointment).await, Err(RepositoryError::Conflict(_)));
}

#[tokio::test]
async fn test_server_error_maps_to_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let repository = SupabaseAppointmentRepository::new(client_for(&mock_server));
    assert_matches!(repository.get(Uuid::new_v4()).await, Err(RepositoryError::Backend(_)));
}

#[tokio::test]
async fn test_update_only_patches_scheduled_rows() {
    let mock_server = MockServer::start().await;
    let appointment = Fixtures::appointment(Uuid::new_v4(), Uuid::new_v4(), Utc::now());

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment.id)))
        .and(query_param("status", "eq.scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response(&appointment)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let repository = SupabaseAppointmentRepository::new(client_for(&mock_server));
    assert!(repository.update(appointment).await.is_ok());
}

#[tokio::test]
async fn test_update_of_cancelled_row_is_conflict() {
    let mock_server = MockServer::start().await;
    let appointment = Fixtures::appointment(Uuid::new_v4(), Uuid::new_v4(), Utc::now());

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": appointment.id }
        ])))
        .mount(&mock_server)
        .await;

    let repository = SupabaseAppointmentRepository::new(client_for(&mock_server));
    assert_matches!(repository.update(appointment).await, Err(RepositoryError::Conflict(_)));
}
