use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::address::Address;
use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::auth::User;
use shared_models::patient::Patient;
use shared_models::physician::{Physician, Specialty};

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            jwt_issuer: "clinic-api".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            jwt_issuer: self.jwt_issuer.clone(),
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub login: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("reception@clinic.test")
    }
}

impl TestUser {
    pub fn new(login: &str) -> Self {
        Self { login: login.to_string() }
    }

    pub fn to_user(&self) -> User {
        User {
            login: self.login.clone(),
            issued_at: Some(Utc::now()),
            expires_at: Some(Utc::now() + Duration::hours(2)),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, config: &AppConfig, exp_hours: Option<i64>) -> String {
        issue_token(
            &user.login,
            &config.jwt_secret,
            &config.jwt_issuer,
            Duration::hours(exp_hours.unwrap_or(2)),
        )
        .expect("test config always carries a secret")
    }

    pub fn create_expired_token(user: &TestUser, config: &AppConfig) -> String {
        Self::create_test_token(user, config, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser, config: &AppConfig) -> String {
        issue_token(&user.login, "wrong-secret", &config.jwt_issuer, Duration::hours(2))
            .expect("non-empty secret")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Builders for domain records used across cell tests.
pub struct Fixtures;

impl Fixtures {
    pub fn address() -> Address {
        Address {
            street: "Rua XPTO".to_string(),
            number: Some("100".to_string()),
            complement: None,
            district: "Bairro".to_string(),
            city: "Brasilia".to_string(),
            state: "DF".to_string(),
            postal_code: "70000000".to_string(),
        }
    }

    pub fn patient(name: &str) -> Patient {
        let now = Utc::now();
        Patient {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: "61999998888".to_string(),
            national_id: "12345678901".to_string(),
            address: Self::address(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn physician(name: &str, specialty: Specialty) -> Physician {
        let now = Utc::now();
        Physician {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@clinic.test", name.to_lowercase().replace(' ', ".")),
            phone: "61988887777".to_string(),
            license_number: "123456".to_string(),
            specialty,
            address: Self::address(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn appointment(physician_id: Uuid, patient_id: Uuid, date_time: DateTime<Utc>) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            physician_id,
            patient_id,
            date_time,
            status: AppointmentStatus::Scheduled,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn patient_response(patient: &Patient) -> serde_json::Value {
        json!(patient)
    }

    pub fn physician_response(physician: &Physician) -> serde_json::Value {
        json!(physician)
    }

    pub fn appointment_response(appointment: &Appointment) -> serde_json::Value {
        json!(appointment)
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
