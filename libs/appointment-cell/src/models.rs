// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::RepositoryError;
use shared_models::appointment::{Appointment, CancellationReason};
use shared_models::error::AppError;
use shared_models::physician::Specialty;

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

/// A booking request. `specialty` is only consulted when no physician is named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub patient_id: Uuid,
    #[serde(default)]
    pub physician_id: Option<Uuid>,
    #[serde(default)]
    pub specialty: Option<Specialty>,
    pub date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub appointment_id: Uuid,
    pub physician_id: Uuid,
    pub patient_id: Uuid,
    pub date_time: DateTime<Utc>,
}

impl From<&Appointment> for AppointmentSummary {
    fn from(appointment: &Appointment) -> Self {
        Self {
            appointment_id: appointment.id,
            physician_id: appointment.physician_id,
            patient_id: appointment.patient_id,
            date_time: appointment.date_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    pub appointment_id: Uuid,
    pub reason: CancellationReason,
}

/// Body of `POST /appointments/{id}/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: CancellationReason,
}

// ==============================================================================
// VALIDATION MODELS
// ==============================================================================

#[derive(Debug, Clone)]
pub struct AppointmentValidationRules {
    /// How far ahead of now a new appointment must be.
    pub min_booking_notice_minutes: i64,
    /// Cancellations closer than this to the appointment are refused.
    pub min_cancellation_notice_minutes: i64,
}

impl Default for AppointmentValidationRules {
    fn default() -> Self {
        Self {
            min_booking_notice_minutes: 0,
            min_cancellation_notice_minutes: 120,
        }
    }
}

impl AppointmentValidationRules {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min_booking_notice_minutes: config.booking_notice_minutes,
            min_cancellation_notice_minutes: config.cancellation_notice_minutes,
        }
    }

    pub fn booking_notice(&self) -> Duration {
        Duration::minutes(self.min_booking_notice_minutes)
    }

    pub fn cancellation_notice(&self) -> Duration {
        Duration::minutes(self.min_cancellation_notice_minutes)
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Patient {0} does not exist")]
    UnknownPatient(Uuid),

    #[error("Patient {0} is inactive")]
    InactivePatient(Uuid),

    #[error("Physician {0} does not exist")]
    UnknownPhysician(Uuid),

    #[error("Specialty is required when no physician is chosen")]
    SpecialtyRequired,

    #[error("No {specialty} physician is available at {date_time}")]
    NoPhysicianAvailable {
        specialty: Specialty,
        date_time: DateTime<Utc>,
    },

    #[error("Physician {physician_id} already has an appointment at {date_time}")]
    PhysicianUnavailable {
        physician_id: Uuid,
        date_time: DateTime<Utc>,
    },

    #[error("Appointment time {0} is not in the future")]
    NotInFuture(DateTime<Utc>),

    #[error("Appointment {0} does not exist")]
    UnknownAppointment(Uuid),

    #[error("Appointment {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error("Appointment {appointment_id} can only be cancelled at least {min_notice_minutes} minutes in advance")]
    TooLateToCancel {
        appointment_id: Uuid,
        min_notice_minutes: i64,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for AppointmentError {
    fn from(err: RepositoryError) -> Self {
        AppointmentError::Storage(err.to_string())
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::UnknownPatient(_)
            | AppointmentError::InactivePatient(_)
            | AppointmentError::UnknownPhysician(_)
            | AppointmentError::SpecialtyRequired
            | AppointmentError::NotInFuture(_)
            | AppointmentError::TooLateToCancel { .. } => AppError::BadRequest(err.to_string()),
            AppointmentError::UnknownAppointment(_) => AppError::NotFound(err.to_string()),
            AppointmentError::AlreadyCancelled(_)
            | AppointmentError::NoPhysicianAvailable { .. }
            | AppointmentError::PhysicianUnavailable { .. } => AppError::Conflict(err.to_string()),
            AppointmentError::Storage(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_status_mapping() {
        let id = Uuid::new_v4();
        let cases = [
            (AppointmentError::UnknownPatient(id), StatusCode::BAD_REQUEST),
            (AppointmentError::SpecialtyRequired, StatusCode::BAD_REQUEST),
            (
                AppointmentError::TooLateToCancel { appointment_id: id, min_notice_minutes: 120 },
                StatusCode::BAD_REQUEST,
            ),
            (AppointmentError::UnknownAppointment(id), StatusCode::NOT_FOUND),
            (AppointmentError::AlreadyCancelled(id), StatusCode::CONFLICT),
            (
                AppointmentError::NoPhysicianAvailable { specialty: Specialty::Cardiology, date_time: Utc::now() },
                StatusCode::CONFLICT,
            ),
            (AppointmentError::Storage("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_schedule_request_optional_fields() {
        let request: ScheduleRequest = serde_json::from_str(&format!(
            r#"{{"patient_id":"{}","specialty":"CARDIOLOGY","date_time":"2030-03-01T10:00:00Z"}}"#,
            Uuid::nil()
        ))
        .unwrap();

        assert_eq!(request.physician_id, None);
        assert_eq!(request.specialty, Some(Specialty::Cardiology));
    }

    #[test]
    fn test_rules_follow_config() {
        let config = AppConfig {
            cancellation_notice_minutes: 30,
            booking_notice_minutes: 15,
            ..AppConfig::default()
        };
        let rules = AppointmentValidationRules::from_config(&config);

        assert_eq!(rules.cancellation_notice(), Duration::minutes(30));
        assert_eq!(rules.booking_notice(), Duration::minutes(15));
    }
}
