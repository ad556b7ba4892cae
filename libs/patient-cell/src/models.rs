use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::RepositoryError;
use shared_models::address::{Address, AddressUpdate};
use shared_models::error::AppError;
use shared_models::patient::Patient;
use shared_models::validation::{require_digits, require_email, require_text};

pub const NATIONAL_ID_DIGITS: usize = 11;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub address: Address,
}

impl CreatePatientRequest {
    pub fn validate(&self) -> Result<(), PatientError> {
        require_text("name", &self.name)
            .and_then(|_| require_email("email", &self.email))
            .and_then(|_| require_text("phone", &self.phone))
            .and_then(|_| require_digits("national_id", &self.national_id, NATIONAL_ID_DIGITS, NATIONAL_ID_DIGITS))
            .and_then(|_| self.address.validate())
            .map_err(PatientError::ValidationError)
    }
}

/// Only name, phone and address may change after registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressUpdate>,
}

/// Row shape for the paged listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub national_id: String,
}

impl From<Patient> for PatientListItem {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            email: patient.email,
            national_id: patient.national_id,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Patient {0} not found")]
    NotFound(String),

    #[error("Patient already registered: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<RepositoryError> for PatientError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id, .. } => PatientError::NotFound(id),
            RepositoryError::Conflict(msg) => PatientError::AlreadyExists(msg),
            RepositoryError::Backend(msg) => PatientError::DatabaseError(msg),
        }
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound(_) => AppError::NotFound(err.to_string()),
            PatientError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
