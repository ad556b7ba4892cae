use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::RepositoryError;
use shared_models::address::{Address, AddressUpdate};
use shared_models::error::AppError;
use shared_models::physician::{Physician, Specialty};
use shared_models::validation::{require_digits, require_email, require_text};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePhysicianRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub specialty: Specialty,
    pub address: Address,
}

impl CreatePhysicianRequest {
    pub fn validate(&self) -> Result<(), PhysicianError> {
        require_text("name", &self.name)
            .and_then(|_| require_email("email", &self.email))
            .and_then(|_| require_text("phone", &self.phone))
            .and_then(|_| require_digits("license_number", &self.license_number, 4, 6))
            .and_then(|_| self.address.validate())
            .map_err(PhysicianError::ValidationError)
    }
}

/// Specialty, e-mail and license are fixed at registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePhysicianRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicianListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub license_number: String,
    pub specialty: Specialty,
}

impl From<Physician> for PhysicianListItem {
    fn from(physician: Physician) -> Self {
        Self {
            id: physician.id,
            name: physician.name,
            email: physician.email,
            license_number: physician.license_number,
            specialty: physician.specialty,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PhysicianError {
    #[error("Physician {0} not found")]
    NotFound(String),

    #[error("Physician already registered: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<RepositoryError> for PhysicianError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id, .. } => PhysicianError::NotFound(id),
            RepositoryError::Conflict(msg) => PhysicianError::AlreadyExists(msg),
            RepositoryError::Backend(msg) => PhysicianError::DatabaseError(msg),
        }
    }
}

impl From<PhysicianError> for AppError {
    fn from(err: PhysicianError) -> Self {
        match err {
            PhysicianError::NotFound(_) => AppError::NotFound(err.to_string()),
            PhysicianError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            PhysicianError::ValidationError(msg) => AppError::ValidationError(msg),
            PhysicianError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
