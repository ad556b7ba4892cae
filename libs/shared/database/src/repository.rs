//! Storage contracts consumed by the cells.
//!
//! Implementations must be safe to share across request tasks; handles are
//! passed around as `Arc<dyn ...Repository>` and owned by [`crate::AppState`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_models::appointment::Appointment;
use shared_models::auth::UserAccount;
use shared_models::pagination::{Page, PageRequest};
use shared_models::patient::Patient;
use shared_models::physician::{Physician, Specialty};

use crate::error::RepositoryError;

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Fails with `NotFound` when absent.
    async fn get(&self, id: Uuid) -> Result<Patient, RepositoryError>;

    async fn insert(&self, patient: Patient) -> Result<Patient, RepositoryError>;

    async fn update(&self, patient: Patient) -> Result<Patient, RepositoryError>;

    /// Active patients ordered by name.
    async fn list_active(&self, page: &PageRequest) -> Result<Page<Patient>, RepositoryError>;
}

#[async_trait]
pub trait PhysicianRepository: Send + Sync {
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Physician, RepositoryError>;

    async fn insert(&self, physician: Physician) -> Result<Physician, RepositoryError>;

    async fn update(&self, physician: Physician) -> Result<Physician, RepositoryError>;

    async fn list_active(&self, page: &PageRequest) -> Result<Page<Physician>, RepositoryError>;

    /// Active physicians of `specialty` with no scheduled appointment at exactly `date_time`.
    /// Order is unspecified.
    async fn find_available_candidates(
        &self,
        specialty: Specialty,
        date_time: DateTime<Utc>,
    ) -> Result<Vec<Physician>, RepositoryError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Inserts a new appointment. The free-slot check and the insert are atomic:
    /// a second scheduled appointment for the same physician and timestamp is
    /// rejected with `Conflict`.
    async fn save(&self, appointment: Appointment) -> Result<Uuid, RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Appointment, RepositoryError>;

    /// Overwrites a scheduled appointment. The status check and the write are
    /// atomic: a row that is already cancelled is left untouched and the call
    /// fails with `Conflict`.
    async fn update(&self, appointment: Appointment) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserAccount>, RepositoryError>;

    async fn insert(&self, user: UserAccount) -> Result<UserAccount, RepositoryError>;
}
