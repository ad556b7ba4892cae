use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::appointment::Appointment;
use shared_models::auth::UserAccount;
use shared_models::pagination::{Page, PageRequest};
use shared_models::patient::Patient;
use shared_models::physician::{Physician, Specialty};

use crate::error::RepositoryError;
use crate::repository::{AppointmentRepository, PatientRepository, PhysicianRepository, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    patients: HashMap<Uuid, Patient>,
    physicians: HashMap<Uuid, Physician>,
    appointments: HashMap<Uuid, Appointment>,
    users: HashMap<String, UserAccount>,
}

/// Process-local store backing all repositories with a single lock, so that
/// availability checks and appointment inserts observe one consistent view.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientRepository for MemoryDatabase {
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.patients.contains_key(&id))
    }

    async fn get(&self, id: Uuid) -> Result<Patient, RepositoryError> {
        self.tables
            .read()
            .await
            .patients
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("patient", id))
    }

    async fn insert(&self, patient: Patient) -> Result<Patient, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.patients.values().any(|p| p.email.eq_ignore_ascii_case(&patient.email)) {
            warn!("Patient e-mail {} already registered", patient.email);
            return Err(RepositoryError::Conflict(format!(
                "Patient with email {} already exists",
                patient.email
            )));
        }

        debug!("Inserting patient {}", patient.id);
        tables.patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn update(&self, patient: Patient) -> Result<Patient, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.patients.get_mut(&patient.id) {
            Some(slot) => {
                *slot = patient.clone();
                Ok(patient)
            }
            None => Err(RepositoryError::not_found("patient", patient.id)),
        }
    }

    async fn list_active(&self, page: &PageRequest) -> Result<Page<Patient>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut active: Vec<Patient> = tables.patients.values().filter(|p| p.active).cloned().collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Page::from_sorted(active, page))
    }
}

#[async_trait]
impl PhysicianRepository for MemoryDatabase {
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.physicians.contains_key(&id))
    }

    async fn get(&self, id: Uuid) -> Result<Physician, RepositoryError> {
        self.tables
            .read()
            .await
            .physicians
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("physician", id))
    }

    async fn insert(&self, physician: Physician) -> Result<Physician, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables
            .physicians
            .values()
            .any(|p| p.license_number == physician.license_number || p.email.eq_ignore_ascii_case(&physician.email))
        {
            warn!("Physician license {} or e-mail {} already registered", physician.license_number, physician.email);
            return Err(RepositoryError::Conflict(
                "Physician with this license number or email already exists".to_string(),
            ));
        }

        debug!("Inserting physician {}", physician.id);
        tables.physicians.insert(physician.id, physician.clone());
        Ok(physician)
    }

    async fn update(&self, physician: Physician) -> Result<Physician, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.physicians.get_mut(&physician.id) {
            Some(slot) => {
                *slot = physician.clone();
                Ok(physician)
            }
            None => Err(RepositoryError::not_found("physician", physician.id)),
        }
    }

    async fn list_active(&self, page: &PageRequest) -> Result<Page<Physician>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut active: Vec<Physician> = tables.physicians.values().filter(|p| p.active).cloned().collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Page::from_sorted(active, page))
    }

    async fn find_available_candidates(
        &self,
        specialty: Specialty,
        date_time: DateTime<Utc>,
    ) -> Result<Vec<Physician>, RepositoryError> {
        let tables = self.tables.read().await;

        let candidates: Vec<Physician> = tables
            .physicians
            .values()
            .filter(|p| p.active && p.specialty == specialty)
            .filter(|p| !tables.appointments.values().any(|a| a.occupies(p.id, date_time)))
            .cloned()
            .collect();

        debug!("{} free {} physicians at {}", candidates.len(), specialty, date_time);
        Ok(candidates)
    }
}

#[async_trait]
impl AppointmentRepository for MemoryDatabase {
    async fn save(&self, appointment: Appointment) -> Result<Uuid, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.appointments.contains_key(&appointment.id) {
            return Err(RepositoryError::Conflict(format!(
                "Appointment {} already exists",
                appointment.id
            )));
        }

        if tables
            .appointments
            .values()
            .any(|a| a.occupies(appointment.physician_id, appointment.date_time))
        {
            warn!(
                "Physician {} already booked at {}",
                appointment.physician_id, appointment.date_time
            );
            return Err(RepositoryError::Conflict(format!(
                "Physician {} already has an appointment at {}",
                appointment.physician_id, appointment.date_time
            )));
        }

        let id = appointment.id;
        tables.appointments.insert(id, appointment);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, RepositoryError> {
        self.tables
            .read()
            .await
            .appointments
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("appointment", id))
    }

    async fn update(&self, appointment: Appointment) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.appointments.get_mut(&appointment.id) {
            Some(slot) if slot.is_cancelled() => {
                warn!("Appointment {} is already cancelled", appointment.id);
                Err(RepositoryError::Conflict(format!(
                    "Appointment {} is already cancelled",
                    appointment.id
                )))
            }
            Some(slot) => {
                *slot = appointment;
                Ok(())
            }
            None => Err(RepositoryError::not_found("appointment", appointment.id)),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self.tables.read().await.users.get(login).cloned())
    }

    async fn insert(&self, user: UserAccount) -> Result<UserAccount, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.login) {
            return Err(RepositoryError::Conflict(format!("Login {} already taken", user.login)));
        }
        tables.users.insert(user.login.clone(), user.clone());
        Ok(user)
    }
}
