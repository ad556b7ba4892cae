use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{AppState, PatientRepository};
use shared_models::pagination::{Page, PageRequest};
use shared_models::patient::Patient;
use shared_models::validation::require_text;

use crate::models::{CreatePatientRequest, PatientError, PatientListItem, UpdatePatientRequest};

pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self::with_repository(Arc::clone(&state.patients))
    }

    pub fn with_repository(patients: Arc<dyn PatientRepository>) -> Self {
        Self { patients }
    }

    pub async fn register(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        debug!("Registering patient: {}", request.email);

        if let Err(e) = request.validate() {
            warn!("Rejected patient registration for {}: {}", request.email, e);
            return Err(e);
        }

        let now = Utc::now();
        let patient = Patient {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            phone: request.phone,
            national_id: request.national_id,
            address: request.address,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.patients.insert(patient).await?;
        info!("Patient registered with ID: {}", created.id);
        Ok(created)
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Page<PatientListItem>, PatientError> {
        debug!("Listing active patients, page {} size {}", page.page(), page.size());
        let patients = self.patients.list_active(page).await?;
        Ok(patients.map(PatientListItem::from))
    }

    pub async fn get(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        debug!("Fetching patient: {}", patient_id);
        Ok(self.patients.get(patient_id).await?)
    }

    pub async fn update(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient: {}", patient_id);

        let mut patient = self.patients.get(patient_id).await?;

        if let Some(name) = request.name {
            require_text("name", &name).map_err(PatientError::ValidationError)?;
            patient.name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            require_text("phone", &phone).map_err(PatientError::ValidationError)?;
            patient.phone = phone;
        }
        if let Some(changes) = request.address {
            patient.address.merge(changes);
            patient.address.validate().map_err(PatientError::ValidationError)?;
        }
        patient.updated_at = Utc::now();

        let updated = self.patients.update(patient).await?;
        info!("Patient {} updated", updated.id);
        Ok(updated)
    }

    pub async fn deactivate(&self, patient_id: Uuid) -> Result<(), PatientError> {
        debug!("Deactivating patient: {}", patient_id);

        let patient = self.patients.get(patient_id).await?;
        if !patient.active {
            return Ok(());
        }

        self.patients.update(patient.deactivated(Utc::now())).await?;
        info!("Patient {} deactivated", patient_id);
        Ok(())
    }
}
