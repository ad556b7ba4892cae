use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{AppState, PhysicianRepository};
use shared_models::pagination::{Page, PageRequest};
use shared_models::physician::Physician;
use shared_models::validation::require_text;

use crate::models::{CreatePhysicianRequest, PhysicianError, PhysicianListItem, UpdatePhysicianRequest};

pub struct PhysicianService {
    physicians: Arc<dyn PhysicianRepository>,
}

impl PhysicianService {
    pub fn new(state: &AppState) -> Self {
        Self::with_repository(Arc::clone(&state.physicians))
    }

    pub fn with_repository(physicians: Arc<dyn PhysicianRepository>) -> Self {
        Self { physicians }
    }

    pub async fn register(&self, request: CreatePhysicianRequest) -> Result<Physician, PhysicianError> {
        debug!("Registering {} physician: {}", request.specialty, request.email);

        if let Err(e) = request.validate() {
            warn!("Rejected physician registration for {}: {}", request.email, e);
            return Err(e);
        }

        let now = Utc::now();
        let physician = Physician {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            phone: request.phone,
            license_number: request.license_number,
            specialty: request.specialty,
            address: request.address,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.physicians.insert(physician).await?;
        info!("Physician registered with ID: {}", created.id);
        Ok(created)
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Page<PhysicianListItem>, PhysicianError> {
        debug!("Listing active physicians, page {} size {}", page.page(), page.size());
        let physicians = self.physicians.list_active(page).await?;
        Ok(physicians.map(PhysicianListItem::from))
    }

    pub async fn get(&self, physician_id: Uuid) -> Result<Physician, PhysicianError> {
        debug!("Fetching physician: {}", physician_id);
        Ok(self.physicians.get(physician_id).await?)
    }

    pub async fn update(
        &self,
        physician_id: Uuid,
        request: UpdatePhysicianRequest,
    ) -> Result<Physician, PhysicianError> {
        debug!("Updating physician: {}", physician_id);

        let mut physician = self.physicians.get(physician_id).await?;

        if let Some(name) = request.name {
            require_text("name", &name).map_err(PhysicianError::ValidationError)?;
            physician.name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            require_text("phone", &phone).map_err(PhysicianError::ValidationError)?;
            physician.phone = phone;
        }
        if let Some(changes) = request.address {
            physician.address.merge(changes);
            physician.address.validate().map_err(PhysicianError::ValidationError)?;
        }
        physician.updated_at = Utc::now();

        let updated = self.physicians.update(physician).await?;
        info!("Physician {} updated", updated.id);
        Ok(updated)
    }

    /// Inactive physicians drop out of automatic assignment; booked
    /// appointments are left as they are.
    pub async fn deactivate(&self, physician_id: Uuid) -> Result<(), PhysicianError> {
        debug!("Deactivating physician: {}", physician_id);

        let physician = self.physicians.get(physician_id).await?;
        if !physician.active {
            return Ok(());
        }

        self.physicians.update(physician.deactivated(Utc::now())).await?;
        info!("Physician {} deactivated", physician_id);
        Ok(())
    }
}
