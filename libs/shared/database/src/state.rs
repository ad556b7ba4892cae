use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;

use crate::memory::MemoryDatabase;
use crate::repository::{AppointmentRepository, PatientRepository, PhysicianRepository, UserRepository};
use crate::rest::{
    SupabaseAppointmentRepository, SupabasePatientRepository, SupabasePhysicianRepository,
    SupabaseUserRepository,
};
use crate::supabase::SupabaseClient;

/// Shared handles passed to every router. Cloning is cheap; repositories are
/// shared, never owned, by the services built from this state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub patients: Arc<dyn PatientRepository>,
    pub physicians: Arc<dyn PhysicianRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        if config.is_supabase_configured() {
            Self::supabase(config)
        } else {
            Self::in_memory(config)
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        info!("Using in-memory storage");
        Self::with_memory_database(config, Arc::new(MemoryDatabase::new()))
    }

    /// Builds state over an existing in-memory database, so tests can seed it.
    pub fn with_memory_database(config: Arc<AppConfig>, database: Arc<MemoryDatabase>) -> Self {
        Self {
            config,
            patients: database.clone(),
            physicians: database.clone(),
            appointments: database.clone(),
            users: database,
        }
    }

    pub fn supabase(config: Arc<AppConfig>) -> Self {
        info!("Using Supabase storage at {}", config.supabase_url);
        let client = Arc::new(SupabaseClient::new(&config));
        Self {
            patients: Arc::new(SupabasePatientRepository::new(Arc::clone(&client))),
            physicians: Arc::new(SupabasePhysicianRepository::new(Arc::clone(&client))),
            appointments: Arc::new(SupabaseAppointmentRepository::new(Arc::clone(&client))),
            users: Arc::new(SupabaseUserRepository::new(client)),
            config,
        }
    }
}
