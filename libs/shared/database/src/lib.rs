pub mod error;
pub mod memory;
pub mod repository;
pub mod rest;
pub mod state;
pub mod supabase;

pub use error::RepositoryError;
pub use memory::MemoryDatabase;
pub use repository::{AppointmentRepository, PatientRepository, PhysicianRepository, UserRepository};
pub use state::AppState;
