use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::Address;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub address: Address,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Soft deletion; the record stays so past appointments keep their reference.
    pub fn deactivated(&self, at: DateTime<Utc>) -> Self {
        Self {
            active: false,
            updated_at: at,
            ..self.clone()
        }
    }
}
