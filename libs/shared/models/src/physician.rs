use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::Address;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    #[serde(alias = "ORTHOPEDICS")]
    Orthopedics,
    #[serde(alias = "CARDIOLOGY")]
    Cardiology,
    #[serde(alias = "GYNECOLOGY")]
    Gynecology,
    #[serde(alias = "DERMATOLOGY")]
    Dermatology,
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specialty::Orthopedics => write!(f, "orthopedics"),
            Specialty::Cardiology => write!(f, "cardiology"),
            Specialty::Gynecology => write!(f, "gynecology"),
            Specialty::Dermatology => write!(f, "dermatology"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physician {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub specialty: Specialty,
    pub address: Address,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Physician {
    pub fn deactivated(&self, at: DateTime<Utc>) -> Self {
        Self {
            active: false,
            updated_at: at,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialty_serializes_as_snake_case() {
        let json = serde_json::to_string(&Specialty::Gynecology).unwrap();
        assert_eq!(json, "\"gynecology\"");

        let parsed: Specialty = serde_json::from_str("\"ORTHOPEDICS\"").unwrap();
        assert_eq!(parsed, Specialty::Orthopedics);
    }
}
