use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CancellationReason {
    #[serde(alias = "PATIENT_CANCELLED")]
    PatientCancelled,
    #[serde(alias = "PHYSICIAN_CANCELLED")]
    PhysicianCancelled,
    #[serde(alias = "OTHER")]
    Other,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancellationReason::PatientCancelled => write!(f, "patient_cancelled"),
            CancellationReason::PhysicianCancelled => write!(f, "physician_cancelled"),
            CancellationReason::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub physician_id: Uuid,
    pub patient_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub cancellation_reason: Option<CancellationReason>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }

    /// True when this appointment blocks `physician_id` at exactly `at`.
    pub fn occupies(&self, physician_id: Uuid, at: DateTime<Utc>) -> bool {
        self.status == AppointmentStatus::Scheduled
            && self.physician_id == physician_id
            && self.date_time == at
    }
}
