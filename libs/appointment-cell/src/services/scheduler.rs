use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{
    AppState, AppointmentRepository, PatientRepository, PhysicianRepository, RepositoryError,
};
use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::physician::Specialty;

use crate::models::{AppointmentError, AppointmentSummary, AppointmentValidationRules, ScheduleRequest};
use crate::services::clock::{Clock, SystemClock};
use crate::services::lifecycle;
use crate::services::selection::{PhysicianSelector, RandomSelector};

/// Decides whether a booking is valid, picks the physician when none is
/// named, and persists the result. Holds no state between calls.
pub struct AppointmentScheduler {
    patients: Arc<dyn PatientRepository>,
    physicians: Arc<dyn PhysicianRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    selector: Arc<dyn PhysicianSelector>,
    clock: Arc<dyn Clock>,
    rules: AppointmentValidationRules,
}

impl AppointmentScheduler {
    pub fn new(
        patients: Arc<dyn PatientRepository>,
        physicians: Arc<dyn PhysicianRepository>,
        appointments: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            patients,
            physicians,
            appointments,
            selector: Arc::new(RandomSelector),
            clock: Arc::new(SystemClock),
            rules: AppointmentValidationRules::default(),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.patients),
            Arc::clone(&state.physicians),
            Arc::clone(&state.appointments),
        )
        .with_rules(AppointmentValidationRules::from_config(&state.config))
    }

    pub fn with_selector(mut self, selector: Arc<dyn PhysicianSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rules(mut self, rules: AppointmentValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub async fn schedule(&self, request: ScheduleRequest) -> Result<AppointmentSummary, AppointmentError> {
        debug!(
            "Scheduling appointment for patient {} at {}",
            request.patient_id, request.date_time
        );

        self.check_patient(request.patient_id).await?;

        let (physician_id, selected) = match request.physician_id {
            Some(physician_id) => {
                if !self.physicians.exists(physician_id).await? {
                    warn!("Physician {} does not exist", physician_id);
                    return Err(AppointmentError::UnknownPhysician(physician_id));
                }
                (physician_id, None)
            }
            None => {
                let specialty = request.specialty.ok_or_else(|| {
                    warn!("Rejected booking without physician or specialty");
                    AppointmentError::SpecialtyRequired
                })?;
                let physician_id = self.select_physician(specialty, request.date_time).await?;
                (physician_id, Some(specialty))
            }
        };

        let now = self.clock.now();
        lifecycle::check_booking_notice(request.date_time, now, self.rules.booking_notice())
            .inspect_err(|_| warn!("Requested time {} is not in the future", request.date_time))?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            physician_id,
            patient_id: request.patient_id,
            date_time: request.date_time,
            status: AppointmentStatus::Scheduled,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        let summary = AppointmentSummary::from(&appointment);

        match self.appointments.save(appointment).await {
            Ok(_) => {
                info!(
                    "Appointment {} scheduled with physician {} at {}",
                    summary.appointment_id, summary.physician_id, summary.date_time
                );
                Ok(summary)
            }
            Err(RepositoryError::Conflict(_)) => {
                warn!("Physician {} was booked at {} concurrently", physician_id, request.date_time);
                Err(match selected {
                    Some(specialty) => AppointmentError::NoPhysicianAvailable {
                        specialty,
                        date_time: request.date_time,
                    },
                    None => AppointmentError::PhysicianUnavailable {
                        physician_id,
                        date_time: request.date_time,
                    },
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn check_patient(&self, patient_id: Uuid) -> Result<(), AppointmentError> {
        match self.patients.get(patient_id).await {
            Ok(patient) if patient.active => Ok(()),
            Ok(_) => {
                warn!("Patient {} is inactive", patient_id);
                Err(AppointmentError::InactivePatient(patient_id))
            }
            Err(RepositoryError::NotFound { .. }) => {
                warn!("Patient {} does not exist", patient_id);
                Err(AppointmentError::UnknownPatient(patient_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn select_physician(
        &self,
        specialty: Specialty,
        date_time: DateTime<Utc>,
    ) -> Result<Uuid, AppointmentError> {
        let candidates = self
            .physicians
            .find_available_candidates(specialty, date_time)
            .await?;
        debug!("{} candidate {} physicians at {}", candidates.len(), specialty, date_time);

        match self.selector.pick(&candidates) {
            Some(physician) => Ok(physician.id),
            None => {
                warn!("No {} physician free at {}", specialty, date_time);
                Err(AppointmentError::NoPhysicianAvailable { specialty, date_time })
            }
        }
    }
}
