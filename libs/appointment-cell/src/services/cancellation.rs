use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_database::{AppState, AppointmentRepository, RepositoryError};

use crate::models::{AppointmentError, AppointmentValidationRules, CancelRequest};
use crate::services::clock::{Clock, SystemClock};
use crate::services::lifecycle;

pub struct AppointmentCanceller {
    appointments: Arc<dyn AppointmentRepository>,
    clock: Arc<dyn Clock>,
    rules: AppointmentValidationRules,
}

impl AppointmentCanceller {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self {
            appointments,
            clock: Arc::new(SystemClock),
            rules: AppointmentValidationRules::default(),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(Arc::clone(&state.appointments))
            .with_rules(AppointmentValidationRules::from_config(&state.config))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rules(mut self, rules: AppointmentValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub async fn cancel(&self, request: CancelRequest) -> Result<(), AppointmentError> {
        debug!("Cancel requested for appointment {}", request.appointment_id);

        let appointment = match self.appointments.get(request.appointment_id).await {
            Ok(appointment) => appointment,
            Err(RepositoryError::NotFound { .. }) => {
                warn!("Appointment {} does not exist", request.appointment_id);
                return Err(AppointmentError::UnknownAppointment(request.appointment_id));
            }
            Err(e) => return Err(e.into()),
        };

        let now = self.clock.now();
        let cancelled = lifecycle::cancel(&appointment, request.reason, now)?;
        lifecycle::check_cancellation_notice(&appointment, now, self.rules.cancellation_notice())?;

        match self.appointments.update(cancelled).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                warn!("Appointment {} was cancelled concurrently", request.appointment_id);
                return Err(AppointmentError::AlreadyCancelled(request.appointment_id));
            }
            Err(e) => return Err(e.into()),
        }
        info!("Appointment {} cancelled ({})", request.appointment_id, request.reason);
        Ok(())
    }
}
