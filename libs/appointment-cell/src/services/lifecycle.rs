// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use shared_models::appointment::{Appointment, AppointmentStatus, CancellationReason};

use crate::models::AppointmentError;

/// Returns the cancelled snapshot of `appointment`. The input is left untouched;
/// a cancelled appointment is terminal and cannot be cancelled again.
pub fn cancel(
    appointment: &Appointment,
    reason: CancellationReason,
    now: DateTime<Utc>,
) -> Result<Appointment, AppointmentError> {
    debug!("Cancelling appointment {} ({})", appointment.id, reason);

    if appointment.is_cancelled() {
        warn!("Appointment {} is already cancelled", appointment.id);
        return Err(AppointmentError::AlreadyCancelled(appointment.id));
    }

    Ok(Appointment {
        status: AppointmentStatus::Cancelled,
        cancellation_reason: Some(reason),
        updated_at: now,
        ..appointment.clone()
    })
}

/// Fails when the appointment starts less than `min_notice` after `now`.
/// Appointments already in the past fail as well.
pub fn check_cancellation_notice(
    appointment: &Appointment,
    now: DateTime<Utc>,
    min_notice: Duration,
) -> Result<(), AppointmentError> {
    if appointment.date_time - now < min_notice {
        warn!(
            "Appointment {} at {} is inside the {} minute cancellation window",
            appointment.id,
            appointment.date_time,
            min_notice.num_minutes()
        );
        return Err(AppointmentError::TooLateToCancel {
            appointment_id: appointment.id,
            min_notice_minutes: min_notice.num_minutes(),
        });
    }
    Ok(())
}

/// Fails unless `date_time` is strictly later than `now + min_notice`.
pub fn check_booking_notice(
    date_time: DateTime<Utc>,
    now: DateTime<Utc>,
    min_notice: Duration,
) -> Result<(), AppointmentError> {
    if date_time <= now + min_notice {
        return Err(AppointmentError::NotInFuture(date_time));
    }
    Ok(())
}
