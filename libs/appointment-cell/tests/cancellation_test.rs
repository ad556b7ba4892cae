use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, AppointmentValidationRules, CancelRequest};
use appointment_cell::services::{AppointmentCanceller, FixedClock};
use shared_database::{AppointmentRepository, MemoryDatabase, PhysicianRepository, RepositoryError};
use shared_models::appointment::{Appointment, AppointmentStatus, CancellationReason};
use shared_models::physician::Specialty;
use shared_utils::test_utils::Fixtures;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 1, 8, 0, 0).unwrap()
}

async fn booked_at(db: &MemoryDatabase, date_time: DateTime<Utc>) -> Appointment {
    let appointment = Fixtures::appointment(Uuid::new_v4(), Uuid::new_v4(), date_time);
    AppointmentRepository::save(db, appointment.clone()).await.unwrap();
    appointment
}

/// Yields between reading an appointment and handing it back, so two
/// cancellations both observe the scheduled row before either writes.
struct InterleavingAppointments {
    inner: Arc<MemoryDatabase>,
}

#[async_trait]
impl AppointmentRepository for InterleavingAppointments {
    async fn save(&self, appointment: Appointment) -> Result<Uuid, RepositoryError> {
        AppointmentRepository::save(self.inner.as_ref(), appointment).await
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, RepositoryError> {
        let appointment = AppointmentRepository::get(self.inner.as_ref(), id).await;
        tokio::task::yield_now().await;
        appointment
    }

    async fn update(&self, appointment: Appointment) -> Result<(), RepositoryError> {
        AppointmentRepository::update(self.inner.as_ref(), appointment).await
    }
}

fn canceller(db: &Arc<MemoryDatabase>) -> AppointmentCanceller {
    AppointmentCanceller::new(db.clone()).with_clock(Arc::new(FixedClock(now())))
}

#[tokio::test]
async fn test_cancel_stores_reason_and_status() {
    let db = Arc::new(MemoryDatabase::new());
    let appointment = booked_at(&db, now() + Duration::days(1)).await;

    canceller(&db)
        .cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::PatientCancelled })
        .await
        .unwrap();

    let stored = AppointmentRepository::get(db.as_ref(), appointment.id).await.unwrap();
    assert_eq!(stored.status, AppointmentStatus::Cancelled);
    assert_eq!(stored.cancellation_reason, Some(CancellationReason::PatientCancelled));
    assert_eq!(stored.physician_id, appointment.physician_id);
    assert_eq!(stored.date_time, appointment.date_time);
}

#[tokio::test]
async fn test_cancel_inside_lead_time_is_too_late() {
    let db = Arc::new(MemoryDatabase::new());
    let appointment = booked_at(&db, now() + Duration::minutes(30)).await;

    let result = canceller(&db)
        .cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::Other })
        .await;

    assert_matches!(result, Err(AppointmentError::TooLateToCancel { min_notice_minutes: 120, .. }));
    let stored = AppointmentRepository::get(db.as_ref(), appointment.id).await.unwrap();
    assert_eq!(stored.status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn test_lead_time_follows_rules() {
    let db = Arc::new(MemoryDatabase::new());
    let appointment = booked_at(&db, now() + Duration::minutes(30)).await;
    let rules = AppointmentValidationRules { min_cancellation_notice_minutes: 15, ..Default::default() };

    let result = canceller(&db)
        .with_rules(rules)
        .cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::PhysicianCancelled })
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cancel_twice_keeps_first_reason() {
    let db = Arc::new(MemoryDatabase::new());
    let appointment = booked_at(&db, now() + Duration::days(2)).await;
    let canceller = canceller(&db);

    canceller
        .cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::PatientCancelled })
        .await
        .unwrap();
    let again = canceller
        .cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::PhysicianCancelled })
        .await;

    assert_eq!(again, Err(AppointmentError::AlreadyCancelled(appointment.id)));
    let stored = AppointmentRepository::get(db.as_ref(), appointment.id).await.unwrap();
    assert_eq!(stored.cancellation_reason, Some(CancellationReason::PatientCancelled));
}

#[tokio::test]
async fn test_already_cancelled_wins_over_lead_time() {
    let db = Arc::new(MemoryDatabase::new());
    let mut appointment = booked_at(&db, now() + Duration::minutes(10)).await;
    appointment.status = AppointmentStatus::Cancelled;
    appointment.cancellation_reason = Some(CancellationReason::Other);
    AppointmentRepository::update(db.as_ref(), appointment.clone()).await.unwrap();

    let result = canceller(&db)
        .cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::Other })
        .await;

    assert_eq!(result, Err(AppointmentError::AlreadyCancelled(appointment.id)));
}

#[tokio::test]
async fn test_unknown_appointment() {
    let db = Arc::new(MemoryDatabase::new());
    let id = Uuid::new_v4();

    let result = canceller(&db)
        .cancel(CancelRequest { appointment_id: id, reason: CancellationReason::Other })
        .await;

    assert_eq!(result, Err(AppointmentError::UnknownAppointment(id)));
}

#[tokio::test]
async fn test_cancelled_slot_can_be_rebooked() {
    let db = Arc::new(MemoryDatabase::new());
    let physician = Fixtures::physician("Dr. Cardio", Specialty::Cardiology);
    PhysicianRepository::insert(db.as_ref(), physician.clone()).await.unwrap();
    let at = now() + Duration::days(1);
    let appointment = Fixtures::appointment(physician.id, Uuid::new_v4(), at);
    AppointmentRepository::save(db.as_ref(), appointment.clone()).await.unwrap();

    canceller(&db)
        .cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::PatientCancelled })
        .await
        .unwrap();

    let replacement = Fixtures::appointment(physician.id, Uuid::new_v4(), at);
    assert!(AppointmentRepository::save(db.as_ref(), replacement).await.is_ok());
}

#[tokio::test]
async fn test_concurrent_cancels_admit_one_and_keep_its_reason() {
    let db = Arc::new(MemoryDatabase::new());
    let appointment = booked_at(&db, now() + Duration::days(1)).await;
    let canceller = AppointmentCanceller::new(Arc::new(InterleavingAppointments { inner: db.clone() }))
        .with_clock(Arc::new(FixedClock(now())));

    let (by_patient, by_physician) = tokio::join!(
        canceller.cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::PatientCancelled }),
        canceller.cancel(CancelRequest { appointment_id: appointment.id, reason: CancellationReason::PhysicianCancelled }),
    );

    let winner = match (&by_patient, &by_physician) {
        (Ok(()), Err(AppointmentError::AlreadyCancelled(_))) => CancellationReason::PatientCancelled,
        (Err(AppointmentError::AlreadyCancelled(_)), Ok(())) => CancellationReason::PhysicianCancelled,
        other => panic!("expected exactly one cancellation to succeed, got {:?}", other),
    };
    let stored = AppointmentRepository::get(db.as_ref(), appointment.id).await.unwrap();
    assert_eq!(stored.status, AppointmentStatus::Cancelled);
    assert_eq!(stored.cancellation_reason, Some(winner));
}
