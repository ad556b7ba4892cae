//! PostgREST-backed repositories.
//!
//! Expected schema: `patients`, `physicians`, `appointments` and `users`
//! tables whose columns mirror the serialized models. Double booking is
//! prevented by a partial unique index on
//! `appointments (physician_id, date_time) WHERE status = 'scheduled'`,
//! which PostgREST reports as HTTP 409.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::auth::UserAccount;
use shared_models::pagination::{Page, PageRequest};
use shared_models::patient::Patient;
use shared_models::physician::{Physician, Specialty};

use crate::error::RepositoryError;
use crate::repository::{AppointmentRepository, PatientRepository, PhysicianRepository, UserRepository};
use crate::supabase::{ApiError, SupabaseClient};

fn map_api_error(entity: &'static str, err: anyhow::Error) -> RepositoryError {
    match err.downcast_ref::<ApiError>() {
        Some(api) if api.status == 409 => RepositoryError::Conflict(format!("{}: {}", entity, api.body)),
        Some(api) if api.status == 404 => RepositoryError::not_found(entity, api.body.clone()),
        _ => RepositoryError::Backend(err.to_string()),
    }
}

fn encode_timestamp(at: DateTime<Utc>) -> String {
    urlencoding::encode(&at.to_rfc3339_opts(SecondsFormat::Secs, true)).into_owned()
}

/// One PostgREST table addressed by `id`.
struct Table {
    client: Arc<SupabaseClient>,
    name: &'static str,
    entity: &'static str,
}

impl Table {
    fn path(&self, query: &str) -> String {
        format!("/rest/v1/{}?{}", self.name, query)
    }

    async fn select<T: DeserializeOwned>(&self, query: &str) -> Result<Vec<T>, RepositoryError> {
        self.client
            .request(Method::GET, &self.path(query), None, None)
            .await
            .map_err(|e| map_api_error(self.entity, e))
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let rows: Vec<Value> = self.select(&format!("id=eq.{}&select=id", id)).await?;
        Ok(!rows.is_empty())
    }

    async fn get<T: DeserializeOwned>(&self, id: Uuid) -> Result<T, RepositoryError> {
        self.select(&format!("id=eq.{}", id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::not_found(self.entity, id))
    }

    async fn insert<T: Serialize + DeserializeOwned>(&self, row: &T) -> Result<T, RepositoryError> {
        let written: Vec<T> = self.client
            .request_with_headers(
                Method::POST,
                &format!("/rest/v1/{}", self.name),
                None,
                Some(json!(row)),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(|e| map_api_error(self.entity, e))?;

        written
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Backend(format!("Failed to create {}", self.entity)))
    }

    async fn update<T: Serialize + DeserializeOwned>(&self, id: Uuid, row: &T) -> Result<T, RepositoryError> {
        self.update_where(id, "", row)
            .await?
            .ok_or_else(|| RepositoryError::not_found(self.entity, id))
    }

    /// PATCH restricted by an extra PostgREST filter. `None` when no row matched.
    async fn update_where<T: Serialize + DeserializeOwned>(
        &self,
        id: Uuid,
        filter: &str,
        row: &T,
    ) -> Result<Option<T>, RepositoryError> {
        let written: Vec<T> = self.client
            .request_with_headers(
                Method::PATCH,
                &self.path(&format!("id=eq.{}{}", id, filter)),
                None,
                Some(json!(row)),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(|e| map_api_error(self.entity, e))?;

        Ok(written.into_iter().next())
    }

    async fn list_active<T: DeserializeOwned>(&self, page: &PageRequest) -> Result<Page<T>, RepositoryError> {
        let total: Vec<Value> = self.select("active=eq.true&select=id").await?;
        let content: Vec<T> = self
            .select(&format!(
                "active=eq.true&order=name.asc&limit={}&offset={}",
                page.size(),
                page.offset()
            ))
            .await?;
        Ok(Page::new(content, page, total.len()))
    }
}

pub struct SupabasePatientRepository {
    table: Table,
}

impl SupabasePatientRepository {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { table: Table { client, name: "patients", entity: "patient" } }
    }
}

#[async_trait]
impl PatientRepository for SupabasePatientRepository {
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.table.exists(id).await
    }

    async fn get(&self, id: Uuid) -> Result<Patient, RepositoryError> {
        self.table.get(id).await
    }

    async fn insert(&self, patient: Patient) -> Result<Patient, RepositoryError> {
        self.table.insert(&patient).await
    }

    async fn update(&self, patient: Patient) -> Result<Patient, RepositoryError> {
        self.table.update(patient.id, &patient).await
    }

    async fn list_active(&self, page: &PageRequest) -> Result<Page<Patient>, RepositoryError> {
        self.table.list_active(page).await
    }
}

pub struct SupabasePhysicianRepository {
    table: Table,
    appointments: Table,
}

impl SupabasePhysicianRepository {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self {
            table: Table { client: Arc::clone(&client), name: "physicians", entity: "physician" },
            appointments: Table { client, name: "appointments", entity: "appointment" },
        }
    }
}

#[async_trait]
impl PhysicianRepository for SupabasePhysicianRepository {
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.table.exists(id).await
    }

    async fn get(&self, id: Uuid) -> Result<Physician, RepositoryError> {
        self.table.get(id).await
    }

    async fn insert(&self, physician: Physician) -> Result<Physician, RepositoryError> {
        self.table.insert(&physician).await
    }

    async fn update(&self, physician: Physician) -> Result<Physician, RepositoryError> {
        self.table.update(physician.id, &physician).await
    }

    async fn list_active(&self, page: &PageRequest) -> Result<Page<Physician>, RepositoryError> {
        self.table.list_active(page).await
    }

    async fn find_available_candidates(
        &self,
        specialty: Specialty,
        date_time: DateTime<Utc>,
    ) -> Result<Vec<Physician>, RepositoryError> {
        let physicians: Vec<Physician> = self
            .table
            .select(&format!("specialty=eq.{}&active=eq.true", specialty))
            .await?;

        let booked: Vec<Value> = self
            .appointments
            .select(&format!(
                "date_time=eq.{}&status=eq.scheduled&select=physician_id",
                encode_timestamp(date_time)
            ))
            .await?;

        let booked_ids: Vec<Uuid> = booked
            .iter()
            .filter_map(|row| row.get("physician_id")?.as_str()?.parse().ok())
            .collect();

        let candidates: Vec<Physician> = physicians
            .into_iter()
            .filter(|p| !booked_ids.contains(&p.id))
            .collect();

        debug!("{} free {} physicians at {}", candidates.len(), specialty, date_time);
        Ok(candidates)
    }
}

pub struct SupabaseAppointmentRepository {
    table: Table,
}

impl SupabaseAppointmentRepository {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { table: Table { client, name: "appointments", entity: "appointment" } }
    }
}

#[async_trait]
impl AppointmentRepository for SupabaseAppointmentRepository {
    async fn save(&self, appointment: Appointment) -> Result<Uuid, RepositoryError> {
        let saved = self.table.insert(&appointment).await.map_err(|e| {
            if let RepositoryError::Conflict(_) = e {
                warn!(
                    "Store rejected appointment for physician {} at {}",
                    appointment.physician_id, appointment.date_time
                );
            }
            e
        })?;
        Ok(saved.id)
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, RepositoryError> {
        self.table.get(id).await
    }

    async fn update(&self, appointment: Appointment) -> Result<(), RepositoryError> {
        let filter = format!("&status=eq.{}", AppointmentStatus::Scheduled);
        if self.table.update_where(appointment.id, &filter, &appointment).await?.is_some() {
            return Ok(());
        }

        if !self.table.exists(appointment.id).await? {
            return Err(RepositoryError::not_found("appointment", appointment.id));
        }
        warn!("Appointment {} is no longer scheduled", appointment.id);
        Err(RepositoryError::Conflict(format!(
            "Appointment {} is already cancelled",
            appointment.id
        )))
    }
}

pub struct SupabaseUserRepository {
    table: Table,
}

impl SupabaseUserRepository {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { table: Table { client, name: "users", entity: "user" } }
    }
}

#[async_trait]
impl UserRepository for SupabaseUserRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let rows: Vec<UserAccount> = self
            .table
            .select(&format!("login=eq.{}", urlencoding::encode(login)))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, user: UserAccount) -> Result<UserAccount, RepositoryError> {
        self.table.insert(&user).await
    }
}
