//! Medical Agency Core Library
//!
//! Local-first patient and reservation management. All state lives in a
//! key-value store as two JSON collections; there is no server.
//!
//! # Architecture
//!
//! ```text
//!            View (forms, lists, dashboard)
//!                         │
//!            ┌────────────▼────────────┐
//!            │    Validation Engine    │──── reads ────┐
//!            └────────────┬────────────┘               │
//!                         │ on success                 │
//!            ┌────────────▼────────────┐   ┌───────────▼───────────┐
//!            │   Patient Repository    │   │ Reservation Repository │
//!            └────────────┬────────────┘   └───────────┬───────────┘
//!                         │                            │
//!                         └─────────────┬──────────────┘
//!                                       ▼
//!                         KeyValueStore (SQLite / memory)
//! ```
//!
//! # Modules
//!
//! - [`store`]: Key-value store trait with SQLite and in-memory backends
//! - [`models`]: Domain types (Patient, Reservation and their forms)
//! - [`repo`]: Repositories over the stored JSON collections
//! - [`validation`]: Form validation rules
//! - [`stats`]: Dashboard aggregates
//! - [`format`]: Display helpers
//! - [`config`]: Constants, runtime configuration and logging setup

pub mod config;
pub mod format;
pub mod models;
pub mod repo;
pub mod stats;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::CoreConfig;
pub use models::{
    Patient, PatientForm, PatientUpdate, Reservation, ReservationForm, ReservationUpdate,
};
pub use repo::{PatientRepository, RepoError, ReservationRepository};
pub use stats::{Dashboard, DashboardStats};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use validation::{validate_patient, FieldKey, ValidationResult, Validator};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedicalAgencyError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Stored data is corrupt: {0}")]
    CorruptData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<store::StoreError> for MedicalAgencyError {
    fn from(e: store::StoreError) -> Self {
        MedicalAgencyError::StorageError(e.to_string())
    }
}

impl From<RepoError> for MedicalAgencyError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Store(e) => e.into(),
            RepoError::Json(e) => MedicalAgencyError::SerializationError(e.to_string()),
            RepoError::Corrupt { key } => MedicalAgencyError::CorruptData(key),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedicalAgencyError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedicalAgencyError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a store at the given path.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<MedicalAgencyCore>, MedicalAgencyError> {
    let store = SqliteStore::open(&path)?;
    tracing::info!(path = %path, "Opened store");
    Ok(MedicalAgencyCore::with_store(
        Box::new(store),
        CoreConfig::from_env(),
    ))
}

/// Create a volatile in-memory store (for testing and demos).
#[uniffi::export]
pub fn open_store_in_memory() -> Arc<MedicalAgencyCore> {
    MedicalAgencyCore::with_store(Box::new(MemoryStore::new()), CoreConfig::from_env())
}

/// Install the log subscriber. Returns `false` if one was already installed.
#[uniffi::export]
pub fn enable_logging(filter: Option<String>) -> bool {
    config::init_logging(filter.as_deref())
}

/// `"2030-01-15"` → `"January 15, 2030"`.
#[uniffi::export]
pub fn display_date(date: String) -> String {
    format::format_date(&date)
}

/// `"14:05"` → `"2:05 PM"`.
#[uniffi::export]
pub fn display_time(time: String) -> String {
    format::format_time(&time)
}

// =========================================================================
// Main API Object
// =========================================================================

type SharedStore = Box<dyn KeyValueStore + Send>;

/// Thread-safe store wrapper for FFI.
///
/// The mutex is held for the whole of each call so that every
/// read-modify-write of a collection runs without interleaving.
#[derive(uniffi::Object)]
pub struct MedicalAgencyCore {
    store: Arc<Mutex<SharedStore>>,
    config: CoreConfig,
}

impl MedicalAgencyCore {
    /// Wrap any store backend.
    pub fn with_store(store: SharedStore, config: CoreConfig) -> Arc<Self> {
        Arc::new(Self {
            store: Arc::new(Mutex::new(store)),
            config,
        })
    }

    fn patients<'a>(&self, store: &'a dyn KeyValueStore) -> PatientRepository<'a> {
        PatientRepository::with_key(store, self.config.patients_key.as_str())
    }

    fn reservations<'a>(&self, store: &'a dyn KeyValueStore) -> ReservationRepository<'a> {
        ReservationRepository::with_key(store, self.config.reservations_key.as_str())
    }
}

#[uniffi::export]
impl MedicalAgencyCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// All patients, newest first.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let patients = self.patients(&**store).list()?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: String) -> Result<Option<FfiPatient>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let patient = self.patients(&**store).get_by_id(&patient_id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// Search patients by name.
    pub fn search_patients(&self, query: String) -> Result<Vec<FfiPatient>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let patients = self.patients(&**store).search(&query)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Create a patient. Call `validate_patient` first.
    pub fn create_patient(&self, form: FfiPatientForm) -> Result<FfiPatient, MedicalAgencyError> {
        let store = self.store.lock()?;
        let patient = self.patients(&**store).create(form.into())?;
        Ok(patient.into())
    }

    /// Update the provided fields of a patient.
    pub fn update_patient(
        &self,
        patient_id: String,
        update: FfiPatientUpdate,
    ) -> Result<Option<FfiPatient>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let patient = self.patients(&**store).update(&patient_id, update.into())?;
        Ok(patient.map(|p| p.into()))
    }

    /// Delete a patient. With `cascade`, its reservations are deleted too;
    /// otherwise they are left orphaned.
    pub fn delete_patient(&self, patient_id: String, cascade: bool) -> Result<bool, MedicalAgencyError> {
        let store = self.store.lock()?;
        if !cascade {
            return Ok(self.patients(&**store).delete(&patient_id)?);
        }
        let removed = repo::delete_patient_cascade(
            &self.patients(&**store),
            &self.reservations(&**store),
            &patient_id,
        )?;
        if let Some(removed) = removed {
            tracing::info!(patient_id = %patient_id, removed, "Cascaded patient deletion");
        }
        Ok(removed.is_some())
    }

    /// Validate a patient form.
    pub fn validate_patient(&self, form: FfiPatientForm) -> FfiValidationResult {
        validation::validate_patient(&form.into()).into()
    }

    // =========================================================================
    // Reservation Operations
    // =========================================================================

    /// All reservations, newest first.
    pub fn list_reservations(&self) -> Result<Vec<FfiReservation>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let reservations = self.reservations(&**store).list()?;
        Ok(reservations.into_iter().map(|r| r.into()).collect())
    }

    /// Reservations booked for one patient.
    pub fn list_reservations_for_patient(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiReservation>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let reservations = self.reservations(&**store).list_by_patient(&patient_id)?;
        Ok(reservations.into_iter().map(|r| r.into()).collect())
    }

    /// Get a reservation by ID.
    pub fn get_reservation(
        &self,
        reservation_id: String,
    ) -> Result<Option<FfiReservation>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let reservation = self.reservations(&**store).get_by_id(&reservation_id)?;
        Ok(reservation.map(|r| r.into()))
    }

    /// Create a reservation. Call `validate_reservation` first.
    pub fn create_reservation(
        &self,
        form: FfiReservationForm,
    ) -> Result<FfiReservation, MedicalAgencyError> {
        let store = self.store.lock()?;
        let reservation = self.reservations(&**store).create(form.into())?;
        Ok(reservation.into())
    }

    /// Update the provided fields of a reservation.
    pub fn update_reservation(
        &self,
        reservation_id: String,
        update: FfiReservationUpdate,
    ) -> Result<Option<FfiReservation>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let reservation = self
            .reservations(&**store)
            .update(&reservation_id, update.into())?;
        Ok(reservation.map(|r| r.into()))
    }

    /// Delete a reservation.
    pub fn delete_reservation(&self, reservation_id: String) -> Result<bool, MedicalAgencyError> {
        let store = self.store.lock()?;
        Ok(self.reservations(&**store).delete(&reservation_id)?)
    }

    /// Validate a reservation form. Pass `exclude_id` when editing.
    pub fn validate_reservation(
        &self,
        form: FfiReservationForm,
        exclude_id: Option<String>,
    ) -> Result<FfiValidationResult, MedicalAgencyError> {
        let store = self.store.lock()?;
        let validator =
            Validator::with_repositories(self.patients(&**store), self.reservations(&**store));
        let result = validator.validate_reservation(&form.into(), exclude_id.as_deref())?;
        Ok(result.into())
    }

    // =========================================================================
    // Dashboard Operations
    // =========================================================================

    /// Headline counts.
    pub fn dashboard_stats(&self) -> Result<FfiDashboardStats, MedicalAgencyError> {
        let store = self.store.lock()?;
        let stats = self.dashboard(&**store).stats()?;
        Ok(stats.into())
    }

    /// Soonest upcoming reservations; defaults to the configured limit.
    pub fn upcoming_reservations(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<FfiReservation>, MedicalAgencyError> {
        let limit = limit.map_or(self.config.upcoming_limit, |l| l as usize);
        let store = self.store.lock()?;
        let reservations = self.dashboard(&**store).upcoming_reservations(limit)?;
        Ok(reservations.into_iter().map(|r| r.into()).collect())
    }

    /// Reservations whose patient was deleted.
    pub fn orphaned_reservations(&self) -> Result<Vec<FfiReservation>, MedicalAgencyError> {
        let store = self.store.lock()?;
        let reservations = self.dashboard(&**store).orphaned_reservations()?;
        Ok(reservations.into_iter().map(|r| r.into()).collect())
    }
}

impl MedicalAgencyCore {
    fn dashboard<'a>(&self, store: &'a dyn KeyValueStore) -> Dashboard<'a> {
        Dashboard::with_repositories(self.patients(store), self.reservations(store))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiPatient {
    pub patient_id: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub contact_information: String,
    pub medical_notes: Option<String>,
    pub created_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            patient_id: patient.patient_id,
            full_name: patient.full_name,
            date_of_birth: patient.date_of_birth,
            contact_information: patient.contact_information,
            medical_notes: patient.medical_notes,
            created_at: patient.created_at,
        }
    }
}

/// FFI-safe patient form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientForm {
    pub full_name: String,
    pub date_of_birth: String,
    pub contact_information: String,
    pub medical_notes: Option<String>,
}

impl From<FfiPatientForm> for PatientForm {
    fn from(form: FfiPatientForm) -> Self {
        PatientForm {
            full_name: form.full_name,
            date_of_birth: form.date_of_birth,
            contact_information: form.contact_information,
            medical_notes: form.medical_notes,
        }
    }
}

/// FFI-safe partial patient update. A blank `medical_notes` clears the notes.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientUpdate {
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub contact_information: Option<String>,
    pub medical_notes: Option<String>,
}

impl From<FfiPatientUpdate> for PatientUpdate {
    fn from(update: FfiPatientUpdate) -> Self {
        PatientUpdate {
            full_name: update.full_name,
            date_of_birth: update.date_of_birth,
            contact_information: update.contact_information,
            medical_notes: update.medical_notes.map(non_blank),
        }
    }
}

/// FFI-safe reservation.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiReservation {
    pub reservation_id: String,
    pub patient_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub reason: Option<String>,
    pub created_at: String,
}

impl From<Reservation> for FfiReservation {
    fn from(reservation: Reservation) -> Self {
        Self {
            reservation_id: reservation.reservation_id,
            patient_id: reservation.patient_id,
            appointment_date: reservation.appointment_date,
            appointment_time: reservation.appointment_time,
            reason: reservation.reason,
            created_at: reservation.created_at,
        }
    }
}

/// FFI-safe reservation form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReservationForm {
    pub patient_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub reason: Option<String>,
}

impl From<FfiReservationForm> for ReservationForm {
    fn from(form: FfiReservationForm) -> Self {
        ReservationForm {
            patient_id: form.patient_id,
            appointment_date: form.appointment_date,
            appointment_time: form.appointment_time,
            reason: form.reason,
        }
    }
}

/// FFI-safe partial reservation update. A blank `reason` clears it.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiReservationUpdate {
    pub patient_id: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub reason: Option<String>,
}

impl From<FfiReservationUpdate> for ReservationUpdate {
    fn from(update: FfiReservationUpdate) -> Self {
        ReservationUpdate {
            patient_id: update.patient_id,
            appointment_date: update.appointment_date,
            appointment_time: update.appointment_time,
            reason: update.reason.map(non_blank),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

/// FFI-safe validation outcome, keyed by camelCase field name.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiValidationResult {
    pub is_valid: bool,
    pub field_errors: HashMap<String, String>,
}

impl From<ValidationResult> for FfiValidationResult {
    fn from(result: ValidationResult) -> Self {
        Self {
            is_valid: result.is_valid(),
            field_errors: result
                .field_errors
                .into_iter()
                .map(|(field, message)| (field.as_str().to_string(), message))
                .collect(),
        }
    }
}

/// FFI-safe dashboard statistics.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiDashboardStats {
    pub total_patients: u32,
    pub total_reservations: u32,
    pub upcoming: u32,
    pub today: u32,
}

impl From<DashboardStats> for FfiDashboardStats {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_patients: saturating_u32(stats.total_patients),
            total_reservations: saturating_u32(stats.total_reservations),
            upcoming: saturating_u32(stats.upcoming),
            today: saturating_u32(stats.today),
        }
    }
}

fn saturating_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
