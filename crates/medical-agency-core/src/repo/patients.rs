//! Patient repository.

use strsim::jaro_winkler;

use super::{load_for_write, load_or_empty, save, sort_newest_first, RepoResult};
use crate::config::PATIENTS_KEY;
use crate::models::{Patient, PatientForm, PatientUpdate};
use crate::store::KeyValueStore;

/// Minimum Jaro-Winkler similarity for a fuzzy name match.
const FUZZY_THRESHOLD: f64 = 0.85;

/// CRUD over the patient collection.
pub struct PatientRepository<'a> {
    pub(super) store: &'a dyn KeyValueStore,
    pub(super) key: String,
}

impl<'a> PatientRepository<'a> {
    /// Repository using the default storage key.
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self::with_key(store, PATIENTS_KEY)
    }

    /// Repository using a custom storage key.
    pub fn with_key(store: &'a dyn KeyValueStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// All patients, most recently created first.
    pub fn list(&self) -> RepoResult<Vec<Patient>> {
        let mut patients = load_or_empty::<Patient>(self.store, &self.key)?;
        sort_newest_first(&mut patients, |p| p.created_at.as_str());
        Ok(patients)
    }

    /// Get a patient by ID.
    pub fn get_by_id(&self, patient_id: &str) -> RepoResult<Option<Patient>> {
        let patients = load_or_empty::<Patient>(self.store, &self.key)?;
        Ok(patients.into_iter().find(|p| p.patient_id == patient_id))
    }

    /// Number of stored patients.
    pub fn count(&self) -> RepoResult<usize> {
        Ok(load_or_empty::<Patient>(self.store, &self.key)?.len())
    }

    /// Insert a new patient. Does not validate; run
    /// [`crate::validation::validate_patient`] first.
    pub fn create(&self, form: PatientForm) -> RepoResult<Patient> {
        let mut patients = load_for_write::<Patient>(self.store, &self.key)?;
        let patient = Patient::from_form(form);
        patients.push(patient.clone());
        save(self.store, &self.key, &patients)?;
        tracing::debug!(patient_id = %patient.patient_id, "Created patient");
        Ok(patient)
    }

    /// Merge the named fields onto an existing patient.
    pub fn update(&self, patient_id: &str, update: PatientUpdate) -> RepoResult<Option<Patient>> {
        let mut patients = load_for_write::<Patient>(self.store, &self.key)?;
        let Some(patient) = patients.iter_mut().find(|p| p.patient_id == patient_id) else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(patient.clone()));
        }
        update.apply_to(patient);
        let updated = patient.clone();
        save(self.store, &self.key, &patients)?;
        tracing::debug!(patient_id, "Updated patient");
        Ok(Some(updated))
    }

    /// Delete a patient. Reservations referencing it are left in place.
    pub fn delete(&self, patient_id: &str) -> RepoResult<bool> {
        let mut patients = load_for_write::<Patient>(self.store, &self.key)?;
        let Some(index) = patients.iter().position(|p| p.patient_id == patient_id) else {
            return Ok(false);
        };
        patients.remove(index);
        save(self.store, &self.key, &patients)?;
        tracing::debug!(patient_id, "Deleted patient");
        Ok(true)
    }

    /// Search patients by name.
    ///
    /// Case-insensitive substring matches come first (newest first), followed
    /// by fuzzy matches ordered by similarity. A blank query returns [`list`].
    ///
    /// [`list`]: Self::list
    pub fn search(&self, query: &str) -> RepoResult<Vec<Patient>> {
        let query = query.trim().to_lowercase();
        let patients = self.list()?;
        if query.is_empty() {
            return Ok(patients);
        }

        let mut exact = Vec::new();
        let mut fuzzy = Vec::new();
        for patient in patients {
            let name = patient.full_name.to_lowercase();
            if name.contains(&query) {
                exact.push(patient);
                continue;
            }
            let score = name
                .split_whitespace()
                .chain(std::iter::once(name.as_str()))
                .map(|part| jaro_winkler(part, &query))
                .fold(0.0, f64::max);
            if score >= FUZZY_THRESHOLD {
                fuzzy.push((score, patient));
            }
        }

        fuzzy.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        exact.extend(fuzzy.into_iter().map(|(_, p)| p));
        Ok(exact)
    }
}
