//! Reservation repository.

use super::{load_for_write, load_or_empty, save, sort_newest_first, RepoResult};
use crate::config::RESERVATIONS_KEY;
use crate::models::{Reservation, ReservationForm, ReservationUpdate};
use crate::store::KeyValueStore;

/// CRUD over the reservation collection.
pub struct ReservationRepository<'a> {
    pub(super) store: &'a dyn KeyValueStore,
    pub(super) key: String,
}

impl<'a> ReservationRepository<'a> {
    /// Repository using the default storage key.
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self::with_key(store, RESERVATIONS_KEY)
    }

    /// Repository using a custom storage key.
    pub fn with_key(store: &'a dyn KeyValueStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    fn load(&self) -> RepoResult<Vec<Reservation>> {
        load_or_empty(self.store, &self.key)
    }

    /// All reservations, most recently created first.
    pub fn list(&self) -> RepoResult<Vec<Reservation>> {
        let mut reservations = self.load()?;
        sort_newest_first(&mut reservations, |r| r.created_at.as_str());
        Ok(reservations)
    }

    /// Get a reservation by ID.
    pub fn get_by_id(&self, reservation_id: &str) -> RepoResult<Option<Reservation>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|r| r.reservation_id == reservation_id))
    }

    /// Reservations for one patient, in storage order.
    pub fn list_by_patient(&self, patient_id: &str) -> RepoResult<Vec<Reservation>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| r.patient_id == patient_id)
            .collect())
    }

    /// Number of stored reservations.
    pub fn count(&self) -> RepoResult<usize> {
        Ok(self.load()?.len())
    }

    /// Whether another reservation already holds this patient/date/time slot.
    ///
    /// Date and time are compared as strings. `exclude_id` skips the
    /// reservation being edited.
    pub fn exists_duplicate(
        &self,
        patient_id: &str,
        appointment_date: &str,
        appointment_time: &str,
        exclude_id: Option<&str>,
    ) -> RepoResult<bool> {
        Ok(self.load()?.iter().any(|r| {
            r.matches_slot(patient_id, appointment_date, appointment_time)
                && exclude_id != Some(r.reservation_id.as_str())
        }))
    }

    /// Insert a new reservation. Does not validate; run
    /// [`crate::validation::Validator::validate_reservation`] first.
    pub fn create(&self, form: ReservationForm) -> RepoResult<Reservation> {
        let mut reservations = load_for_write::<Reservation>(self.store, &self.key)?;
        let reservation = Reservation::from_form(form);
        reservations.push(reservation.clone());
        save(self.store, &self.key, &reservations)?;
        tracing::debug!(
            reservation_id = %reservation.reservation_id,
            patient_id = %reservation.patient_id,
            "Created reservation"
        );
        Ok(reservation)
    }

    /// Merge the named fields onto an existing reservation.
    pub fn update(
        &self,
        reservation_id: &str,
        update: ReservationUpdate,
    ) -> RepoResult<Option<Reservation>> {
        let mut reservations = load_for_write::<Reservation>(self.store, &self.key)?;
        let Some(reservation) = reservations
            .iter_mut()
            .find(|r| r.reservation_id == reservation_id)
        else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(reservation.clone()));
        }
        update.apply_to(reservation);
        let updated = reservation.clone();
        save(self.store, &self.key, &reservations)?;
        tracing::debug!(reservation_id, "Updated reservation");
        Ok(Some(updated))
    }

    /// Delete a reservation.
    pub fn delete(&self, reservation_id: &str) -> RepoResult<bool> {
        let mut reservations = load_for_write::<Reservation>(self.store, &self.key)?;
        let Some(index) = reservations
            .iter()
            .position(|r| r.reservation_id == reservation_id)
        else {
            return Ok(false);
        };
        reservations.remove(index);
        save(self.store, &self.key, &reservations)?;
        tracing::debug!(reservation_id, "Deleted reservation");
        Ok(true)
    }

    /// Delete every reservation for a patient. Returns how many were removed.
    pub fn delete_by_patient(&self, patient_id: &str) -> RepoResult<usize> {
        let mut reservations = load_for_write::<Reservation>(self.store, &self.key)?;
        let before = reservations.len();
        reservations.retain(|r| r.patient_id != patient_id);
        let removed = before - reservations.len();
        if removed > 0 {
            save(self.store, &self.key, &reservations)?;
            tracing::debug!(patient_id, removed, "Deleted reservations for patient");
        }
        Ok(removed)
    }
}
