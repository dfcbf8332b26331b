//! Repositories over JSON collections in a [`KeyValueStore`].
//!
//! Every call reloads the whole collection, mutates it in memory and writes
//! it back under the same key. Callers sharing a store across threads must
//! serialize these read-modify-write sequences themselves.

mod patients;
mod reservations;

pub use patients::*;
pub use reservations::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Patient, Reservation};
use crate::store::{KeyValueStore, StoreError};

/// Repository errors.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stored collection under '{key}' is corrupt; refusing to overwrite")]
    Corrupt { key: String },
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Load a collection for reading. Malformed JSON yields an empty collection.
fn load_or_empty<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> RepoResult<Vec<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::warn!(key, error = %e, "Malformed collection in store, treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Load a collection for modification. Malformed JSON is an error so the
/// stored blob is never clobbered.
fn load_for_write<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> RepoResult<Vec<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    serde_json::from_str(&raw).map_err(|e| {
        tracing::warn!(key, error = %e, "Refusing to modify malformed collection");
        RepoError::Corrupt {
            key: key.to_string(),
        }
    })
}

/// Overwrite the whole collection.
fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, records: &[T]) -> RepoResult<()> {
    let json = serde_json::to_string(records)?;
    store.set(key, &json)?;
    tracing::debug!(key, count = records.len(), "Saved collection");
    Ok(())
}

/// Stable sort by creation time, newest first. Unparseable timestamps sink
/// to the end; ties keep storage order.
fn sort_newest_first<T>(records: &mut [T], created_at: impl Fn(&T) -> &str) {
    records.sort_by_key(|r| std::cmp::Reverse(crate::models::parse_timestamp(created_at(r))));
}

/// Delete a patient together with every reservation that references it.
///
/// Both collections are loaded before either is written, so a corrupt
/// collection aborts with nothing changed. If the reservation write fails
/// after the patient write succeeded, the previous patient collection is
/// written back. Returns `None` if the patient does not exist, otherwise the
/// number of reservations removed.
pub fn delete_patient_cascade(
    patients: &PatientRepository<'_>,
    reservations: &ReservationRepository<'_>,
    patient_id: &str,
) -> RepoResult<Option<usize>> {
    let previous = patients.store.get(&patients.key)?;
    let mut patient_list = load_for_write::<Patient>(patients.store, &patients.key)?;
    let mut reservation_list =
        load_for_write::<Reservation>(reservations.store, &reservations.key)?;

    let Some(index) = patient_list.iter().position(|p| p.patient_id == patient_id) else {
        return Ok(None);
    };
    patient_list.remove(index);

    let before = reservation_list.len();
    reservation_list.retain(|r| r.patient_id != patient_id);
    let removed = before - reservation_list.len();

    save(patients.store, &patients.key, &patient_list)?;
    if removed > 0 {
        if let Err(e) = save(reservations.store, &reservations.key, &reservation_list) {
            tracing::warn!(patient_id, error = %e, "Cascade failed, restoring patients");
            if let Some(raw) = previous {
                patients.store.set(&patients.key, &raw)?;
            }
            return Err(e);
        }
    }

    tracing::debug!(patient_id, removed, "Deleted patient with reservations");
    Ok(Some(removed))
}
