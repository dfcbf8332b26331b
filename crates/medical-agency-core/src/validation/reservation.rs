//! Reservation form rules.

use chrono::{Local, NaiveDateTime};

use super::{present, FieldKey, ValidationResult};
use crate::models::{parse_appointment, PatientForm, ReservationForm};
use crate::repo::{PatientRepository, RepoResult, ReservationRepository};
use crate::store::KeyValueStore;

pub const MSG_PATIENT_REQUIRED: &str = "Patient is required.";
pub const MSG_PATIENT_MISSING: &str = "Selected patient does not exist.";
pub const MSG_DATE_REQUIRED: &str = "Appointment date is required.";
pub const MSG_TIME_REQUIRED: &str = "Appointment time is required.";
pub const MSG_NOT_FUTURE: &str = "Appointment must be scheduled in the future.";
pub const MSG_DATETIME_INVALID: &str = "Appointment date or time is not valid.";
pub const MSG_DUPLICATE: &str =
    "A reservation already exists for this patient at the same date and time.";

/// Validation rules that consult the repositories read-only.
pub struct Validator<'a> {
    patients: PatientRepository<'a>,
    reservations: ReservationRepository<'a>,
}

impl<'a> Validator<'a> {
    /// Validator over the default storage keys of `store`.
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self::with_repositories(PatientRepository::new(store), ReservationRepository::new(store))
    }

    pub fn with_repositories(
        patients: PatientRepository<'a>,
        reservations: ReservationRepository<'a>,
    ) -> Self {
        Self {
            patients,
            reservations,
        }
    }

    /// See [`validate_patient`](super::validate_patient).
    pub fn validate_patient(&self, form: &PatientForm) -> ValidationResult {
        super::validate_patient(form)
    }

    /// Validate a reservation form against the local clock.
    pub fn validate_reservation(
        &self,
        form: &ReservationForm,
        exclude_id: Option<&str>,
    ) -> RepoResult<ValidationResult> {
        self.validate_reservation_at(form, exclude_id, Local::now().naive_local())
    }

    /// Validate a reservation form as of `now`.
    ///
    /// `exclude_id` names the reservation being edited so it does not count
    /// as its own duplicate.
    pub fn validate_reservation_at(
        &self,
        form: &ReservationForm,
        exclude_id: Option<&str>,
        now: NaiveDateTime,
    ) -> RepoResult<ValidationResult> {
        let mut result = ValidationResult::default();

        // Ids, dates and times are compared exactly as entered
        let patient_id = present(&form.patient_id).map(|_| form.patient_id.as_str());
        let date = present(&form.appointment_date).map(|_| form.appointment_date.as_str());
        let time = present(&form.appointment_time).map(|_| form.appointment_time.as_str());

        match patient_id {
            None => result.add(FieldKey::PatientId, MSG_PATIENT_REQUIRED),
            Some(id) => {
                if self.patients.get_by_id(id)?.is_none() {
                    result.add(FieldKey::PatientId, MSG_PATIENT_MISSING);
                }
            }
        }

        if date.is_none() {
            result.add(FieldKey::AppointmentDate, MSG_DATE_REQUIRED);
        }
        if time.is_none() {
            result.add(FieldKey::AppointmentTime, MSG_TIME_REQUIRED);
        }

        if let (Some(date), Some(time)) = (date, time) {
            match parse_appointment(date, time) {
                None => result.add(FieldKey::AppointmentDateTime, MSG_DATETIME_INVALID),
                Some(at) if at <= now => result.add(FieldKey::AppointmentDateTime, MSG_NOT_FUTURE),
                Some(_) => {}
            }

            if let Some(patient_id) = patient_id {
                if self
                    .reservations
                    .exists_duplicate(patient_id, date, time, exclude_id)?
                {
                    result.add(FieldKey::Duplicate, MSG_DUPLICATE);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn now() -> NaiveDateTime {
        parse_appointment("2026-06-15", "12:00").unwrap()
    }

    fn form(patient: &str, date: &str, time: &str) -> ReservationForm {
        ReservationForm {
            patient_id: patient.into(),
            appointment_date: date.into(),
            appointment_time: time.into(),
            reason: None,
        }
    }

    fn seed_patient(store: &MemoryStore) -> String {
        PatientRepository::new(store)
            .create(PatientForm {
                full_name: "Jane Doe".into(),
                date_of_birth: "1990-01-01".into(),
                ..Default::default()
            })
            .unwrap()
            .patient_id
    }

    #[test]
    fn test_valid_reservation() {
        let store = MemoryStore::new();
        let id = seed_patient(&store);
        let validator = Validator::new(&store);

        let result = validator
            .validate_reservation_at(&form(&id, "2026-06-15", "12:01"), None, now())
            .unwrap();
        assert!(result.is_valid(), "{:?}", result);
    }

    #[test]
    fn test_all_missing() {
        let store = MemoryStore::new();
        let validator = Validator::new(&store);

        let result = validator
            .validate_reservation_at(&form("", " ", ""), None, now())
            .unwrap();
        assert_eq!(result.error(FieldKey::PatientId), Some(MSG_PATIENT_REQUIRED));
        assert_eq!(result.error(FieldKey::AppointmentDate), Some(MSG_DATE_REQUIRED));
        assert_eq!(result.error(FieldKey::AppointmentTime), Some(MSG_TIME_REQUIRED));
        assert!(!result.has_error(FieldKey::AppointmentDateTime));
        assert!(!result.has_error(FieldKey::Duplicate));
    }

    #[test]
    fn test_now_is_not_future() {
        let store = MemoryStore::new();
        let id = seed_patient(&store);
        let validator = Validator::new(&store);

        let result = validator
            .validate_reservation_at(&form(&id, "2026-06-15", "12:00"), None, now())
            .unwrap();
        assert_eq!(result.error(FieldKey::AppointmentDateTime), Some(MSG_NOT_FUTURE));
    }

    #[test]
    fn test_unparseable_datetime() {
        let store = MemoryStore::new();
        let id = seed_patient(&store);
        let validator = Validator::new(&store);

        let result = validator
            .validate_reservation_at(&form(&id, "2026-02-30", "10:00"), None, now())
            .unwrap();
        assert_eq!(
            result.error(FieldKey::AppointmentDateTime),
            Some(MSG_DATETIME_INVALID)
        );
    }

    #[test]
    fn test_errors_accumulate() {
        let store = MemoryStore::new();
        let validator = Validator::new(&store);
        ReservationRepository::new(&store)
            .create(form("ghost", "2000-01-01", "10:00"))
            .unwrap();

        let result = validator
            .validate_reservation_at(&form("ghost", "2000-01-01", "10:00"), None, now())
            .unwrap();
        assert_eq!(result.error(FieldKey::PatientId), Some(MSG_PATIENT_MISSING));
        assert_eq!(result.error(FieldKey::AppointmentDateTime), Some(MSG_NOT_FUTURE));
        assert_eq!(result.error(FieldKey::Duplicate), Some(MSG_DUPLICATE));
    }
}
