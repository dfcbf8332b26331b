//! Patient form rules.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use super::{present, FieldKey, ValidationResult};
use crate::models::PatientForm;

pub const MSG_NAME_REQUIRED: &str = "Patient name is required.";
pub const MSG_DOB_REQUIRED: &str = "Date of birth is required.";
pub const MSG_DOB_NOT_PAST: &str = "Date of birth must be in the past.";
pub const MSG_DOB_INVALID: &str = "Date of birth is not a valid date.";

/// Validate a patient form against the local clock.
pub fn validate_patient(form: &PatientForm) -> ValidationResult {
    validate_patient_at(form, Local::now().naive_local())
}

/// Validate a patient form as of `now`.
///
/// The birth date counts as its midnight, so today's date passes once the
/// day has started. `contactInformation` and `medicalNotes` carry no rules.
pub fn validate_patient_at(form: &PatientForm, now: NaiveDateTime) -> ValidationResult {
    let mut result = ValidationResult::default();

    if present(&form.full_name).is_none() {
        result.add(FieldKey::FullName, MSG_NAME_REQUIRED);
    }

    match present(&form.date_of_birth) {
        None => result.add(FieldKey::DateOfBirth, MSG_DOB_REQUIRED),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Err(_) => result.add(FieldKey::DateOfBirth, MSG_DOB_INVALID),
            Ok(dob) if dob.and_time(NaiveTime::MIN) >= now => {
                result.add(FieldKey::DateOfBirth, MSG_DOB_NOT_PAST)
            }
            Ok(_) => {}
        },
    }

    result
}
