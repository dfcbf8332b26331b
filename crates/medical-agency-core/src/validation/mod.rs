//! Form validation for patients and reservations.
//!
//! Every applicable rule runs; all resulting errors are reported together,
//! keyed by the form field they belong to. Validation never mutates a store.

mod patient;
mod reservation;

pub use patient::*;
pub use reservation::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key under which a validation message is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FullName,
    DateOfBirth,
    PatientId,
    AppointmentDate,
    AppointmentTime,
    /// Combined date and time
    AppointmentDateTime,
    /// Slot already taken by the same patient
    Duplicate,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::FullName => "fullName",
            FieldKey::DateOfBirth => "dateOfBirth",
            FieldKey::PatientId => "patientId",
            FieldKey::AppointmentDate => "appointmentDate",
            FieldKey::AppointmentTime => "appointmentTime",
            FieldKey::AppointmentDateTime => "appointmentDateTime",
            FieldKey::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub field_errors: BTreeMap<FieldKey, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// Message reported for `field`, if any.
    pub fn error(&self, field: FieldKey) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn has_error(&self, field: FieldKey) -> bool {
        self.field_errors.contains_key(&field)
    }

    /// Record an error, replacing any earlier message for the same field.
    fn add(&mut self, field: FieldKey, message: &str) {
        self.field_errors.insert(field, message.to_string());
    }
}

/// Treats whitespace-only input as absent.
fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_key_serializes_camel_case() {
        let json = serde_json::to_string(&FieldKey::AppointmentDateTime).unwrap();
        assert_eq!(json, "\"appointmentDateTime\"");
        assert_eq!(FieldKey::DateOfBirth.to_string(), "dateOfBirth");
    }

    #[test]
    fn test_result_json() {
        let mut result = ValidationResult::default();
        assert!(result.is_valid());

        result.add(FieldKey::FullName, "Patient name is required.");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fieldErrors"]["fullName"], "Patient name is required.");
        assert!(!result.is_valid());
    }

    #[test]
    fn test_present() {
        assert_eq!(present("  a "), Some("a"));
        assert_eq!(present(" \t"), None);
        assert_eq!(present(""), None);
    }
}
