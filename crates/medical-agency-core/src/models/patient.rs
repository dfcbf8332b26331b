//! Patient models.

use serde::{Deserialize, Serialize};

/// A patient record as persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// UUID generated at creation, immutable
    pub patient_id: String,
    /// Full name
    pub full_name: String,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: String,
    /// Phone, email or address, free text
    #[serde(default)]
    pub contact_information: String,
    /// Additional notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_notes: Option<String>,
    /// Creation timestamp (RFC 3339), immutable
    pub created_at: String,
}

/// User-entered patient fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientForm {
    pub full_name: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub contact_information: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_notes: Option<String>,
}

/// Partial patient update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientUpdate {
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub contact_information: Option<String>,
    /// `Some(None)` clears the notes
    pub medical_notes: Option<Option<String>>,
}

impl Patient {
    /// Create a new patient from form input with a fresh id and timestamp.
    pub fn from_form(form: PatientForm) -> Self {
        Self {
            patient_id: uuid::Uuid::new_v4().to_string(),
            full_name: form.full_name,
            date_of_birth: form.date_of_birth,
            contact_information: form.contact_information,
            medical_notes: form.medical_notes,
            created_at: super::now_timestamp(),
        }
    }

    /// Form fields of this record, e.g. to prefill an edit form.
    pub fn to_form(&self) -> PatientForm {
        PatientForm {
            full_name: self.full_name.clone(),
            date_of_birth: self.date_of_birth.clone(),
            contact_information: self.contact_information.clone(),
            medical_notes: self.medical_notes.clone(),
        }
    }
}

impl PatientUpdate {
    /// Overwrite the named fields on `patient`. Id and timestamp never change.
    pub fn apply_to(self, patient: &mut Patient) {
        if let Some(full_name) = self.full_name {
            patient.full_name = full_name;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            patient.date_of_birth = date_of_birth;
        }
        if let Some(contact_information) = self.contact_information {
            patient.contact_information = contact_information;
        }
        if let Some(medical_notes) = self.medical_notes {
            patient.medical_notes = medical_notes;
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<PatientForm> for PatientUpdate {
    /// Full overwrite with every form field.
    fn from(form: PatientForm) -> Self {
        Self {
            full_name: Some(form.full_name),
            date_of_birth: Some(form.date_of_birth),
            contact_information: Some(form.contact_information),
            medical_notes: Some(form.medical_notes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PatientForm {
        PatientForm {
            full_name: "Jane Doe".into(),
            date_of_birth: "1990-01-01".into(),
            contact_information: "555-0100".into(),
            medical_notes: None,
        }
    }

    #[test]
    fn test_from_form() {
        let patient = Patient::from_form(form());
        assert_eq!(patient.full_name, "Jane Doe");
        assert_eq!(patient.patient_id.len(), 36); // UUID format
        assert!(super::super::parse_timestamp(&patient.created_at).is_some());
        assert_eq!(patient.to_form(), form());
    }

    #[test]
    fn test_json_shape() {
        let mut patient = Patient::from_form(form());
        patient.patient_id = "p-1".into();
        patient.created_at = "2024-01-01T00:00:00.000Z".into();

        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["patientId"], "p-1");
        assert_eq!(json["fullName"], "Jane Doe");
        assert_eq!(json["dateOfBirth"], "1990-01-01");
        assert_eq!(json["contactInformation"], "555-0100");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00.000Z");
        assert!(json.get("medicalNotes").is_none());
    }

    #[test]
    fn test_update_only_named_fields() {
        let mut patient = Patient::from_form(form());
        let before = patient.clone();

        PatientUpdate {
            contact_information: Some("jane@example.com".into()),
            ..Default::default()
        }
        .apply_to(&mut patient);

        assert_eq!(patient.contact_information, "jane@example.com");
        assert_eq!(patient.full_name, before.full_name);
        assert_eq!(patient.patient_id, before.patient_id);
        assert_eq!(patient.created_at, before.created_at);
    }

    #[test]
    fn test_update_clears_notes() {
        let mut patient = Patient::from_form(PatientForm {
            medical_notes: Some("Penicillin allergy".into()),
            ..form()
        });

        PatientUpdate {
            medical_notes: Some(None),
            ..Default::default()
        }
        .apply_to(&mut patient);

        assert_eq!(patient.medical_notes, None);
    }
}
