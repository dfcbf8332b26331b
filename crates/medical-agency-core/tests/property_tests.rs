//! Property tests for repository invariants.

use std::collections::HashSet;

use proptest::prelude::*;

use medical_agency_core::config::PATIENTS_KEY;
use medical_agency_core::models::{Patient, PatientForm, ReservationForm};
use medical_agency_core::repo::{PatientRepository, ReservationRepository};
use medical_agency_core::store::{KeyValueStore, MemoryStore};

fn stored_patient(index: usize, created_at: &str) -> Patient {
    Patient {
        patient_id: format!("p-{}", index),
        full_name: format!("Patient {}", index),
        date_of_birth: "1990-01-01".to_string(),
        contact_information: String::new(),
        medical_notes: None,
        created_at: created_at.to_string(),
    }
}

proptest! {
    #[test]
    fn created_ids_are_distinct(names in prop::collection::vec("[A-Za-z ]{1,12}", 1..20)) {
        let store = MemoryStore::new();
        let patients = PatientRepository::new(&store);
        let reservations = ReservationRepository::new(&store);

        let mut ids = HashSet::new();
        for name in &names {
            let patient = patients
                .create(PatientForm {
                    full_name: name.clone(),
                    date_of_birth: "1990-01-01".to_string(),
                    ..Default::default()
                })
                .unwrap();
            prop_assert!(ids.insert(patient.patient_id.clone()));

            let reservation = reservations
                .create(ReservationForm {
                    patient_id: patient.patient_id,
                    appointment_date: "2030-01-01".to_string(),
                    appointment_time: "10:00".to_string(),
                    reason: None,
                })
                .unwrap();
            prop_assert!(ids.insert(reservation.reservation_id));
        }
        prop_assert_eq!(patients.count().unwrap(), names.len());
    }

    #[test]
    fn list_is_newest_first(seconds in prop::collection::vec(0i64..4_000_000_000, 0..30)) {
        let store = MemoryStore::new();
        let stored: Vec<Patient> = seconds
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let ts = chrono::DateTime::from_timestamp(*s, 0).unwrap();
                stored_patient(i, &ts.to_rfc3339())
            })
            .collect();
        store
            .set(PATIENTS_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let listed = PatientRepository::new(&store).list().unwrap();
        prop_assert_eq!(listed.len(), stored.len());

        let times: Vec<_> = listed
            .iter()
            .map(|p| chrono::DateTime::parse_from_rfc3339(&p.created_at).unwrap())
            .collect();
        prop_assert!(times.windows(2).all(|w| w[0] >= w[1]));

        // Ties keep storage order
        for pair in listed.windows(2) {
            if pair[0].created_at == pair[1].created_at {
                let a: usize = pair[0].patient_id[2..].parse().unwrap();
                let b: usize = pair[1].patient_id[2..].parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }
}
