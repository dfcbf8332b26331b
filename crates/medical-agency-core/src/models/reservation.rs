//! Reservation models.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// An appointment booked against a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// UUID generated at creation, immutable
    pub reservation_id: String,
    /// Non-owning reference to a patient; may dangle after patient deletion
    pub patient_id: String,
    /// Appointment date (YYYY-MM-DD)
    pub appointment_date: String,
    /// Appointment time (HH:MM)
    pub appointment_time: String,
    /// Reason for the visit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Creation timestamp (RFC 3339), immutable
    pub created_at: String,
}

/// User-entered reservation fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
    pub patient_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Partial reservation update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationUpdate {
    pub patient_id: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    /// `Some(None)` clears the reason
    pub reason: Option<Option<String>>,
}

/// Combine a `YYYY-MM-DD` date and an `HH:MM` (or `HH:MM:SS`) time.
pub fn parse_appointment(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = time.trim();
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    Some(date.and_time(time))
}

impl Reservation {
    /// Create a new reservation from form input with a fresh id and timestamp.
    pub fn from_form(form: ReservationForm) -> Self {
        Self {
            reservation_id: uuid::Uuid::new_v4().to_string(),
            patient_id: form.patient_id,
            appointment_date: form.appointment_date,
            appointment_time: form.appointment_time,
            reason: form.reason,
            created_at: super::now_timestamp(),
        }
    }

    /// Form fields of this record, e.g. to prefill an edit form.
    pub fn to_form(&self) -> ReservationForm {
        ReservationForm {
            patient_id: self.patient_id.clone(),
            appointment_date: self.appointment_date.clone(),
            appointment_time: self.appointment_time.clone(),
            reason: self.reason.clone(),
        }
    }

    /// Local date-time of the appointment, if date and time parse.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        parse_appointment(&self.appointment_date, &self.appointment_time)
    }

    /// Whether the appointment is strictly before `now`.
    pub fn is_past_at(&self, now: NaiveDateTime) -> bool {
        self.scheduled_at().is_some_and(|at| at < now)
    }

    /// Whether the appointment is strictly after `now`.
    pub fn is_upcoming_at(&self, now: NaiveDateTime) -> bool {
        self.scheduled_at().is_some_and(|at| at > now)
    }

    /// Whether this reservation occupies the given patient/date/time slot.
    pub fn matches_slot(&self, patient_id: &str, date: &str, time: &str) -> bool {
        self.patient_id == patient_id
            && self.appointment_date == date
            && self.appointment_time == time
    }
}

impl ReservationUpdate {
    /// Overwrite the named fields on `reservation`. Id and timestamp never change.
    pub fn apply_to(self, reservation: &mut Reservation) {
        if let Some(patient_id) = self.patient_id {
            reservation.patient_id = patient_id;
        }
        if let Some(appointment_date) = self.appointment_date {
            reservation.appointment_date = appointment_date;
        }
        if let Some(appointment_time) = self.appointment_time {
            reservation.appointment_time = appointment_time;
        }
        if let Some(reason) = self.reason {
            reservation.reason = reason;
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<ReservationForm> for ReservationUpdate {
    /// Full overwrite with every form field.
    fn from(form: ReservationForm) -> Self {
        Self {
            patient_id: Some(form.patient_id),
            appointment_date: Some(form.appointment_date),
            appointment_time: Some(form.appointment_time),
            reason: Some(form.reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        parse_appointment(date, time).unwrap()
    }

    fn reservation(date: &str, time: &str) -> Reservation {
        Reservation::from_form(ReservationForm {
            patient_id: "P1".into(),
            appointment_date: date.into(),
            appointment_time: time.into(),
            reason: Some("Checkup".into()),
        })
    }

    #[test]
    fn test_parse_appointment() {
        let dt = at("2030-01-01", "10:00");
        assert_eq!(dt.to_string(), "2030-01-01 10:00:00");
        assert!(parse_appointment("2030-01-01", "10:00:30").is_some());
        assert!(parse_appointment("2030-13-01", "10:00").is_none());
        assert!(parse_appointment("2030-01-01", "25:00").is_none());
        assert!(parse_appointment("", "10:00").is_none());
    }

    #[test]
    fn test_past_and_upcoming() {
        let res = reservation("2030-01-01", "10:00");
        let before = at("2029-12-31", "23:59");
        let after = at("2030-01-01", "10:01");

        assert!(res.is_upcoming_at(before));
        assert!(!res.is_past_at(before));
        assert!(res.is_past_at(after));

        // The exact instant is neither past nor upcoming
        let exact = at("2030-01-01", "10:00");
        assert!(!res.is_past_at(exact));
        assert!(!res.is_upcoming_at(exact));
    }

    #[test]
    fn test_unparseable_is_neither() {
        let res = reservation("not-a-date", "10:00");
        let now = at("2024-01-01", "00:00");
        assert!(!res.is_past_at(now));
        assert!(!res.is_upcoming_at(now));
    }

    #[test]
    fn test_matches_slot_is_exact() {
        let res = reservation("2030-01-01", "10:00");
        assert!(res.matches_slot("P1", "2030-01-01", "10:00"));
        // String equality, not time equality
        assert!(!res.matches_slot("P1", "2030-01-01", "10:00:00"));
        assert!(!res.matches_slot("P2", "2030-01-01", "10:00"));
    }

    #[test]
    fn test_json_shape() {
        let res = reservation("2030-01-01", "10:00");
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["patientId"], "P1");
        assert_eq!(json["appointmentDate"], "2030-01-01");
        assert_eq!(json["appointmentTime"], "10:00");
        assert_eq!(json["reason"], "Checkup");
        assert!(json["reservationId"].is_string());
    }

    #[test]
    fn test_update_from_form_overwrites_all() {
        let mut res = reservation("2030-01-01", "10:00");
        let id = res.reservation_id.clone();

        ReservationUpdate::from(ReservationForm {
            patient_id: "P2".into(),
            appointment_date: "2031-02-02".into(),
            appointment_time: "11:30".into(),
            reason: None,
        })
        .apply_to(&mut res);

        assert_eq!(res.reservation_id, id);
        assert_eq!(res.patient_id, "P2");
        assert_eq!(res.appointment_time, "11:30");
        assert_eq!(res.reason, None);
    }
}
