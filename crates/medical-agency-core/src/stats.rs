//! Dashboard aggregates over patients and reservations.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::Reservation;
use crate::repo::{PatientRepository, RepoResult, ReservationRepository};
use crate::store::KeyValueStore;

/// Headline counts for the overview tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: usize,
    pub total_reservations: usize,
    /// Reservations strictly after now
    pub upcoming: usize,
    /// Reservations dated today, past or not
    pub today: usize,
}

/// Read-only aggregate queries.
pub struct Dashboard<'a> {
    patients: PatientRepository<'a>,
    reservations: ReservationRepository<'a>,
}

impl<'a> Dashboard<'a> {
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

    /// Counts as of the local clock. "Today" is the local calendar date.
    pub fn stats(&self) -> RepoResult<DashboardStats> {
        self.stats_at(Local::now().naive_local())
    }

    pub fn stats_at(&self, now: NaiveDateTime) -> RepoResult<DashboardStats> {
        let reservations = self.reservations.list()?;
        let today = now.date().format("%Y-%m-%d").to_string();

        Ok(DashboardStats {
            total_patients: self.patients.count()?,
            total_reservations: reservations.len(),
            upcoming: reservations.iter().filter(|r| r.is_upcoming_at(now)).count(),
            today: reservations
                .iter()
                .filter(|r| r.appointment_date.trim() == today)
                .count(),
        })
    }

    pub fn upcoming_reservations(&self, limit: usize) -> RepoResult<Vec<Reservation>> {
        self.upcoming_reservations_at(limit, Local::now().naive_local())
    }

    /// Reservations after `now`, soonest first, at most `limit`.
    pub fn upcoming_reservations_at(
        &self,
        limit: usize,
        now: NaiveDateTime,
    ) -> RepoResult<Vec<Reservation>> {
        let mut upcoming: Vec<_> = self
            .reservations
            .list()?
            .into_iter()
            .filter_map(|r| r.scheduled_at().filter(|at| *at > now).map(|at| (at, r)))
            .collect();
        upcoming.sort_by_key(|(at, _)| *at);
        Ok(upcoming.into_iter().take(limit).map(|(_, r)| r).collect())
    }

    /// Reservations whose patient no longer exists.
    pub fn orphaned_reservations(&self) -> RepoResult<Vec<Reservation>> {
        let known: HashSet<String> = self
            .patients
            .list()?
            .into_iter()
            .map(|p| p.patient_id)
            .collect();
        Ok(self
            .reservations
            .list()?
            .into_iter()
            .filter(|r| !known.contains(&r.patient_id))
            .collect())
    }
}
