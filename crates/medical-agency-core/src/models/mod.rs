//! Domain models for the medical agency system.

mod patient;
mod reservation;

pub use patient::*;
pub use reservation::*;

/// Timestamp format for `created_at`, matching JavaScript `toISOString`.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Parse a `created_at` timestamp for ordering.
pub(crate) fn parse_timestamp(value: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc))
}
