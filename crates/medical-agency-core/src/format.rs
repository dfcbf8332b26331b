//! Display formatting for dates and times.

use chrono::{NaiveDate, NaiveTime};

/// `"2030-01-15"` → `"January 15, 2030"`. Unparseable input is returned as-is.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// `"14:05"` → `"2:05 PM"`. Unparseable input is returned as-is.
pub fn format_time(time: &str) -> String {
    let trimmed = time.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| time.to_string())
}
