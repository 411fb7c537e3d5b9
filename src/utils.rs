/// Utility functions for formatting
use std::time::Duration;
use time::{format_description, OffsetDateTime};

use crate::models::Tick;

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    match format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]") {
        Ok(format) => dt.format(&format).unwrap_or_else(|_| dt.to_string()),
        Err(_) => dt.to_string(),
    }
}

/// Convert a tick count to a std Duration
pub fn ticks_to_duration(ticks: Tick) -> Duration {
    Duration::from_millis(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_datetime() {
        let dt = OffsetDateTime::from_unix_timestamp(0).unwrap();
        assert_eq!(format_datetime(&dt), "01.01.1970 - 00:00:00");
    }

    #[test]
    fn ticks_are_milliseconds() {
        assert_eq!(ticks_to_duration(1500), Duration::from_millis(1500));
    }
}
