//! Reconciles the split pickup date/time fields stored upstream with the
//! single pickup instant used by the application.
//!
//! Fields are written as `%Y-%m-%d` and `%H:%M:%S` in the offset configured on
//! [`TransportConfig`]. Nothing here fails: unusable input degrades to empty
//! fields or to the clock's current instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::TransportConfig;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Pickup date and time as stored upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupFields {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Split an ISO-8601 instant into date and time fields.
///
/// Empty or unparseable input yields both fields as `None`.
pub fn split(timestamp: &str, config: &TransportConfig) -> PickupFields {
    match parse_instant(timestamp, config) {
        Some(instant) => split_instant(instant, config),
        None => {
            if !timestamp.trim().is_empty() {
                tracing::warn!(timestamp, "unparseable pickup timestamp, leaving fields empty");
            }
            PickupFields::default()
        }
    }
}

pub fn split_instant(instant: DateTime<Utc>, config: &TransportConfig) -> PickupFields {
    let local = instant.with_timezone(&config.utc_offset());
    PickupFields {
        date: Some(local.format(DATE_FORMAT).to_string()),
        time: Some(local.format(TIME_FORMAT).to_string()),
    }
}

/// Join optional date and time fields into one instant.
///
/// - both missing: `clock.now()`
/// - time missing: `config.default_pickup_time` on the given date
/// - date missing: the given time on the clock's current date
/// - anything unparseable: `clock.now()`
///
/// Blank strings count as missing.
pub fn join<C: Clock + ?Sized>(
    date: Option<&str>,
    time: Option<&str>,
    clock: &C,
    config: &TransportConfig,
) -> DateTime<Utc> {
    let now = clock.now();
    let offset = config.utc_offset();
    let date = date.map(str::trim).filter(|value| !value.is_empty());
    let time = time.map(str::trim).filter(|value| !value.is_empty());

    if date.is_none() && time.is_none() {
        return now;
    }

    let day = match date {
        Some(text) => match NaiveDate::parse_from_str(text, DATE_FORMAT) {
            Ok(day) => day,
            Err(err) => {
                tracing::warn!(date = text, %err, "unparseable pickup date, using current instant");
                return now;
            }
        },
        None => now.with_timezone(&offset).date_naive(),
    };

    let wall_clock = match time {
        Some(text) => match parse_time(text) {
            Some(wall_clock) => wall_clock,
            None => {
                tracing::warn!(time = text, "unparseable pickup time, using current instant");
                return now;
            }
        },
        None => config.default_pickup_time,
    };

    offset
        .from_local_datetime(&day.and_time(wall_clock))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Parse an instant. RFC 3339 is preferred; a bare `YYYY-MM-DDTHH:MM:SS` is
/// read in the configured offset.
pub fn parse_instant(value: &str, config: &TransportConfig) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| config.utc_offset().from_local_datetime(&naive).single())
        .map(|local| local.with_timezone(&Utc))
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clock() -> FixedClock {
        FixedClock(
            Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
                .single()
                .expect("valid instant"),
        )
    }

    fn ist() -> TransportConfig {
        TransportConfig {
            utc_offset_minutes: 330,
            ..TransportConfig::default()
        }
    }

    #[test]
    fn split_produces_canonical_fields() {
        let fields = split("2025-06-01T14:30:05Z", &TransportConfig::default());
        assert_eq!(fields.date.as_deref(), Some("2025-06-01"));
        assert_eq!(fields.time.as_deref(), Some("14:30:05"));
    }

    #[test]
    fn split_renders_in_configured_offset() {
        let fields = split("2025-06-01T20:00:00Z", &ist());
        assert_eq!(fields.date.as_deref(), Some("2025-06-02"));
        assert_eq!(fields.time.as_deref(), Some("01:30:00"));
    }

    #[test]
    fn split_tolerates_garbage() {
        let config = TransportConfig::default();
        assert_eq!(split("", &config), PickupFields::default());
        assert_eq!(split("next tuesday", &config), PickupFields::default());
    }

    #[test]
    fn missing_time_uses_midnight() {
        let joined = join(Some("2025-06-01"), None, &clock(), &TransportConfig::default());
        assert_eq!(joined.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn missing_date_uses_clock_date() {
        let joined = join(None, Some("18:45"), &clock(), &TransportConfig::default());
        assert_eq!(joined.to_rfc3339(), "2025-03-14T18:45:00+00:00");
    }

    #[test]
    fn both_missing_is_now() {
        let config = TransportConfig::default();
        assert_eq!(join(None, None, &clock(), &config), clock().0);
        assert_eq!(join(Some("  "), Some(""), &clock(), &config), clock().0);
    }

    #[test]
    fn unparseable_fields_fall_back_to_now() {
        let config = TransportConfig::default();
        assert_eq!(join(Some("2025-02-30"), Some("10:00"), &clock(), &config), clock().0);
        assert_eq!(join(Some("2025-02-03"), Some("25:00"), &clock(), &config), clock().0);
    }

    #[test]
    fn join_reads_fields_in_configured_offset() {
        let joined = join(Some("2025-06-01"), Some("05:30:00"), &clock(), &ist());
        assert_eq!(joined.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn fractional_seconds_are_dropped_on_split() {
        let config = TransportConfig::default();
        let joined = join(Some("2025-06-01"), Some("10:15:30.750"), &clock(), &config);
        let fields = split_instant(joined, &config);
        assert_eq!(fields.time.as_deref(), Some("10:15:30"));
    }

    #[test]
    fn naive_instants_use_configured_offset() {
        let parsed = parse_instant("2025-06-01T05:30:00", &ist()).expect("should parse");
        assert_eq!(parsed.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    proptest! {
        #[test]
        fn split_after_join_returns_inputs(
            year in 1950i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
            offset in -720i32..=840,
        ) {
            let config = TransportConfig { utc_offset_minutes: offset, ..TransportConfig::default() };
            let date = format!("{year:04}-{month:02}-{day:02}");
            let time = format!("{hour:02}:{minute:02}:{second:02}");

            let fields = split_instant(join(Some(date.as_str()), Some(time.as_str()), &clock(), &config), &config);
            prop_assert_eq!(fields.date, Some(date));
            prop_assert_eq!(fields.time, Some(time));
        }

        #[test]
        fn join_after_split_is_stable_to_the_second(seconds in 0i64..4_102_444_800) {
            let config = ist();
            let instant = DateTime::from_timestamp(seconds, 0).expect("in range");
            let fields = split_instant(instant, &config);
            let joined = join(fields.date.as_deref(), fields.time.as_deref(), &clock(), &config);
            prop_assert_eq!(joined, instant);
        }
    }
}
