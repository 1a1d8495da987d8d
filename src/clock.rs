//! Time-of-day helpers for the single simulated day.

use chrono::{NaiveTime, TimeDelta, Timelike};

use crate::error::ClockError;

/// Converts a distance into travel time at a constant speed.
///
/// Rounded to the millisecond. A non-positive speed yields zero so a
/// misconfigured vehicle still makes forward progress.
pub fn travel_time(distance: f64, speed: f64) -> TimeDelta {
    if speed <= 0.0 || !distance.is_finite() || distance <= 0.0 {
        return TimeDelta::zero();
    }
    let millis = (distance / speed * 3_600_000.0).round() as i64;
    TimeDelta::milliseconds(millis)
}

/// `t + delta`, or `None` if that would run past midnight.
///
/// The simulation covers a single day; a leg that ends tomorrow cannot be
/// stamped on today's clock.
pub fn advance(t: NaiveTime, delta: TimeDelta) -> Option<NaiveTime> {
    let (next, wrapped) = t.overflowing_add_signed(delta);
    (wrapped == 0).then_some(next)
}

/// Fractional hours since midnight.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_routing::clock::hours_of_day;
///
/// let t = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
/// assert!((hours_of_day(t) - 9.5).abs() < 1e-9);
/// ```
pub fn hours_of_day(t: NaiveTime) -> f64 {
    f64::from(t.num_seconds_from_midnight()) / 3600.0 + f64::from(t.nanosecond()) / 3.6e12
}

/// Minutes from `earlier` to `later` (negative when `later` is earlier).
pub fn minutes_between(earlier: NaiveTime, later: NaiveTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 60_000.0
}

/// Parses a strict `HH:MM` time of day.
pub fn parse_clock(text: &str) -> Result<NaiveTime, ClockError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").map_err(|_| ClockError(text.to_string()))
}

/// Builds a time of day from hour and minute literals known to be valid.
pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Formats a time of day as `HH:MM`.
pub fn format_clock(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Parses manifest deadline text.
///
/// Accepts `H:MM AM`, `HH:MM PM` and a bare `H:MM` (read as AM). `EOD`,
/// blank and unparseable text all mean "no deadline".
///
/// # Examples
///
/// ```
/// use parcel_routing::clock::parse_deadline;
///
/// assert_eq!(parse_deadline("10:30 AM").map(|t| t.to_string()), Some("10:30:00".into()));
/// assert_eq!(parse_deadline("12:15 PM").map(|t| t.to_string()), Some("12:15:00".into()));
/// assert!(parse_deadline("EOD").is_none());
/// assert!(parse_deadline("soon").is_none());
/// ```
pub fn parse_deadline(text: &str) -> Option<NaiveTime> {
    let upper = text.trim().to_ascii_uppercase();
    if upper.is_empty() || upper == "EOD" {
        return None;
    }

    let mut parts = upper.split_whitespace();
    let clock = parts.next()?;
    let meridiem = parts.next().unwrap_or("AM");

    let parsed = clock.split_once(':').and_then(|(h, m)| {
        let hour: u32 = h.parse().ok()?;
        let minute: u32 = m.parse().ok()?;
        let hour = match (meridiem, hour) {
            ("AM", 12) => 0,
            ("AM", h @ 0..=11) => h,
            ("PM", 12) => 12,
            ("PM", h @ 0..=11) => h + 12,
            _ => return None,
        };
        NaiveTime::from_hms_opt(hour, minute, 0)
    });

    if parsed.is_none() {
        log::warn!("unparseable deadline '{}', treating as end of day", text.trim());
    }
    parsed
}

/// Serde adapter storing a [`NaiveTime`] as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_clock(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_clock(&raw).map_err(serde::de::Error::custom)
    }

    /// Same format for optional values.
    pub mod option {
        use chrono::NaiveTime;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
            match t {
                Some(t) => super::serialize(t, s),
                None => s.serialize_none(),
            }
        }
    }
}
