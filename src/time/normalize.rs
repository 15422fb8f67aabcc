//! Lenient time extraction for intake data.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::PlanError;

const ISO_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn embedded_time() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").ok()).as_ref()
}

/// Extracts a canonical `"HH:MM"` from loosely formatted input.
///
/// ISO datetimes such as `2024-05-01T09:30:00+08:00` are parsed as
/// datetimes first and keep their local wall-clock time. Anything else is
/// searched for the first `h:mm` occurrence (`"around 9:30 am"`). An
/// out-of-range hour or minute in that occurrence is an error rather than
/// a reason to keep scanning.
///
/// # Examples
///
/// ```
/// use u_dayplan::time::normalize_hhmm;
///
/// assert_eq!(normalize_hhmm("9:05").unwrap(), "09:05");
/// assert_eq!(normalize_hhmm("2024-05-01T13:30:00").unwrap(), "13:30");
/// assert!(normalize_hhmm("noon").is_err());
/// ```
pub fn normalize_hhmm(raw: &str) -> Result<String, PlanError> {
    let trimmed = raw.trim();
    if let Some(time) = parse_iso(trimmed) {
        return Ok(time.format("%H:%M").to_string());
    }

    let err = || PlanError::TimeFormat(raw.to_string());
    let caps = embedded_time()
        .and_then(|re| re.captures(trimmed))
        .ok_or_else(err)?;
    let hour: u32 = caps[1].parse().map_err(|_| err())?;
    let minute: u32 = caps[2].parse().map_err(|_| err())?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(err)?;
    Ok(time.format("%H:%M").to_string())
}

fn parse_iso(raw: &str) -> Option<NaiveTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.time());
    }
    ISO_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|dt| dt.time())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_forms() {
        assert_eq!(normalize_hhmm("09:30").unwrap(), "09:30");
        assert_eq!(normalize_hhmm(" 7:15 ").unwrap(), "07:15");
    }

    #[test]
    fn test_iso_datetime() {
        assert_eq!(normalize_hhmm("2024-05-01T09:30:00").unwrap(), "09:30");
        assert_eq!(normalize_hhmm("2024-05-01T09:30:00+08:00").unwrap(), "09:30");
        assert_eq!(normalize_hhmm("2024-05-01 18:05:00+08:00").unwrap(), "18:05");
        assert_eq!(normalize_hhmm("2024-05-01 18:05").unwrap(), "18:05");
    }

    #[test]
    fn test_embedded_in_text() {
        assert_eq!(normalize_hhmm("start at 14:45 sharp").unwrap(), "14:45");
        assert_eq!(normalize_hhmm("13:10 pm").unwrap(), "13:10");
        assert_eq!(normalize_hhmm("1:2:30").unwrap(), "02:30");
        // Only the two digits before the colon count as the hour.
        assert_eq!(normalize_hhmm("room 123:45").unwrap(), "23:45");
    }

    #[test]
    fn test_rejects() {
        assert!(normalize_hhmm("").is_err());
        assert!(normalize_hhmm("tomorrow").is_err());
        assert!(normalize_hhmm("9:5").is_err());
        assert!(normalize_hhmm("25:00").is_err());
        assert!(normalize_hhmm("10:75").is_err());
    }
}
