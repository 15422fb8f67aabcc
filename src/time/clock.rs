//! Day clock and slot codec.

use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;

use crate::error::PlanError;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Day bounds and slot length used to discretize a planning day.
///
/// Times are stored as minutes after midnight. The horizon `H` is the
/// number of whole slots between day start and day end.
///
/// # Examples
///
/// ```
/// use u_dayplan::time::DayClock;
///
/// let clock = DayClock::default(); // 08:00–22:00, 5-minute slots
/// assert_eq!(clock.horizon(), 168);
/// assert_eq!(clock.to_slot("09:30").unwrap(), 18);
/// assert_eq!(clock.slot_to_hhmm(18), "09:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayClock {
    /// Day start, minutes after midnight. Must fall on a whole hour.
    pub day_start_min: i64,
    /// Day end, minutes after midnight.
    pub day_end_min: i64,
    /// Slot length in minutes.
    pub slot_min: i64,
}

impl Default for DayClock {
    fn default() -> Self {
        Self {
            day_start_min: 8 * 60,
            day_end_min: 22 * 60,
            slot_min: 5,
        }
    }
}

impl DayClock {
    /// Creates a clock from `"HH:MM"` day bounds.
    pub fn from_hhmm(day_start: &str, day_end: &str, slot_min: i64) -> Result<Self, PlanError> {
        let (sh, sm) = parse_hhmm(day_start)?;
        let (eh, em) = parse_hhmm(day_end)?;
        let clock = Self {
            day_start_min: sh * 60 + sm,
            day_end_min: eh * 60 + em,
            slot_min,
        };
        clock.validate().map_err(PlanError::Config)?;
        Ok(clock)
    }

    pub fn with_slot_minutes(mut self, slot_min: i64) -> Self {
        self.slot_min = slot_min;
        self
    }

    /// Validates the clock.
    ///
    /// Slot arithmetic is exact only when the day starts on a whole hour,
    /// the slot length divides an hour, and the day ends before midnight.
    pub fn validate(&self) -> Result<(), String> {
        if self.slot_min <= 0 || 60 % self.slot_min != 0 {
            return Err(format!(
                "slot_min must divide 60, got {}",
                self.slot_min
            ));
        }
        if self.day_start_min < 0 || self.day_start_min % 60 != 0 {
            return Err("day start must fall on a whole hour".into());
        }
        if self.day_end_min <= self.day_start_min {
            return Err("day end must be after day start".into());
        }
        if self.day_end_min >= MINUTES_PER_DAY {
            return Err("day end must be before midnight".into());
        }
        Ok(())
    }

    /// Number of slots in the day (`H`).
    pub fn horizon(&self) -> i64 {
        (self.day_end_min - self.day_start_min) / self.slot_min
    }

    /// Converts `"HH:MM"` to a slot index relative to the day start.
    ///
    /// Times before the day start map to negative slots; callers clamp.
    pub fn to_slot(&self, hhmm: &str) -> Result<i64, PlanError> {
        let (hour, minute) = parse_hhmm(hhmm)?;
        let start_hour = self.day_start_min / 60;
        Ok(((hour - start_hour) * 60).div_euclid(self.slot_min) + minute.div_euclid(self.slot_min))
    }

    /// Converts a slot index back to `"HH:MM"`, wrapping past midnight.
    pub fn slot_to_hhmm(&self, slot: i64) -> String {
        let offset =
            (self.day_start_min + slot.rem_euclid(MINUTES_PER_DAY) * self.slot_min) % MINUTES_PER_DAY;
        NaiveTime::from_num_seconds_from_midnight_opt((offset * 60) as u32, 0)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default()
    }

    /// Whole slots needed to cover `minutes` (ceiling), saturating for
    /// absurdly large inputs.
    pub fn ceil_slots(&self, minutes: i64) -> i64 {
        minutes
            .saturating_add(self.slot_min - 1)
            .div_euclid(self.slot_min)
    }

    /// Slot count occupied by a task of `duration_min` minutes.
    ///
    /// At least one slot. Durations longer than the day are capped one slot
    /// past the horizon, which no window admits.
    pub fn duration_slots(&self, duration_min: i64) -> i64 {
        self.ceil_slots(duration_min)
            .min(self.horizon().max(0) + 1)
            .max(1)
    }

    /// Minutes spanned by `slots` slots.
    pub fn minutes(&self, slots: i64) -> i64 {
        slots * self.slot_min
    }
}

fn strict_hhmm() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}:\d{2}$").ok()).as_ref()
}

/// Strict `"H:MM"` / `"HH:MM"` parser returning `(hour, minute)`.
pub(crate) fn parse_hhmm(raw: &str) -> Result<(i64, i64), PlanError> {
    let err = || PlanError::TimeFormat(raw.to_string());
    let trimmed = raw.trim();
    if !strict_hhmm().is_some_and(|re| re.is_match(trimmed)) {
        return Err(err());
    }

    let time = NaiveTime::parse_from_str(&format!("{trimmed:0>5}"), "%H:%M").map_err(|_| err())?;
    Ok((i64::from(time.hour()), i64::from(time.minute())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_horizon() {
        let clock = DayClock::default();
        assert!(clock.validate().is_ok());
        assert_eq!(clock.horizon(), 168);
    }

    #[test]
    fn test_to_slot() {
        let clock = DayClock::default();
        assert_eq!(clock.to_slot("08:00").unwrap(), 0);
        assert_eq!(clock.to_slot("09:00").unwrap(), 12);
        assert_eq!(clock.to_slot("09:07").unwrap(), 13);
        assert_eq!(clock.to_slot("22:00").unwrap(), 168);
        assert_eq!(clock.to_slot("7:00").unwrap(), -12);
    }

    #[test]
    fn test_slot_to_hhmm() {
        let clock = DayClock::default();
        assert_eq!(clock.slot_to_hhmm(0), "08:00");
        assert_eq!(clock.slot_to_hhmm(7), "08:35");
        assert_eq!(clock.slot_to_hhmm(168), "22:00");
        // 08:00 + 200 * 5 min = 00:40 next day
        assert_eq!(clock.slot_to_hhmm(200), "00:40");
    }

    #[test]
    fn test_roundtrip_whole_horizon() {
        let clock = DayClock::default();
        for s in 0..=clock.horizon() {
            assert_eq!(clock.to_slot(&clock.slot_to_hhmm(s)).unwrap(), s);
        }
    }

    #[test]
    fn test_bad_format() {
        let clock = DayClock::default();
        for raw in ["", "9", "9:5", "ab:cd", "24:00", "10:60", "100:00", "10-30"] {
            assert!(
                matches!(clock.to_slot(raw), Err(PlanError::TimeFormat(_))),
                "expected format error for {raw:?}"
            );
        }
    }

    #[test]
    fn test_slot_rounding() {
        let clock = DayClock::default();
        assert_eq!(clock.ceil_slots(0), 0);
        assert_eq!(clock.ceil_slots(1), 1);
        assert_eq!(clock.ceil_slots(10), 2);
        assert_eq!(clock.ceil_slots(11), 3);
        assert_eq!(clock.duration_slots(0), 1);
        assert_eq!(clock.duration_slots(30), 6);
        assert_eq!(clock.minutes(6), 30);
    }

    #[test]
    fn test_huge_minutes_saturate() {
        let clock = DayClock::default();
        assert_eq!(clock.ceil_slots(i64::MAX), i64::MAX / 5);
        assert_eq!(clock.duration_slots(i64::MAX), 169);
        assert_eq!(clock.duration_slots(14 * 60), 168);
        assert_eq!(clock.duration_slots(14 * 60 + 1), 169);
    }

    #[test]
    fn test_from_hhmm() {
        let clock = DayClock::from_hhmm("07:00", "19:00", 15).unwrap();
        assert_eq!(clock.horizon(), 48);
        assert_eq!(clock.to_slot("07:45").unwrap(), 3);

        assert!(DayClock::from_hhmm("07:30", "19:00", 5).is_err());
        assert!(DayClock::from_hhmm("10:00", "09:00", 5).is_err());
        assert!(DayClock::from_hhmm("08:00", "22:00", 7).is_err());
    }
}
