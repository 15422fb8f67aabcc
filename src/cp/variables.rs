//! Decision variables of a [`CpModel`](super::CpModel).
//!
//! All bounds are in slots. Intervals own their start/end bounds and an
//! optional presence literal; scalar variables ([`IntVar`], [`BoolVar`])
//! are referenced by name from constraints and objective terms.

/// Bounded integer variable, e.g. the day's makespan.
#[derive(Debug, Clone)]
pub struct IntVar {
    pub name: String,
    /// Inclusive lower bound.
    pub min: i64,
    /// Inclusive upper bound.
    pub max: i64,
}

impl IntVar {
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }
}

/// Boolean literal; `fixed` pins its value before search.
#[derive(Debug, Clone)]
pub struct BoolVar {
    pub name: String,
    pub fixed: Option<bool>,
}

impl BoolVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: None,
        }
    }
}

/// Inclusive slot range of an interval endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeVar {
    pub min: i64,
    pub max: i64,
}

impl TimeVar {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

/// Fixed-length interval: a task occupying `[start, start + duration)`.
///
/// Optional intervals carry a presence literal. An absent interval takes
/// part in no constraint and contributes nothing to the objective.
///
/// # Examples
///
/// ```
/// use u_dayplan::cp::IntervalVar;
///
/// // a 6-slot task that may start from slot 12 and must end by slot 30
/// let lecture = IntervalVar::new("lecture", 12, 30, 6, 30);
/// assert_eq!(lecture.latest_start(), 24);
/// assert!(lecture.is_mandatory());
///
/// let gym = IntervalVar::new("gym", 0, 160, 12, 168).as_optional("p_gym");
/// assert!(!gym.is_mandatory());
/// assert!(gym.clone().with_presence(true).is_mandatory());
/// ```
#[derive(Debug, Clone)]
pub struct IntervalVar {
    pub name: String,
    pub start: TimeVar,
    pub end: TimeVar,
    pub duration: i64,
    pub is_optional: bool,
    /// Presence literal, set for optional intervals only.
    pub presence: Option<BoolVar>,
}

impl IntervalVar {
    /// Interval starting in `[start_min, start_max]` and ending by `end_max`.
    pub fn new(
        name: impl Into<String>,
        start_min: i64,
        start_max: i64,
        duration: i64,
        end_max: i64,
    ) -> Self {
        Self {
            name: name.into(),
            start: TimeVar::new(start_min, start_max),
            end: TimeVar::new(start_min + duration, end_max),
            duration,
            is_optional: false,
            presence: None,
        }
    }

    /// Marks the interval optional under the literal `presence_name`.
    pub fn as_optional(mut self, presence_name: impl Into<String>) -> Self {
        self.is_optional = true;
        self.presence = Some(BoolVar::new(presence_name));
        self
    }

    /// Pins the presence literal. No effect on a non-optional interval.
    pub fn with_presence(mut self, present: bool) -> Self {
        if let Some(literal) = self.presence.as_mut() {
            literal.fixed = Some(present);
        }
        self
    }

    pub fn is_mandatory(&self) -> bool {
        !self.is_optional || self.presence.as_ref().is_some_and(|p| p.fixed == Some(true))
    }

    pub fn is_forbidden(&self) -> bool {
        self.presence.as_ref().is_some_and(|p| p.fixed == Some(false))
    }

    /// Last start slot allowed by both the start range and `end.max`.
    /// Below `start.min` when no start fits.
    pub fn latest_start(&self) -> i64 {
        self.start.max.min(self.end.max - self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_bounds() {
        let iv = IntervalVar::new("lunch", 48, 60, 9, 66);
        assert_eq!(iv.end, TimeVar::new(57, 66));
        assert_eq!(iv.latest_start(), 57);
        assert!(iv.presence.is_none());
    }

    #[test]
    fn test_presence_literal() {
        let iv = IntervalVar::new("walk", 0, 100, 6, 168).as_optional("p_walk");
        assert_eq!(iv.presence.as_ref().map(|p| p.name.as_str()), Some("p_walk"));
        assert!(!iv.is_mandatory());
        assert!(!iv.is_forbidden());
        assert!(iv.clone().with_presence(false).is_forbidden());
        assert!(iv.with_presence(true).is_mandatory());
    }

    #[test]
    fn test_presence_ignored_when_not_optional() {
        let iv = IntervalVar::new("exam", 12, 12, 24, 36).with_presence(false);
        assert!(iv.is_mandatory());
        assert!(!iv.is_forbidden());
    }

    #[test]
    fn test_window_too_narrow() {
        let iv = IntervalVar::new("nap", 30, 30, 10, 35);
        assert!(iv.latest_start() < iv.start.min);
    }
}
