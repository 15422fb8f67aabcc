//! Task model.

use std::collections::HashSet;

use crate::error::PlanError;
use crate::time::normalize_hhmm;

/// A task to place in the day.
///
/// Times are `"HH:MM"` wall-clock strings. `earliest` and `latest` bound the
/// whole task: it must start no earlier than `earliest` and finish no later
/// than `latest`.
///
/// Tasks are immutable inputs: solvers read them and never write back.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Location name (travel graph node).
    pub location: String,
    /// Earliest start, `"HH:MM"`.
    pub earliest: String,
    /// Latest finish, `"HH:MM"`.
    pub latest: String,
    /// Duration in minutes, must be positive.
    pub duration_min: i64,
    /// Fixed tasks must be scheduled; they are never dropped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fixed: bool,
    /// Value of scheduling the task (higher = more valuable).
    #[cfg_attr(feature = "serde", serde(default = "default_priority"))]
    pub priority: i64,
    /// Soft `[start, end]` windows the task should ideally start in.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefer_win: Vec<(String, String)>,
}

#[cfg(feature = "serde")]
fn default_priority() -> i64 {
    Task::DEFAULT_PRIORITY
}

impl Task {
    /// Priority given to tasks that do not declare one.
    pub const DEFAULT_PRIORITY: i64 = 3;

    /// Creates a movable task with default priority and no preferences.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
        earliest: impl Into<String>,
        latest: impl Into<String>,
        duration_min: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location: location.into(),
            earliest: earliest.into(),
            latest: latest.into(),
            duration_min,
            fixed: false,
            priority: Self::DEFAULT_PRIORITY,
            prefer_win: Vec::new(),
        }
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Adds a soft preference window for the start time.
    pub fn with_preferred_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.prefer_win.push((start.into(), end.into()));
        self
    }

    /// Rewrites every time field into canonical `"HH:MM"`.
    ///
    /// Intake layers call this once at the boundary so loosely formatted
    /// input (ISO datetimes, `"9:30"`) reaches the solvers in one shape.
    pub fn normalized(mut self) -> Result<Self, PlanError> {
        self.earliest = normalize_hhmm(&self.earliest)?;
        self.latest = normalize_hhmm(&self.latest)?;
        for (a, b) in &mut self.prefer_win {
            *a = normalize_hhmm(a)?;
            *b = normalize_hhmm(b)?;
        }
        Ok(self)
    }
}

/// Checks structural integrity of a task list: unique ids and positive
/// durations. Returns the first problem found.
pub fn validate_tasks(tasks: &[Task]) -> Result<(), PlanError> {
    let mut ids = HashSet::new();
    for task in tasks {
        if !ids.insert(task.id.as_str()) {
            return Err(PlanError::DuplicateTask(task.id.clone()));
        }
        if task.duration_min <= 0 {
            return Err(PlanError::InvalidDuration {
                task_id: task.id.clone(),
                duration_min: task.duration_min,
            });
        }
    }
    Ok(())
}
