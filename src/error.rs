//! Errors surfaced to planner callers.
//!
//! Only input problems are errors. Scheduling-level infeasibility
//! (dropped tasks, unsatisfiable fixed tasks, solver timeouts) is folded
//! into [`Plan`](crate::models::Plan) instead.

use thiserror::Error;

/// Error returned by the planning entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A wall-clock string could not be read as hour:minute.
    #[error("unrecognized time format: {0:?}")]
    TimeFormat(String),

    /// A task's window is inverted after clamping into the day horizon.
    #[error("invalid window for task '{title}': earliest > latest")]
    InvalidWindow {
        /// Offending task id.
        task_id: String,
        /// Offending task title.
        title: String,
    },

    /// A task declares a non-positive duration.
    #[error("task '{task_id}' must have a positive duration, got {duration_min} min")]
    InvalidDuration { task_id: String, duration_min: i64 },

    /// Two tasks share an id.
    #[error("duplicate task id: {0}")]
    DuplicateTask(String),

    /// A request carried no tasks.
    #[error("no tasks provided")]
    NoTasks,

    /// Planner configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PlanError {
    /// Whether the error was caused by the caller's input (a 400-class answer)
    /// rather than by the planner's own configuration.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, PlanError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_error_message() {
        let err = PlanError::InvalidWindow {
            task_id: "t1".into(),
            title: "Lunch".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid window for task 'Lunch': earliest > latest"
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_config_is_not_input_error() {
        let err = PlanError::Config("slot_min must be positive".into());
        assert!(!err.is_invalid_input());
    }
}
