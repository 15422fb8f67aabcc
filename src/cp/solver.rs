//! Solver-facing types: outcome status, assignments and limits.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::model::CpModel;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Search space exhausted; the solution is optimal.
    Optimal,
    /// A solution exists but the search stopped before proving it optimal.
    Feasible,
    /// Search space exhausted without a solution.
    Infeasible,
    /// The model uses something the solver cannot handle.
    ModelInvalid,
    /// Time limit hit before any solution.
    Timeout,
    /// Stopped without a solution for another reason (cancellation).
    Unknown,
}

/// Assignment of one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSolution {
    pub start: i64,
    pub end: i64,
    pub duration: i64,
    /// False for an optional interval left out.
    pub is_present: bool,
}

/// Result of one solve.
#[derive(Debug, Clone)]
pub struct CpSolution {
    pub status: SolverStatus,
    pub objective_value: Option<i64>,
    /// Keyed by interval name; empty unless a solution was found.
    pub intervals: HashMap<String, IntervalSolution>,
    pub int_vars: HashMap<String, i64>,
    /// Presence literal values.
    pub bool_vars: HashMap<String, bool>,
    pub solve_time_ms: i64,
    /// Search nodes explored.
    pub nodes: u64,
}

impl CpSolution {
    /// A solution carrying only `status`.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            intervals: HashMap::new(),
            int_vars: HashMap::new(),
            bool_vars: HashMap::new(),
            solve_time_ms: 0,
            nodes: 0,
        }
    }

    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Latest end over present intervals, 0 when none.
    pub fn max_end(&self) -> i64 {
        self.intervals
            .values()
            .filter(|s| s.is_present)
            .map(|s| s.end)
            .max()
            .unwrap_or(0)
    }
}

/// Search limits.
///
/// # Examples
///
/// ```
/// use u_dayplan::cp::SolverConfig;
///
/// let config = SolverConfig::default().with_time_limit_ms(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Wall-clock budget; the best solution so far is returned when it
    /// runs out.
    pub time_limit_ms: u64,
    /// Return the first complete schedule found.
    pub stop_after_first: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 5_000,
            stop_after_first: false,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms == 0 {
            return Err("time_limit_ms must be > 0".into());
        }
        Ok(())
    }
}

/// A backend able to solve a [`CpModel`].
///
/// Models a backend cannot handle come back as
/// [`SolverStatus::ModelInvalid`], never as a panic.
pub trait CpSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        self.solve_with_cancel(model, config, None)
    }

    /// Solves the model, stopping early when `cancel` is set.
    fn solve_with_cancel(
        &self,
        model: &CpModel,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> CpSolution;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(start: i64, duration: i64, is_present: bool) -> IntervalSolution {
        IntervalSolution {
            start,
            end: start + duration,
            duration,
            is_present,
        }
    }

    #[test]
    fn test_max_end_skips_absent() {
        let mut solution = CpSolution::empty(SolverStatus::Optimal);
        solution.intervals.insert("breakfast".into(), placed(0, 6, true));
        solution.intervals.insert("class".into(), placed(12, 18, true));
        solution.intervals.insert("nap".into(), placed(40, 12, false));

        assert_eq!(solution.max_end(), 30);
        assert_eq!(CpSolution::empty(SolverStatus::Infeasible).max_end(), 0);
    }

    #[test]
    fn test_config_limits() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_ms, 5_000);
        assert!(!config.stop_after_first);
        assert!(config.clone().with_stop_after_first(true).stop_after_first);
        assert!(config.with_time_limit_ms(0).validate().is_err());
    }

    #[test]
    fn test_status_found() {
        assert!(CpSolution::empty(SolverStatus::Feasible).is_solution_found());
        assert!(!CpSolution::empty(SolverStatus::Timeout).is_solution_found());
        assert!(!CpSolution::empty(SolverStatus::Unknown).is_solution_found());
    }
}
