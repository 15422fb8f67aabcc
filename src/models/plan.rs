//! Solver output.

/// One placed task, with wall-clock start and end.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledItem {
    pub id: String,
    pub title: String,
    pub loc: String,
    /// `"HH:MM"`.
    pub start: String,
    /// `"HH:MM"`.
    pub end: String,
}

/// How a plan was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlanStatus {
    /// Proven optimal (exact engine).
    Optimal,
    /// Feasible, not proven optimal.
    Feasible,
    /// Feasible for everything placed, but some fixed tasks could not be
    /// placed (heuristic engine).
    Degraded,
    /// No schedule honors every fixed task.
    Infeasible,
    /// Time budget ran out before any schedule was found.
    TimedOut,
    /// Solver could not run (invalid model, cancellation before a solution).
    Failed,
}

impl PlanStatus {
    /// Whether the plan's items come from an actual solution.
    pub fn has_solution(self) -> bool {
        matches!(
            self,
            PlanStatus::Optimal | PlanStatus::Feasible | PlanStatus::Degraded
        )
    }
}

/// A day plan: items ordered by start time plus diagnostics about the
/// tasks left out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    /// Scheduled items, ascending by start.
    pub items: Vec<ScheduledItem>,
    pub status: PlanStatus,
    /// Movable tasks left out of the plan.
    pub dropped: Vec<String>,
    /// Fixed tasks that could not be honored.
    pub infeasible_fixed: Vec<String>,
}

impl Plan {
    /// A plan with no items.
    pub fn empty(status: PlanStatus) -> Self {
        Self {
            items: Vec::new(),
            status,
            dropped: Vec::new(),
            infeasible_fixed: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item for a task id, if it was scheduled.
    pub fn item(&self, task_id: &str) -> Option<&ScheduledItem> {
        self.items.iter().find(|i| i.id == task_id)
    }

    /// Whether every fixed task made it into the plan.
    pub fn honors_fixed(&self) -> bool {
        self.infeasible_fixed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plan() {
        let plan = Plan::empty(PlanStatus::TimedOut);
        assert!(plan.is_empty());
        assert!(plan.honors_fixed());
        assert!(!plan.status.has_solution());
        assert!(plan.item("x").is_none());
    }

    #[test]
    fn test_status_has_solution() {
        assert!(PlanStatus::Optimal.has_solution());
        assert!(PlanStatus::Degraded.has_solution());
        assert!(!PlanStatus::Infeasible.has_solution());
        assert!(!PlanStatus::Failed.has_solution());
    }
}
