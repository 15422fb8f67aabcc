//! Slot discretization shared by both solvers.

use crate::error::PlanError;
use crate::time::DayClock;
use crate::travel::{TravelGraph, TravelMatrix};

use super::plan::{Plan, PlanStatus, ScheduledItem};
use super::task::{validate_tasks, Task};

/// A task discretized onto the slot grid.
///
/// The task occupies `[start, start + duration)`, which must lie inside
/// `[earliest, latest]`. Both bounds are clamped into `[0, H]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTask {
    pub id: String,
    pub title: String,
    pub location: String,
    /// Duration in slots (at least 1).
    pub duration: i64,
    /// Earliest start slot.
    pub earliest: i64,
    /// Latest end slot.
    pub latest: i64,
    pub priority: i64,
    pub fixed: bool,
    /// Preferred start windows `[lo, hi]`, inclusive, in slots.
    pub prefer: Vec<(i64, i64)>,
}

impl SlotTask {
    /// Latest feasible start slot. May fall below `earliest` when the
    /// window is too narrow for the duration.
    pub fn latest_start(&self) -> i64 {
        self.latest - self.duration
    }

    /// Whether any start slot fits the window.
    pub fn is_placeable(&self) -> bool {
        self.earliest <= self.latest_start()
    }

    /// Window width in slots, at least 1.
    pub fn span(&self) -> i64 {
        (self.latest - self.earliest).max(1)
    }

    /// Whether `start` keeps the task inside its window.
    pub fn admits_start(&self, start: i64) -> bool {
        start >= self.earliest && start <= self.latest_start()
    }

    /// Whether `start` falls inside any preference window. False when the
    /// task has none.
    pub fn starts_in_preferred(&self, start: i64) -> bool {
        self.prefer.iter().any(|&(lo, hi)| lo <= start && start <= hi)
    }
}

/// One day's tasks on the slot grid together with their travel memo.
#[derive(Debug, Clone)]
pub struct SlotProblem {
    pub tasks: Vec<SlotTask>,
    /// Number of slots in the day.
    pub horizon: i64,
    pub clock: DayClock,
    travel: TravelMatrix,
}

impl SlotProblem {
    /// Validates and discretizes `tasks`.
    ///
    /// # Errors
    ///
    /// - [`PlanError::DuplicateTask`] / [`PlanError::InvalidDuration`] for
    ///   structurally invalid input.
    /// - [`PlanError::TimeFormat`] for unparseable times.
    /// - [`PlanError::InvalidWindow`] when `earliest > latest` after clamping
    ///   into the horizon.
    pub fn new(tasks: &[Task], graph: &TravelGraph, clock: &DayClock) -> Result<Self, PlanError> {
        clock.validate().map_err(PlanError::Config)?;
        validate_tasks(tasks)?;

        let horizon = clock.horizon();
        let mut slot_tasks = Vec::with_capacity(tasks.len());
        for task in tasks {
            let earliest = clock.to_slot(&task.earliest)?.max(0);
            let latest = clock.to_slot(&task.latest)?.min(horizon);
            if earliest > latest {
                return Err(PlanError::InvalidWindow {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                });
            }

            let prefer = task
                .prefer_win
                .iter()
                .map(|(a, b)| Ok((clock.to_slot(a)?, clock.to_slot(b)?)))
                .collect::<Result<Vec<_>, PlanError>>()?;

            slot_tasks.push(SlotTask {
                id: task.id.clone(),
                title: task.title.clone(),
                location: task.location.clone(),
                duration: clock.duration_slots(task.duration_min),
                earliest,
                latest,
                priority: task.priority,
                fixed: task.fixed,
                prefer,
            });
        }

        let locations: Vec<&str> = tasks.iter().map(|t| t.location.as_str()).collect();
        let travel = TravelMatrix::for_locations(graph, &locations);

        Ok(Self {
            tasks: slot_tasks,
            horizon,
            clock: *clock,
            travel,
        })
    }

    /// Builds a problem from already-discretized parts.
    pub fn from_parts(tasks: Vec<SlotTask>, travel: TravelMatrix, clock: DayClock) -> Self {
        Self {
            tasks,
            horizon: clock.horizon(),
            clock,
            travel,
        }
    }

    /// Travel slots from task `i`'s location to task `j`'s location.
    pub fn travel(&self, i: usize, j: usize) -> i64 {
        self.travel.get(i, j)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Turns `(task index, start slot)` placements into a [`Plan`].
    ///
    /// Items come out sorted by start; tasks without a placement are
    /// reported as dropped (movable) or infeasible (fixed).
    pub fn plan_from<I>(&self, placements: I, status: PlanStatus) -> Plan
    where
        I: IntoIterator<Item = (usize, i64)>,
    {
        let mut placed: Vec<(usize, i64)> = placements.into_iter().collect();
        placed.sort_by_key(|&(task, start)| (start, task));

        let mut scheduled = vec![false; self.tasks.len()];
        let items = placed
            .iter()
            .map(|&(idx, start)| {
                scheduled[idx] = true;
                let task = &self.tasks[idx];
                ScheduledItem {
                    id: task.id.clone(),
                    title: task.title.clone(),
                    loc: task.location.clone(),
                    start: self.clock.slot_to_hhmm(start),
                    end: self.clock.slot_to_hhmm(start + task.duration),
                }
            })
            .collect();

        let (mut dropped, mut infeasible_fixed) = (Vec::new(), Vec::new());
        for (task, _) in self.tasks.iter().zip(&scheduled).filter(|&(_, &s)| !s) {
            if task.fixed {
                infeasible_fixed.push(task.id.clone());
            } else {
                dropped.push(task.id.clone());
            }
        }

        Plan {
            items,
            status,
            dropped,
            infeasible_fixed,
        }
    }
}
