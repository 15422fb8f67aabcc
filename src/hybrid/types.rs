//! Partial day schedules and the insertion feasibility test.

use crate::models::SlotProblem;

/// One task placed at a start slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index into [`SlotProblem::tasks`].
    pub task: usize,
    pub start: i64,
    pub end: i64,
}

impl Placement {
    pub fn new(problem: &SlotProblem, task: usize, start: i64) -> Self {
        Self {
            task,
            start,
            end: start + problem.tasks[task].duration,
        }
    }
}

/// Placements kept in insertion order.
///
/// Invariant: placements pairwise do not overlap, and chronologically
/// adjacent placements are separated by at least their travel time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    placements: Vec<Placement>,
}

impl DaySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn get(&self, k: usize) -> Placement {
        self.placements[k]
    }

    pub fn set(&mut self, k: usize, placement: Placement) {
        self.placements[k] = placement;
    }

    pub fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    pub fn remove(&mut self, k: usize) -> Placement {
        self.placements.remove(k)
    }

    /// Copy without the placements at positions `skip`.
    pub fn without(&self, skip: &[usize]) -> Self {
        Self {
            placements: self
                .placements
                .iter()
                .enumerate()
                .filter(|(k, _)| !skip.contains(k))
                .map(|(_, &p)| p)
                .collect(),
        }
    }

    /// Placements sorted by start.
    pub fn chronological(&self) -> Vec<Placement> {
        let mut ordered = self.placements.clone();
        ordered.sort_by_key(|p| (p.start, p.task));
        ordered
    }

    /// Whether `task` can start at `start` without breaking the invariant.
    ///
    /// Requires the task to fit its window and the horizon, to overlap no
    /// placement, and to leave travel time after the placement ending last
    /// before `start` and before the placement starting first after its end.
    pub fn can_insert(&self, problem: &SlotProblem, task: usize, start: i64) -> bool {
        let t = &problem.tasks[task];
        let end = start + t.duration;
        if !t.admits_start(start) || start < 0 || end > problem.horizon {
            return false;
        }
        if self
            .placements
            .iter()
            .any(|p| start < p.end && p.start < end)
        {
            return false;
        }

        let before = self
            .placements
            .iter()
            .filter(|p| p.end <= start)
            .max_by_key(|p| p.end);
        let after = self
            .placements
            .iter()
            .filter(|p| p.start >= end)
            .min_by_key(|p| p.start);

        if let Some(b) = before {
            if start < b.end + problem.travel(b.task, task) {
                return false;
            }
        }
        if let Some(a) = after {
            if a.start < end + problem.travel(task, a.task) {
                return false;
            }
        }
        true
    }
}
