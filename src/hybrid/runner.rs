//! Greedy construction and local search loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rand::Rng;

use crate::dispatching::insertion_order;
use crate::models::{ObjectiveMode, Plan, PlanStatus, SlotProblem};

use super::config::HybridConfig;
use super::objective::schedule_cost;
use super::types::{DaySchedule, Placement};

/// Result of a hybrid run.
#[derive(Debug, Clone)]
pub struct HybridResult {
    /// The best schedule found.
    pub best: DaySchedule,

    /// Cost of the best schedule.
    pub best_cost: i64,

    /// Local search iterations performed.
    pub iterations: usize,

    /// Candidates adopted as the new best (improving or randomly accepted).
    pub accepted_moves: usize,

    /// Candidates strictly better than the best.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Fixed tasks the construction could not place (task indices).
    pub unplaced_fixed: Vec<usize>,
}

impl HybridResult {
    /// Converts the best schedule into a [`Plan`].
    ///
    /// The status is [`PlanStatus::Degraded`] when a fixed task is missing.
    pub fn to_plan(&self, problem: &SlotProblem) -> Plan {
        let status = if self.unplaced_fixed.is_empty() {
            PlanStatus::Feasible
        } else {
            PlanStatus::Degraded
        };
        problem.plan_from(
            self.best.placements().iter().map(|p| (p.task, p.start)),
            status,
        )
    }
}

/// Greedy insertion followed by randomized shift/swap local search.
///
/// Candidates are always derived from the best schedule so far. A
/// candidate replaces it when strictly cheaper, or with probability
/// `random_accept` regardless of cost.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_dayplan::hybrid::{HybridConfig, HybridSolver};
/// use u_dayplan::models::{ObjectiveMode, SlotProblem, Task};
/// use u_dayplan::time::DayClock;
/// use u_dayplan::travel::TravelGraph;
///
/// let clock = DayClock::default();
/// let graph = TravelGraph::build([("Lab", "Cafe", 10)], &clock);
/// let tasks = vec![
///     Task::new("a", "Experiment", "Lab", "09:00", "12:00", 90),
///     Task::new("b", "Lunch", "Cafe", "11:00", "14:00", 45),
/// ];
/// let problem = SlotProblem::new(&tasks, &graph, &clock).unwrap();
///
/// let solver = HybridSolver::new(HybridConfig::default(), ObjectiveMode::Travel);
/// let mut rng = StdRng::seed_from_u64(42);
/// let result = solver.solve(&problem, &mut rng);
/// assert_eq!(result.best.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HybridSolver {
    config: HybridConfig,
    mode: ObjectiveMode,
}

impl HybridSolver {
    pub fn new(config: HybridConfig, mode: ObjectiveMode) -> Self {
        Self { config, mode }
    }

    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Cost of `schedule` under this solver's mode.
    pub fn cost(&self, problem: &SlotProblem, schedule: &DaySchedule) -> i64 {
        schedule_cost(problem, self.mode, schedule, self.config.preference_penalty)
    }

    /// Places tasks one at a time at their first feasible start.
    ///
    /// Returns the schedule and the fixed tasks left out.
    pub fn construct(&self, problem: &SlotProblem) -> (DaySchedule, Vec<usize>) {
        let order = insertion_order(&problem.tasks, &self.config.insertion_context());
        let mut schedule = DaySchedule::new();
        let mut unplaced_fixed = Vec::new();

        for idx in order {
            let task = &problem.tasks[idx];
            let slot = (task.earliest..=task.latest_start())
                .find(|&s| schedule.can_insert(problem, idx, s));
            match slot {
                Some(start) => schedule.push(Placement::new(problem, idx, start)),
                None if task.fixed => {
                    warn!("fixed task {} has no feasible slot", task.id);
                    unplaced_fixed.push(idx);
                }
                None => debug!("dropping task {}", task.id),
            }
        }

        debug!(
            "initial schedule: {} of {} tasks placed",
            schedule.len(),
            problem.len()
        );
        (schedule, unplaced_fixed)
    }

    /// Runs construction and local search.
    pub fn solve<R: Rng>(&self, problem: &SlotProblem, rng: &mut R) -> HybridResult {
        self.solve_with_cancel(problem, rng, None)
    }

    /// Runs construction and local search with an optional cancellation
    /// token, checked once per iteration.
    pub fn solve_with_cancel<R: Rng>(
        &self,
        problem: &SlotProblem,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> HybridResult {
        let (mut best, unplaced_fixed) = self.construct(problem);
        let mut best_cost = self.cost(problem, &best);

        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        for _ in 0..self.config.iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let mut cand = best.clone();
            let op: f64 = rng.random();
            if op < self.config.move_probability && !cand.is_empty() {
                self.shift_move(problem, &mut cand, rng);
            } else if cand.len() >= 2 {
                self.swap_move(problem, &mut cand, rng);
            }

            let cost = self.cost(problem, &cand);
            let improving = cost < best_cost;
            if improving || rng.random::<f64>() < self.config.random_accept {
                if improving {
                    improving_moves += 1;
                }
                best = cand;
                best_cost = cost;
                accepted_moves += 1;
            }
            iterations += 1;
        }

        info!(
            "hybrid ({}): cost {best_cost}, {} tasks, {iterations} iterations, {accepted_moves} accepted",
            self.mode,
            best.len()
        );

        HybridResult {
            best,
            best_cost,
            iterations,
            accepted_moves,
            improving_moves,
            cancelled,
            unplaced_fixed,
        }
    }

    /// Moves one placement by a random offset, clamped into its window.
    fn shift_move<R: Rng>(&self, problem: &SlotProblem, cand: &mut DaySchedule, rng: &mut R) {
        let k = rng.random_range(0..cand.len());
        let old = cand.remove(k);
        let task = &problem.tasks[old.task];
        let offsets = &self.config.shift_offsets;
        let shift = offsets[rng.random_range(0..offsets.len())];

        let start = (old.start + shift)
            .min(task.latest_start())
            .max(task.earliest);
        if cand.can_insert(problem, old.task, start) {
            cand.push(Placement::new(problem, old.task, start));
        } else {
            cand.push(old);
        }
    }

    /// Exchanges the starts of two placements when both still fit.
    ///
    /// The first task is checked against the others, the second against
    /// the others plus the first at its new start.
    fn swap_move<R: Rng>(&self, problem: &SlotProblem, cand: &mut DaySchedule, rng: &mut R) {
        let n = cand.len();
        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        let (pi, pj) = (cand.get(i), cand.get(j));

        let mut rest = cand.without(&[i, j]);
        if !rest.can_insert(problem, pi.task, pj.start) {
            return;
        }
        let moved_i = Placement::new(problem, pi.task, pj.start);
        rest.push(moved_i);
        if !rest.can_insert(problem, pj.task, pi.start) {
            return;
        }
        cand.set(i, moved_i);
        cand.set(j, Placement::new(problem, pj.task, pi.start));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::time::DayClock;
    use crate::travel::TravelGraph;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problem(tasks: &[Task]) -> SlotProblem {
        let clock = DayClock::default();
        let graph = TravelGraph::build(
            [("A", "B", 20), ("B", "A", 20), ("A", "C", 5), ("C", "A", 5)],
            &clock,
        );
        SlotProblem::new(tasks, &graph, &clock).unwrap()
    }

    fn assert_consistent(p: &SlotProblem, schedule: &DaySchedule) {
        let ordered = schedule.chronological();
        for pl in &ordered {
            assert!(p.tasks[pl.task].admits_start(pl.start));
        }
        for w in ordered.windows(2) {
            assert!(w[1].start >= w[0].end + p.travel(w[0].task, w[1].task));
        }
    }

    #[test]
    fn test_construct_places_fixed_first() {
        let tasks = vec![
            Task::new("free", "Free", "A", "09:00", "10:00", 30),
            Task::new("fixed", "Fixed", "A", "09:00", "10:00", 30).with_fixed(true),
        ];
        let p = problem(&tasks);
        let solver = HybridSolver::new(HybridConfig::default(), ObjectiveMode::Travel);
        let (schedule, unplaced) = solver.construct(&p);

        assert!(unplaced.is_empty());
        assert_eq!(schedule.get(0).task, 1);
        assert_eq!(schedule.get(0).start, 12);
        assert_eq!(schedule.get(1).start, 18);
    }

    #[test]
    fn test_unplaceable_fixed_reported() {
        let tasks = vec![
            Task::new("a", "A", "A", "09:00", "09:30", 30).with_fixed(true),
            Task::new("b", "B", "A", "09:00", "09:30", 30).with_fixed(true),
        ];
        let p = problem(&tasks);
        let solver = HybridSolver::new(HybridConfig::default(), ObjectiveMode::Travel);
        let mut rng = StdRng::seed_from_u64(1);
        let result = solver.solve(&p, &mut rng);

        assert_eq!(result.unplaced_fixed, vec![1]);
        let plan = result.to_plan(&p);
        assert_eq!(plan.status, PlanStatus::Degraded);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.infeasible_fixed, vec!["b"]);
    }

    #[test]
    fn test_local_search_keeps_invariants() {
        let tasks = vec![
            Task::new("t1", "One", "A", "09:00", "12:00", 30),
            Task::new("t2", "Two", "B", "09:00", "12:00", 45),
            Task::new("t3", "Three", "C", "10:00", "11:00", 20),
            Task::new("t4", "Four", "A", "08:00", "22:00", 60),
        ];
        let p = problem(&tasks);
        for mode in ObjectiveMode::ALL {
            let solver = HybridSolver::new(HybridConfig::default(), mode);
            let mut rng = StdRng::seed_from_u64(7);
            let result = solver.solve(&p, &mut rng);
            assert_eq!(result.iterations, 300);
            assert_eq!(result.best_cost, solver.cost(&p, &result.best));
            assert_consistent(&p, &result.best);
        }
    }

    #[test]
    fn test_never_worse_without_random_accept() {
        let tasks = vec![
            Task::new("t1", "One", "A", "09:00", "12:00", 30),
            Task::new("t2", "Two", "B", "09:00", "12:00", 45),
            Task::new("t3", "Three", "A", "09:00", "12:00", 20),
        ];
        let p = problem(&tasks);
        let solver = HybridSolver::new(
            HybridConfig::default().with_random_accept(0.0),
            ObjectiveMode::Compact,
        );
        let (initial, _) = solver.construct(&p);
        let initial_cost = solver.cost(&p, &initial);

        let mut rng = StdRng::seed_from_u64(3);
        let result = solver.solve(&p, &mut rng);
        assert!(result.best_cost <= initial_cost);
        assert_eq!(result.accepted_moves, result.improving_moves);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let tasks = vec![
            Task::new("t1", "One", "A", "09:00", "12:00", 30),
            Task::new("t2", "Two", "B", "09:00", "12:00", 45),
            Task::new("t3", "Three", "C", "09:00", "12:00", 20),
        ];
        let p = problem(&tasks);
        let solver = HybridSolver::new(HybridConfig::default(), ObjectiveMode::Preference);

        let a = solver.solve(&p, &mut StdRng::seed_from_u64(42));
        let b = solver.solve(&p, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.best, b.best);
        assert_eq!(a.best_cost, b.best_cost);
    }

    #[test]
    fn test_cancelled() {
        let tasks = vec![Task::new("t1", "One", "A", "09:00", "12:00", 30)];
        let p = problem(&tasks);
        let solver = HybridSolver::new(HybridConfig::default(), ObjectiveMode::Travel);
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            solver.solve_with_cancel(&p, &mut StdRng::seed_from_u64(0), Some(cancel));

        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best.len(), 1);
    }
}
