//! CP formulation of a day plan.
//!
//! One optional interval per task on a single `NoOverlap`, a travel
//! `TransitionDelay` for every ordered pair of tasks, and a
//! mode-dependent objective:
//!
//! | Mode         | Terms                                                    |
//! |--------------|----------------------------------------------------------|
//! | all          | `-priority * present` per task                           |
//! | `preference` | `-5` per preference window the start falls into          |
//! | `compact`    | `+makespan`, with `makespan >= end` for present tasks    |
//!
//! # Reference
//! - Laborie et al. (2018), "IBM ILOG CP Optimizer for Scheduling"

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::models::{ObjectiveMode, Plan, PlanStatus, SlotProblem};

use super::model::{Constraint, CpModel, Objective, ObjectiveTerm};
use super::solver::{CpSolution, CpSolver, SolverConfig, SolverStatus};
use super::variables::{IntVar, IntervalVar};

/// Reward for starting inside one preference window.
pub const PREFERENCE_REWARD: i64 = 5;

/// Name of the makespan variable in compact mode.
pub const MAKESPAN_VAR: &str = "makespan";

/// Builds a [`CpModel`] from a discretized day and decodes solutions.
///
/// # Example
/// ```
/// use u_dayplan::cp::{PlanCpBuilder, SequencingSolver, SolverConfig};
/// use u_dayplan::models::{ObjectiveMode, SlotProblem, Task};
/// use u_dayplan::time::DayClock;
/// use u_dayplan::travel::TravelGraph;
///
/// let clock = DayClock::default();
/// let graph = TravelGraph::build([("Home", "Gym", 15)], &clock);
/// let tasks = vec![
///     Task::new("a", "Breakfast", "Home", "08:00", "09:00", 30),
///     Task::new("b", "Workout", "Gym", "08:00", "12:00", 60),
/// ];
/// let problem = SlotProblem::new(&tasks, &graph, &clock).unwrap();
///
/// let builder = PlanCpBuilder::new(&problem, ObjectiveMode::Travel);
/// let plan = builder.solve(&SequencingSolver::new(), &SolverConfig::default());
/// assert_eq!(plan.len(), 2);
/// ```
pub struct PlanCpBuilder<'a> {
    problem: &'a SlotProblem,
    mode: ObjectiveMode,
}

impl<'a> PlanCpBuilder<'a> {
    pub fn new(problem: &'a SlotProblem, mode: ObjectiveMode) -> Self {
        Self { problem, mode }
    }

    fn presence_name(id: &str) -> String {
        format!("p_{id}")
    }

    /// Builds the model.
    pub fn build(&self) -> CpModel {
        let mut model = CpModel::new("dayplan", self.problem.horizon);
        self.add_intervals(&mut model);
        self.add_sequencing(&mut model);
        self.add_objective(&mut model);
        model
    }

    /// Builds the model, giving up between steps once `cancel` is set.
    pub fn build_with_cancel(&self, cancel: Option<&AtomicBool>) -> Option<CpModel> {
        let cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));
        let mut model = CpModel::new("dayplan", self.problem.horizon);

        if cancelled() {
            return None;
        }
        self.add_intervals(&mut model);
        if cancelled() {
            return None;
        }
        self.add_sequencing(&mut model);
        if cancelled() {
            return None;
        }
        self.add_objective(&mut model);
        Some(model)
    }

    fn add_intervals(&self, model: &mut CpModel) {
        for task in &self.problem.tasks {
            let interval = IntervalVar::new(
                &task.id,
                task.earliest,
                task.latest_start(),
                task.duration,
                task.latest,
            )
            .as_optional(Self::presence_name(&task.id));
            model.add_interval(if task.fixed {
                interval.with_presence(true)
            } else {
                interval
            });
        }
    }

    fn add_sequencing(&self, model: &mut CpModel) {
        let tasks = &self.problem.tasks;
        model.add_no_overlap(tasks.iter().map(|t| t.id.clone()).collect());

        for (i, before) in tasks.iter().enumerate() {
            for (j, after) in tasks.iter().enumerate() {
                if i != j {
                    model.add_transition_delay(&before.id, &after.id, self.problem.travel(i, j));
                }
            }
        }
    }

    fn add_objective(&self, model: &mut CpModel) {
        let tasks = &self.problem.tasks;
        let mut terms: Vec<ObjectiveTerm> = tasks
            .iter()
            .map(|t| ObjectiveTerm::Presence {
                interval: t.id.clone(),
                coeff: -t.priority,
            })
            .collect();

        match self.mode {
            ObjectiveMode::Travel => {}
            ObjectiveMode::Preference => {
                for task in tasks {
                    terms.extend(task.prefer.iter().map(|&(lo, hi)| ObjectiveTerm::StartWithin {
                        interval: task.id.clone(),
                        lo,
                        hi,
                        coeff: -PREFERENCE_REWARD,
                    }));
                }
            }
            ObjectiveMode::Compact => {
                model.add_int_var(IntVar::new(MAKESPAN_VAR, 0, self.problem.horizon));
                model.add_constraint(Constraint::MaxEnd {
                    var: MAKESPAN_VAR.into(),
                    intervals: tasks.iter().map(|t| t.id.clone()).collect(),
                });
                terms.push(ObjectiveTerm::Var {
                    name: MAKESPAN_VAR.into(),
                    coeff: 1,
                });
            }
        }

        model.set_objective(Objective::Minimize { terms });
    }

    /// Builds, solves and decodes.
    pub fn solve<S: CpSolver>(&self, solver: &S, config: &SolverConfig) -> Plan {
        self.solve_with_cancel(solver, config, None)
    }

    /// Builds, solves and decodes with an optional cancellation flag.
    pub fn solve_with_cancel<S: CpSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Plan {
        let Some(model) = self.build_with_cancel(cancel.as_deref()) else {
            debug!("model build cancelled");
            return Plan::empty(PlanStatus::Failed);
        };
        debug!(
            "built {} mode model: {} intervals, {} constraints",
            self.mode,
            model.interval_count(),
            model.constraint_count()
        );

        let solution = solver.solve_with_cancel(&model, config, cancel);
        info!(
            "cp solve ({}): {:?}, objective {:?} in {} ms",
            self.mode, solution.status, solution.objective_value, solution.solve_time_ms
        );
        self.decode(&solution)
    }

    /// Decodes a CP solution into a [`Plan`].
    ///
    /// Without a solution the plan has no items. An infeasible model
    /// reports the fixed tasks that cannot be placed on their own, or
    /// every fixed task when only their combination is infeasible.
    pub fn decode(&self, solution: &CpSolution) -> Plan {
        let status = match solution.status {
            SolverStatus::Optimal => PlanStatus::Optimal,
            SolverStatus::Feasible => PlanStatus::Feasible,
            SolverStatus::Infeasible => PlanStatus::Infeasible,
            SolverStatus::Timeout => PlanStatus::TimedOut,
            SolverStatus::ModelInvalid | SolverStatus::Unknown => PlanStatus::Failed,
        };

        if solution.is_solution_found() {
            let placements = self
                .problem
                .tasks
                .iter()
                .enumerate()
                .filter_map(|(idx, task)| {
                    solution
                        .intervals
                        .get(&task.id)
                        .filter(|s| s.is_present)
                        .map(|s| (idx, s.start))
                });
            return self.problem.plan_from(placements, status);
        }

        let mut plan = Plan::empty(status);
        if status == PlanStatus::Infeasible {
            let fixed = self.problem.tasks.iter().filter(|t| t.fixed);
            let unplaceable: Vec<String> = fixed
                .clone()
                .filter(|t| !t.is_placeable())
                .map(|t| t.id.clone())
                .collect();
            plan.infeasible_fixed = if unplaceable.is_empty() {
                fixed.map(|t| t.id.clone()).collect()
            } else {
                unplaceable
            };
            warn!(
                "no plan honors every fixed task: {:?}",
                plan.infeasible_fixed
            );
        }
        plan
    }
}
