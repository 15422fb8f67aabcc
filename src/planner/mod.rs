//! Planning facade.
//!
//! The only entry point intake layers need: it discretizes the tasks,
//! dispatches to the requested engine and returns a [`Plan`] built from
//! public types only.
//!
//! Input problems come back as [`PlanError`]; anything that goes wrong
//! inside a solver is folded into [`Plan::status`] with the items that
//! could be produced (possibly none).

mod config;
mod variants;

pub use config::{Engine, PlannerConfig};
pub use variants::{PlanRequest, PlanVariant};

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cp::{PlanCpBuilder, SequencingSolver};
use crate::error::PlanError;
use crate::hybrid::HybridSolver;
use crate::models::{ObjectiveMode, Plan, SlotProblem, Task};
use crate::travel::TravelGraph;

/// Day planner holding a validated configuration.
///
/// Holds no mutable state, so one planner can serve concurrent requests.
///
/// # Examples
///
/// ```
/// use u_dayplan::models::{ObjectiveMode, Task};
/// use u_dayplan::planner::{Engine, Planner};
/// use u_dayplan::time::DayClock;
/// use u_dayplan::travel::TravelGraph;
///
/// let graph = TravelGraph::build([("Hall", "Library", 10)], &DayClock::default());
/// let tasks = vec![
///     Task::new("a", "Lecture", "Hall", "09:00", "11:00", 120).with_fixed(true),
///     Task::new("b", "Revision", "Library", "09:00", "13:00", 60),
/// ];
///
/// let plan = Planner::default()
///     .solve_plan(&graph, &tasks, ObjectiveMode::Travel, Engine::Cp)
///     .unwrap();
/// assert_eq!(plan.items[0].id, "a");
/// assert_eq!(plan.items[1].start, "11:10");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Creates a planner after validating `config`.
    pub fn new(config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate().map_err(PlanError::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans one day.
    ///
    /// # Errors
    ///
    /// Invalid tasks: duplicate ids, non-positive durations, unreadable
    /// times, or windows that are inverted after clamping into the day.
    pub fn solve_plan(
        &self,
        graph: &TravelGraph,
        tasks: &[Task],
        mode: ObjectiveMode,
        engine: Engine,
    ) -> Result<Plan, PlanError> {
        self.solve_plan_with_cancel(graph, tasks, mode, engine, None)
    }

    /// Plans one day with an optional cancellation token.
    pub fn solve_plan_with_cancel(
        &self,
        graph: &TravelGraph,
        tasks: &[Task],
        mode: ObjectiveMode,
        engine: Engine,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Plan, PlanError> {
        let problem = SlotProblem::new(tasks, graph, &self.config.clock)?;
        Ok(self.solve_problem(&problem, mode, engine, cancel))
    }

    fn solve_problem(
        &self,
        problem: &SlotProblem,
        mode: ObjectiveMode,
        engine: Engine,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Plan {
        debug!(
            "planning {} tasks over {} slots ({engine}, {mode})",
            problem.len(),
            problem.horizon
        );

        let plan = match engine {
            Engine::Cp => PlanCpBuilder::new(problem, mode).solve_with_cancel(
                &SequencingSolver::new(),
                &self.config.solver,
                cancel,
            ),
            Engine::Hybrid => {
                let mut rng = StdRng::seed_from_u64(self.config.hybrid.seed);
                HybridSolver::new(self.config.hybrid.clone(), mode)
                    .solve_with_cancel(problem, &mut rng, cancel)
                    .to_plan(problem)
            }
        };

        if !plan.honors_fixed() {
            warn!(
                "fixed tasks could not be scheduled: {:?}",
                plan.infeasible_fixed
            );
        }
        info!(
            "{engine}/{mode} plan: {:?}, {} scheduled, {} dropped",
            plan.status,
            plan.len(),
            plan.dropped.len()
        );
        plan
    }
}

/// Plans one day with the default configuration.
///
/// Shorthand for [`Planner::solve_plan`] on `Planner::default()`.
pub fn solve_plan(
    graph: &TravelGraph,
    tasks: &[Task],
    mode: ObjectiveMode,
    engine: Engine,
) -> Result<Plan, PlanError> {
    Planner::default().solve_plan(graph, tasks, mode, engine)
}
