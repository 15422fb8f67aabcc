//! Side-by-side plans for every objective mode.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::PlanError;
use crate::models::{ObjectiveMode, Plan, SlotProblem, Task};
use crate::travel::{CommuteMode, TravelGraph, TravelTable};

use super::{Engine, Planner};

/// One candidate plan, labelled for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanVariant {
    pub mode: ObjectiveMode,
    pub title: String,
    pub description: String,
    pub plan: Plan,
    /// Travel between consecutive items, in minutes (slot-rounded).
    pub travel_minutes: i64,
    /// `"{n} tasks · {m}′ travel"`.
    pub meta: String,
}

fn labels(mode: ObjectiveMode) -> (&'static str, &'static str) {
    match mode {
        ObjectiveMode::Travel => ("Travel-first", "Minimize inter-location travel"),
        ObjectiveMode::Preference => ("Preference-first", "Maximize preferred windows"),
        ObjectiveMode::Compact => ("Compact-day", "Minimize makespan"),
    }
}

/// A planning request as received from the intake layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    pub tasks: Vec<Task>,
    #[cfg_attr(feature = "serde", serde(default = "default_request_commute"))]
    pub commute_mode: CommuteMode,
    #[cfg_attr(feature = "serde", serde(default = "default_request_engine"))]
    pub engine: Engine,
}

fn default_request_engine() -> Engine {
    Engine::Hybrid
}

fn default_request_commute() -> CommuteMode {
    CommuteMode::Auto
}

impl PlanRequest {
    /// Request on the hybrid engine, taking the faster of bus and walk
    /// per location pair.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            commute_mode: default_request_commute(),
            engine: default_request_engine(),
        }
    }

    pub fn with_commute_mode(mut self, commute_mode: CommuteMode) -> Self {
        self.commute_mode = commute_mode;
        self
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }
}

impl Planner {
    /// Total travel between consecutive items of `plan`, in minutes.
    pub fn travel_minutes(&self, graph: &TravelGraph, plan: &Plan) -> i64 {
        let slots: i64 = plan
            .items
            .windows(2)
            .map(|w| graph.travel_slots(&w[0].loc, &w[1].loc))
            .sum();
        self.config.clock.minutes(slots)
    }

    fn variant(&self, graph: &TravelGraph, mode: ObjectiveMode, plan: Plan) -> PlanVariant {
        let (title, description) = labels(mode);
        let travel_minutes = self.travel_minutes(graph, &plan);
        PlanVariant {
            mode,
            title: title.into(),
            description: description.into(),
            meta: format!("{} tasks · {travel_minutes}′ travel", plan.len()),
            travel_minutes,
            plan,
        }
    }

    /// Solves every [`ObjectiveMode`] for the same tasks.
    ///
    /// Validation runs once; with the `parallel` feature the modes are
    /// solved concurrently. Results keep [`ObjectiveMode::ALL`] order.
    pub fn compare_modes(
        &self,
        graph: &TravelGraph,
        tasks: &[Task],
        engine: Engine,
    ) -> Result<Vec<PlanVariant>, PlanError> {
        let problem = SlotProblem::new(tasks, graph, &self.config.clock)?;
        let solve = |mode: &ObjectiveMode| {
            let plan = self.solve_problem(&problem, *mode, engine, None);
            self.variant(graph, *mode, plan)
        };

        #[cfg(feature = "parallel")]
        let variants = ObjectiveMode::ALL.par_iter().map(solve).collect();
        #[cfg(not(feature = "parallel"))]
        let variants = ObjectiveMode::ALL.iter().map(solve).collect();

        Ok(variants)
    }

    /// Handles a full request: normalizes task times, builds the travel
    /// graph for the commute mode and compares all modes.
    ///
    /// # Errors
    ///
    /// [`PlanError::NoTasks`] for an empty request, plus everything
    /// [`Planner::solve_plan`] rejects.
    pub fn generate(
        &self,
        table: &TravelTable,
        request: &PlanRequest,
    ) -> Result<Vec<PlanVariant>, PlanError> {
        if request.tasks.is_empty() {
            return Err(PlanError::NoTasks);
        }
        let tasks = request
            .tasks
            .iter()
            .cloned()
            .map(Task::normalized)
            .collect::<Result<Vec<_>, _>>()?;
        let graph = table.graph_for(request.commute_mode, &self.config.clock);
        self.compare_modes(&graph, &tasks, request.engine)
    }
}
