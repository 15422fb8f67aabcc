//! Single-day task planning engine.
//!
//! Turns a list of tasks (location, time window, duration, priority,
//! optional preferred windows, fixed flag) into a travel-aware day plan:
//!
//! - **Time**: wall-clock ↔ slot discretization of the planning day.
//! - **Travel**: directed travel-time graph over named locations with
//!   shortest-path queries rounded up to slots.
//! - **Models**: tasks, their slot representation and the plan output.
//! - **CP**: interval-variable modeling layer plus an exact
//!   branch-and-bound sequencing solver.
//! - **Dispatching**: priority rule composition used to order greedy
//!   insertion.
//! - **Hybrid**: greedy construction followed by shift/swap local search.
//! - **Planner**: the facade callers use; picks an engine, compares
//!   objective modes and folds solver outcomes into a [`Plan`].
//!
//! # Quick start
//!
//! ```
//! use u_dayplan::{solve_plan, Engine, ObjectiveMode, Task};
//! use u_dayplan::time::DayClock;
//! use u_dayplan::travel::TravelGraph;
//!
//! let graph = TravelGraph::build([("Home", "Gym", 15)], &DayClock::default());
//! let tasks = vec![
//!     Task::new("breakfast", "Breakfast", "Home", "08:00", "09:00", 30),
//!     Task::new("workout", "Workout", "Gym", "08:00", "12:00", 60),
//! ];
//!
//! let plan = solve_plan(&graph, &tasks, ObjectiveMode::Travel, Engine::Cp).unwrap();
//! assert_eq!(plan.len(), 2);
//! assert!(plan.status.has_solution());
//! ```

pub mod cp;
pub mod dispatching;
pub mod error;
pub mod hybrid;
pub mod models;
pub mod planner;
pub mod time;
pub mod travel;

pub use error::PlanError;
pub use models::{ObjectiveMode, Plan, PlanStatus, ScheduledItem, Task};
pub use planner::{solve_plan, Engine, PlanRequest, PlanVariant, Planner, PlannerConfig};
