//! Planning domain types.
//!
//! - [`Task`]: the intake-facing scheduling unit (wall-clock strings).
//! - [`SlotProblem`] / [`SlotTask`]: the same tasks discretized into slots,
//!   with their travel memo. Both solvers consume this one representation.
//! - [`ScheduledItem`] / [`Plan`]: solver output, ordered by start time.
//! - [`ObjectiveMode`]: which objective terms are active.

mod mode;
mod plan;
mod problem;
mod task;

pub use mode::ObjectiveMode;
pub use plan::{Plan, PlanStatus, ScheduledItem};
pub use problem::{SlotProblem, SlotTask};
pub use task::{validate_tasks, Task};
