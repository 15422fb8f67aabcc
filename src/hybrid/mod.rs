//! Hybrid greedy construction + local search.
//!
//! A fast approximate alternative to the exact CP engine:
//!
//! 1. **Construction**: tasks are ranked by window urgency (fixed tasks
//!    first), declared priority and window breadth, then each is placed
//!    at its first feasible start.
//! 2. **Local search**: a fixed number of shift and swap moves around the
//!    best schedule, with strict-improvement acceptance plus a small
//!    random acceptance probability.
//!
//! The random generator is passed in by the caller, so runs are
//! reproducible for a given seed.

mod config;
mod objective;
mod runner;
mod types;

pub use config::HybridConfig;
pub use objective::schedule_cost;
pub use runner::{HybridResult, HybridSolver};
pub use types::{DaySchedule, Placement};
