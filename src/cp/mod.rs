//! Constraint Programming (CP) layer.
//!
//! Models a day as optional interval variables on one shared resource,
//! with travel-dependent transition delays between them, and solves the
//! model exactly.
//!
//! # Key Components
//!
//! - **Variables**: [`IntervalVar`], [`IntVar`], [`BoolVar`]
//! - **Constraints**: [`Constraint`] (NoOverlap, TransitionDelay, MaxEnd)
//! - **Model**: [`CpModel`] with a linear [`Objective`]
//! - **Solver**: [`CpSolver`] trait, implemented by [`SequencingSolver`]
//! - **Formulation**: [`PlanCpBuilder`] maps a [`SlotProblem`] to a model
//!   and a solution back to a [`Plan`]
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"
//!
//! [`SlotProblem`]: crate::models::SlotProblem
//! [`Plan`]: crate::models::Plan

mod builder;
mod model;
mod sequencing;
mod solver;
mod variables;

pub use builder::{PlanCpBuilder, MAKESPAN_VAR, PREFERENCE_REWARD};
pub use model::{Constraint, CpModel, Objective, ObjectiveTerm};
pub use sequencing::SequencingSolver;
pub use solver::{CpSolution, CpSolver, IntervalSolution, SolverConfig, SolverStatus};
pub use variables::{BoolVar, IntVar, IntervalVar, TimeVar};
