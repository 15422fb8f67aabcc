//! Priority rule composition.
//!
//! Ranks items by a list of scoring rules evaluated in order: a later
//! rule is only consulted when every earlier rule ties. The greedy
//! construction of the hybrid solver uses it to decide which task is
//! inserted first.
//!
//! # References
//!
//! Dispatching rule composition: Pinedo (2016), "Scheduling: Theory,
//! Algorithms, and Systems"

mod engine;
mod rules;
mod types;

pub use engine::{RuleEngine, TieBreaker};
pub use rules::{insertion_order, DeclaredPriority, InsertionContext, WindowBreadth, WindowUrgency};
pub use types::PriorityRule;
