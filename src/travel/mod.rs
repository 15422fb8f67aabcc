//! Travel-time graph over named locations.
//!
//! # Key Components
//!
//! - [`TravelGraph`]: directed graph whose edges carry travel minutes and
//!   their slot rounding; answers shortest-path-in-slots queries.
//! - [`TravelTable`]: raw per-mode travel records; builds a graph for a
//!   [`CommuteMode`].
//! - [`TravelMatrix`]: per-solve memo of pairwise travel slots between task
//!   locations, so solvers never rerun shortest paths on their hot paths.
//!
//! # Unreachable pairs
//!
//! A missing path is not an error. [`TravelGraph::shortest_slots`] returns
//! `None`; [`TravelGraph::travel_slots`] maps that to the
//! [`UNREACHABLE_SLOTS`] sentinel so optimization can treat the pair as
//! heavily penalized instead of special-casing it.

mod graph;
mod matrix;
mod table;

pub use graph::{TravelEdge, TravelGraph, UNREACHABLE_SLOTS};
pub use matrix::TravelMatrix;
pub use table::{CommuteMode, TravelMode, TravelRecord, TravelTable};
