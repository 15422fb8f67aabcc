//! Pairwise travel memo for a single solve.

use std::collections::HashMap;

use super::graph::{TravelGraph, UNREACHABLE_SLOTS};

/// Travel slots between every ordered pair of a fixed list of locations.
///
/// Built once per solve: one shortest-path sweep per distinct location, so
/// repeated `(a, b)` queries from the solvers are table lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelMatrix {
    slots: Vec<Vec<i64>>,
}

impl TravelMatrix {
    /// Computes the matrix for `locations` (indices follow the slice).
    pub fn for_locations(graph: &TravelGraph, locations: &[&str]) -> Self {
        let mut sweeps: HashMap<&str, HashMap<&str, i64>> = HashMap::new();
        let mut slots = vec![vec![0; locations.len()]; locations.len()];

        for (i, &from) in locations.iter().enumerate() {
            let dist = sweeps
                .entry(from)
                .or_insert_with(|| graph.distances_from(from));
            for (j, &to) in locations.iter().enumerate() {
                slots[i][j] = if from == to {
                    0
                } else {
                    dist.get(to).copied().unwrap_or(UNREACHABLE_SLOTS)
                };
            }
        }

        Self { slots }
    }

    /// Builds a matrix from explicit values (row = from, column = to).
    pub fn from_rows(slots: Vec<Vec<i64>>) -> Self {
        Self { slots }
    }

    /// Travel slots from location `i` to location `j`.
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.slots[i][j]
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
