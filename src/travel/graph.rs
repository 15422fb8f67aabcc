//! Directed travel graph with shortest-path queries.

use std::collections::HashMap;

use log::warn;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::time::DayClock;

/// Travel cost, in slots, reported for pairs with no connecting path.
pub const UNREACHABLE_SLOTS: i64 = 9999;

/// Weight of a directed travel edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelEdge {
    /// Raw travel time in minutes.
    pub minutes: i64,
    /// Travel time in whole slots, rounded up and capped at
    /// [`UNREACHABLE_SLOTS`].
    pub slots: i64,
}

/// Directed, weighted graph over location names.
///
/// # Examples
///
/// ```
/// use u_dayplan::time::DayClock;
/// use u_dayplan::travel::{TravelGraph, UNREACHABLE_SLOTS};
///
/// let clock = DayClock::default();
/// let graph = TravelGraph::build([("Dorm", "Library", 12), ("Library", "Gym", 4)], &clock);
///
/// assert_eq!(graph.travel_slots("Dorm", "Gym"), 4); // 3 + 1 slots
/// assert_eq!(graph.travel_slots("Gym", "Dorm"), UNREACHABLE_SLOTS);
/// assert_eq!(graph.travel_slots("Gym", "Gym"), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TravelGraph {
    graph: DiGraph<String, TravelEdge>,
    nodes: HashMap<String, NodeIndex>,
}

impl TravelGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph with one directed edge per `(from, to, minutes)` tuple.
    ///
    /// A repeated `(from, to)` pair replaces the earlier edge.
    pub fn build<I, S>(edges: I, clock: &DayClock) -> Self
    where
        I: IntoIterator<Item = (S, S, i64)>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for (from, to, minutes) in edges {
            graph.add_edge(from, to, minutes, clock);
        }
        graph
    }

    /// Adds (or replaces) the directed edge `from → to`.
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        minutes: i64,
        clock: &DayClock,
    ) {
        let from = self.node(from.into());
        let to = self.node(to.into());
        let minutes = if minutes < 0 {
            warn!(
                "negative travel time {minutes} min between {} and {}, clamped to 0",
                self.graph[from], self.graph[to]
            );
            0
        } else {
            minutes
        };
        let edge = TravelEdge {
            minutes,
            slots: clock.ceil_slots(minutes).min(UNREACHABLE_SLOTS),
        };
        self.graph.update_edge(from, to, edge);
    }

    fn node(&mut self, name: String) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        self.nodes.insert(name, idx);
        idx
    }

    /// Number of locations.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether `location` is a node of the graph.
    pub fn contains(&self, location: &str) -> bool {
        self.nodes.contains_key(location)
    }

    /// The direct edge `from → to`, if any.
    pub fn edge(&self, from: &str, to: &str) -> Option<TravelEdge> {
        let a = *self.nodes.get(from)?;
        let b = *self.nodes.get(to)?;
        self.graph.find_edge(a, b).map(|e| self.graph[e])
    }

    /// Shortest directed travel time in slots, or `None` when no path exists.
    ///
    /// Identical names cost zero even when the location is not in the graph.
    pub fn shortest_slots(&self, from: &str, to: &str) -> Option<i64> {
        if from == to {
            return Some(0);
        }
        let a = *self.nodes.get(from)?;
        let b = *self.nodes.get(to)?;
        dijkstra(&self.graph, a, Some(b), |e| e.weight().slots)
            .get(&b)
            .copied()
    }

    /// Shortest directed travel time in slots, [`UNREACHABLE_SLOTS`] when no
    /// path exists.
    pub fn travel_slots(&self, from: &str, to: &str) -> i64 {
        self.shortest_slots(from, to).unwrap_or(UNREACHABLE_SLOTS)
    }

    /// Shortest travel slots from `from` to every reachable location
    /// (including `from` itself at zero).
    pub fn distances_from(&self, from: &str) -> HashMap<&str, i64> {
        let Some(&a) = self.nodes.get(from) else {
            return HashMap::new();
        };
        dijkstra(&self.graph, a, None, |e| e.weight().slots)
            .into_iter()
            .map(|(node, cost)| (self.graph[node].as_str(), cost))
            .collect()
    }
}
