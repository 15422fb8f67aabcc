//! Raw travel-time records and commute-mode filtering.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;

use super::graph::TravelGraph;
use crate::time::DayClock;

/// Transport mode of a single travel record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelMode {
    Bus,
    Walk,
}

/// Which travel records populate the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CommuteMode {
    /// Bus records only.
    #[default]
    Bus,
    /// Walking records only.
    Walk,
    /// Per-pair minimum over bus and walk.
    Auto,
}

impl CommuteMode {
    /// Parses a caller-supplied mode name.
    ///
    /// `"transit"` is an alias for bus; unrecognized names fall back to bus.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bus" | "transit" => CommuteMode::Bus,
            "walk" => CommuteMode::Walk,
            "auto" => CommuteMode::Auto,
            other => {
                warn!("unknown commute mode {other:?}, using bus");
                CommuteMode::Bus
            }
        }
    }

    fn admits(self, mode: TravelMode) -> bool {
        match self {
            CommuteMode::Bus => mode == TravelMode::Bus,
            CommuteMode::Walk => mode == TravelMode::Walk,
            CommuteMode::Auto => true,
        }
    }
}

/// One row of the travel-time table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TravelRecord {
    pub from: String,
    pub to: String,
    pub mode: TravelMode,
    pub minutes: i64,
}

impl TravelRecord {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        mode: TravelMode,
        minutes: i64,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            mode,
            minutes,
        }
    }
}

/// In-memory travel-time table covering every transport mode.
///
/// Loading and persisting the table is the caller's business; this type
/// only filters it into a [`TravelGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TravelTable {
    records: Vec<TravelRecord>,
}

impl TravelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record.
    pub fn with_record(mut self, record: TravelRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn push(&mut self, record: TravelRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TravelRecord] {
        &self.records
    }

    /// Distinct location names appearing on either end of a record, sorted.
    pub fn locations(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| [r.from.as_str(), r.to.as_str()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Edges admitted by `commute`, one per `(from, to)` pair.
    ///
    /// Within a single mode a later record for the same pair wins; across
    /// modes (`Auto`) the smaller travel time wins.
    pub fn edges_for(&self, commute: CommuteMode) -> Vec<(String, String, i64)> {
        let mut edges: BTreeMap<(&str, &str), i64> = BTreeMap::new();
        for r in self.records.iter().filter(|r| commute.admits(r.mode)) {
            let key = (r.from.as_str(), r.to.as_str());
            match commute {
                CommuteMode::Auto => {
                    edges
                        .entry(key)
                        .and_modify(|m| *m = (*m).min(r.minutes))
                        .or_insert(r.minutes);
                }
                _ => {
                    edges.insert(key, r.minutes);
                }
            }
        }
        edges
            .into_iter()
            .map(|((from, to), minutes)| (from.to_string(), to.to_string(), minutes))
            .collect()
    }

    /// Builds the travel graph for `commute`.
    pub fn graph_for(&self, commute: CommuteMode, clock: &DayClock) -> TravelGraph {
        TravelGraph::build(self.edges_for(commute), clock)
    }
}
