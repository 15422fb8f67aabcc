//! Planner configuration and engine selection.

use std::fmt;

use log::warn;

use crate::cp::SolverConfig;
use crate::hybrid::HybridConfig;
use crate::time::DayClock;

/// Solver backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Engine {
    /// Exact CP model, bounded by the solver time limit.
    #[default]
    Cp,
    /// Greedy construction + local search.
    Hybrid,
}

impl Engine {
    /// Parses a caller-supplied engine name; anything but `"hybrid"` is CP.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Engine::Hybrid,
            "cp" => Engine::Cp,
            other => {
                warn!("unknown engine {other:?}, using cp");
                Engine::Cp
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Cp => "cp",
            Engine::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the planner needs besides the request itself.
///
/// `Default` reproduces the stock day: 08:00–22:00 in 5-minute slots, a
/// 5 s CP budget and 300 local search iterations seeded with 42.
///
/// # Examples
///
/// ```
/// use u_dayplan::cp::SolverConfig;
/// use u_dayplan::planner::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_solver(SolverConfig::default().with_time_limit_ms(1_000));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.clock.horizon(), 168);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    pub clock: DayClock,
    pub solver: SolverConfig,
    pub hybrid: HybridConfig,
}

impl PlannerConfig {
    pub fn with_clock(mut self, clock: DayClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_hybrid(mut self, hybrid: HybridConfig) -> Self {
        self.hybrid = hybrid;
        self
    }

    /// Validates every part.
    pub fn validate(&self) -> Result<(), String> {
        self.clock.validate()?;
        self.solver.validate()?;
        self.hybrid.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_parse() {
        assert_eq!(Engine::parse("hybrid"), Engine::Hybrid);
        assert_eq!(Engine::parse(" CP "), Engine::Cp);
        assert_eq!(Engine::parse("ortools"), Engine::Cp);
        assert_eq!(Engine::default(), Engine::Cp);
    }

    #[test]
    fn test_invalid_part_rejected() {
        let config = PlannerConfig::default()
            .with_hybrid(HybridConfig::default().with_move_probability(2.0));
        assert!(config.validate().is_err());
    }
}
