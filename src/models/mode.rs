//! Objective modes.

use std::fmt;

use log::warn;

/// Selects which terms make up the objective.
///
/// Every mode rewards keeping tasks in the plan in proportion to their
/// priority; the modes differ in what they add on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ObjectiveMode {
    /// Minimize inter-location travel.
    #[default]
    Travel,
    /// Reward starting inside preference windows.
    Preference,
    /// Minimize the day's makespan.
    Compact,
}

impl ObjectiveMode {
    /// All modes, in presentation order.
    pub const ALL: [ObjectiveMode; 3] = [
        ObjectiveMode::Travel,
        ObjectiveMode::Preference,
        ObjectiveMode::Compact,
    ];

    /// Parses a caller-supplied mode name; unknown names fall back to travel.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "travel" => ObjectiveMode::Travel,
            "preference" => ObjectiveMode::Preference,
            "compact" => ObjectiveMode::Compact,
            other => {
                warn!("unknown objective mode {other:?}, using travel");
                ObjectiveMode::Travel
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectiveMode::Travel => "travel",
            ObjectiveMode::Preference => "preference",
            ObjectiveMode::Compact => "compact",
        }
    }
}

impl fmt::Display for ObjectiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for mode in ObjectiveMode::ALL {
            assert_eq!(ObjectiveMode::parse(mode.as_str()), mode);
        }
        assert_eq!(ObjectiveMode::parse("Compact"), ObjectiveMode::Compact);
        assert_eq!(ObjectiveMode::parse("fastest"), ObjectiveMode::Travel);
    }
}
