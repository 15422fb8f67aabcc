//! Hybrid solver configuration.

use crate::dispatching::InsertionContext;

/// Configuration for greedy construction plus local search.
///
/// # Examples
///
/// ```
/// use u_dayplan::hybrid::HybridConfig;
///
/// let config = HybridConfig::default()
///     .with_iterations(1_000)
///     .with_seed(7)
///     .with_random_accept(0.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HybridConfig {
    /// Local search iterations.
    pub iterations: usize,

    /// Offsets, in slots, tried by the shift move.
    pub shift_offsets: Vec<i64>,

    /// Probability of a shift move; the rest are swaps.
    pub move_probability: f64,

    /// Probability of accepting a candidate that does not improve the best.
    pub random_accept: f64,

    /// Cost per task starting outside all of its preference windows.
    pub preference_penalty: i64,

    /// Urgency term numerator for the insertion order.
    pub urgency_scale: f64,

    /// Urgency bonus for fixed tasks in the insertion order.
    pub fixed_boost: f64,

    /// Seed for the generator built by the planner.
    pub seed: u64,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            shift_offsets: vec![-3, -2, -1, 1, 2, 3],
            move_probability: 0.5,
            random_accept: 0.05,
            preference_penalty: 10,
            urgency_scale: 1000.0,
            fixed_boost: 1000.0,
            seed: 42,
        }
    }
}

impl HybridConfig {
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_shift_offsets(mut self, offsets: Vec<i64>) -> Self {
        self.shift_offsets = offsets;
        self
    }

    pub fn with_move_probability(mut self, p: f64) -> Self {
        self.move_probability = p;
        self
    }

    pub fn with_random_accept(mut self, p: f64) -> Self {
        self.random_accept = p;
        self
    }

    pub fn with_preference_penalty(mut self, penalty: i64) -> Self {
        self.preference_penalty = penalty;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub(crate) fn insertion_context(&self) -> InsertionContext {
        InsertionContext {
            urgency_scale: self.urgency_scale,
            fixed_boost: self.fixed_boost,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.shift_offsets.is_empty() {
            return Err("shift_offsets must not be empty".into());
        }
        if self.shift_offsets.contains(&0) {
            return Err("shift_offsets must not contain 0".into());
        }
        for (name, p) in [
            ("move_probability", self.move_probability),
            ("random_accept", self.random_accept),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{name} must be in [0, 1], got {p}"));
            }
        }
        if self.preference_penalty < 0 {
            return Err("preference_penalty must be >= 0".into());
        }
        if self.urgency_scale <= 0.0 || self.fixed_boost < 0.0 {
            return Err("urgency_scale must be > 0 and fixed_boost >= 0".into());
        }
        Ok(())
    }
}
