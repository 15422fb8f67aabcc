//! Lexicographic ranking over a list of rules.

use std::cmp::Ordering;

use super::types::PriorityRule;

/// Scores closer than this count as equal.
const SCORE_EPSILON: f64 = 1e-9;

/// Order of items every rule scores equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreaker {
    /// Input order survives (the sort is stable).
    PreserveOrder,
    /// Lower index first, independent of sort stability.
    ByIndex,
}

/// Ranks items by the first rule, then the second among ties, and so on.
///
/// # Examples
///
/// ```
/// use u_dayplan::dispatching::{PriorityRule, RuleEngine, TieBreaker};
///
/// struct ByValue;
/// impl PriorityRule<i64, ()> for ByValue {
///     fn name(&self) -> &str { "ByValue" }
///     fn score(&self, item: &i64, _ctx: &()) -> f64 { *item as f64 }
/// }
///
/// let engine = RuleEngine::new()
///     .with_rule(ByValue)
///     .with_tie_breaker(TieBreaker::ByIndex);
/// assert_eq!(engine.sort_indices(&[3, 1, 2], &()), vec![1, 2, 0]);
/// ```
pub struct RuleEngine<T, C> {
    rules: Vec<Box<dyn PriorityRule<T, C>>>,
    tie_breaker: TieBreaker,
}

impl<T, C> RuleEngine<T, C> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::PreserveOrder,
        }
    }

    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Appends a rule; earlier rules take precedence.
    pub fn with_rule<R: PriorityRule<T, C> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Rule names in precedence order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    fn compare(&self, sa: &[f64], sb: &[f64]) -> Ordering {
        for (va, vb) in sa.iter().zip(sb) {
            if (va - vb).abs() > SCORE_EPSILON {
                return va.partial_cmp(vb).unwrap_or(Ordering::Equal);
            }
        }
        Ordering::Equal
    }

    /// Indices of `items`, highest priority (lowest scores) first.
    pub fn sort_indices(&self, items: &[T], context: &C) -> Vec<usize> {
        let mut order: Vec<usize> = (0..items.len()).collect();
        if self.rules.is_empty() {
            return order;
        }

        let keys: Vec<Vec<f64>> = items
            .iter()
            .map(|item| self.rules.iter().map(|r| r.score(item, context)).collect())
            .collect();

        order.sort_by(|&a, &b| {
            self.compare(&keys[a], &keys[b])
                .then_with(|| match self.tie_breaker {
                    TieBreaker::PreserveOrder => Ordering::Equal,
                    TieBreaker::ByIndex => a.cmp(&b),
                })
        });
        order
    }
}

impl<T, C> Default for RuleEngine<T, C> {
    fn default() -> Self {
        Self::new()
    }
}
