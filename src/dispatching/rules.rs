//! Insertion-order rules for greedy day construction.

use log::debug;

use crate::models::SlotTask;

use super::engine::{RuleEngine, TieBreaker};
use super::types::PriorityRule;

/// Constants shared by the insertion rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertionContext {
    /// Numerator of the `scale / span` urgency term.
    pub urgency_scale: f64,
    /// Urgency bonus for fixed tasks.
    pub fixed_boost: f64,
}

impl Default for InsertionContext {
    fn default() -> Self {
        Self {
            urgency_scale: 1000.0,
            fixed_boost: 1000.0,
        }
    }
}

/// Narrow windows and fixed tasks first: `-(scale / span + boost)`.
pub struct WindowUrgency;

impl PriorityRule<SlotTask, InsertionContext> for WindowUrgency {
    fn name(&self) -> &str {
        "WindowUrgency"
    }

    fn score(&self, task: &SlotTask, ctx: &InsertionContext) -> f64 {
        let boost = if task.fixed { ctx.fixed_boost } else { 0.0 };
        -(ctx.urgency_scale / task.span() as f64 + boost)
    }
}

/// Declared priority, ascending.
pub struct DeclaredPriority;

impl PriorityRule<SlotTask, InsertionContext> for DeclaredPriority {
    fn name(&self) -> &str {
        "DeclaredPriority"
    }

    fn score(&self, task: &SlotTask, _ctx: &InsertionContext) -> f64 {
        task.priority as f64
    }
}

/// Wider windows first.
pub struct WindowBreadth;

impl PriorityRule<SlotTask, InsertionContext> for WindowBreadth {
    fn name(&self) -> &str {
        "WindowBreadth"
    }

    fn score(&self, task: &SlotTask, _ctx: &InsertionContext) -> f64 {
        -(task.span() as f64)
    }
}

/// Order in which the greedy construction inserts `tasks`.
pub fn insertion_order(tasks: &[SlotTask], ctx: &InsertionContext) -> Vec<usize> {
    let engine = RuleEngine::new()
        .with_rule(WindowUrgency)
        .with_rule(DeclaredPriority)
        .with_rule(WindowBreadth)
        .with_tie_breaker(TieBreaker::ByIndex);
    let order = engine.sort_indices(tasks, ctx);
    debug!("insertion order by {:?}: {order:?}", engine.rule_names());
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, earliest: i64, latest: i64, priority: i64, fixed: bool) -> SlotTask {
        SlotTask {
            id: id.into(),
            title: id.into(),
            location: "A".into(),
            duration: 6,
            earliest,
            latest,
            priority,
            fixed,
            prefer: Vec::new(),
        }
    }

    #[test]
    fn test_fixed_first_then_narrow() {
        let tasks = vec![
            task("wide", 0, 100, 5, false),
            task("narrow", 10, 20, 5, false),
            task("fixed_wide", 0, 100, 1, true),
        ];
        let order = insertion_order(&tasks, &InsertionContext::default());
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_priority_breaks_urgency_tie() {
        let tasks = vec![
            task("p5", 0, 50, 5, false),
            task("p1", 0, 50, 1, false),
            task("p3", 10, 60, 3, false),
        ];
        let order = insertion_order(&tasks, &InsertionContext::default());
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_index_breaks_full_tie() {
        let tasks = vec![task("a", 0, 50, 3, false), task("b", 0, 50, 3, false)];
        assert_eq!(
            insertion_order(&tasks, &InsertionContext::default()),
            vec![0, 1]
        );
    }

    #[test]
    fn test_zero_width_window_span() {
        let t = task("z", 10, 10, 3, false);
        let s = WindowUrgency.score(&t, &InsertionContext::default());
        assert!((s + 1000.0).abs() < 1e-9);
    }
}
