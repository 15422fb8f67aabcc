//! Declarative scheduling model: interval variables, disjunctive and
//! delay constraints, and a linear objective.

use std::collections::HashMap;

use super::variables::{IntVar, IntervalVar};

/// Hard constraint. Constraints touching an optional interval are
/// vacuous while that interval is absent.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Present members are pairwise disjoint: the person can only be in
    /// one place at a time.
    NoOverlap { intervals: Vec<String> },

    /// Sequence-dependent gap: whenever both intervals are present and
    /// `before` precedes `after`, `end(before) + delay <= start(after)`.
    ///
    /// Together with `NoOverlap` this is the disjunctive
    /// "i before j, or j before i" ordering with a setup time.
    TransitionDelay {
        /// Interval on the earlier side of the ordering.
        before: String,
        /// Interval on the later side of the ordering.
        after: String,
        /// Minimum gap, non-negative.
        delay: i64,
    },

    /// `var >= end(i)` for every present interval `i` in the set.
    MaxEnd {
        /// Integer variable bounding the ends.
        var: String,
        /// Bounded intervals.
        intervals: Vec<String>,
    },
}

/// A linear term of the objective.
#[derive(Debug, Clone)]
pub enum ObjectiveTerm {
    /// `coeff * present(interval)`.
    Presence { interval: String, coeff: i64 },

    /// `coeff * [present(interval) and lo <= start(interval) <= hi]`.
    ///
    /// Models a reified "inside window" literal.
    StartWithin {
        interval: String,
        lo: i64,
        hi: i64,
        coeff: i64,
    },

    /// `coeff * var`.
    Var { name: String, coeff: i64 },
}

impl ObjectiveTerm {
    fn referenced(&self) -> (&str, bool) {
        match self {
            ObjectiveTerm::Presence { interval, .. } | ObjectiveTerm::StartWithin { interval, .. } => {
                (interval, true)
            }
            ObjectiveTerm::Var { name, .. } => (name, false),
        }
    }
}

/// What the solver optimizes.
#[derive(Debug, Clone)]
pub enum Objective {
    /// Minimize a sum of integer-weighted terms.
    Minimize { terms: Vec<ObjectiveTerm> },
}

impl Objective {
    pub fn terms(&self) -> &[ObjectiveTerm] {
        match self {
            Objective::Minimize { terms } => terms,
        }
    }
}

/// A day expressed as a constraint model.
///
/// Intervals keep insertion order, which solvers use as their tie-break
/// order.
///
/// # Examples
///
/// ```
/// use u_dayplan::cp::{CpModel, IntervalVar, Objective, ObjectiveTerm};
///
/// let mut model = CpModel::new("tuesday", 168);
/// model.add_interval(IntervalVar::new("lecture", 12, 12, 24, 36));
/// model.add_interval(IntervalVar::new("lunch", 36, 60, 9, 72).as_optional("p_lunch"));
/// model.add_no_overlap(vec!["lecture".into(), "lunch".into()]);
/// // 15 minutes from the lecture hall to the cafeteria
/// model.add_transition_delay("lecture", "lunch", 3);
/// model.set_objective(Objective::Minimize {
///     terms: vec![ObjectiveTerm::Presence { interval: "lunch".into(), coeff: -3 }],
/// });
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    pub name: String,
    pub intervals: Vec<IntervalVar>,
    pub int_vars: HashMap<String, IntVar>,
    pub constraints: Vec<Constraint>,
    pub objective: Option<Objective>,
    /// Slots in the day; no interval may end after it.
    pub horizon: i64,
    index: HashMap<String, usize>,
}

impl CpModel {
    pub fn new(name: impl Into<String>, horizon: i64) -> Self {
        Self {
            name: name.into(),
            intervals: Vec::new(),
            int_vars: HashMap::new(),
            constraints: Vec::new(),
            objective: None,
            horizon,
            index: HashMap::new(),
        }
    }

    /// Adds an interval variable. A repeated name replaces the earlier one.
    pub fn add_interval(&mut self, var: IntervalVar) {
        match self.index.get(&var.name) {
            Some(&i) => self.intervals[i] = var,
            None => {
                self.index.insert(var.name.clone(), self.intervals.len());
                self.intervals.push(var);
            }
        }
    }

    pub fn add_int_var(&mut self, var: IntVar) {
        self.int_vars.insert(var.name.clone(), var);
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn add_no_overlap(&mut self, intervals: Vec<String>) {
        self.constraints.push(Constraint::NoOverlap { intervals });
    }

    /// `before → after` gap of `delay` slots.
    pub fn add_transition_delay(
        &mut self,
        before: impl Into<String>,
        after: impl Into<String>,
        delay: i64,
    ) {
        self.constraints.push(Constraint::TransitionDelay {
            before: before.into(),
            after: after.into(),
            delay,
        });
    }

    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    pub fn interval(&self, name: &str) -> Option<&IntervalVar> {
        self.index.get(name).map(|&i| &self.intervals[i])
    }

    /// Position of an interval in insertion order.
    pub fn interval_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Checks that every name a constraint or objective term mentions is
    /// declared and that no delay is negative.
    pub fn validate(&self) -> Result<(), String> {
        let has_interval = |name: &str| {
            if self.index.contains_key(name) {
                Ok(())
            } else {
                Err(format!("undefined interval: {name}"))
            }
        };

        for constraint in &self.constraints {
            match constraint {
                Constraint::NoOverlap { intervals } => {
                    for name in intervals {
                        has_interval(name)?;
                    }
                }
                Constraint::TransitionDelay {
                    before,
                    after,
                    delay,
                } => {
                    has_interval(before)?;
                    has_interval(after)?;
                    if *delay < 0 {
                        return Err(format!("negative delay {before} -> {after}: {delay}"));
                    }
                }
                Constraint::MaxEnd { var, intervals } => {
                    if !self.int_vars.contains_key(var) {
                        return Err(format!("undefined variable: {var}"));
                    }
                    for name in intervals {
                        has_interval(name)?;
                    }
                }
            }
        }

        if let Some(objective) = &self.objective {
            for term in objective.terms() {
                match term.referenced() {
                    (name, true) => has_interval(name)?,
                    (name, false) => {
                        if !self.int_vars.contains_key(name) {
                            return Err(format!("undefined variable: {name}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tasks() -> CpModel {
        let mut model = CpModel::new("day", 168);
        model.add_interval(IntervalVar::new("gym", 0, 156, 12, 168));
        model.add_interval(IntervalVar::new("shop", 24, 60, 6, 72).as_optional("p_shop"));
        model
    }

    #[test]
    fn test_counts_and_lookup() {
        let mut model = two_tasks();
        model.add_no_overlap(vec!["gym".into(), "shop".into()]);

        assert_eq!(model.interval_count(), 2);
        assert_eq!(model.constraint_count(), 1);
        assert_eq!(model.interval_index("shop"), Some(1));
        assert!(model.interval("swim").is_none());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_redeclared_interval_keeps_slot() {
        let mut model = two_tasks();
        model.add_interval(IntervalVar::new("gym", 12, 156, 18, 168));

        assert_eq!(model.interval_count(), 2);
        assert_eq!(model.interval_index("gym"), Some(0));
        assert_eq!(model.interval("gym").unwrap().duration, 18);
    }

    #[test]
    fn test_negative_delay_rejected() {
        let mut model = two_tasks();
        model.add_transition_delay("gym", "shop", 4);
        assert!(model.validate().is_ok());

        model.add_transition_delay("shop", "gym", -1);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_max_end_needs_declared_var() {
        let mut model = two_tasks();
        model.add_constraint(Constraint::MaxEnd {
            var: "day_end".into(),
            intervals: vec!["gym".into(), "shop".into()],
        });
        assert!(model.validate().is_err());

        model.add_int_var(IntVar::new("day_end", 0, 168));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_unknown_names_rejected() {
        let mut model = two_tasks();
        model.add_no_overlap(vec!["gym".into(), "swim".into()]);
        assert!(model.validate().is_err());

        let mut model = two_tasks();
        model.set_objective(Objective::Minimize {
            terms: vec![ObjectiveTerm::StartWithin {
                interval: "swim".into(),
                lo: 0,
                hi: 5,
                coeff: -5,
            }],
        });
        assert!(model.validate().is_err());
    }
}
