//! Exact single-resource sequencing by depth-first branch and bound.
//!
//! Handles models whose fixed-duration intervals (optional or not) all
//! share one `NoOverlap`, with `TransitionDelay` setup gaps, at most one
//! `MaxEnd` variable and a linear objective of presence, start-window and
//! variable terms.
//!
//! The search enumerates present intervals in chronological order. For a
//! fixed order every interval starts either as early as its predecessors
//! allow or at a breakpoint of its window terms. Shifting an interval left
//! to the nearest such point never breaks a constraint and never changes
//! its window terms, so this candidate set contains an optimum.
//!
//! When delays satisfy the triangle inequality (travel times derived from
//! shortest paths always do), the earliest start only depends on the last
//! placed interval, and partial sequences are pruned by dominance on
//! `(placed set, last interval)`.
//!
//! # References
//!
//! Baker & Trietsch (2009), "Principles of Sequencing and Scheduling", ch. 8

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};

use super::model::{Constraint, CpModel, ObjectiveTerm};
use super::solver::{CpSolution, CpSolver, IntervalSolution, SolverConfig, SolverStatus};

/// Node interval between deadline and cancellation checks.
const CHECK_EVERY: u64 = 256;
/// Dominance keys are `u128` bit sets.
const MEMO_MAX_INTERVALS: usize = 128;
const MEMO_MAX_ENTRIES: usize = 1 << 20;

/// Exact solver for single-resource sequencing models.
///
/// # Examples
///
/// ```
/// use u_dayplan::cp::{CpModel, CpSolver, IntervalVar, SequencingSolver, SolverConfig, SolverStatus};
///
/// let mut model = CpModel::new("pair", 100);
/// model.add_interval(IntervalVar::new("a", 0, 50, 10, 100));
/// model.add_interval(IntervalVar::new("b", 0, 50, 10, 100));
/// model.add_no_overlap(vec!["a".into(), "b".into()]);
/// model.add_transition_delay("a", "b", 5);
/// model.add_transition_delay("b", "a", 5);
///
/// let solution = SequencingSolver::new().solve(&model, &SolverConfig::default());
/// assert_eq!(solution.status, SolverStatus::Optimal);
/// let (a, b) = (&solution.intervals["a"], &solution.intervals["b"]);
/// assert!(a.end + 5 <= b.start || b.end + 5 <= a.start);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SequencingSolver;

impl SequencingSolver {
    pub fn new() -> Self {
        Self
    }
}

struct Makespan {
    name: String,
    min: i64,
    max: i64,
    coeff: i64,
    members: Vec<bool>,
}

/// Index-based view of a model.
struct Compiled {
    names: Vec<String>,
    presence_names: Vec<Option<String>>,
    duration: Vec<i64>,
    start_min: Vec<i64>,
    start_max: Vec<i64>,
    mandatory: Vec<bool>,
    forbidden: Vec<bool>,
    delay: Vec<Vec<i64>>,
    min_delay_in: Vec<i64>,
    presence_coeff: Vec<i64>,
    windows: Vec<Vec<(i64, i64, i64)>>,
    optimistic: Vec<i64>,
    makespan: Option<Makespan>,
    constant: i64,
    metric: bool,
    order: Vec<usize>,
}

impl Compiled {
    fn from_model(model: &CpModel) -> Result<Self, String> {
        model.validate()?;
        let n = model.interval_count();
        let index = |name: &str| {
            model
                .interval_index(name)
                .ok_or_else(|| format!("undefined interval: {name}"))
        };

        let mut covered = vec![false; n];
        let mut groups = 0;
        let mut delay = vec![vec![0i64; n]; n];
        let mut makespan: Option<Makespan> = None;

        for constraint in &model.constraints {
            match constraint {
                Constraint::NoOverlap { intervals } => {
                    groups += 1;
                    for name in intervals {
                        covered[index(name)?] = true;
                    }
                }
                Constraint::TransitionDelay {
                    before,
                    after,
                    delay: d,
                } => {
                    let (b, a) = (index(before)?, index(after)?);
                    if a != b {
                        delay[b][a] = delay[b][a].max(*d);
                    }
                }
                Constraint::MaxEnd { var, intervals } => {
                    if makespan.as_ref().is_some_and(|m| &m.name != var) {
                        return Err("at most one MaxEnd variable is supported".into());
                    }
                    let v = model
                        .int_vars
                        .get(var)
                        .ok_or_else(|| format!("undefined variable: {var}"))?;
                    let m = makespan.get_or_insert_with(|| Makespan {
                        name: var.clone(),
                        min: v.min,
                        max: v.max,
                        coeff: 0,
                        members: vec![false; n],
                    });
                    for name in intervals {
                        m.members[index(name)?] = true;
                    }
                }
            }
        }
        if n > 0 && (groups != 1 || covered.contains(&false)) {
            return Err("all intervals must share exactly one NoOverlap".into());
        }

        let mut c = Compiled {
            names: Vec::with_capacity(n),
            presence_names: Vec::with_capacity(n),
            duration: Vec::with_capacity(n),
            start_min: Vec::with_capacity(n),
            start_max: Vec::with_capacity(n),
            mandatory: Vec::with_capacity(n),
            forbidden: Vec::with_capacity(n),
            delay,
            min_delay_in: Vec::new(),
            presence_coeff: vec![0; n],
            windows: vec![Vec::new(); n],
            optimistic: Vec::new(),
            makespan: None,
            constant: 0,
            metric: true,
            order: (0..n).collect(),
        };

        for iv in &model.intervals {
            if iv.duration < 0 {
                return Err(format!("negative duration on {}", iv.name));
            }
            let mut start_max = iv.latest_start().min(model.horizon - iv.duration);
            if let Some(m) = &makespan {
                if m.members[c.names.len()] {
                    start_max = start_max.min(m.max - iv.duration);
                }
            }
            c.names.push(iv.name.clone());
            c.presence_names
                .push(iv.presence.as_ref().map(|p| p.name.clone()));
            c.duration.push(iv.duration);
            c.start_min.push(iv.start.min);
            c.start_max.push(start_max);
            c.mandatory.push(iv.is_mandatory());
            c.forbidden.push(iv.is_forbidden());
        }

        if let Some(objective) = &model.objective {
            for term in objective.terms() {
                match term {
                    ObjectiveTerm::Presence { interval, coeff } => {
                        c.presence_coeff[index(interval)?] += coeff;
                    }
                    ObjectiveTerm::StartWithin {
                        interval,
                        lo,
                        hi,
                        coeff,
                    } => c.windows[index(interval)?].push((*lo, *hi, *coeff)),
                    ObjectiveTerm::Var { name, coeff } => {
                        match makespan.as_mut().filter(|m| &m.name == name) {
                            Some(m) => m.coeff += coeff,
                            None => {
                                let v = model
                                    .int_vars
                                    .get(name)
                                    .ok_or_else(|| format!("undefined variable: {name}"))?;
                                c.constant += coeff * if *coeff >= 0 { v.min } else { v.max };
                            }
                        }
                    }
                }
            }
        }
        if makespan.as_ref().is_some_and(|m| m.coeff < 0) {
            return Err("a MaxEnd variable cannot be maximized".into());
        }
        c.makespan = makespan;

        c.optimistic = (0..n)
            .map(|i| {
                if c.forbidden[i] {
                    return 0;
                }
                let best =
                    c.presence_coeff[i] + c.windows[i].iter().map(|w| w.2.min(0)).sum::<i64>();
                if c.mandatory[i] {
                    best
                } else {
                    best.min(0)
                }
            })
            .collect();
        c.min_delay_in = (0..n)
            .map(|z| {
                (0..n)
                    .filter(|&j| j != z)
                    .map(|j| c.delay[j][z])
                    .min()
                    .unwrap_or(0)
            })
            .collect();
        c.metric = (0..n).all(|i| {
            (0..n).all(|j| {
                (0..n).all(|k| {
                    i == j
                        || j == k
                        || i == k
                        || c.delay[i][k] <= c.delay[i][j] + c.duration[j] + c.delay[j][k]
                })
            })
        });
        c.order
            .sort_by_key(|&i| (c.start_min[i], c.start_max[i], i));
        Ok(c)
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn in_makespan(&self, i: usize) -> bool {
        self.makespan.as_ref().is_some_and(|m| m.members[i])
    }

    fn makespan_cost(&self, ms: i64) -> i64 {
        self.makespan
            .as_ref()
            .map_or(0, |m| m.coeff * ms.max(m.min))
    }

    fn initial_makespan(&self) -> i64 {
        self.makespan.as_ref().map_or(0, |m| m.min)
    }

    /// Objective contribution of placing `i` at `start`.
    fn gain(&self, i: usize, start: i64) -> i64 {
        self.presence_coeff[i]
            + self.windows[i]
                .iter()
                .filter(|&&(lo, hi, _)| lo <= start && start <= hi)
                .map(|w| w.2)
                .sum::<i64>()
    }

    /// `ready` plus every window breakpoint in `(ready, start_max]`.
    fn candidate_starts(&self, i: usize, ready: i64) -> Vec<i64> {
        let hi = self.start_max[i];
        let mut starts = vec![ready];
        for &(lo, whi, _) in &self.windows[i] {
            for b in [lo, whi.saturating_add(1)] {
                if b > ready && b <= hi {
                    starts.push(b);
                }
            }
        }
        starts.sort_unstable();
        starts.dedup();
        starts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Deadline,
    Cancelled,
    FirstSolution,
}

struct Incumbent {
    cost: i64,
    path: Vec<(usize, i64)>,
    makespan: i64,
}

struct Search<'a> {
    c: &'a Compiled,
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
    stop_after_first: bool,
    nodes: u64,
    stopped: Option<Stop>,
    used: Vec<bool>,
    mask: u128,
    path: Vec<(usize, i64)>,
    best: Option<Incumbent>,
    memo: Option<HashMap<(u128, usize), Vec<(i64, i64, i64)>>>,
    memo_entries: usize,
}

impl<'a> Search<'a> {
    fn new(
        c: &'a Compiled,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
        stop_after_first: bool,
    ) -> Self {
        let memo = (c.metric && c.len() <= MEMO_MAX_INTERVALS).then(HashMap::new);
        Self {
            c,
            deadline,
            cancel,
            stop_after_first,
            nodes: 0,
            stopped: None,
            used: vec![false; c.len()],
            mask: 0,
            path: Vec::with_capacity(c.len()),
            best: None,
            memo,
            memo_entries: 0,
        }
    }

    fn check_limits(&mut self) {
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            self.stopped = Some(Stop::Cancelled);
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.stopped = Some(Stop::Deadline);
        }
    }

    /// Earliest start of `i` right after the current path.
    fn ready(&self, i: usize, last: Option<(usize, i64)>) -> i64 {
        let c = self.c;
        let Some((l, end)) = last else {
            return c.start_min[i];
        };
        if c.metric {
            c.start_min[i].max(end + c.delay[l][i])
        } else {
            self.path
                .iter()
                .fold(c.start_min[i].max(end), |acc, &(p, s)| {
                    acc.max(s + c.duration[p] + c.delay[p][i])
                })
        }
    }

    /// Whether an explored state with the same placed set and last
    /// interval is at least as good on every axis. Records the state if not.
    fn dominated(&mut self, last: usize, end: i64, ms: i64, partial: i64) -> bool {
        let mask = self.mask;
        let Some(memo) = self.memo.as_mut() else {
            return false;
        };
        let entries = memo.entry((mask, last)).or_default();
        if entries
            .iter()
            .any(|&(e, m, p)| e <= end && m <= ms && p <= partial)
        {
            return true;
        }
        let before = entries.len();
        entries.retain(|&(e, m, p)| !(end <= e && ms <= m && partial <= p));
        self.memo_entries -= before - entries.len();
        if self.memo_entries < MEMO_MAX_ENTRIES {
            entries.push((end, ms, partial));
            self.memo_entries += 1;
        }
        false
    }

    fn record(&mut self, cost: i64, makespan: i64) {
        if self.best.as_ref().is_some_and(|b| b.cost <= cost) {
            return;
        }
        trace!(
            "incumbent cost {cost} with {} intervals after {} nodes",
            self.path.len(),
            self.nodes
        );
        self.best = Some(Incumbent {
            cost,
            path: self.path.clone(),
            makespan,
        });
        if self.stop_after_first {
            self.stopped = Some(Stop::FirstSolution);
        }
    }

    fn dfs(&mut self, last: Option<(usize, i64)>, ms: i64, partial: i64) {
        if self.stopped.is_some() {
            return;
        }
        self.nodes += 1;
        if self.nodes % CHECK_EVERY == 0 {
            self.check_limits();
            if self.stopped.is_some() {
                return;
            }
        }

        let c = self.c;
        let floor = last.map(|(_, end)| end);
        let mut optimistic = 0;
        let mut ms_bound = ms;
        let mut mandatory_left = false;
        for z in 0..c.len() {
            if self.used[z] {
                continue;
            }
            let earliest = match floor {
                Some(end) => c.start_min[z].max(end + c.min_delay_in[z]),
                None => c.start_min[z],
            };
            let reachable = earliest <= c.start_max[z];
            if c.mandatory[z] {
                if !reachable {
                    return;
                }
                mandatory_left = true;
                optimistic += c.optimistic[z];
                if c.in_makespan(z) {
                    ms_bound = ms_bound.max(earliest + c.duration[z]);
                }
            } else if reachable {
                optimistic += c.optimistic[z];
            }
        }
        let bound = partial + optimistic + c.makespan_cost(ms_bound);
        if self.best.as_ref().is_some_and(|b| bound >= b.cost) {
            return;
        }
        if let Some((l, end)) = last {
            if self.dominated(l, end, ms, partial) {
                return;
            }
        }

        for &i in &c.order {
            if self.used[i] || c.forbidden[i] {
                continue;
            }
            let ready = self.ready(i, last);
            if ready > c.start_max[i] {
                continue;
            }
            for start in c.candidate_starts(i, ready) {
                let end = start + c.duration[i];
                let ms_next = if c.in_makespan(i) { ms.max(end) } else { ms };
                self.push(i, start);
                self.dfs(Some((i, end)), ms_next, partial + c.gain(i, start));
                self.pop(i);
                if self.stopped.is_some() {
                    return;
                }
            }
        }

        // Leave every remaining interval absent.
        if !mandatory_left {
            self.record(partial + c.makespan_cost(ms), ms);
        }
    }

    fn push(&mut self, i: usize, start: i64) {
        self.used[i] = true;
        if i < MEMO_MAX_INTERVALS {
            self.mask |= 1u128 << i;
        }
        self.path.push((i, start));
    }

    fn pop(&mut self, i: usize) {
        self.used[i] = false;
        if i < MEMO_MAX_INTERVALS {
            self.mask &= !(1u128 << i);
        }
        self.path.pop();
    }
}

fn to_solution(c: &Compiled, best: &Incumbent, status: SolverStatus) -> CpSolution {
    let mut starts: Vec<Option<i64>> = vec![None; c.len()];
    for &(i, s) in &best.path {
        starts[i] = Some(s);
    }

    let mut solution = CpSolution::empty(status);
    for (i, start) in starts.into_iter().enumerate() {
        let start_at = start.unwrap_or(c.start_min[i]);
        solution.intervals.insert(
            c.names[i].clone(),
            IntervalSolution {
                start: start_at,
                end: start_at + c.duration[i],
                duration: c.duration[i],
                is_present: start.is_some(),
            },
        );
        if let Some(p) = &c.presence_names[i] {
            solution.bool_vars.insert(p.clone(), start.is_some());
        }
    }
    if let Some(m) = &c.makespan {
        solution
            .int_vars
            .insert(m.name.clone(), best.makespan.max(m.min));
    }
    solution.objective_value = Some(best.cost + c.constant);
    solution
}

impl CpSolver for SequencingSolver {
    fn solve_with_cancel(
        &self,
        model: &CpModel,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> CpSolution {
        let started = Instant::now();
        let elapsed_ms = || started.elapsed().as_millis() as i64;

        let compiled = match Compiled::from_model(model) {
            Ok(c) => c,
            Err(reason) => {
                debug!("model {} rejected: {reason}", model.name);
                return CpSolution::empty(SolverStatus::ModelInvalid);
            }
        };
        let c = &compiled;
        debug!(
            "sequencing {} intervals (metric delays: {})",
            c.len(),
            c.metric
        );

        let hopeless = (0..c.len())
            .any(|i| c.mandatory[i] && (c.forbidden[i] || c.start_min[i] > c.start_max[i]));
        if hopeless {
            let mut solution = CpSolution::empty(SolverStatus::Infeasible);
            solution.solve_time_ms = elapsed_ms();
            return solution;
        }

        let deadline = started.checked_add(Duration::from_millis(config.time_limit_ms));
        let mut search = Search::new(c, deadline, cancel, config.stop_after_first);
        search.check_limits();
        search.dfs(None, c.initial_makespan(), 0);

        let status = match (search.stopped, search.best.is_some()) {
            (None, true) => SolverStatus::Optimal,
            (None, false) => SolverStatus::Infeasible,
            (Some(_), true) => SolverStatus::Feasible,
            (Some(Stop::Deadline), false) => SolverStatus::Timeout,
            (Some(_), false) => SolverStatus::Unknown,
        };

        let mut solution = match &search.best {
            Some(best) => to_solution(c, best, status),
            None => CpSolution::empty(status),
        };
        solution.nodes = search.nodes;
        solution.solve_time_ms = elapsed_ms();
        debug!(
            "sequencing finished: {:?}, objective {:?}, {} nodes in {} ms",
            solution.status, solution.objective_value, solution.nodes, solution.solve_time_ms
        );
        solution
    }
}
