//! Exhaustive cross-check of the CP engine on small days.
//!
//! Every present/absent choice and start slot is enumerated on a coarse
//! clock; the solver's objective must match the best enumerated one.

use proptest::prelude::*;
use u_dayplan::cp::{CpSolver, PlanCpBuilder, SequencingSolver, SolverConfig, SolverStatus, PREFERENCE_REWARD};
use u_dayplan::models::{ObjectiveMode, SlotProblem, Task};
use u_dayplan::time::DayClock;
use u_dayplan::travel::TravelGraph;

const LOCATIONS: [&str; 3] = ["Home", "Office", "Gym"];

fn clock() -> DayClock {
    DayClock::from_hhmm("08:00", "12:00", 15).unwrap()
}

fn graph(clock: &DayClock) -> TravelGraph {
    TravelGraph::build(
        [
            ("Home", "Office", 20),
            ("Office", "Home", 20),
            ("Office", "Gym", 10),
            ("Gym", "Office", 10),
            ("Home", "Gym", 35),
        ],
        clock,
    )
}

fn hhmm(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

prop_compose! {
    fn arb_task(idx: usize)(
        loc in 0..LOCATIONS.len(),
        open in 0..14i64,
        width in 1..12i64,
        duration in 10..75i64,
        priority in 1..6i64,
        fixed in prop::bool::weighted(0.25),
        prefer in prop::option::of((0..14i64, 1..4i64)),
    ) -> Task {
        let open_min = 8 * 60 + open * 15;
        let close_min = (open_min + width * 15).min(12 * 60);
        let mut task = Task::new(
            format!("t{idx}"),
            format!("Task {idx}"),
            LOCATIONS[loc],
            hhmm(open_min),
            hhmm(close_min),
            duration,
        )
        .with_priority(priority)
        .with_fixed(fixed);
        if let Some((lo, len)) = prefer {
            let lo_min = 8 * 60 + lo * 15;
            task = task.with_preferred_window(hhmm(lo_min), hhmm((lo_min + len * 15).min(12 * 60)));
        }
        task
    }
}

fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    (1usize..=4).prop_flat_map(|n| (0..n).map(arb_task).collect::<Vec<_>>())
}

fn arb_mode() -> impl Strategy<Value = ObjectiveMode> {
    prop::sample::select(ObjectiveMode::ALL.to_vec())
}

fn objective(p: &SlotProblem, mode: ObjectiveMode, starts: &[Option<i64>]) -> i64 {
    let mut value = 0;
    let mut makespan = 0;
    for (task, start) in p.tasks.iter().zip(starts) {
        let Some(start) = *start else { continue };
        value -= task.priority;
        makespan = makespan.max(start + task.duration);
        if mode == ObjectiveMode::Preference {
            let hits = task.prefer.iter().filter(|&&(lo, hi)| lo <= start && start <= hi).count();
            value -= PREFERENCE_REWARD * hits as i64;
        }
    }
    if mode == ObjectiveMode::Compact {
        value += makespan;
    }
    value
}

fn compatible(p: &SlotProblem, starts: &[Option<i64>], next: usize, start: i64) -> bool {
    let duration = p.tasks[next].duration;
    starts.iter().enumerate().all(|(i, other)| match *other {
        None => true,
        Some(s) if s < start => s + p.tasks[i].duration + p.travel(i, next) <= start,
        Some(s) if s > start => start + duration + p.travel(next, i) <= s,
        Some(_) => false,
    })
}

fn enumerate(
    p: &SlotProblem,
    mode: ObjectiveMode,
    starts: &mut Vec<Option<i64>>,
    best: &mut Option<i64>,
) {
    let next = starts.len();
    if next == p.tasks.len() {
        let value = objective(p, mode, starts);
        if best.map_or(true, |b| value < b) {
            *best = Some(value);
        }
        return;
    }

    let task = &p.tasks[next];
    if !task.fixed {
        starts.push(None);
        enumerate(p, mode, starts, best);
        starts.pop();
    }
    for start in task.earliest..=task.latest_start() {
        if compatible(p, starts, next, start) {
            starts.push(Some(start));
            enumerate(p, mode, starts, best);
            starts.pop();
        }
    }
}

fn brute_force(p: &SlotProblem, mode: ObjectiveMode) -> Option<i64> {
    let mut best = None;
    enumerate(p, mode, &mut Vec::with_capacity(p.tasks.len()), &mut best);
    best
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn cp_matches_exhaustive_search(tasks in arb_tasks(), mode in arb_mode()) {
        let clock = clock();
        let problem = SlotProblem::new(&tasks, &graph(&clock), &clock).unwrap();
        let model = PlanCpBuilder::new(&problem, mode).build();
        let solution = SequencingSolver::new().solve(&model, &SolverConfig::default());

        match brute_force(&problem, mode) {
            Some(best) => {
                prop_assert_eq!(solution.status, SolverStatus::Optimal);
                prop_assert_eq!(solution.objective_value, Some(best));
            }
            None => prop_assert_eq!(solution.status, SolverStatus::Infeasible),
        }
    }
}

#[test]
fn exhaustive_search_agrees_on_a_known_day() {
    let clock = clock();
    let tasks = vec![
        Task::new("a", "Standup", "Office", "09:00", "09:30", 15).with_fixed(true),
        Task::new("b", "Swim", "Gym", "08:00", "12:00", 45).with_priority(4),
        Task::new("c", "Laundry", "Home", "08:00", "10:00", 30).with_preferred_window("08:30", "08:45"),
    ];
    let problem = SlotProblem::new(&tasks, &graph(&clock), &clock).unwrap();

    for mode in ObjectiveMode::ALL {
        let model = PlanCpBuilder::new(&problem, mode).build();
        let solution = SequencingSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Optimal, "{mode}");
        assert_eq!(solution.objective_value, brute_force(&problem, mode), "{mode}");
    }
}
