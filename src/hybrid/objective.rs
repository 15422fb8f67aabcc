//! Heuristic schedule cost.

use crate::models::{ObjectiveMode, SlotProblem};

use super::types::DaySchedule;

/// Cost of a schedule, lower is better:
/// `travel + preference + makespan - priority`.
///
/// - travel: slots between chronologically consecutive placements
/// - preference (preference mode): `penalty` per task with preference
///   windows whose start lies outside all of them
/// - makespan (compact mode): last end minus first start
/// - priority: sum over placed tasks
pub fn schedule_cost(
    problem: &SlotProblem,
    mode: ObjectiveMode,
    schedule: &DaySchedule,
    preference_penalty: i64,
) -> i64 {
    let ordered = schedule.chronological();

    let travel: i64 = ordered
        .windows(2)
        .map(|w| problem.travel(w[0].task, w[1].task))
        .sum();

    let preference = if mode == ObjectiveMode::Preference {
        ordered
            .iter()
            .filter(|p| {
                let t = &problem.tasks[p.task];
                !t.prefer.is_empty() && !t.starts_in_preferred(p.start)
            })
            .count() as i64
            * preference_penalty
    } else {
        0
    };

    let makespan = match (mode, ordered.first(), ordered.last()) {
        (ObjectiveMode::Compact, Some(first), Some(last)) => last.end - first.start,
        _ => 0,
    };

    let reward: i64 = ordered.iter().map(|p| problem.tasks[p.task].priority).sum();

    travel + preference + makespan - reward
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hybrid::Placement;
    use crate::models::SlotTask;
    use crate::time::DayClock;
    use crate::travel::TravelMatrix;

    fn problem() -> SlotProblem {
        let task = |id: &str, priority: i64, prefer: Vec<(i64, i64)>| SlotTask {
            id: id.into(),
            title: id.into(),
            location: id.into(),
            duration: 6,
            earliest: 0,
            latest: 168,
            priority,
            fixed: false,
            prefer,
        };
        let tasks = vec![
            task("a", 3, vec![(0, 5)]),
            task("b", 2, vec![]),
            task("c", 1, vec![(50, 60)]),
        ];
        let travel = TravelMatrix::from_rows(vec![
            vec![0, 2, 4],
            vec![2, 0, 1],
            vec![4, 1, 0],
        ]);
        SlotProblem::from_parts(tasks, travel, DayClock::default())
    }

    fn schedule(p: &SlotProblem) -> DaySchedule {
        let mut s = DaySchedule::new();
        s.push(Placement::new(p, 2, 30));
        s.push(Placement::new(p, 0, 0));
        s.push(Placement::new(p, 1, 10));
        s
    }

    #[test]
    fn test_travel_mode() {
        let p = problem();
        // travel a->b 2 + b->c 1, reward 6
        assert_eq!(schedule_cost(&p, ObjectiveMode::Travel, &schedule(&p), 10), -3);
    }

    #[test]
    fn test_preference_mode() {
        let p = problem();
        // c starts at 30, outside (50, 60); b has no windows
        assert_eq!(schedule_cost(&p, ObjectiveMode::Preference, &schedule(&p), 10), 7);
    }

    #[test]
    fn test_compact_mode() {
        let p = problem();
        // makespan 36 - 0
        assert_eq!(schedule_cost(&p, ObjectiveMode::Compact, &schedule(&p), 10), 33);
    }

    #[test]
    fn test_empty_schedule() {
        let p = problem();
        assert_eq!(schedule_cost(&p, ObjectiveMode::Compact, &DaySchedule::new(), 10), 0);
    }
}
