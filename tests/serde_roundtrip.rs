#![cfg(feature = "serde")]
//! JSON shapes of the boundary types.

use u_dayplan::planner::{Engine, PlanRequest, Planner, PlannerConfig};
use u_dayplan::travel::{CommuteMode, TravelMode, TravelRecord, TravelTable};
use u_dayplan::{ObjectiveMode, PlanStatus, Task};

#[test]
fn request_defaults_apply() {
    let json = r#"{
        "tasks": [
            {
                "id": "t1",
                "title": "Lecture",
                "location": "Hall",
                "earliest": "09:00",
                "latest": "11:00",
                "duration_min": 90
            }
        ]
    }"#;
    let request: PlanRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.commute_mode, CommuteMode::Auto);
    assert_eq!(request.engine, Engine::Hybrid);

    let task = &request.tasks[0];
    assert!(!task.fixed);
    assert_eq!(task.priority, Task::DEFAULT_PRIORITY);
    assert!(task.prefer_win.is_empty());
}

#[test]
fn enums_use_lowercase_names() {
    assert_eq!(serde_json::to_string(&Engine::Cp).unwrap(), "\"cp\"");
    assert_eq!(serde_json::to_string(&CommuteMode::Auto).unwrap(), "\"auto\"");
    assert_eq!(
        serde_json::to_string(&ObjectiveMode::Preference).unwrap(),
        "\"preference\""
    );
    assert_eq!(
        serde_json::to_string(&PlanStatus::TimedOut).unwrap(),
        "\"timed_out\""
    );
}

#[test]
fn variants_survive_json() {
    let table = TravelTable::new()
        .with_record(TravelRecord::new("Hall", "Cafe", TravelMode::Walk, 7))
        .with_record(TravelRecord::new("Cafe", "Hall", TravelMode::Walk, 7));
    let request = PlanRequest::new(vec![
        Task::new("t1", "Lecture", "Hall", "09:00", "11:00", 90).with_fixed(true),
        Task::new("t2", "Lunch", "Cafe", "11:00", "14:00", 45)
            .with_preferred_window("12:00", "12:30"),
    ])
    .with_commute_mode(CommuteMode::Walk)
    .with_engine(Engine::Cp);

    let variants = Planner::default().generate(&table, &request).unwrap();
    let json = serde_json::to_string(&variants).unwrap();
    let back: Vec<u_dayplan::PlanVariant> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, variants);
}

#[test]
fn config_round_trip() {
    let config = PlannerConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: PlannerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.hybrid.seed, config.hybrid.seed);
    assert_eq!(back.solver.time_limit_ms, config.solver.time_limit_ms);
    assert_eq!(back.clock.horizon(), config.clock.horizon());
}
