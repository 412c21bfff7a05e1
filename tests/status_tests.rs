use chrono::{NaiveDate, NaiveDateTime};
use fleetust::models::{DistanceUnit, Intervals, MaintenanceRecord, TaskKind, Vehicle};
use fleetust::policy::MaintenancePolicy;
use fleetust::status::{evaluate_all_tasks, evaluate_safety_inspection, evaluate_task, fleet_inspection_status, Status};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> NaiveDateTime {
    date(2024, 6, 1).and_hms_opt(12, 0, 0).unwrap()
}

fn record(kind: TaskKind, odometer: i64, next_due: Option<NaiveDate>) -> MaintenanceRecord {
    MaintenanceRecord {
        kind,
        date: Some(date(2024, 1, 10)),
        odometer: Some(odometer),
        next_due_date: next_due,
        notes: String::new(),
    }
}

fn truck(odometer: i64, history: Vec<MaintenanceRecord>) -> Vehicle {
    Vehicle {
        id: 1,
        unit_number: "103".into(),
        year: Some(2020),
        current_odometer: Some(odometer),
        maintenance_history: history,
        ..Default::default()
    }
}

#[test]
fn test_missing_record_is_initial_service() {
    let policy = MaintenancePolicy::default();
    let v = truck(12345, vec![record(TaskKind::Oil, 12000, None)]);

    for kind in [TaskKind::AirFilter, TaskKind::FuelFilter, TaskKind::DpfCleaning] {
        let eval = evaluate_task(&policy, &v, kind, now());
        assert_eq!(eval.status, Status::Due);
        assert_eq!(eval.next_due_distance, Some(12345));
        assert_eq!(eval.overdue_distance, 0);
        assert!(eval.initial_service);
    }
}

#[test]
fn test_untracked_task_is_unknown() {
    let mut policy = MaintenancePolicy::default();
    policy.km_intervals.dpf_cleaning = 0;
    let v = truck(50000, vec![]);

    let eval = evaluate_task(&policy, &v, TaskKind::DpfCleaning, now());
    assert_eq!(eval.status, Status::Unknown);
    assert_eq!(eval.next_due_distance, None);

    // A vehicle-level interval still tracks it.
    let mut tracked = v.clone();
    tracked.intervals.dpf_cleaning = Some(150000);
    assert_eq!(evaluate_task(&policy, &tracked, TaskKind::DpfCleaning, now()).status, Status::Due);
}

#[test]
fn test_due_exactly_at_next_distance() {
    let policy = MaintenancePolicy::default();
    let mut v = truck(42000, vec![record(TaskKind::Oil, 34000, None)]);
    v.intervals.oil = Some(8000);

    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.next_due_distance, Some(42000));
    assert_eq!(eval.status, Status::Due);
    assert_eq!(eval.overdue_distance, 0);
    assert!(!eval.initial_service);
}

#[test]
fn test_approaching_within_km_threshold() {
    let policy = MaintenancePolicy::default();
    let mut v = truck(41600, vec![record(TaskKind::Oil, 34000, None)]);
    v.intervals.oil = Some(8000);

    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.status, Status::Approaching);
    assert_eq!(eval.overdue_distance, 0);

    v.current_odometer = Some(41199);
    assert_eq!(evaluate_task(&policy, &v, TaskKind::Oil, now()).status, Status::Ok);
}

#[test]
fn test_approaching_within_mile_threshold() {
    let policy = MaintenancePolicy::default();
    let mut v = truck(14500, vec![record(TaskKind::Oil, 10000, None)]);
    v.distance_unit = DistanceUnit::Miles;

    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.next_due_distance, Some(15000));
    assert_eq!(eval.status, Status::Approaching);

    v.current_odometer = Some(14499);
    assert_eq!(evaluate_task(&policy, &v, TaskKind::Oil, now()).status, Status::Ok);
}

#[test]
fn test_overdue_distance() {
    let policy = MaintenancePolicy::default();
    let v = truck(42500, vec![record(TaskKind::Oil, 34000, Some(date(2024, 12, 1)))]);

    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.status, Status::Due);
    assert_eq!(eval.overdue_distance, 500);
}

#[test]
fn test_due_by_date_only() {
    let policy = MaintenancePolicy::default();
    let v = truck(35000, vec![record(TaskKind::Oil, 34000, Some(date(2024, 5, 31)))]);

    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.status, Status::Due);
    assert_eq!(eval.overdue_distance, 0);
}

#[test]
fn test_due_on_the_next_due_day() {
    let policy = MaintenancePolicy::default();
    // Midday on the due date is already past the start of that day.
    let v = truck(35000, vec![record(TaskKind::Oil, 34000, Some(date(2024, 6, 1)))]);
    assert_eq!(evaluate_task(&policy, &v, TaskKind::Oil, now()).status, Status::Due);
}

#[test]
fn test_approaching_by_date_window() {
    let policy = MaintenancePolicy::default();
    let soon = truck(35000, vec![record(TaskKind::Oil, 34000, Some(date(2024, 6, 11)))]);
    assert_eq!(evaluate_task(&policy, &soon, TaskKind::Oil, now()).status, Status::Approaching);

    let later = truck(35000, vec![record(TaskKind::Oil, 34000, Some(date(2024, 6, 21)))]);
    assert_eq!(evaluate_task(&policy, &later, TaskKind::Oil, now()).status, Status::Ok);
}

#[test]
fn test_missing_fields_skip_checks() {
    let policy = MaintenancePolicy::default();
    let mut v = truck(0, vec![MaintenanceRecord {
        kind: TaskKind::Oil,
        date: None,
        odometer: None,
        next_due_date: None,
        notes: String::new(),
    }]);
    v.current_odometer = None;

    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.status, Status::Ok);
    assert_eq!(eval.next_due_distance, None);
}

#[test]
fn test_invalid_values_treated_as_absent() {
    let policy = MaintenancePolicy::default();
    let mut v = truck(41600, vec![record(TaskKind::Oil, 34000, None)]);
    // A negative interval falls back to the km default (8000).
    v.intervals = Intervals { oil: Some(-5), ..Default::default() };
    assert_eq!(evaluate_task(&policy, &v, TaskKind::Oil, now()).next_due_distance, Some(42000));

    // A negative odometer disables the distance check instead of reading as zero.
    v.current_odometer = Some(-1);
    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.status, Status::Ok);
}

#[test]
fn test_latest_record_wins() {
    let policy = MaintenancePolicy::default();
    let old = record(TaskKind::Oil, 20000, None);
    let mut new = record(TaskKind::Oil, 40000, None);
    new.date = Some(date(2024, 5, 1));
    let v = truck(42000, vec![new, old]);

    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.next_due_distance, Some(48000));
    assert_eq!(eval.status, Status::Ok);
}

#[test]
fn test_status_never_regresses_as_odometer_grows() {
    let policy = MaintenancePolicy::default();
    let mut last = Status::Unknown;
    for odometer in (30000..46000).step_by(100) {
        let v = truck(odometer, vec![record(TaskKind::Oil, 34000, Some(date(2025, 1, 1)))]);
        let status = evaluate_task(&policy, &v, TaskKind::Oil, now()).status;
        assert!(status >= last, "{:?} after {:?} at {}", status, last, odometer);
        last = status;
    }
    assert_eq!(last, Status::Due);
}

#[test]
fn test_safety_inspection_statuses() {
    let policy = MaintenancePolicy::default();
    let mut v = truck(1000, vec![]);
    assert_eq!(evaluate_safety_inspection(&policy, &v, now()), Status::Unknown);

    v.safety_inspection_date = Some(date(2023, 5, 1));
    v.safety_inspection_expiry = Some(date(2024, 5, 1));
    assert_eq!(evaluate_safety_inspection(&policy, &v, now()), Status::Due);

    v.safety_inspection_expiry = Some(date(2024, 6, 20));
    assert_eq!(evaluate_safety_inspection(&policy, &v, now()), Status::Approaching);

    v.safety_inspection_expiry = Some(date(2024, 8, 1));
    assert_eq!(evaluate_safety_inspection(&policy, &v, now()), Status::Ok);

    // Inspection date without an expiry is not enough to judge expiry.
    v.safety_inspection_expiry = None;
    assert_eq!(evaluate_safety_inspection(&policy, &v, now()), Status::Ok);
}

#[test]
fn test_fleet_inspection_requires_one_for_onboarded_vehicles() {
    let policy = MaintenancePolicy::default();
    let mut v = truck(1000, vec![]);
    assert_eq!(evaluate_safety_inspection(&policy, &v, now()), Status::Unknown);
    assert_eq!(fleet_inspection_status(&policy, &v, now()), Status::Due);

    v.year = None;
    assert_eq!(fleet_inspection_status(&policy, &v, now()), Status::Unknown);
}

#[test]
fn test_extreme_windows_do_not_overflow() {
    let policy = MaintenancePolicy {
        task_approaching_days: 9_000_000_000_000_000,
        inspection_approaching_days: i64::MAX,
        approaching_km: u64::MAX,
        ..MaintenancePolicy::default()
    };
    let v = truck(35000, vec![record(TaskKind::Oil, 34000, Some(date(2024, 6, 11)))]);

    // Only the out-of-range date windows are skipped; the distance buffer still applies.
    let eval = evaluate_task(&policy, &v, TaskKind::Oil, now());
    assert_eq!(eval.status, Status::Approaching);
    assert_eq!(eval.next_due_distance, Some(42000));

    let mut inspected = truck(1000, vec![]);
    inspected.safety_inspection_expiry = Some(date(2024, 6, 20));
    assert_eq!(evaluate_safety_inspection(&policy, &inspected, now()), Status::Ok);

    let far = MaintenancePolicy { task_approaching_days: -9_000_000_000_000_000, ..MaintenancePolicy::default() };
    let later = truck(35000, vec![record(TaskKind::Oil, 34000, Some(date(2024, 6, 11)))]);
    assert_eq!(evaluate_task(&far, &later, TaskKind::Oil, now()).status, Status::Ok);
}

#[test]
fn test_evaluate_all_tasks_in_display_order() {
    let policy = MaintenancePolicy::default();
    let v = truck(42500, vec![record(TaskKind::Oil, 34000, None)]);

    let evals = evaluate_all_tasks(&policy, &v, now());
    let kinds: Vec<TaskKind> = evals.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, TaskKind::ALL.to_vec());
    assert_eq!(evals[0].1.overdue_distance, 500);
    for (kind, eval) in evals {
        assert_eq!(eval, evaluate_task(&policy, &v, kind, now()));
    }
}
