use chrono::{NaiveDate, NaiveDateTime};
use fleetust::models::{MaintenanceItem, MaintenanceRecord, TaskKind, Vehicle};
use fleetust::policy::{MaintenancePolicy, Weights};
use fleetust::status::{evaluate_safety_inspection, Status};
use fleetust::urgency::{
    has_overdue_maintenance, overdue_distance, task_urgency_score, urgency_score, vehicle_needs_attention,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> NaiveDateTime {
    date(2024, 6, 1).and_hms_opt(12, 0, 0).unwrap()
}

/// A truck with every task serviced recently and a valid inspection.
fn healthy_truck() -> Vehicle {
    let history = TaskKind::ALL
        .iter()
        .map(|kind| MaintenanceRecord {
            kind: *kind,
            date: Some(date(2024, 5, 1)),
            odometer: Some(49000),
            next_due_date: Some(date(2024, 9, 1)),
            notes: String::new(),
        })
        .collect();
    Vehicle {
        id: 1,
        unit_number: "101".into(),
        year: Some(2020),
        current_odometer: Some(50000),
        safety_inspection_date: Some(date(2024, 1, 15)),
        safety_inspection_expiry: Some(date(2025, 1, 15)),
        maintenance_history: history,
        ..Default::default()
    }
}

#[test]
fn test_healthy_truck_scores_zero() {
    let policy = MaintenancePolicy::default();
    let v = healthy_truck();
    assert_eq!(urgency_score(&policy, &v, now()), 0);
    assert!(!vehicle_needs_attention(&policy, &v, now()));
    assert!(!has_overdue_maintenance(&policy, &v, now()));
}

#[test]
fn test_unserviced_truck_gets_every_weight_and_bonus() {
    let policy = MaintenancePolicy::default();
    let v = Vehicle {
        id: 2,
        unit_number: "102".into(),
        year: Some(2021),
        current_odometer: Some(1000),
        ..Default::default()
    };
    // 100 + 90 + 80 + 70 for the tasks, 110 for the missing inspection, 60 for no history.
    assert_eq!(urgency_score(&policy, &v, now()), 510);
}

#[test]
fn test_approaching_weights() {
    let policy = MaintenancePolicy::default();
    let mut v = healthy_truck();
    // Oil: 49000 + 8000 = 57000, within 800 km.
    v.current_odometer = Some(56500);
    assert_eq!(urgency_score(&policy, &v, now()), 50);

    v.safety_inspection_expiry = Some(date(2024, 6, 10));
    assert_eq!(urgency_score(&policy, &v, now()), 50 + 55);
}

#[test]
fn test_task_score_adds_bonus_for_never_performed_task() {
    let policy = MaintenancePolicy::default();
    let mut v = healthy_truck();
    v.maintenance_history.retain(|r| r.kind != TaskKind::AirFilter);

    assert_eq!(task_urgency_score(&policy, &v, TaskKind::AirFilter.into(), now()), 90 + 60);
    assert_eq!(task_urgency_score(&policy, &v, TaskKind::Oil.into(), now()), 0);
    // The aggregate only gets the bonus when there is no history at all.
    assert_eq!(urgency_score(&policy, &v, now()), 90);
}

#[test]
fn test_inspection_task_score() {
    let policy = MaintenancePolicy::default();
    let mut v = healthy_truck();
    v.safety_inspection_expiry = Some(date(2024, 5, 1));
    assert_eq!(task_urgency_score(&policy, &v, MaintenanceItem::SafetyInspection, now()), 110);

    v.maintenance_history.clear();
    assert_eq!(task_urgency_score(&policy, &v, MaintenanceItem::SafetyInspection, now()), 110 + 60);
}

#[test]
fn test_missing_inspection_needs_attention() {
    let policy = MaintenancePolicy::default();
    let mut v = healthy_truck();
    v.safety_inspection_date = None;
    v.safety_inspection_expiry = None;

    assert_eq!(evaluate_safety_inspection(&policy, &v, now()), Status::Unknown);
    assert!(vehicle_needs_attention(&policy, &v, now()));
    assert!(has_overdue_maintenance(&policy, &v, now()));

    v.year = None;
    assert!(!vehicle_needs_attention(&policy, &v, now()));
}

#[test]
fn test_approaching_needs_attention_but_is_not_overdue() {
    let policy = MaintenancePolicy::default();
    let mut v = healthy_truck();
    v.current_odometer = Some(56500);
    assert!(vehicle_needs_attention(&policy, &v, now()));
    assert!(!has_overdue_maintenance(&policy, &v, now()));
}

#[test]
fn test_overdue_distance_helper() {
    let policy = MaintenancePolicy::default();
    let mut v = healthy_truck();
    v.current_odometer = Some(57250);
    assert_eq!(overdue_distance(&policy, &v, TaskKind::Oil, now()), 250);
    assert_eq!(overdue_distance(&policy, &v, TaskKind::AirFilter, now()), 0);
}

#[test]
fn test_huge_weights_saturate() {
    let policy = MaintenancePolicy {
        due_weights: Weights { oil: u32::MAX, air_filter: u32::MAX, fuel_filter: 1, dpf_cleaning: 1, safety_inspection: 1 },
        no_history_bonus: u32::MAX,
        ..MaintenancePolicy::default()
    };
    let v = Vehicle { id: 2, unit_number: "102".into(), year: Some(2021), current_odometer: Some(1000), ..Default::default() };
    assert_eq!(urgency_score(&policy, &v, now()), u32::MAX);
    assert_eq!(task_urgency_score(&policy, &v, TaskKind::Oil.into(), now()), u32::MAX);
}
