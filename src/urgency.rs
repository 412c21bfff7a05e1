use chrono::NaiveDateTime;
use crate::models::{MaintenanceItem, TaskKind, Vehicle};
use crate::policy::MaintenancePolicy;
use crate::status::{evaluate_task, fleet_inspection_status, Status};

/// Status of any maintenance item. The inspection uses the fleet interpretation,
/// so an onboarded vehicle without an inspection on file counts as due.
pub fn item_status(policy: &MaintenancePolicy, vehicle: &Vehicle, item: MaintenanceItem, now: NaiveDateTime) -> Status {
    match item {
        MaintenanceItem::Task(kind) => evaluate_task(policy, vehicle, kind, now).status,
        MaintenanceItem::SafetyInspection => fleet_inspection_status(policy, vehicle, now),
    }
}

/// Weight contributed by one item in the given status.
fn contribution(policy: &MaintenancePolicy, item: MaintenanceItem, status: Status) -> u32 {
    match status {
        Status::Due => policy.due_weights.get(item),
        Status::Approaching => policy.approaching_weights.get(item),
        Status::Ok | Status::Unknown => 0,
    }
}

/// Calculates the overall urgency score for a vehicle.
///
/// The score is the sum of:
/// - **Due items**: oil 100, air filter 90, fuel filter 80, DPF 70, inspection 110.
/// - **Approaching items**: roughly half the due weight.
/// - **No history**: a flat bonus for a vehicle that has never been serviced.
///
/// The number only orders vehicles; it has no meaning on its own. The sum
/// saturates at `u32::MAX`.
pub fn urgency_score(policy: &MaintenancePolicy, vehicle: &Vehicle, now: NaiveDateTime) -> u32 {
    let items = MaintenanceItem::ALL
        .iter()
        .map(|item| contribution(policy, *item, item_status(policy, vehicle, *item, now)))
        .fold(0u32, u32::saturating_add);
    let bonus = if vehicle.has_history() { 0 } else { policy.no_history_bonus };
    items.saturating_add(bonus)
}

/// Urgency of a single item, used when the fleet is ranked by that item.
///
/// Tasks that were never performed get the no-history bonus on top of their
/// due weight; the inspection only gets it when the vehicle has no history.
pub fn task_urgency_score(policy: &MaintenancePolicy, vehicle: &Vehicle, item: MaintenanceItem, now: NaiveDateTime) -> u32 {
    let own = contribution(policy, item, item_status(policy, vehicle, item, now));
    let never_serviced = match item {
        _ if !vehicle.has_history() => true,
        MaintenanceItem::Task(kind) => vehicle.record_for(kind).is_none(),
        MaintenanceItem::SafetyInspection => false,
    };
    if never_serviced {
        own.saturating_add(policy.no_history_bonus)
    } else {
        own
    }
}

/// Distance by which `kind` is overdue, 0 if it is not due by distance.
pub fn overdue_distance(policy: &MaintenancePolicy, vehicle: &Vehicle, kind: TaskKind, now: NaiveDateTime) -> u64 {
    evaluate_task(policy, vehicle, kind, now).overdue_distance
}

/// Whether the vehicle counts toward the dashboard's "maintenance due" figure:
/// any task or the inspection is due or approaching.
pub fn vehicle_needs_attention(policy: &MaintenancePolicy, vehicle: &Vehicle, now: NaiveDateTime) -> bool {
    MaintenanceItem::ALL
        .iter()
        .any(|item| item_status(policy, vehicle, *item, now).needs_attention())
}

/// Whether anything is actually due, not merely approaching.
pub fn has_overdue_maintenance(policy: &MaintenancePolicy, vehicle: &Vehicle, now: NaiveDateTime) -> bool {
    MaintenanceItem::ALL
        .iter()
        .any(|item| item_status(policy, vehicle, *item, now) == Status::Due)
}
