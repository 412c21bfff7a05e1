//! Fleet-level summaries shown by the `dashboard` command.

use chrono::{Months, NaiveDateTime};
use crate::models::{MaintenanceItem, TaskKind, Vehicle};
use crate::policy::MaintenancePolicy;
use crate::status::{evaluate_task, fleet_inspection_status, Status};
use crate::urgency::{has_overdue_maintenance, vehicle_needs_attention};

/// Headline counts for the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FleetSummary {
    pub total: usize,
    /// Vehicles with anything due or approaching.
    pub needs_attention: usize,
    /// Vehicles serviced within the last month.
    pub recently_serviced: usize,
}

/// One due or approaching item with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttentionItem {
    pub item: MaintenanceItem,
    pub status: Status,
    pub message: String,
}

fn serviced_within_last_month(vehicle: &Vehicle, now: NaiveDateTime) -> bool {
    let since = now.date().checked_sub_months(Months::new(1)).unwrap_or(now.date());
    vehicle.maintenance_history.iter().any(|r| r.date.map_or(false, |d| d > since))
}

pub fn summarize(policy: &MaintenancePolicy, vehicles: &[Vehicle], now: NaiveDateTime) -> FleetSummary {
    FleetSummary {
        total: vehicles.len(),
        needs_attention: vehicles.iter().filter(|v| vehicle_needs_attention(policy, v, now)).count(),
        recently_serviced: vehicles.iter().filter(|v| serviced_within_last_month(v, now)).count(),
    }
}

/// Vehicles needing attention, those with something actually due first.
pub fn due_soon<'a>(policy: &MaintenancePolicy, vehicles: &'a [Vehicle], now: NaiveDateTime, limit: usize) -> Vec<&'a Vehicle> {
    let mut due: Vec<(bool, &Vehicle)> = vehicles
        .iter()
        .filter(|v| vehicle_needs_attention(policy, v, now))
        .map(|v| (has_overdue_maintenance(policy, v, now), v))
        .collect();
    due.sort_by(|a, b| b.0.cmp(&a.0));
    due.into_iter().take(limit).map(|(_, v)| v).collect()
}

/// Vehicles with any service on record, most recently serviced first.
pub fn recently_serviced(vehicles: &[Vehicle], limit: usize) -> Vec<&Vehicle> {
    let mut serviced: Vec<&Vehicle> = vehicles.iter().filter(|v| v.has_history()).collect();
    // Undated histories sort last.
    serviced.sort_by(|a, b| b.last_service_date().cmp(&a.last_service_date()));
    serviced.into_iter().take(limit).collect()
}

fn task_message(policy: &MaintenancePolicy, vehicle: &Vehicle, kind: TaskKind, now: NaiveDateTime) -> Option<AttentionItem> {
    let eval = evaluate_task(policy, vehicle, kind, now);
    let unit = vehicle.distance_unit.label();
    let message = match eval.status {
        Status::Due if eval.initial_service => "Initial service needed".to_string(),
        Status::Due if eval.overdue_distance > 0 => format!("Overdue by {} {}", eval.overdue_distance, unit),
        Status::Due => "Due now".to_string(),
        Status::Approaching => match (vehicle.odometer(), eval.next_due_distance) {
            (Some(c), Some(n)) if n > c => format!("Due in {} {}", n - c, unit),
            _ => "Due soon".to_string(),
        },
        Status::Ok | Status::Unknown => return None,
    };
    Some(AttentionItem { item: kind.into(), status: eval.status, message })
}

/// Every due or approaching item of one vehicle, tasks first.
pub fn attention_items(policy: &MaintenancePolicy, vehicle: &Vehicle, now: NaiveDateTime) -> Vec<AttentionItem> {
    let mut items: Vec<AttentionItem> = TaskKind::ALL
        .iter()
        .filter_map(|kind| task_message(policy, vehicle, *kind, now))
        .collect();

    let inspection = fleet_inspection_status(policy, vehicle, now);
    let message = match (inspection, vehicle.safety_inspection_expiry) {
        (Status::Due, None) => Some("No inspection on file".to_string()),
        (Status::Due, Some(e)) => Some(format!("Expired {}", e)),
        (Status::Approaching, Some(e)) => Some(format!("Expires {}", e)),
        _ => None,
    };
    if let Some(message) = message {
        items.push(AttentionItem { item: MaintenanceItem::SafetyInspection, status: inspection, message });
    }
    items
}
