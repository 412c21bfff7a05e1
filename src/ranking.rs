//! Sort policies for listing the fleet.

use std::cmp::Ordering;
use chrono::{NaiveDate, NaiveDateTime};
use crate::models::{MaintenanceItem, SortMode, TaskKind, Vehicle};
use crate::policy::MaintenancePolicy;
use crate::status::{evaluate_safety_inspection, evaluate_task, Status};
use crate::urgency::{task_urgency_score, urgency_score};

/// Precomputed sort key for single-task ranking.
struct TaskKey {
    overdue: bool,
    score: u32,
    overdue_distance: u64,
    approaching: bool,
    odometer: u64,
}

impl TaskKey {
    fn new(policy: &MaintenancePolicy, vehicle: &Vehicle, kind: TaskKind, now: NaiveDateTime) -> Self {
        let eval = evaluate_task(policy, vehicle, kind, now);
        TaskKey {
            overdue: eval.status == Status::Due,
            score: task_urgency_score(policy, vehicle, kind.into(), now),
            overdue_distance: eval.overdue_distance,
            approaching: eval.status == Status::Approaching,
            odometer: vehicle.odometer().unwrap_or(0),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        other.overdue.cmp(&self.overdue)
            .then(other.score.cmp(&self.score))
            .then_with(|| match (self.overdue, other.overdue) {
                (true, true) => other.overdue_distance.cmp(&self.overdue_distance),
                _ => other.approaching.cmp(&self.approaching),
            })
            .then(other.odometer.cmp(&self.odometer))
    }
}

/// Precomputed sort key for safety-inspection ranking.
struct InspectionKey {
    expiry: Option<NaiveDate>,
    year: i32,
    expired: bool,
    approaching: bool,
    score: u32,
}

impl InspectionKey {
    fn new(policy: &MaintenancePolicy, vehicle: &Vehicle, now: NaiveDateTime) -> Self {
        let status = evaluate_safety_inspection(policy, vehicle, now);
        InspectionKey {
            expiry: vehicle.safety_inspection_expiry,
            year: vehicle.year.unwrap_or(0),
            expired: status == Status::Due,
            approaching: status == Status::Approaching,
            score: task_urgency_score(policy, vehicle, MaintenanceItem::SafetyInspection, now),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        let (a, b) = match (self.expiry, other.expiry) {
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            // Newer vehicles first when neither has an inspection on file.
            (None, None) => return other.year.cmp(&self.year),
            (Some(a), Some(b)) => (a, b),
        };

        let primary = other.expired.cmp(&self.expired).then_with(|| {
            if self.expired && other.expired {
                // Longest expired first.
                a.cmp(&b)
            } else {
                other.approaching.cmp(&self.approaching).then(a.cmp(&b))
            }
        });
        primary.then(other.score.cmp(&self.score))
    }
}

/// Orders vehicles for display according to `mode`.
///
/// # Sort Modes
///
/// - `Urgency`: descending aggregate urgency score; ties keep input order.
/// - Single task: overdue first, then task score, then overdue distance (among
///   overdue) or approaching-first (among the rest), then highest odometer.
/// - `SafetyInspection`: vehicles without an inspection first (newest model
///   year first), then expired (longest expired first), then approaching, then
///   soonest expiry, then task score.
///
/// The sort is stable.
pub fn rank_vehicles<'a>(
    policy: &MaintenancePolicy,
    vehicles: &'a [Vehicle],
    mode: SortMode,
    now: NaiveDateTime,
) -> Vec<&'a Vehicle> {
    let ranked: Vec<&Vehicle> = match mode.item() {
        None => {
            let mut keyed: Vec<(u32, &Vehicle)> =
                vehicles.iter().map(|v| (urgency_score(policy, v, now), v)).collect();
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
            keyed.into_iter().map(|(_, v)| v).collect()
        }
        Some(MaintenanceItem::Task(kind)) => {
            let mut keyed: Vec<(TaskKey, &Vehicle)> =
                vehicles.iter().map(|v| (TaskKey::new(policy, v, kind, now), v)).collect();
            keyed.sort_by(|a, b| a.0.compare(&b.0));
            keyed.into_iter().map(|(_, v)| v).collect()
        }
        Some(MaintenanceItem::SafetyInspection) => {
            let mut keyed: Vec<(InspectionKey, &Vehicle)> =
                vehicles.iter().map(|v| (InspectionKey::new(policy, v, now), v)).collect();
            keyed.sort_by(|a, b| a.0.compare(&b.0));
            keyed.into_iter().map(|(_, v)| v).collect()
        }
    };
    log::debug!("ranked {} vehicles by {:?}", ranked.len(), mode);
    ranked
}
