//! Due-status rules for maintenance tasks and the safety inspection.
//!
//! Every function here is pure: it reads a vehicle snapshot and an explicit
//! `now` and never fails. Missing or invalid inputs disable the sub-check they
//! feed instead of producing an error.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use crate::models::{TaskKind, Vehicle};
use crate::policy::MaintenancePolicy;

/// Status of one maintenance item, ordered by severity.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Unknown,
    Ok,
    Approaching,
    Due,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Unknown => "Unknown",
            Status::Ok => "OK",
            Status::Approaching => "Soon",
            Status::Due => "Due",
        }
    }

    pub fn needs_attention(self) -> bool {
        matches!(self, Status::Due | Status::Approaching)
    }
}

/// Result of evaluating one task for one vehicle.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskEvaluation {
    pub status: Status,
    /// Odometer reading at which the task falls due.
    pub next_due_distance: Option<u64>,
    /// How far past `next_due_distance` the vehicle is, 0 unless due by distance.
    pub overdue_distance: u64,
    /// Due because the task has never been performed.
    pub initial_service: bool,
}

impl TaskEvaluation {
    fn unknown() -> Self {
        TaskEvaluation { status: Status::Unknown, next_due_distance: None, overdue_distance: 0, initial_service: false }
    }
}

/// Dates are compared as the start of that day.
pub(crate) fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `now` moved forward by `days`, `None` when that falls outside chrono's range.
fn days_after(now: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    Duration::try_days(days).and_then(|d| now.checked_add_signed(d))
}

/// Interval used for `kind`: the vehicle's own value, else the unit default.
pub fn effective_interval(policy: &MaintenancePolicy, vehicle: &Vehicle, kind: TaskKind) -> u64 {
    vehicle
        .interval(kind)
        .unwrap_or_else(|| policy.default_interval(kind, vehicle.distance_unit))
}

/// Evaluates one maintenance task against its last service record.
pub fn evaluate_task(policy: &MaintenancePolicy, vehicle: &Vehicle, kind: TaskKind, now: NaiveDateTime) -> TaskEvaluation {
    let interval = effective_interval(policy, vehicle, kind);
    if interval == 0 {
        return TaskEvaluation::unknown();
    }

    let current = vehicle.odometer();
    let record = match vehicle.record_for(kind) {
        Some(r) => r,
        None => {
            return TaskEvaluation {
                status: Status::Due,
                next_due_distance: current,
                overdue_distance: 0,
                initial_service: true,
            };
        }
    };

    let next_due_distance = record.odometer().map(|o| o.saturating_add(interval));
    let next_due_date = record.next_due_date.map(start_of);

    let due_by_date = next_due_date.map_or(false, |d| now > d);
    let due_by_distance = match (current, next_due_distance) {
        (Some(c), Some(n)) => c >= n,
        _ => false,
    };

    let status = if due_by_date || due_by_distance {
        Status::Due
    } else {
        let approaching_by_date = match (next_due_date, days_after(now, policy.task_approaching_days)) {
            (Some(d), Some(window_end)) => window_end >= d && d > now,
            _ => false,
        };
        let threshold = policy.approaching_distance_threshold(vehicle.distance_unit);
        let approaching_by_distance = match (current, next_due_distance) {
            (Some(c), Some(n)) => c.saturating_add(threshold) >= n && c < n,
            _ => false,
        };
        if approaching_by_date || approaching_by_distance {
            Status::Approaching
        } else {
            Status::Ok
        }
    };

    let overdue_distance = match (due_by_distance, current, next_due_distance) {
        (true, Some(c), Some(n)) => c.saturating_sub(n),
        _ => 0,
    };

    log::debug!(
        "vehicle {} {:?}: {:?} (next due {:?}, overdue {})",
        vehicle.id, kind, status, next_due_distance, overdue_distance
    );

    TaskEvaluation { status, next_due_distance, overdue_distance, initial_service: false }
}

/// Evaluates all four tasks in `TaskKind::ALL` order.
pub fn evaluate_all_tasks(policy: &MaintenancePolicy, vehicle: &Vehicle, now: NaiveDateTime) -> [(TaskKind, TaskEvaluation); 4] {
    TaskKind::ALL.map(|kind| (kind, evaluate_task(policy, vehicle, kind, now)))
}

/// Raw safety-inspection status from the inspection and expiry dates alone.
pub fn evaluate_safety_inspection(policy: &MaintenancePolicy, vehicle: &Vehicle, now: NaiveDateTime) -> Status {
    let expiry = match vehicle.safety_inspection_expiry {
        Some(e) => start_of(e),
        None if vehicle.safety_inspection_date.is_none() => return Status::Unknown,
        None => return Status::Ok,
    };

    if now > expiry {
        Status::Due
    } else if days_after(now, policy.inspection_approaching_days).map_or(false, |end| expiry < end) {
        Status::Approaching
    } else {
        Status::Ok
    }
}

/// Safety-inspection status as the fleet views it: an onboarded vehicle (one
/// with a model year) that has no inspection on file owes one.
pub fn fleet_inspection_status(policy: &MaintenancePolicy, vehicle: &Vehicle, now: NaiveDateTime) -> Status {
    if vehicle.safety_inspection_expiry.is_none() && vehicle.year.is_some() {
        return Status::Due;
    }
    evaluate_safety_inspection(policy, vehicle, now)
}
