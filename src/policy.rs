use serde::{Deserialize, Serialize};
use crate::models::{DistanceUnit, MaintenanceItem, TaskKind};

/// Longest approaching window accepted from settings, in days.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Default intervals for one distance unit. A value of 0 leaves the task untracked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntervalTable {
    pub oil: u64,
    pub air_filter: u64,
    pub fuel_filter: u64,
    pub dpf_cleaning: u64,
}

impl IntervalTable {
    pub fn miles() -> Self {
        IntervalTable { oil: 5000, air_filter: 15000, fuel_filter: 25000, dpf_cleaning: 100000 }
    }

    pub fn km() -> Self {
        IntervalTable { oil: 8000, air_filter: 24000, fuel_filter: 40000, dpf_cleaning: 160000 }
    }

    pub fn get(&self, kind: TaskKind) -> u64 {
        match kind {
            TaskKind::Oil => self.oil,
            TaskKind::AirFilter => self.air_filter,
            TaskKind::FuelFilter => self.fuel_filter,
            TaskKind::DpfCleaning => self.dpf_cleaning,
        }
    }
}

/// Urgency weight per maintenance item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Weights {
    pub oil: u32,
    pub air_filter: u32,
    pub fuel_filter: u32,
    pub dpf_cleaning: u32,
    pub safety_inspection: u32,
}

impl Weights {
    pub fn due() -> Self {
        Weights { oil: 100, air_filter: 90, fuel_filter: 80, dpf_cleaning: 70, safety_inspection: 110 }
    }

    pub fn approaching() -> Self {
        Weights { oil: 50, air_filter: 45, fuel_filter: 40, dpf_cleaning: 35, safety_inspection: 55 }
    }

    pub fn get(&self, item: MaintenanceItem) -> u32 {
        match item {
            MaintenanceItem::Task(TaskKind::Oil) => self.oil,
            MaintenanceItem::Task(TaskKind::AirFilter) => self.air_filter,
            MaintenanceItem::Task(TaskKind::FuelFilter) => self.fuel_filter,
            MaintenanceItem::Task(TaskKind::DpfCleaning) => self.dpf_cleaning,
            MaintenanceItem::SafetyInspection => self.safety_inspection,
        }
    }
}

/// Every tunable number the status and urgency rules depend on.
///
/// Loaded from `settings.json`; missing fields take the values from
/// `MaintenancePolicy::default()`. The task window (14 days) and the inspection
/// window (30 days) are separate settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MaintenancePolicy {
    pub miles_intervals: IntervalTable,
    pub km_intervals: IntervalTable,
    /// Distance buffer before the next due distance, in miles.
    pub approaching_miles: u64,
    /// Distance buffer before the next due distance, in kilometers.
    pub approaching_km: u64,
    /// Days before a task's next due date it counts as approaching.
    pub task_approaching_days: i64,
    /// Days before inspection expiry it counts as approaching.
    pub inspection_approaching_days: i64,
    pub due_weights: Weights,
    pub approaching_weights: Weights,
    /// Added for a vehicle that has never been serviced.
    pub no_history_bonus: u32,
}

impl Default for MaintenancePolicy {
    fn default() -> Self {
        MaintenancePolicy {
            miles_intervals: IntervalTable::miles(),
            km_intervals: IntervalTable::km(),
            approaching_miles: 500,
            approaching_km: 800,
            task_approaching_days: 14,
            inspection_approaching_days: 30,
            due_weights: Weights::due(),
            approaching_weights: Weights::approaching(),
            no_history_bonus: 60,
        }
    }
}

impl MaintenancePolicy {
    pub fn default_interval(&self, kind: TaskKind, unit: DistanceUnit) -> u64 {
        match unit {
            DistanceUnit::Miles => self.miles_intervals.get(kind),
            DistanceUnit::Km => self.km_intervals.get(kind),
        }
    }

    pub fn approaching_distance_threshold(&self, unit: DistanceUnit) -> u64 {
        match unit {
            DistanceUnit::Miles => self.approaching_miles,
            DistanceUnit::Km => self.approaching_km,
        }
    }

    /// Replaces day windows outside `0..=MAX_WINDOW_DAYS` with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = MaintenancePolicy::default();
        if !(0..=MAX_WINDOW_DAYS).contains(&self.task_approaching_days) {
            log::warn!(
                "task_approaching_days {} out of range, using {}",
                self.task_approaching_days, defaults.task_approaching_days
            );
            self.task_approaching_days = defaults.task_approaching_days;
        }
        if !(0..=MAX_WINDOW_DAYS).contains(&self.inspection_approaching_days) {
            log::warn!(
                "inspection_approaching_days {} out of range, using {}",
                self.inspection_approaching_days, defaults.inspection_approaching_days
            );
            self.inspection_approaching_days = defaults.inspection_approaching_days;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intervals() {
        let p = MaintenancePolicy::default();
        assert_eq!(p.default_interval(TaskKind::Oil, DistanceUnit::Miles), 5000);
        assert_eq!(p.default_interval(TaskKind::Oil, DistanceUnit::Km), 8000);
        assert_eq!(p.default_interval(TaskKind::AirFilter, DistanceUnit::Km), 24000);
        assert_eq!(p.default_interval(TaskKind::FuelFilter, DistanceUnit::Miles), 25000);
        assert_eq!(p.default_interval(TaskKind::DpfCleaning, DistanceUnit::Km), 160000);
    }

    #[test]
    fn test_thresholds() {
        let p = MaintenancePolicy::default();
        assert_eq!(p.approaching_distance_threshold(DistanceUnit::Miles), 500);
        assert_eq!(p.approaching_distance_threshold(DistanceUnit::Km), 800);
    }

    #[test]
    fn test_sanitized_resets_bad_windows() {
        let p = MaintenancePolicy {
            task_approaching_days: 9_000_000_000_000_000,
            inspection_approaching_days: -1,
            ..MaintenancePolicy::default()
        }
        .sanitized();
        assert_eq!(p.task_approaching_days, 14);
        assert_eq!(p.inspection_approaching_days, 30);

        let kept = MaintenancePolicy { task_approaching_days: 0, ..MaintenancePolicy::default() }.sanitized();
        assert_eq!(kept.task_approaching_days, 0);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let p: MaintenancePolicy = serde_json::from_str(
            r#"{"approaching_km": 1000, "km_intervals": {"oil": 10000, "air_filter": 0, "fuel_filter": 40000, "dpf_cleaning": 160000}}"#,
        ).unwrap();
        assert_eq!(p.approaching_km, 1000);
        assert_eq!(p.km_intervals.oil, 10000);
        assert_eq!(p.km_intervals.air_filter, 0);
        assert_eq!(p.miles_intervals.oil, 5000);
        assert_eq!(p.task_approaching_days, 14);
        assert_eq!(p.no_history_bonus, 60);
    }
}
