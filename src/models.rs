use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Distance unit a vehicle's odometer and intervals are expressed in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Miles,
    #[default]
    Km,
}

impl DistanceUnit {
    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Km => "km",
        }
    }
}

/// The recurring, distance-based maintenance tasks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    Oil,
    AirFilter,
    FuelFilter,
    DpfCleaning,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Oil,
        TaskKind::AirFilter,
        TaskKind::FuelFilter,
        TaskKind::DpfCleaning,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Oil => "Oil Change",
            TaskKind::AirFilter => "Air Filter",
            TaskKind::FuelFilter => "Fuel Filter",
            TaskKind::DpfCleaning => "DPF Cleaning",
        }
    }
}

/// Anything that can carry a status: the four tasks plus the safety inspection.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MaintenanceItem {
    Task(TaskKind),
    SafetyInspection,
}

impl MaintenanceItem {
    pub const ALL: [MaintenanceItem; 5] = [
        MaintenanceItem::Task(TaskKind::Oil),
        MaintenanceItem::Task(TaskKind::AirFilter),
        MaintenanceItem::Task(TaskKind::FuelFilter),
        MaintenanceItem::Task(TaskKind::DpfCleaning),
        MaintenanceItem::SafetyInspection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MaintenanceItem::Task(kind) => kind.label(),
            MaintenanceItem::SafetyInspection => "Safety Inspection",
        }
    }
}

impl From<TaskKind> for MaintenanceItem {
    fn from(kind: TaskKind) -> Self {
        MaintenanceItem::Task(kind)
    }
}

/// Ordering used when listing the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortMode {
    /// Overall urgency across every item
    #[default]
    Urgency,
    Oil,
    AirFilter,
    FuelFilter,
    DpfCleaning,
    SafetyInspection,
}

impl SortMode {
    pub const ALL: [SortMode; 6] = [
        SortMode::Urgency,
        SortMode::Oil,
        SortMode::AirFilter,
        SortMode::FuelFilter,
        SortMode::DpfCleaning,
        SortMode::SafetyInspection,
    ];

    /// The single item this mode ranks by, `None` for the aggregate mode.
    pub fn item(self) -> Option<MaintenanceItem> {
        match self {
            SortMode::Urgency => None,
            SortMode::Oil => Some(TaskKind::Oil.into()),
            SortMode::AirFilter => Some(TaskKind::AirFilter.into()),
            SortMode::FuelFilter => Some(TaskKind::FuelFilter.into()),
            SortMode::DpfCleaning => Some(TaskKind::DpfCleaning.into()),
            SortMode::SafetyInspection => Some(MaintenanceItem::SafetyInspection),
        }
    }

    pub fn label(self) -> &'static str {
        match self.item() {
            None => "Overall Urgency",
            Some(item) => item.label(),
        }
    }

    /// Next mode in display order, wrapping around.
    pub fn next(self) -> SortMode {
        let idx = SortMode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        SortMode::ALL[(idx + 1) % SortMode::ALL.len()]
    }
}

/// Per-task service intervals, in the vehicle's distance unit.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Intervals {
    #[serde(default)]
    pub oil: Option<i64>,
    #[serde(default)]
    pub air_filter: Option<i64>,
    #[serde(default)]
    pub fuel_filter: Option<i64>,
    #[serde(default)]
    pub dpf_cleaning: Option<i64>,
}

impl Intervals {
    pub fn get(&self, kind: TaskKind) -> Option<i64> {
        match kind {
            TaskKind::Oil => self.oil,
            TaskKind::AirFilter => self.air_filter,
            TaskKind::FuelFilter => self.fuel_filter,
            TaskKind::DpfCleaning => self.dpf_cleaning,
        }
    }

    pub fn get_mut(&mut self, kind: TaskKind) -> &mut Option<i64> {
        match kind {
            TaskKind::Oil => &mut self.oil,
            TaskKind::AirFilter => &mut self.air_filter,
            TaskKind::FuelFilter => &mut self.fuel_filter,
            TaskKind::DpfCleaning => &mut self.dpf_cleaning,
        }
    }
}

/// A service performed on a vehicle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MaintenanceRecord {
    /// Which task was performed.
    pub kind: TaskKind,
    /// Date the service was performed.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Odometer reading at service time.
    #[serde(default)]
    pub odometer: Option<i64>,
    /// Date the next service is due, set when the service is recorded.
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl MaintenanceRecord {
    /// Odometer at service, treating negative readings as absent.
    pub fn odometer(&self) -> Option<u64> {
        self.odometer.and_then(|o| u64::try_from(o).ok())
    }
}

/// A vehicle as stored in the fleet database.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Vehicle {
    /// Unique identifier for the vehicle.
    pub id: u64,
    /// Fleet unit number painted on the truck.
    pub unit_number: String,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Model year. A vehicle with a year is considered onboarded.
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    #[serde(default)]
    pub current_odometer: Option<i64>,
    #[serde(default)]
    pub intervals: Intervals,
    #[serde(default)]
    pub safety_inspection_date: Option<NaiveDate>,
    /// Always inspection date + 1 year, maintained by the editing command.
    #[serde(default)]
    pub safety_inspection_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub maintenance_history: Vec<MaintenanceRecord>,
    /// Timestamp when the vehicle was added (ISO 8601).
    #[serde(default)]
    pub created_at: String,
}

impl Vehicle {
    /// Current odometer, treating negative readings as absent.
    pub fn odometer(&self) -> Option<u64> {
        self.current_odometer.and_then(|o| u64::try_from(o).ok())
    }

    /// The configured interval for `kind`, if it is a usable positive value.
    pub fn interval(&self, kind: TaskKind) -> Option<u64> {
        self.intervals
            .get(kind)
            .filter(|i| *i > 0)
            .and_then(|i| u64::try_from(i).ok())
    }

    pub fn has_history(&self) -> bool {
        !self.maintenance_history.is_empty()
    }

    /// The authoritative record for `kind`: the most recently dated one.
    pub fn record_for(&self, kind: TaskKind) -> Option<&MaintenanceRecord> {
        self.maintenance_history
            .iter()
            .filter(|r| r.kind == kind)
            .max_by_key(|r| r.date)
    }

    /// Date of the most recent service of any kind.
    pub fn last_service_date(&self) -> Option<NaiveDate> {
        self.maintenance_history.iter().filter_map(|r| r.date).max()
    }

    /// Short human label, e.g. `#103 2020 Volvo VNL`.
    pub fn display_name(&self) -> String {
        let mut parts = vec![format!("#{}", self.unit_number)];
        if let Some(y) = self.year {
            parts.push(y.to_string());
        }
        if let Some(m) = &self.make {
            parts.push(m.clone());
        }
        if let Some(m) = &self.model {
            parts.push(m.clone());
        }
        parts.join(" ")
    }
}
