use chrono::NaiveDateTime;
use ratatui::widgets::TableState;
use crate::commands::{cmd_add, cmd_inspect, cmd_odometer, cmd_remove, cmd_service};
use crate::error::Result;
use crate::models::{DistanceUnit, SortMode, TaskKind, Vehicle};
use crate::policy::MaintenancePolicy;
use crate::ranking::rank_vehicles;
use crate::storage::load_vehicles;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

pub enum InputField {
    None,
    Odometer,
    Service(TaskKind),
    Inspection,
}

/// State for the multi-step "Add Vehicle" wizard.
#[derive(Default)]
pub struct AddState {
    pub unit_number: String,
    pub year: Option<i32>,
    pub step: usize, // 0: Unit number, 1: Year, 2: Odometer
}

pub struct App {
    pub policy: MaintenancePolicy,
    pub now: NaiveDateTime,
    /// Vehicles in display order for the current sort mode.
    pub vehicles: Vec<Vehicle>,
    pub sort_mode: SortMode,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    pub add_state: AddState,
    /// Outcome of the last action, shown in the help bar.
    pub message: Option<String>,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(policy: MaintenancePolicy, now: NaiveDateTime) -> App {
        let mut app = App {
            policy,
            now,
            vehicles: Vec::new(),
            sort_mode: SortMode::Urgency,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            message: None,
        };
        app.reload();
        app
    }

    /// Selects the next vehicle.
    pub fn next(&mut self) {
        if self.vehicles.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.vehicles.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous vehicle.
    pub fn previous(&mut self) {
        if self.vehicles.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.vehicles.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn selected_vehicle(&self) -> Option<&Vehicle> {
        self.state.selected().and_then(|i| self.vehicles.get(i))
    }

    /// Reloads vehicles from storage and re-ranks them.
    pub fn reload(&mut self) {
        let all = match load_vehicles() {
            Ok(v) => v,
            Err(e) => {
                self.message = Some(e.to_string());
                Vec::new()
            }
        };
        self.vehicles = rank_vehicles(&self.policy, &all, self.sort_mode, self.now)
            .into_iter()
            .cloned()
            .collect();

        if self.vehicles.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.vehicles.len() {
                self.state.select(Some(self.vehicles.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Switches to the next sort mode.
    pub fn cycle_sort(&mut self) {
        self.sort_mode = self.sort_mode.next();
        self.reload();
    }

    /// Deletes the currently selected vehicle.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_vehicle().map(|v| v.id) {
            let result = cmd_remove(id, true);
            self.report(result, format!("Vehicle {} removed", id));
            self.reload();
        }
    }

    /// Initiates the "Add Vehicle" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of a field for the selected vehicle.
    pub fn start_edit(&mut self, field: InputField) {
        let (id, odometer) = match self.selected_vehicle() {
            Some(v) => (v.id, v.current_odometer),
            None => return,
        };
        self.target_id = Some(id);
        self.input_mode = InputMode::Editing;
        self.input_field = field;
        self.input_buffer.clear();

        // Pre-fill buffer for editing
        match self.input_field {
            InputField::Odometer | InputField::Service(_) => {
                self.input_buffer = odometer.map(|o| o.to_string()).unwrap_or_default();
            }
            InputField::Inspection => self.input_buffer = self.now.date().to_string(),
            InputField::None => {}
        }
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Normal => {}
        }
    }

    fn report(&mut self, result: Result<()>, success: String) {
        self.message = Some(match result {
            Ok(()) => success,
            Err(e) => e.to_string(),
        });
    }

    /// Handles input for the "Add Vehicle" wizard.
    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => { // Unit number
                if !self.input_buffer.is_empty() {
                    self.add_state.unit_number = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => { // Year
                if let Ok(y) = self.input_buffer.trim().parse::<i32>() {
                    self.add_state.year = Some(y);
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                } else if self.input_buffer.is_empty() {
                    self.add_state.step += 1;
                }
            }
            2 => { // Odometer
                let odometer = self.input_buffer.trim().parse::<i64>().ok();
                let result = cmd_add(
                    self.add_state.unit_number.clone(),
                    None,
                    None,
                    self.add_state.year,
                    None,
                    DistanceUnit::Km,
                    odometer,
                    true,
                );
                let success = format!("Vehicle {} added", self.add_state.unit_number);
                self.report(result.map(|_| ()), success);
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.reload();
            }
            _ => {}
        }
    }

    /// Handles input for the edit prompts.
    fn handle_editing_input(&mut self) {
        if let Some(id) = self.target_id {
            let value = self.input_buffer.trim().to_string();
            let result = match self.input_field {
                InputField::Odometer => match value.parse::<i64>() {
                    Ok(o) => Some((cmd_odometer(id, o, true), "Odometer updated".to_string())),
                    Err(_) => None,
                },
                InputField::Service(kind) => {
                    let odometer = value.parse::<i64>().ok();
                    let result = cmd_service(id, kind, None, odometer, None, None, self.now.date(), true);
                    Some((result, format!("{} recorded", kind.label())))
                }
                InputField::Inspection => Some((cmd_inspect(id, value, true), "Inspection recorded".to_string())),
                InputField::None => None,
            };
            if let Some((result, success)) = result {
                self.report(result, success);
            }
            self.input_mode = InputMode::Normal;
            self.input_field = InputField::None;
            self.input_buffer.clear();
            self.reload();
        }
    }
}
