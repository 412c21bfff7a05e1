use std::io::{self, Write};
use chrono::{Local, Months, NaiveDate, NaiveDateTime};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::dashboard::{attention_items, due_soon, recently_serviced, summarize};
use crate::error::{FleetError, Result};
use crate::models::{DistanceUnit, MaintenanceItem, MaintenanceRecord, SortMode, TaskKind, Vehicle};
use crate::policy::MaintenancePolicy;
use crate::ranking::rank_vehicles;
use crate::status::{effective_interval, evaluate_all_tasks, evaluate_safety_inspection, fleet_inspection_status, Status};
use crate::storage::{delete_database, load_vehicles, save_vehicles};
use crate::units::convert_reading;
use crate::urgency::urgency_score;

/// Smallest interval the editor accepts, in either unit.
pub const MIN_INTERVAL: i64 = 1000;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| FleetError::InvalidDate(s.to_string()))
}

fn find_vehicle(vehicles: &mut [Vehicle], id: u64) -> Result<&mut Vehicle> {
    vehicles.iter_mut().find(|v| v.id == id).ok_or(FleetError::VehicleNotFound(id))
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Due => Color::Red,
        Status::Approaching => Color::Yellow,
        Status::Ok => Color::Green,
        Status::Unknown => Color::Grey,
    }
}

/// Adds a new vehicle to the fleet and returns its ID.
pub fn cmd_add(
    unit_number: String,
    make: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    vin: Option<String>,
    unit: DistanceUnit,
    odometer: Option<i64>,
    silent: bool,
) -> Result<u64> {
    if let Some(o) = odometer.filter(|o| *o < 0) {
        return Err(FleetError::InvalidOdometer(o));
    }
    let mut vehicles = load_vehicles()?;
    if vehicles.iter().any(|v| v.unit_number == unit_number) {
        return Err(FleetError::DuplicateUnit(unit_number));
    }
    let next_id = vehicles.iter().map(|v| v.id).max().unwrap_or(0) + 1;
    vehicles.push(Vehicle {
        id: next_id,
        unit_number,
        vin,
        make,
        model,
        year,
        distance_unit: unit,
        current_odometer: odometer,
        created_at: Local::now().to_rfc3339(),
        ..Default::default()
    });
    save_vehicles(&vehicles)?;
    if !silent { println!("Vehicle added (id = {})", next_id); }
    Ok(next_id)
}

/// Removes a vehicle from the fleet.
pub fn cmd_remove(id: u64, silent: bool) -> Result<()> {
    let mut vehicles = load_vehicles()?;
    let len_before = vehicles.len();
    vehicles.retain(|v| v.id != id);
    if vehicles.len() == len_before {
        return Err(FleetError::VehicleNotFound(id));
    }
    save_vehicles(&vehicles)?;
    if !silent { println!("Vehicle {} removed.", id); }
    Ok(())
}

/// Records a service for one task, replacing any earlier record of that kind.
///
/// The date defaults to `today` and the next due date to three months after
/// the service. The vehicle's odometer is raised to the service reading if
/// that is higher.
pub fn cmd_service(
    id: u64,
    kind: TaskKind,
    date: Option<String>,
    odometer: Option<i64>,
    next_due: Option<String>,
    notes: Option<String>,
    today: NaiveDate,
    silent: bool,
) -> Result<()> {
    let date = match date {
        Some(d) => parse_date(&d)?,
        None => today,
    };
    let next_due_date = match next_due {
        Some(d) => parse_date(&d)?,
        None => date.checked_add_months(Months::new(3)).unwrap_or(date),
    };

    let mut vehicles = load_vehicles()?;
    let vehicle = find_vehicle(&mut vehicles, id)?;
    let reading = odometer.or(vehicle.current_odometer).unwrap_or(0);
    if reading < 0 {
        return Err(FleetError::InvalidOdometer(reading));
    }

    vehicle.maintenance_history.retain(|r| r.kind != kind);
    vehicle.maintenance_history.push(MaintenanceRecord {
        kind,
        date: Some(date),
        odometer: Some(reading),
        next_due_date: Some(next_due_date),
        notes: notes.unwrap_or_default(),
    });
    vehicle.current_odometer = Some(vehicle.current_odometer.map_or(reading, |c| c.max(reading)));

    save_vehicles(&vehicles)?;
    if !silent { println!("{} recorded for vehicle {}.", kind.label(), id); }
    Ok(())
}

/// Updates the current odometer. Readings never go backwards.
pub fn cmd_odometer(id: u64, value: i64, silent: bool) -> Result<()> {
    if value < 0 {
        return Err(FleetError::InvalidOdometer(value));
    }
    let mut vehicles = load_vehicles()?;
    let vehicle = find_vehicle(&mut vehicles, id)?;
    if let Some(current) = vehicle.current_odometer.filter(|c| *c > value) {
        log::warn!("rejected odometer {} for vehicle {} (current {})", value, id, current);
        return Err(FleetError::OdometerRollback { current, new: value });
    }
    vehicle.current_odometer = Some(value);
    let unit = vehicle.distance_unit.label();
    save_vehicles(&vehicles)?;
    if !silent { println!("Vehicle {} odometer set to {} {}.", id, value, unit); }
    Ok(())
}

/// Sets the service interval for one task.
pub fn cmd_interval(id: u64, kind: TaskKind, value: i64, silent: bool) -> Result<()> {
    if value < MIN_INTERVAL {
        return Err(FleetError::IntervalTooSmall { value, min: MIN_INTERVAL });
    }
    let mut vehicles = load_vehicles()?;
    let vehicle = find_vehicle(&mut vehicles, id)?;
    *vehicle.intervals.get_mut(kind) = Some(value);
    let unit = vehicle.distance_unit.label();
    save_vehicles(&vehicles)?;
    if !silent { println!("{} interval for vehicle {} set to {} {}.", kind.label(), id, value, unit); }
    Ok(())
}

/// Switches a vehicle's distance unit, converting every stored distance.
///
/// Each value is rounded on its own, so toggling back and forth can drift
/// by one unit.
pub fn cmd_unit(id: u64, unit: DistanceUnit, silent: bool) -> Result<()> {
    let mut vehicles = load_vehicles()?;
    let vehicle = find_vehicle(&mut vehicles, id)?;
    let from = vehicle.distance_unit;
    if from == unit {
        if !silent { println!("Vehicle {} already uses {}.", id, unit.label()); }
        return Ok(());
    }

    for kind in TaskKind::ALL {
        let interval = vehicle.intervals.get_mut(kind);
        *interval = interval.map(|i| convert_reading(i, from, unit));
    }
    vehicle.current_odometer = vehicle.current_odometer.map(|o| convert_reading(o, from, unit));
    for record in vehicle.maintenance_history.iter_mut() {
        record.odometer = record.odometer.map(|o| convert_reading(o, from, unit));
    }
    vehicle.distance_unit = unit;

    save_vehicles(&vehicles)?;
    if !silent { println!("Vehicle {} now uses {}.", id, unit.label()); }
    Ok(())
}

/// Records a safety inspection. The expiry is one year after the inspection.
pub fn cmd_inspect(id: u64, date: String, silent: bool) -> Result<()> {
    let date = parse_date(&date)?;
    let expiry = date.checked_add_months(Months::new(12)).unwrap_or(date);
    let mut vehicles = load_vehicles()?;
    let vehicle = find_vehicle(&mut vehicles, id)?;
    vehicle.safety_inspection_date = Some(date);
    vehicle.safety_inspection_expiry = Some(expiry);
    save_vehicles(&vehicles)?;
    if !silent { println!("Safety inspection recorded for vehicle {} (expires {}).", id, expiry); }
    Ok(())
}

/// Lists the fleet in a formatted table, ordered by `mode`.
pub fn cmd_list(policy: &MaintenancePolicy, mode: SortMode, now: NaiveDateTime) -> Result<()> {
    let vehicles = load_vehicles()?;
    if vehicles.is_empty() {
        println!("No vehicles found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Unit").add_attribute(Attribute::Bold),
            Cell::new("Vehicle").add_attribute(Attribute::Bold),
            Cell::new("Odometer").add_attribute(Attribute::Bold),
            Cell::new("Oil").add_attribute(Attribute::Bold),
            Cell::new("Air").add_attribute(Attribute::Bold),
            Cell::new("Fuel").add_attribute(Attribute::Bold),
            Cell::new("DPF").add_attribute(Attribute::Bold),
            Cell::new("Inspection").add_attribute(Attribute::Bold),
            Cell::new("Urg").add_attribute(Attribute::Bold),
        ]);

    for v in rank_vehicles(policy, &vehicles, mode, now) {
        let odometer = match v.odometer() {
            Some(o) => format!("{} {}", o, v.distance_unit.label()),
            None => "-".to_string(),
        };
        let mut row = vec![
            Cell::new(v.id),
            Cell::new(&v.unit_number),
            Cell::new(v.display_name()),
            Cell::new(odometer),
        ];
        for (_, eval) in evaluate_all_tasks(policy, v, now) {
            row.push(Cell::new(eval.status.label()).fg(status_color(eval.status)));
        }
        let inspection = fleet_inspection_status(policy, v, now);
        row.push(Cell::new(inspection.label()).fg(status_color(inspection)));
        row.push(Cell::new(urgency_score(policy, v, now)));
        table.add_row(row);
    }

    println!("Sorted by: {}", mode.label());
    println!("{table}");
    Ok(())
}

/// Shows one vehicle's status for every item and its service history.
pub fn cmd_show(policy: &MaintenancePolicy, id: u64, now: NaiveDateTime) -> Result<()> {
    let vehicles = load_vehicles()?;
    let v = vehicles.iter().find(|v| v.id == id).ok_or(FleetError::VehicleNotFound(id))?;
    let unit = v.distance_unit.label();

    println!("{} (id = {})", v.display_name(), v.id);
    if let Some(vin) = &v.vin {
        println!("VIN: {}", vin);
    }
    match v.odometer() {
        Some(o) => println!("Odometer: {} {}", o, unit),
        None => println!("Odometer: -"),
    }
    println!("Urgency: {}", urgency_score(policy, v, now));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Item", "Status", "Interval", "Last Service", "Next Due", "Overdue"]);

    for (kind, eval) in evaluate_all_tasks(policy, v, now) {
        let record = v.record_for(kind);
        let last = match record {
            Some(r) => format!(
                "{} @ {}",
                r.date.map(|d| d.to_string()).unwrap_or_else(|| "?".into()),
                r.odometer().map(|o| o.to_string()).unwrap_or_else(|| "?".into()),
            ),
            None => "Never".to_string(),
        };
        let next = match (eval.next_due_distance, record.and_then(|r| r.next_due_date)) {
            (Some(d), Some(date)) => format!("{} {} / {}", d, unit, date),
            (Some(d), None) => format!("{} {}", d, unit),
            (None, Some(date)) => date.to_string(),
            (None, None) => "-".to_string(),
        };
        let interval = effective_interval(policy, v, kind);
        table.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(eval.status.label()).fg(status_color(eval.status)),
            Cell::new(if interval > 0 { format!("{} {}", interval, unit) } else { "-".into() }),
            Cell::new(last),
            Cell::new(next),
            Cell::new(if eval.overdue_distance > 0 { format!("{} {}", eval.overdue_distance, unit) } else { String::new() }),
        ]);
    }

    let raw = evaluate_safety_inspection(policy, v, now);
    let fleet = fleet_inspection_status(policy, v, now);
    table.add_row(vec![
        Cell::new(MaintenanceItem::SafetyInspection.label()),
        Cell::new(raw.label()).fg(status_color(fleet)),
        Cell::new("1 year"),
        Cell::new(v.safety_inspection_date.map(|d| d.to_string()).unwrap_or_else(|| "Never".into())),
        Cell::new(v.safety_inspection_expiry.map(|d| d.to_string()).unwrap_or_else(|| "-".into())),
        Cell::new(""),
    ]);
    println!("{table}");

    for item in attention_items(policy, v, now) {
        println!("  ! {}: {}", item.item.label(), item.message);
    }

    if v.has_history() {
        let mut records: Vec<&MaintenanceRecord> = v.maintenance_history.iter().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        let mut history = Table::new();
        history
            .load_preset(UTF8_FULL)
            .set_header(vec!["Type", "Date", "Odometer", "Next Due", "Notes"]);
        for r in records {
            history.add_row(vec![
                r.kind.label().to_string(),
                r.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                r.odometer().map(|o| format!("{} {}", o, unit)).unwrap_or_else(|| "-".into()),
                r.next_due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                r.notes.clone(),
            ]);
        }
        println!("{history}");
    } else {
        println!("No maintenance records found.");
    }
    Ok(())
}

/// Prints fleet counts, the vehicles most in need of service and the most
/// recently serviced ones.
pub fn cmd_dashboard(policy: &MaintenancePolicy, now: NaiveDateTime) -> Result<()> {
    let vehicles = load_vehicles()?;
    let summary = summarize(policy, &vehicles, now);
    println!("Total vehicles:      {}", summary.total);
    println!("Maintenance due:     {}", summary.needs_attention);
    println!("Recent maintenance:  {}", summary.recently_serviced);

    let due = due_soon(policy, &vehicles, now, 5);
    if due.is_empty() {
        println!("\nNo maintenance due soon.");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["ID", "Vehicle", "Item", "Status"]);
        for v in due {
            for item in attention_items(policy, v, now) {
                table.add_row(vec![
                    Cell::new(v.id),
                    Cell::new(v.display_name()),
                    Cell::new(item.item.label()),
                    Cell::new(item.message).fg(status_color(item.status)),
                ]);
            }
        }
        println!("\nMaintenance due soon:");
        println!("{table}");
    }

    let recent = recently_serviced(&vehicles, 5);
    if !recent.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["ID", "Vehicle", "Last Service"]);
        for v in recent {
            table.add_row(vec![
                v.id.to_string(),
                v.display_name(),
                v.last_service_date().map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            ]);
        }
        println!("\nRecently serviced:");
        println!("{table}");
    }
    Ok(())
}

/// Resets the database by deleting all vehicles.
pub fn cmd_reset(force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all vehicles? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }

    delete_database()?;
    println!("Database reset successfully.");
    Ok(())
}
