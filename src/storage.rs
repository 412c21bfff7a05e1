use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use crate::error::Result;
use crate::models::Vehicle;
use crate::policy::MaintenancePolicy;

/// Returns the path to the fleet database file (`vehicles.json`).
///
/// The path is determined in the following order:
/// 1. `FLEET_DB` environment variable.
/// 2. `~/.local/share/fleetust/vehicles.json` (on Linux).
/// 3. `./vehicles.json` (fallback).
fn db_path() -> PathBuf {
    std::env::var("FLEET_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("fleetust");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("vehicles.json");
        p
    })
}

/// Returns the path to the settings file (`settings.json`).
///
/// Located in the same directory as the fleet database.
pub fn settings_path() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p.push("settings.json");
    p
}

/// Reads a file, mapping "not found" to `None`.
fn read_optional(path: &PathBuf) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Loads all vehicles. A missing database is an empty fleet.
pub fn load_vehicles() -> Result<Vec<Vehicle>> {
    match read_optional(&db_path())? {
        Some(s) if !s.trim().is_empty() => Ok(serde_json::from_str(&s)?),
        _ => Ok(Vec::new()),
    }
}

/// Loads a single vehicle by its ID.
pub fn load_vehicle(id: u64) -> Result<Option<Vehicle>> {
    Ok(load_vehicles()?.into_iter().find(|v| v.id == id))
}

/// Saves the given list of vehicles, overwriting the database.
pub fn save_vehicles(vehicles: &[Vehicle]) -> Result<()> {
    let path = db_path();
    let s = serde_json::to_string_pretty(vehicles)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    f.write_all(s.as_bytes())?;
    log::info!("saved {} vehicles to {}", vehicles.len(), path.display());
    Ok(())
}

/// Loads the maintenance policy from `settings.json`.
///
/// Missing fields take their documented defaults. An unreadable or malformed
/// file is logged and the defaults are used, as is any day window outside
/// `0..=MAX_WINDOW_DAYS`.
pub fn load_policy() -> MaintenancePolicy {
    let path = settings_path();
    let parsed = read_optional(&path).and_then(|s| match s {
        Some(s) => Ok(Some(serde_json::from_str::<MaintenancePolicy>(&s)?)),
        None => Ok(None),
    });
    match parsed {
        Ok(Some(policy)) => policy.sanitized(),
        Ok(None) => MaintenancePolicy::default(),
        Err(e) => {
            log::warn!("ignoring settings at {}: {}", path.display(), e);
            MaintenancePolicy::default()
        }
    }
}

/// Deletes the fleet database file.
pub fn delete_database() -> Result<()> {
    let path = db_path();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
