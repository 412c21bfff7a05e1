//! # Fleetust
//!
//! A terminal fleet maintenance tracker. Fleetust keeps a small database of
//! trucks and tells you which ones need an oil change, a filter, a DPF cleaning
//! or a safety inspection, ranked by urgency.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! fleetust
//! # or explicitly
//! fleetust ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `j`/`k`: Move selection
//! *   `s`: Cycle sort mode
//! *   `a`: Add vehicle
//! *   `o`: Update odometer
//! *   `1`-`4`: Record oil / air filter / fuel filter / DPF service
//! *   `i`: Record safety inspection
//! *   `d`: Delete selected vehicle
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! fleetust add 103 --make Volvo --model VNL --year 2020 --odometer 42000
//! fleetust service 1 oil --odometer 41000
//! fleetust list --sort oil
//! fleetust show 1
//! fleetust dashboard
//! ```
//!
//! Every status is computed against the current local time, or against
//! `--as-of YYYY-MM-DD` when given.
//!
//! ## Data Storage
//!
//! Vehicles are saved in your local data directory (`vehicles.json`), or at
//! the path in the `FLEET_DB` environment variable. An optional
//! `settings.json` next to it overrides default intervals, thresholds and
//! weights. Set `RUST_LOG=debug` to trace evaluations.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use chrono::{Local, NaiveDateTime};
use std::io;
use std::process::ExitCode;
use fleetust::commands::*;
use fleetust::error::{FleetError, Result};
use fleetust::models::{DistanceUnit, SortMode, TaskKind};
use fleetust::storage::load_policy;
use fleetust::tui::run_tui;

#[derive(Parser)]
#[command(name = "fleetust")]
#[command(about = "Terminal fleet maintenance tracker", long_about = None)]
struct Cli {
    /// Evaluate statuses as of this date (YYYY-MM-DD) instead of now
    #[arg(long, global = true)]
    as_of: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new vehicle
    Add {
        /// Fleet unit number
        unit_number: String,
        #[arg(long)]
        make: Option<String>,
        #[arg(long)]
        model: Option<String>,
        /// Model year
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(long)]
        vin: Option<String>,
        /// Distance unit for odometer and intervals
        #[arg(short, long, value_enum, default_value_t = DistanceUnit::Km)]
        unit: DistanceUnit,
        /// Current odometer reading
        #[arg(short, long)]
        odometer: Option<i64>,
    },
    /// List vehicles ranked by urgency
    List {
        /// Sort mode
        #[arg(short, long, value_enum, default_value_t = SortMode::Urgency)]
        sort: SortMode,
    },
    /// Show the maintenance status of one vehicle
    Show {
        id: u64,
    },
    /// Fleet summary
    Dashboard,
    /// Record a maintenance service
    Service {
        id: u64,
        #[arg(value_enum)]
        kind: TaskKind,
        /// Service date in YYYY-MM-DD (default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Odometer at service (default current reading)
        #[arg(short, long)]
        odometer: Option<i64>,
        /// Next due date in YYYY-MM-DD (default three months after service)
        #[arg(short, long)]
        next: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update the current odometer reading
    Odometer {
        id: u64,
        value: i64,
    },
    /// Set a maintenance interval
    Interval {
        id: u64,
        #[arg(value_enum)]
        kind: TaskKind,
        value: i64,
    },
    /// Switch a vehicle's distance unit, converting stored distances
    Unit {
        id: u64,
        #[arg(value_enum)]
        unit: DistanceUnit,
    },
    /// Record a safety inspection (expires after one year)
    Inspect {
        id: u64,
        /// Inspection date in YYYY-MM-DD
        date: String,
    },
    /// Remove a vehicle
    Remove {
        id: u64,
    },
    /// Reset the database (delete all vehicles)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn resolve_now(as_of: Option<&str>) -> Result<NaiveDateTime> {
    match as_of {
        Some(d) => Ok(parse_date(d)?.and_time(Local::now().time())),
        None => Ok(Local::now().naive_local()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let now = resolve_now(cli.as_of.as_deref())?;
    let today = now.date();
    let policy = load_policy();

    match cli.command {
        Some(Commands::Add { unit_number, make, model, year, vin, unit, odometer }) => {
            cmd_add(unit_number, make, model, year, vin, unit, odometer, false).map(|_| ())
        }
        Some(Commands::List { sort }) => cmd_list(&policy, sort, now),
        Some(Commands::Show { id }) => cmd_show(&policy, id, now),
        Some(Commands::Dashboard) => cmd_dashboard(&policy, now),
        Some(Commands::Service { id, kind, date, odometer, next, notes }) => {
            cmd_service(id, kind, date, odometer, next, notes, today, false)
        }
        Some(Commands::Odometer { id, value }) => cmd_odometer(id, value, false),
        Some(Commands::Interval { id, kind, value }) => cmd_interval(id, kind, value, false),
        Some(Commands::Unit { id, unit }) => cmd_unit(id, unit, false),
        Some(Commands::Inspect { id, date }) => cmd_inspect(id, date, false),
        Some(Commands::Remove { id }) => cmd_remove(id, false),
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "fleetust", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui) | None => run_tui(policy, now).map_err(FleetError::Tui),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
