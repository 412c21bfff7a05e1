//! Fleet maintenance tracking: due-status evaluation, urgency scoring and
//! ranking for a fleet of vehicles, plus the store, CLI commands and TUI
//! built on top of them.

pub mod commands;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod policy;
pub mod ranking;
pub mod status;
pub mod storage;
pub mod tui;
pub mod units;
pub mod urgency;
