//! rutina - Personal weekly workout planner and tracker

pub mod config;
pub mod db;
pub mod schedule;
pub mod tui;

pub use db::Database;
pub use schedule::WeeklySchedule;
