//! Weekly course timetable planner.
//!
//! Builds a slot grid for the active days, then assigns teachers, classes
//! and rooms slot by slot with a greedy first-fit pass, and derives load
//! statistics from the result. See [`planning::generate`] for the single
//! entry point; [`server`] and the binary expose it over HTTP and the CLI.

pub mod config;
pub mod data;
pub mod error;
pub mod fixtures;
pub mod planning;
pub mod report;
pub mod request;
pub mod server;
pub mod slots;
pub mod solver;
pub mod stats;

pub use data::{Assignment, Catalog, Class, Room, Slot, Teacher, Weekday};
pub use error::{ScheduleError, ScheduleResult};
pub use planning::{generate, Planning, PlanningGenerator};
pub use slots::SlotGrid;
pub use solver::{Diagnostics, ScheduleOutcome, Scheduler};
