//! Single entry point for a full planning run:
//! slot grid, then scheduler, then statistics.

use log::info;

use crate::config::{DEFAULT_ACTIVE_DAYS, DEFAULT_SLOT_DURATION};
use crate::data::{Assignment, Catalog, Class, Room, Teacher, Weekday};
use crate::error::{ScheduleError, ScheduleResult};
use crate::slots::SlotGrid;
use crate::solver::{check_exclusivity, Diagnostics, Scheduler};
use crate::stats::{PlanningStats, Summary, Tally};

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Planning {
    pub catalog: Catalog,
    pub grid: SlotGrid,
    pub assignments: Vec<Assignment>,
    pub diagnostics: Diagnostics,
    pub stats: PlanningStats,
}

impl Planning {
    pub fn summary(&self) -> &Summary {
        &self.stats.summary
    }

    pub fn teacher_hours(&self) -> &Tally<usize> {
        &self.stats.teacher_hours
    }

    pub fn class_hours(&self) -> &Tally<usize> {
        &self.stats.class_hours
    }
}

/// Run parameters. Each call to [`generate`](Self::generate) is an
/// independent run with its own grid and scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningGenerator {
    start_hour: f64,
    end_hour: f64,
    days: Vec<Weekday>,
    slot_duration: f64,
    slot_limit: Option<usize>,
}

impl PlanningGenerator {
    /// Monday to Friday, one-hour slots.
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
            days: DEFAULT_ACTIVE_DAYS.to_vec(),
            slot_duration: DEFAULT_SLOT_DURATION,
            slot_limit: None,
        }
    }

    pub fn with_days(mut self, days: Vec<Weekday>) -> Self {
        self.days = days;
        self
    }

    pub fn with_slot_duration(mut self, hours: f64) -> Self {
        self.slot_duration = hours;
        self
    }

    /// Preview mode: schedule into the first `limit` slots only.
    pub fn with_slot_limit(mut self, limit: usize) -> Self {
        self.slot_limit = Some(limit);
        self
    }

    /// Runs the planner over `catalog`.
    ///
    /// Range and resource errors are returned unchanged; an inconsistent
    /// result becomes [`ScheduleError::Generation`].
    pub fn generate(&self, catalog: &Catalog) -> ScheduleResult<Planning> {
        let grid = SlotGrid::build(self.start_hour, self.end_hour, &self.days, self.slot_duration)?;

        let mut scheduler = Scheduler::new(catalog)?;
        if let Some(limit) = self.slot_limit {
            scheduler = scheduler.with_slot_limit(limit);
        }
        let outcome = scheduler.run(&grid);

        check_exclusivity(&outcome.assignments).map_err(ScheduleError::Generation)?;
        let stats = PlanningStats::compute(
            &outcome.assignments,
            catalog.teachers(),
            catalog.classes(),
            &grid,
        )?;
        info!(
            "Generated planning: {} sessions over {} slots ({})",
            stats.summary.total_sessions, stats.summary.total_slots, stats.summary.day_span
        );

        Ok(Planning {
            catalog: catalog.clone(),
            grid,
            assignments: outcome.assignments,
            diagnostics: outcome.diagnostics,
            stats,
        })
    }
}

/// Generates a planning over the default week.
pub fn generate(
    start_hour: f64,
    end_hour: f64,
    teachers: Vec<Teacher>,
    classes: Vec<Class>,
    rooms: Vec<Room>,
) -> ScheduleResult<Planning> {
    let catalog = Catalog::new(teachers, classes, rooms)?;
    PlanningGenerator::new(start_hour, end_hour).generate(&catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_week_is_monday_to_friday() {
        let planning = generate(
            8.0,
            12.0,
            vec![Teacher::new("T1", vec![])],
            vec![Class::new("A", 20, 3)],
            vec![Room::new("R1", 30)],
        )
        .unwrap();
        assert_eq!(planning.grid.days(), &DEFAULT_ACTIVE_DAYS[..]);
        assert_eq!(planning.summary().total_slots, 20);
        assert_eq!(planning.assignments.len(), 3);
        assert_eq!(planning.class_hours().get("A"), Some(3));
    }

    #[test]
    fn range_errors_pass_through() {
        let err = generate(
            10.0,
            10.0,
            vec![Teacher::new("T1", vec![])],
            vec![Class::new("A", 20, 1)],
            vec![Room::new("R1", 30)],
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidRange { .. }));
    }

    #[test]
    fn resource_errors_pass_through() {
        let err = generate(8.0, 10.0, vec![Teacher::new("T1", vec![])], vec![Class::new("A", 20, 1)], vec![])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InsufficientResources { .. }));
    }

    #[test]
    fn generator_options() {
        let catalog = Catalog::new(
            vec![Teacher::new("T1", vec![])],
            vec![Class::new("A", 20, 10)],
            vec![Room::new("R1", 30)],
        )
        .unwrap();
        let planning = PlanningGenerator::new(8.0, 10.0)
            .with_days(vec![Weekday::Saturday])
            .with_slot_duration(0.5)
            .with_slot_limit(3)
            .generate(&catalog)
            .unwrap();
        assert_eq!(planning.grid.len(), 4);
        assert_eq!(planning.assignments.len(), 3);
        assert_eq!(planning.diagnostics.unscheduled_total, 7);
        assert_eq!(planning.summary().total_hours, 1.5);
    }
}
