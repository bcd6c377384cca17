//! Plain-text renderings of a planning, for the console and for export.

use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

use crate::data::{Assignment, Weekday};
use crate::planning::Planning;

/// Full textual report: summary, every session, per-entity totals and
/// whatever the scheduler could not place.
pub struct Report<'a>(pub &'a Planning);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let planning = self.0;
        let summary = planning.summary();

        writeln!(f, "--- SUMMARY ---")?;
        writeln!(f, "Day: {}", summary.day_span)?;
        writeln!(f, "Week: {} slots in total", summary.total_slots)?;
        writeln!(f, "Teachers ({}): {}", summary.teachers.len(), summary.teachers.join(", "))?;
        writeln!(f, "Classes ({}): {}", summary.classes.len(), summary.classes.join(", "))?;

        writeln!(f)?;
        writeln!(f, "--- ROOMS ---")?;
        for room in planning.catalog.rooms() {
            writeln!(f, "{room}")?;
        }

        writeln!(f)?;
        writeln!(f, "--- PLANNING ---")?;
        let fallbacks: HashMap<usize, _> = planning
            .diagnostics
            .fallback_placements
            .iter()
            .map(|p| (p.assignment, p))
            .collect();
        for (i, assignment) in planning.assignments.iter().enumerate() {
            writeln!(f, "{assignment}")?;
            if let Some(p) = fallbacks.get(&i) {
                writeln!(
                    f,
                    "   WARNING: {} (capacity {}) is too small for {} ({} students)",
                    p.room, p.capacity, p.class, p.headcount
                )?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Total: {} sessions scheduled", planning.assignments.len())?;

        writeln!(f)?;
        writeln!(f, "--- SESSIONS PER TEACHER ---")?;
        for (name, sessions) in planning.teacher_hours().iter() {
            writeln!(f, "{name} : {sessions} sessions this week")?;
        }

        writeln!(f)?;
        writeln!(f, "--- SESSIONS PER CLASS ---")?;
        for class in planning.catalog.classes() {
            let scheduled = planning.class_hours().get(&class.name).unwrap_or(0);
            writeln!(
                f,
                "{} : {} scheduled / {} requested",
                class.name, scheduled, class.weekly_sessions
            )?;
        }

        let diagnostics = &planning.diagnostics;
        if diagnostics.has_shortfall() || !diagnostics.oversized_classes.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- NOT SCHEDULED ---")?;
            for shortfall in &diagnostics.unscheduled {
                writeln!(f, "{} : {} sessions missing", shortfall.class, shortfall.missing)?;
            }
            if !diagnostics.oversized_classes.is_empty() {
                writeln!(
                    f,
                    "No room large enough for: {}",
                    diagnostics.oversized_classes.join(", ")
                )?;
            }
        }

        writeln!(f)?;
        write!(f, "Grand total: {} sessions scheduled", summary.total_sessions)
    }
}

/// Weekly grid for one class: one row per time label, one column per
/// active day, cells read `teacher / room`.
pub struct ClassTimetable<'a> {
    planning: &'a Planning,
    class: &'a str,
}

impl<'a> ClassTimetable<'a> {
    pub fn new(planning: &'a Planning, class: &'a str) -> Self {
        Self { planning, class }
    }

    fn cells(&self) -> HashMap<(Weekday, &'a str), &'a Assignment> {
        self.planning
            .assignments
            .iter()
            .filter(|a| a.class == self.class)
            .map(|a| ((a.day, a.time.as_str()), a))
            .collect()
    }
}

impl fmt::Display for ClassTimetable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = &self.planning.grid;
        let cells = self.cells();
        let days = grid.days();
        let times = grid.time_labels();

        let rows: Vec<Vec<String>> = times
            .iter()
            .map(|&time| {
                let mut row = vec![time.to_string()];
                row.extend(days.iter().map(|&day| match cells.get(&(day, time)) {
                    Some(a) => format!("{} / {}", a.teacher, a.room),
                    None => "-".to_string(),
                }));
                row
            })
            .collect();

        let header: Vec<String> = std::iter::once("Time".to_string())
            .chain(days.iter().map(|d| d.to_string()))
            .collect();
        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                rows.iter()
                    .map(|r| r[col].chars().count())
                    .chain(std::iter::once(header[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cols: &[String]| {
            cols.iter()
                .zip(&widths)
                .map(|(c, &w)| format!("{c:<w$}"))
                .join(" | ")
        };

        writeln!(f, "=== {} ===", self.class)?;
        writeln!(f, "{}", line(&header))?;
        writeln!(f, "{}", widths.iter().map(|w| "-".repeat(*w)).join("-+-"))?;
        for row in &rows {
            writeln!(f, "{}", line(row).trim_end())?;
        }
        Ok(())
    }
}

/// Weekly grids of every class, in catalog order.
pub fn class_timetables(planning: &Planning) -> String {
    planning
        .catalog
        .classes()
        .iter()
        .map(|c| ClassTimetable::new(planning, &c.name).to_string())
        .join("\n")
}
