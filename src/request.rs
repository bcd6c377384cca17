use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_ACTIVE_DAYS, DEFAULT_CAPACITY_RANGE, DEFAULT_HEADCOUNT_RANGE, DEFAULT_SLOT_DURATION,
    DEFAULT_WEEKLY_SESSIONS, MAX_RESOURCES,
};
use crate::data::{Assignment, Catalog, Class, Room, Teacher, Weekday};
use crate::error::{ScheduleError, ScheduleResult};
use crate::fixtures::{FixtureSource, RandomFixtures};
use crate::planning::{Planning, PlanningGenerator};
use crate::solver::Diagnostics;
use crate::stats::{Summary, Tally};

/// Either a bare count (`3`) or an explicit list of entries.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ResourceInput<T> {
    Count(usize),
    List(Vec<T>),
}

impl<T> ResourceInput<T> {
    pub fn len(&self) -> usize {
        match self {
            ResourceInput::Count(n) => *n,
            ResourceInput::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, index: usize) -> Option<&T> {
        match self {
            ResourceInput::Count(_) => None,
            ResourceInput::List(items) => items.get(index),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TeacherSpec {
    pub name: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSpec {
    pub name: Option<String>,
    pub headcount: Option<u32>,
    pub weekly_sessions: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RoomSpec {
    pub name: Option<String>,
    pub capacity: Option<u32>,
}

/// A planning request as received over HTTP or read by the CLI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningRequest {
    pub start_hour: f64,
    pub end_hour: f64,
    pub active_days: Option<Vec<Weekday>>,
    pub slot_duration: Option<f64>,
    /// Preview mode: only the first N slots are used.
    pub preview_slots: Option<usize>,
    pub teachers: ResourceInput<TeacherSpec>,
    pub classes: ResourceInput<ClassSpec>,
    pub rooms: ResourceInput<RoomSpec>,
    /// Subjects per teacher index when `teachers` is a count.
    #[serde(default)]
    pub teacher_subjects: Vec<Vec<String>>,
    /// Weekly sessions for classes that do not state their own.
    pub weekly_sessions: Option<u32>,
    pub headcount_range: Option<(u32, u32)>,
    pub capacity_range: Option<(u32, u32)>,
    pub seed: Option<u64>,
}

impl PlanningRequest {
    /// Runs the request, drawing missing headcounts and capacities at random.
    pub fn execute(&self) -> ScheduleResult<Planning> {
        let mut fixtures = self.random_fixtures()?;
        self.execute_with(&mut fixtures)
    }

    pub fn execute_with(&self, fixtures: &mut dyn FixtureSource) -> ScheduleResult<Planning> {
        let catalog = self.build_catalog(fixtures)?;
        self.generator().generate(&catalog)
    }

    pub fn random_fixtures(&self) -> ScheduleResult<RandomFixtures> {
        RandomFixtures::new(
            self.seed,
            self.headcount_range.unwrap_or(DEFAULT_HEADCOUNT_RANGE),
            self.capacity_range.unwrap_or(DEFAULT_CAPACITY_RANGE),
        )
    }

    pub fn generator(&self) -> PlanningGenerator {
        let mut generator = PlanningGenerator::new(self.start_hour, self.end_hour)
            .with_days(self.days())
            .with_slot_duration(self.slot_duration.unwrap_or(DEFAULT_SLOT_DURATION));
        if let Some(limit) = self.preview_slots {
            generator = generator.with_slot_limit(limit);
        }
        generator
    }

    pub fn days(&self) -> Vec<Weekday> {
        self.active_days
            .clone()
            .unwrap_or_else(|| DEFAULT_ACTIVE_DAYS.to_vec())
    }

    /// Materializes the resource lists. Unnamed entries are called
    /// `Teacher_N`, `Class_N`, `Room_N` (1-based). Counts above
    /// `MAX_RESOURCES` are refused before anything is allocated.
    pub fn build_catalog(&self, fixtures: &mut dyn FixtureSource) -> ScheduleResult<Catalog> {
        for (kind, count) in [
            ("teachers", self.teachers.len()),
            ("classes", self.classes.len()),
            ("rooms", self.rooms.len()),
        ] {
            if count > MAX_RESOURCES {
                return Err(ScheduleError::InvalidCatalog(format!(
                    "{count} {kind} requested, at most {MAX_RESOURCES} are allowed"
                )));
            }
        }

        let teachers = (0..self.teachers.len())
            .map(|i| {
                let spec = self.teachers.entry(i);
                let name = spec
                    .and_then(|s| s.name.clone())
                    .unwrap_or_else(|| format!("Teacher_{}", i + 1));
                let subjects = match spec {
                    Some(s) => s.subjects.clone(),
                    None => self.teacher_subjects.get(i).cloned().unwrap_or_default(),
                };
                Teacher::new(name, subjects)
            })
            .collect();

        let default_sessions = self.weekly_sessions.unwrap_or(DEFAULT_WEEKLY_SESSIONS);
        let classes = (0..self.classes.len())
            .map(|i| {
                let spec = self.classes.entry(i);
                let name = spec
                    .and_then(|s| s.name.clone())
                    .unwrap_or_else(|| format!("Class_{}", i + 1));
                let headcount = spec
                    .and_then(|s| s.headcount)
                    .unwrap_or_else(|| fixtures.headcount(i));
                let sessions = spec.and_then(|s| s.weekly_sessions).unwrap_or(default_sessions);
                Class::new(name, headcount, sessions)
            })
            .collect::<Vec<_>>();

        let rooms = (0..self.rooms.len())
            .map(|i| {
                let spec = self.rooms.entry(i);
                let name = spec
                    .and_then(|s| s.name.clone())
                    .unwrap_or_else(|| format!("Room_{}", i + 1));
                let capacity = spec
                    .and_then(|s| s.capacity)
                    .unwrap_or_else(|| fixtures.capacity(i));
                Room::new(name, capacity)
            })
            .collect();

        Catalog::new(teachers, classes, rooms)
    }
}

/// Response body of a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningResponse {
    pub summary: Summary,
    pub assignments: Vec<Assignment>,
    pub teacher_hours: Tally<usize>,
    pub class_hours: Tally<usize>,
    pub teacher_load: Tally<f64>,
    pub diagnostics: Diagnostics,
    pub total_sessions: usize,
    pub total_hours: f64,
}

impl From<&Planning> for PlanningResponse {
    fn from(planning: &Planning) -> Self {
        Self {
            summary: planning.stats.summary.clone(),
            assignments: planning.assignments.clone(),
            teacher_hours: planning.stats.teacher_hours.clone(),
            class_hours: planning.stats.class_hours.clone(),
            teacher_load: planning.stats.teacher_load(),
            diagnostics: planning.diagnostics.clone(),
            total_sessions: planning.stats.summary.total_sessions,
            total_hours: planning.stats.summary.total_hours,
        }
    }
}

/// Error body: one human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
