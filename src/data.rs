use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{DEFAULT_SUBJECT, MAX_WEEKLY_SESSIONS};
use crate::error::{ScheduleError, ScheduleResult};

/// Position of a slot inside its [`SlotGrid`](crate::slots::SlotGrid).
pub type SlotIndex = usize;

/// A day of the week, serialized in lowercase English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A teacher. Subjects are informational; the allocator treats teachers as interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Teacher {
    pub name: String,
    pub subjects: Vec<String>,
}

impl Teacher {
    /// Creates a teacher, falling back to the placeholder subject when none is given.
    pub fn new(name: impl Into<String>, subjects: Vec<String>) -> Self {
        let subjects = if subjects.is_empty() {
            vec![DEFAULT_SUBJECT.to_string()]
        } else {
            subjects
        };
        Self {
            name: name.into(),
            subjects,
        }
    }
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.subjects.join(", "))
    }
}

/// A class: the demand unit. It needs `weekly_sessions` sessions per week.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub name: String,
    pub headcount: u32,
    pub weekly_sessions: u32,
}

impl Class {
    pub fn new(name: impl Into<String>, headcount: u32, weekly_sessions: u32) -> Self {
        Self {
            name: name.into(),
            headcount,
            weekly_sessions,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} students, {} sessions/week)",
            self.name, self.headcount, self.weekly_sessions
        )
    }
}

/// A physical room with a given capacity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub name: String,
    pub capacity: u32,
}

impl Room {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }

    pub fn can_host(&self, class: &Class) -> bool {
        self.capacity >= class.headcount
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (capacity: {})", self.name, self.capacity)
    }
}

/// One bookable time window of the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub day: Weekday,
    pub start_hour: f64,
    pub end_hour: f64,
    /// `HH:MM-HH:MM`
    pub label: String,
}

impl Slot {
    pub fn duration(&self) -> f64 {
        self.end_hour - self.start_hour
    }
}

/// A single scheduled session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Assignment {
    #[serde(skip)]
    pub slot: SlotIndex,
    pub day: Weekday,
    pub time: String,
    pub teacher: String,
    pub class: String,
    pub room: String,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} : {} teaches {} in {}",
            self.day, self.time, self.teacher, self.class, self.room
        )
    }
}

/// Immutable resource snapshot for one planning run.
///
/// Catalog order is significant: the allocator always searches teachers and
/// rooms first-fit in the order they were given, and queues class demand in
/// class order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    teachers: Vec<Teacher>,
    classes: Vec<Class>,
    rooms: Vec<Room>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate names, empty headcounts,
    /// zero-capacity rooms and classes asking for more than
    /// `MAX_WEEKLY_SESSIONS` sessions. Empty lists are accepted here; the scheduler
    /// refuses them.
    pub fn new(teachers: Vec<Teacher>, classes: Vec<Class>, rooms: Vec<Room>) -> ScheduleResult<Self> {
        ensure_unique("teacher", teachers.iter().map(|t| t.name.as_str()))?;
        ensure_unique("class", classes.iter().map(|c| c.name.as_str()))?;
        ensure_unique("room", rooms.iter().map(|r| r.name.as_str()))?;

        if let Some(class) = classes.iter().find(|c| c.headcount == 0) {
            return Err(ScheduleError::InvalidCatalog(format!(
                "class {} has a headcount of 0",
                class.name
            )));
        }
        if let Some(class) = classes.iter().find(|c| c.weekly_sessions > MAX_WEEKLY_SESSIONS) {
            return Err(ScheduleError::InvalidCatalog(format!(
                "class {} asks for {} weekly sessions, at most {MAX_WEEKLY_SESSIONS} are allowed",
                class.name, class.weekly_sessions
            )));
        }
        if let Some(room) = rooms.iter().find(|r| r.capacity == 0) {
            return Err(ScheduleError::InvalidCatalog(format!(
                "room {} has a capacity of 0",
                room.name
            )));
        }

        Ok(Self {
            teachers,
            classes,
            rooms,
        })
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    /// Total number of demand units across all classes.
    pub fn total_demand(&self) -> usize {
        self.classes.iter().map(|c| c.weekly_sessions as usize).sum()
    }

    /// Classes that no room in the catalog can seat.
    pub fn oversized_classes(&self) -> Vec<&Class> {
        self.classes
            .iter()
            .filter(|c| !self.rooms.iter().any(|r| r.can_host(c)))
            .collect()
    }
}

fn ensure_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> ScheduleResult<()> {
    match names.duplicates().next() {
        Some(name) => Err(ScheduleError::InvalidCatalog(format!(
            "duplicate {kind} name: {name}"
        ))),
        None => Ok(()),
    }
}
