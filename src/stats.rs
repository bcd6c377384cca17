//! Load statistics derived from a finished assignment list.

use std::collections::HashMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::data::{Assignment, Class, Teacher};
use crate::error::{ScheduleError, ScheduleResult};
use crate::slots::{format_hour, SlotGrid};

/// Per-entity counters kept in catalog order.
///
/// Serializes as a JSON object whose keys follow catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> FromIterator<(String, T)> for Tally<T> {
    /// Later duplicates of a name are kept in order but never looked up.
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let entries: Vec<(String, T)> = iter.into_iter().collect();
        let mut index = HashMap::with_capacity(entries.len());
        for (i, (name, _)) in entries.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self { entries, index }
    }
}

impl<T> Tally<T> {
    fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let i = *self.index.get(name)?;
        self.entries.get_mut(i).map(|(_, v)| v)
    }
}

impl<T: Copy> Tally<T> {
    pub fn get(&self, name: &str) -> Option<T> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Tally<usize> {
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, v)| v).sum()
    }
}

impl<T: Serialize> Serialize for Tally<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Headline figures of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// e.g. `08:00-17:00 (9.0h/day)`
    pub day_span: String,
    pub total_slots: usize,
    pub slots_per_day: usize,
    pub teachers: Vec<String>,
    pub classes: Vec<String>,
    pub total_sessions: usize,
    /// Booked time in hours; differs from `total_sessions` when slots are not one hour long.
    pub total_hours: f64,
}

/// Statistics over one assignment list. Never mutates its input.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningStats {
    pub summary: Summary,
    pub teacher_hours: Tally<usize>,
    pub class_hours: Tally<usize>,
}

impl PlanningStats {
    /// Counts sessions per teacher and per class. Every catalog entry gets a
    /// counter, including those with no sessions. An assignment naming an
    /// unknown teacher or class is an internal fault.
    pub fn compute(
        assignments: &[Assignment],
        teachers: &[Teacher],
        classes: &[Class],
        grid: &SlotGrid,
    ) -> ScheduleResult<Self> {
        let mut teacher_hours: Tally<usize> = teachers.iter().map(|t| (t.name.clone(), 0)).collect();
        let mut class_hours: Tally<usize> = classes.iter().map(|c| (c.name.clone(), 0)).collect();

        let mut total_hours = 0.0;
        for a in assignments {
            bump(&mut teacher_hours, &a.teacher, "teacher")?;
            bump(&mut class_hours, &a.class, "class")?;
            let slot = grid.slots().get(a.slot).ok_or_else(|| {
                ScheduleError::Generation(format!("assignment refers to missing slot {}", a.slot))
            })?;
            total_hours += slot.duration();
        }

        let summary = Summary {
            day_span: day_span_label(grid.start_hour(), grid.end_hour()),
            total_slots: grid.len(),
            slots_per_day: grid.slots_per_day(),
            teachers: teachers.iter().map(|t| t.name.clone()).collect(),
            classes: classes.iter().map(|c| c.name.clone()).collect(),
            total_sessions: assignments.len(),
            total_hours,
        };

        Ok(Self {
            summary,
            teacher_hours,
            class_hours,
        })
    }

    /// Each teacher's sessions as a percentage of an even split of all sessions.
    ///
    /// The even share is `total_sessions / teachers` rounded down; when it is
    /// zero every teacher reports 0.
    pub fn teacher_load(&self) -> Tally<f64> {
        let teachers = self.teacher_hours.len();
        let even_share = if teachers == 0 {
            0
        } else {
            self.summary.total_sessions / teachers
        };
        self.teacher_hours
            .iter()
            .map(|(name, sessions)| {
                let load = if even_share > 0 {
                    sessions as f64 / even_share as f64 * 100.0
                } else {
                    0.0
                };
                (name.to_string(), load)
            })
            .collect()
    }
}

fn bump(tally: &mut Tally<usize>, name: &str, kind: &str) -> ScheduleResult<()> {
    match tally.get_mut(name) {
        Some(count) => {
            *count += 1;
            Ok(())
        }
        None => Err(ScheduleError::Generation(format!(
            "assignment refers to unknown {kind} {name}"
        ))),
    }
}

pub fn day_span_label(start_hour: f64, end_hour: f64) -> String {
    format!(
        "{}-{} ({:.1}h/day)",
        format_hour(start_hour),
        format_hour(end_hour),
        end_hour - start_hour
    )
}
