use crate::data::{Assignment, Catalog, Class, SlotIndex};
use crate::error::{ScheduleError, ScheduleResult};
use crate::slots::SlotGrid;
use itertools::Itertools;
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;

/// Greedy first-fit allocator.
///
/// One forward pass over the slot grid, no backtracking. For every slot the
/// pending demand queue is walked in order; each unit takes the first free
/// teacher and the first free room that seats the class (or, failing that,
/// the first free room at all). Units that cannot be placed are carried to
/// the next slot. Demand still pending when the slots run out is reported as
/// a shortfall in [`Diagnostics`].
#[derive(Debug, Clone)]
pub struct Scheduler<'a> {
    catalog: &'a Catalog,
    slot_limit: Option<usize>,
}

/// Result of one scheduling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    pub assignments: Vec<Assignment>,
    pub diagnostics: Diagnostics,
}

/// Demand left over for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub class: String,
    pub missing: usize,
}

/// A session placed in a room that is too small for the class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackPlacement {
    /// Index into the assignment list.
    pub assignment: usize,
    pub class: String,
    pub room: String,
    pub headcount: u32,
    pub capacity: u32,
}

/// What the pass could not do cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub unscheduled_total: usize,
    pub unscheduled: Vec<Shortfall>,
    pub fallback_placements: Vec<FallbackPlacement>,
    /// Classes no room in the catalog can seat.
    pub oversized_classes: Vec<String>,
}

impl Diagnostics {
    pub fn has_shortfall(&self) -> bool {
        self.unscheduled_total > 0
    }
}

// per-slot occupancy, dropped at the end of every slot
struct Occupancy {
    teachers: Vec<bool>,
    classes: Vec<bool>,
    rooms: Vec<bool>,
}

impl Occupancy {
    fn new(catalog: &Catalog) -> Self {
        Self {
            teachers: vec![false; catalog.teachers().len()],
            classes: vec![false; catalog.classes().len()],
            rooms: vec![false; catalog.rooms().len()],
        }
    }
}

struct RoomChoice {
    index: usize,
    fallback: bool,
}

impl<'a> Scheduler<'a> {
    /// Fails when the catalog lacks teachers, classes or rooms.
    pub fn new(catalog: &'a Catalog) -> ScheduleResult<Self> {
        if catalog.teachers().is_empty() || catalog.classes().is_empty() || catalog.rooms().is_empty() {
            return Err(ScheduleError::InsufficientResources {
                teachers: catalog.teachers().len(),
                classes: catalog.classes().len(),
                rooms: catalog.rooms().len(),
            });
        }
        Ok(Self {
            catalog,
            slot_limit: None,
        })
    }

    /// Preview mode: only the first `limit` slots of the grid are used.
    pub fn with_slot_limit(mut self, limit: usize) -> Self {
        self.slot_limit = Some(limit);
        self
    }

    /// Runs the allocator over `grid`.
    pub fn run(&self, grid: &SlotGrid) -> ScheduleOutcome {
        let start_time = Instant::now();
        let usable = self.slot_limit.map_or(grid.len(), |limit| limit.min(grid.len()));
        info!(
            "Scheduling {} demand units from {} classes over {} slots with {} teachers and {} rooms...",
            self.catalog.total_demand(),
            self.catalog.classes().len(),
            usable,
            self.catalog.teachers().len(),
            self.catalog.rooms().len()
        );

        let mut assignments = Vec::new();
        let mut fallback_placements = Vec::new();
        let mut pending = self.demand_queue();

        for slot_index in 0..usable {
            if pending.is_empty() {
                break;
            }
            pending = self.schedule_slot(grid, slot_index, pending, &mut assignments, &mut fallback_placements);
        }

        let diagnostics = self.diagnose(&pending, fallback_placements);
        info!(
            "Placed {} sessions in {:.2?} ({} units unscheduled)",
            assignments.len(),
            start_time.elapsed(),
            diagnostics.unscheduled_total
        );

        ScheduleOutcome {
            assignments,
            diagnostics,
        }
    }

    // one entry per required weekly session, in class order
    fn demand_queue(&self) -> Vec<usize> {
        self.catalog
            .classes()
            .iter()
            .enumerate()
            .flat_map(|(i, class)| std::iter::repeat(i).take(class.weekly_sessions as usize))
            .collect()
    }

    /// Places what it can in one slot; returns the units carried over.
    fn schedule_slot(
        &self,
        grid: &SlotGrid,
        slot_index: SlotIndex,
        pending: Vec<usize>,
        assignments: &mut Vec<Assignment>,
        fallback_placements: &mut Vec<FallbackPlacement>,
    ) -> Vec<usize> {
        let slot = &grid.slots()[slot_index];
        let mut occupancy = Occupancy::new(self.catalog);
        let mut carried = Vec::with_capacity(pending.len());

        for class_index in pending {
            // one session per class per slot
            if occupancy.classes[class_index] {
                carried.push(class_index);
                continue;
            }

            let class = &self.catalog.classes()[class_index];
            let teacher = self.find_available_teacher(&occupancy);
            let room = self.find_room(class, &occupancy);

            let (Some(teacher_index), Some(room)) = (teacher, room) else {
                carried.push(class_index);
                continue;
            };

            let teacher = &self.catalog.teachers()[teacher_index];
            let chosen_room = &self.catalog.rooms()[room.index];
            if room.fallback {
                warn!(
                    "{} {}: {} (capacity {}) is too small for {} ({} students), no larger room free",
                    slot.day, slot.label, chosen_room.name, chosen_room.capacity, class.name, class.headcount
                );
                fallback_placements.push(FallbackPlacement {
                    assignment: assignments.len(),
                    class: class.name.clone(),
                    room: chosen_room.name.clone(),
                    headcount: class.headcount,
                    capacity: chosen_room.capacity,
                });
            }
            trace!(
                "{} {}: {} teaches {} in {}",
                slot.day, slot.label, teacher.name, class.name, chosen_room.name
            );
            assignments.push(Assignment {
                slot: slot_index,
                day: slot.day,
                time: slot.label.clone(),
                teacher: teacher.name.clone(),
                class: class.name.clone(),
                room: chosen_room.name.clone(),
            });

            occupancy.teachers[teacher_index] = true;
            occupancy.classes[class_index] = true;
            occupancy.rooms[room.index] = true;
        }

        debug!(
            "Slot {} ({} {}) done, {} units still pending",
            slot_index,
            slot.day,
            slot.label,
            carried.len()
        );
        carried
    }

    // teachers are interchangeable: first free one in catalog order
    fn find_available_teacher(&self, occupancy: &Occupancy) -> Option<usize> {
        occupancy.teachers.iter().position(|busy| !busy)
    }

    // first free room that seats the class, otherwise the first free room at all
    fn find_room(&self, class: &Class, occupancy: &Occupancy) -> Option<RoomChoice> {
        let rooms = self.catalog.rooms();
        let free = |i: &usize| !occupancy.rooms[*i];

        if let Some(index) = (0..rooms.len()).filter(free).find(|&i| rooms[i].can_host(class)) {
            return Some(RoomChoice { index, fallback: false });
        }
        (0..rooms.len())
            .find(free)
            .map(|index| RoomChoice { index, fallback: true })
    }

    fn diagnose(&self, pending: &[usize], fallback_placements: Vec<FallbackPlacement>) -> Diagnostics {
        let counts = pending.iter().counts();
        let unscheduled: Vec<Shortfall> = self
            .catalog
            .classes()
            .iter()
            .enumerate()
            .filter_map(|(i, class)| {
                counts.get(&i).map(|&missing| Shortfall {
                    class: class.name.clone(),
                    missing,
                })
            })
            .collect();

        for shortfall in &unscheduled {
            warn!(
                "Shortfall: {} session(s) of {} could not be scheduled",
                shortfall.missing, shortfall.class
            );
        }

        let oversized_classes: Vec<String> = self
            .catalog
            .oversized_classes()
            .into_iter()
            .map(|c| c.name.clone())
            .collect();
        for name in &oversized_classes {
            warn!("No room in the catalog can seat class {}", name);
        }

        Diagnostics {
            unscheduled_total: pending.len(),
            unscheduled,
            fallback_placements,
            oversized_classes,
        }
    }
}

/// Checks that no slot holds the same teacher, class or room twice.
pub fn check_exclusivity(assignments: &[Assignment]) -> Result<(), String> {
    let mut teachers = HashSet::new();
    let mut classes = HashSet::new();
    let mut rooms = HashSet::new();

    for a in assignments {
        if !teachers.insert((a.slot, a.teacher.as_str())) {
            return Err(format!("teacher {} booked twice at {} {}", a.teacher, a.day, a.time));
        }
        if !classes.insert((a.slot, a.class.as_str())) {
            return Err(format!("class {} booked twice at {} {}", a.class, a.day, a.time));
        }
        if !rooms.insert((a.slot, a.room.as_str())) {
            return Err(format!("room {} booked twice at {} {}", a.room, a.day, a.time));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Class, Room, Teacher, Weekday};

    fn catalog(teachers: usize, classes: Vec<Class>, rooms: Vec<Room>) -> Catalog {
        let teachers = (1..=teachers)
            .map(|i| Teacher::new(format!("T{i}"), vec![]))
            .collect();
        Catalog::new(teachers, classes, rooms).unwrap()
    }

    fn monday(start: f64, end: f64) -> SlotGrid {
        SlotGrid::build(start, end, &[Weekday::Monday], 1.0).unwrap()
    }

    #[test]
    fn rejects_empty_resources() {
        let empty_rooms = catalog(1, vec![Class::new("A", 10, 1)], vec![]);
        assert!(matches!(
            Scheduler::new(&empty_rooms),
            Err(ScheduleError::InsufficientResources { rooms: 0, .. })
        ));

        let no_teachers = catalog(0, vec![Class::new("A", 10, 1)], vec![Room::new("R", 10)]);
        assert!(Scheduler::new(&no_teachers).is_err());

        let no_classes = catalog(1, vec![], vec![Room::new("R", 10)]);
        assert!(Scheduler::new(&no_classes).is_err());
    }

    #[test]
    fn classes_compete_for_single_teacher_and_room() {
        let cat = catalog(
            1,
            vec![Class::new("A", 25, 1), Class::new("B", 30, 1)],
            vec![Room::new("R1", 30)],
        );
        let outcome = Scheduler::new(&cat).unwrap().run(&monday(8.0, 10.0));

        let placed: Vec<(&str, &str)> = outcome
            .assignments
            .iter()
            .map(|a| (a.class.as_str(), a.time.as_str()))
            .collect();
        assert_eq!(placed, vec![("A", "08:00-09:00"), ("B", "09:00-10:00")]);
        assert!(!outcome.diagnostics.has_shortfall());
        assert!(outcome.diagnostics.fallback_placements.is_empty());
    }

    #[test]
    fn shortfall_is_reported_when_slots_run_out() {
        let cat = catalog(
            1,
            vec![Class::new("A", 10, 1), Class::new("B", 10, 1)],
            vec![Room::new("R1", 30)],
        );
        let outcome = Scheduler::new(&cat).unwrap().run(&monday(8.0, 9.0));

        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].class, "A");
        assert_eq!(outcome.diagnostics.unscheduled_total, 1);
        assert_eq!(
            outcome.diagnostics.unscheduled,
            vec![Shortfall {
                class: "B".into(),
                missing: 1
            }]
        );
    }

    #[test]
    fn falls_back_to_undersized_room() {
        let cat = catalog(1, vec![Class::new("Big", 40, 1)], vec![Room::new("R1", 30)]);
        let outcome = Scheduler::new(&cat).unwrap().run(&monday(8.0, 9.0));

        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].room, "R1");
        assert_eq!(
            outcome.diagnostics.fallback_placements,
            vec![FallbackPlacement {
                assignment: 0,
                class: "Big".into(),
                room: "R1".into(),
                headcount: 40,
                capacity: 30,
            }]
        );
        assert_eq!(outcome.diagnostics.oversized_classes, vec!["Big".to_string()]);
    }

    #[test]
    fn prefers_a_room_that_fits() {
        let cat = catalog(
            2,
            vec![Class::new("Big", 40, 1), Class::new("Small", 10, 1)],
            vec![Room::new("Tiny", 15), Room::new("Hall", 50)],
        );
        let outcome = Scheduler::new(&cat).unwrap().run(&monday(8.0, 9.0));

        let rooms: Vec<(&str, &str)> = outcome
            .assignments
            .iter()
            .map(|a| (a.class.as_str(), a.room.as_str()))
            .collect();
        assert_eq!(rooms, vec![("Big", "Hall"), ("Small", "Tiny")]);
        assert!(outcome.diagnostics.fallback_placements.is_empty());
    }

    #[test]
    fn fallback_only_when_fitting_rooms_are_taken() {
        let cat = catalog(
            2,
            vec![Class::new("A", 40, 1), Class::new("B", 40, 1)],
            vec![Room::new("Small", 20), Room::new("Hall", 50)],
        );
        let outcome = Scheduler::new(&cat).unwrap().run(&monday(8.0, 9.0));

        assert_eq!(outcome.assignments[0].room, "Hall");
        assert_eq!(outcome.assignments[1].room, "Small");
        assert_eq!(outcome.diagnostics.fallback_placements.len(), 1);
        assert_eq!(outcome.diagnostics.fallback_placements[0].assignment, 1);
        assert!(outcome.diagnostics.oversized_classes.is_empty());
    }

    #[test]
    fn a_class_is_never_doubled_in_a_slot() {
        let cat = catalog(
            3,
            vec![Class::new("A", 10, 3)],
            vec![Room::new("R1", 30), Room::new("R2", 30)],
        );
        let outcome = Scheduler::new(&cat).unwrap().run(&monday(8.0, 11.0));

        let times: Vec<&str> = outcome.assignments.iter().map(|a| a.time.as_str()).collect();
        assert_eq!(times, vec!["08:00-09:00", "09:00-10:00", "10:00-11:00"]);
        assert!(outcome.assignments.iter().all(|a| a.teacher == "T1" && a.room == "R1"));
    }

    #[test]
    fn teachers_and_rooms_are_taken_first_fit() {
        let cat = catalog(
            2,
            vec![Class::new("A", 10, 1), Class::new("B", 10, 1), Class::new("C", 10, 1)],
            vec![Room::new("R1", 30), Room::new("R2", 30), Room::new("R3", 30)],
        );
        let outcome = Scheduler::new(&cat).unwrap().run(&monday(8.0, 10.0));

        let rows: Vec<(usize, &str, &str, &str)> = outcome
            .assignments
            .iter()
            .map(|a| (a.slot, a.teacher.as_str(), a.class.as_str(), a.room.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![(0, "T1", "A", "R1"), (0, "T2", "B", "R2"), (1, "T1", "C", "R1")]
        );
        check_exclusivity(&outcome.assignments).unwrap();
    }

    #[test]
    fn zero_session_classes_produce_nothing() {
        let cat = catalog(1, vec![Class::new("A", 10, 0)], vec![Room::new("R1", 30)]);
        let outcome = Scheduler::new(&cat).unwrap().run(&monday(8.0, 10.0));
        assert!(outcome.assignments.is_empty());
        assert!(!outcome.diagnostics.has_shortfall());
    }

    #[test]
    fn preview_limits_the_slots_used() {
        let cat = catalog(1, vec![Class::new("A", 10, 4)], vec![Room::new("R1", 30)]);
        let outcome = Scheduler::new(&cat)
            .unwrap()
            .with_slot_limit(2)
            .run(&monday(8.0, 12.0));
        assert_eq!(outcome.assignments.len(), 2);
        assert_eq!(outcome.diagnostics.unscheduled_total, 2);
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let cat = catalog(
            2,
            vec![Class::new("A", 35, 3), Class::new("B", 20, 2)],
            vec![Room::new("R1", 30), Room::new("R2", 40)],
        );
        let grid = SlotGrid::build(8.0, 12.0, &[Weekday::Monday, Weekday::Tuesday], 1.0).unwrap();
        let first = Scheduler::new(&cat).unwrap().run(&grid);
        let second = Scheduler::new(&cat).unwrap().run(&grid);
        assert_eq!(first, second);
    }

    #[test]
    fn exclusivity_check_catches_double_booking() {
        let a = Assignment {
            slot: 0,
            day: Weekday::Monday,
            time: "08:00-09:00".into(),
            teacher: "T1".into(),
            class: "A".into(),
            room: "R1".into(),
        };
        let mut b = a.clone();
        b.class = "B".into();
        b.room = "R2".into();
        let err = check_exclusivity(&[a, b]).unwrap_err();
        assert!(err.contains("teacher T1"));
    }
}
