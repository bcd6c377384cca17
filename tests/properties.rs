//! Property tests over generated grids and catalogs.

use proptest::prelude::*;
use std::collections::HashSet;

use timetable_planner::config::WEEK;
use timetable_planner::{Catalog, Class, Room, Scheduler, SlotGrid, Teacher};

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    (
        1usize..5,
        prop::collection::vec((1u32..60, 0u32..6), 1..7),
        prop::collection::vec(1u32..60, 1..5),
    )
        .prop_map(|(teachers, classes, rooms)| {
            let teachers = (0..teachers)
                .map(|i| Teacher::new(format!("T{i}"), vec![]))
                .collect();
            let classes = classes
                .into_iter()
                .enumerate()
                .map(|(i, (headcount, sessions))| Class::new(format!("C{i}"), headcount, sessions))
                .collect();
            let rooms = rooms
                .into_iter()
                .enumerate()
                .map(|(i, capacity)| Room::new(format!("R{i}"), capacity))
                .collect();
            Catalog::new(teachers, classes, rooms).unwrap()
        })
}

fn grid_strategy() -> impl Strategy<Value = SlotGrid> {
    (0u32..20, 1u32..8, 1usize..=7, prop::sample::select(vec![0.5, 1.0, 1.5]))
        .prop_map(|(start, span, days, duration)| {
            let start = f64::from(start);
            let end = (start + f64::from(span)).min(24.0);
            SlotGrid::build(start, end, &WEEK[..days], duration).unwrap()
        })
}

proptest! {
    #[test]
    fn slot_count_and_bounds(start in 0u32..23, span in 1u32..10, days in 1usize..=7, minutes in prop::sample::select(vec![6u32, 12, 18, 30, 45, 60, 120])) {
        let start_f = f64::from(start);
        let end_f = (start_f + f64::from(span)).min(24.0);
        let duration = f64::from(minutes) / 60.0;
        let grid = SlotGrid::build(start_f, end_f, &WEEK[..days], duration).unwrap();

        let span_minutes = (end_f - start_f) as u32 * 60;
        let per_day = span_minutes.div_ceil(minutes) as usize;
        prop_assert_eq!(grid.len(), days * per_day);
        for slot in grid.slots() {
            prop_assert!(slot.start_hour >= start_f);
            prop_assert!(slot.end_hour <= end_f);
            // no float slivers: every slot lasts at least a minute
            prop_assert!(slot.duration() * 60.0 > 1.0 - 1e-6);
        }
        prop_assert_eq!(grid.slots().last().map(|s| s.end_hour), Some(end_f));
    }

    #[test]
    fn no_double_booking(catalog in catalog_strategy(), grid in grid_strategy()) {
        let outcome = Scheduler::new(&catalog).unwrap().run(&grid);

        let mut teachers = HashSet::new();
        let mut classes = HashSet::new();
        let mut rooms = HashSet::new();
        for a in &outcome.assignments {
            prop_assert!(teachers.insert((a.slot, a.teacher.clone())));
            prop_assert!(classes.insert((a.slot, a.class.clone())));
            prop_assert!(rooms.insert((a.slot, a.room.clone())));
        }
    }

    #[test]
    fn undersized_rooms_only_as_fallback(catalog in catalog_strategy(), grid in grid_strategy()) {
        let outcome = Scheduler::new(&catalog).unwrap().run(&grid);
        let flagged: HashSet<usize> = outcome
            .diagnostics
            .fallback_placements
            .iter()
            .map(|p| p.assignment)
            .collect();

        for (i, a) in outcome.assignments.iter().enumerate() {
            let fits = catalog.room(&a.room).unwrap().can_host(catalog.class(&a.class).unwrap());
            prop_assert_eq!(fits, !flagged.contains(&i));
        }
    }

    #[test]
    fn deterministic_and_conserving(catalog in catalog_strategy(), grid in grid_strategy()) {
        let first = Scheduler::new(&catalog).unwrap().run(&grid);
        let second = Scheduler::new(&catalog).unwrap().run(&grid);
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(
            first.assignments.len() + first.diagnostics.unscheduled_total,
            catalog.total_demand()
        );
        let missing: usize = first.diagnostics.unscheduled.iter().map(|s| s.missing).sum();
        prop_assert_eq!(missing, first.diagnostics.unscheduled_total);
    }
}
