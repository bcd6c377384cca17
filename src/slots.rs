//! Weekly slot grid.
//!
//! A grid is built once per run: for every active day, in weekly order, the
//! span `[start_hour, end_hour)` is cut into windows of `slot_duration`
//! hours. The last window of a day is clipped to `end_hour`.

use log::debug;

use crate::config::{MAX_HOUR, MAX_SLOTS, MIN_HOUR};
use crate::data::{Slot, Weekday};
use crate::error::{ScheduleError, ScheduleResult};

const SLOT_COUNT_SLACK: f64 = 1e-9;

/// Formats a decimal hour as `HH:MM`, truncating fractional minutes.
///
/// `8.5` becomes `08:30`, `17.75` becomes `17:45`.
pub fn format_hour(hour: f64) -> String {
    let whole = hour.trunc();
    let minutes = ((hour - whole) * 60.0).trunc();
    format!("{:02}:{:02}", whole as u32, minutes as u32)
}

/// Checks `MIN_HOUR <= start < end <= MAX_HOUR`.
pub fn validate_range(start: f64, end: f64) -> ScheduleResult<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ScheduleError::invalid_range(start, end, "bounds must be finite numbers"));
    }
    if start < MIN_HOUR || start >= MAX_HOUR || end <= MIN_HOUR || end > MAX_HOUR {
        return Err(ScheduleError::invalid_range(
            start,
            end,
            format!("bounds must satisfy {MIN_HOUR} <= start < end <= {MAX_HOUR}"),
        ));
    }
    if start >= end {
        return Err(ScheduleError::invalid_range(start, end, "start must be before end"));
    }
    Ok(())
}

/// The ordered slots of one week.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotGrid {
    start_hour: f64,
    end_hour: f64,
    slot_duration: f64,
    days: Vec<Weekday>,
    slots: Vec<Slot>,
}

impl SlotGrid {
    /// Builds the grid. `days` may be given in any order and may repeat;
    /// the grid always follows weekly order.
    pub fn build(
        start_hour: f64,
        end_hour: f64,
        days: &[Weekday],
        slot_duration: f64,
    ) -> ScheduleResult<Self> {
        validate_range(start_hour, end_hour)?;
        if !slot_duration.is_finite() || slot_duration <= 0.0 {
            return Err(ScheduleError::invalid_range(
                start_hour,
                end_hour,
                format!("slot duration must be positive, got {slot_duration}"),
            ));
        }

        let mut days = days.to_vec();
        days.sort();
        days.dedup();
        if days.is_empty() {
            return Err(ScheduleError::invalid_range(start_hour, end_hour, "no active days"));
        }

        // slack absorbs spans like 0.9 / 0.3 landing just above or below a whole count
        let per_day = ((end_hour - start_hour) / slot_duration - SLOT_COUNT_SLACK).ceil().max(1.0);
        if per_day * days.len() as f64 > MAX_SLOTS as f64 {
            return Err(ScheduleError::invalid_range(
                start_hour,
                end_hour,
                format!("a slot duration of {slot_duration}h gives more than {MAX_SLOTS} slots"),
            ));
        }
        let per_day = per_day as u32;

        let mut slots = Vec::with_capacity(per_day as usize * days.len());
        for &day in &days {
            for step in 0..per_day {
                let slot_start = start_hour + f64::from(step) * slot_duration;
                let slot_end = if step + 1 == per_day {
                    end_hour
                } else {
                    (slot_start + slot_duration).min(end_hour)
                };
                slots.push(Slot {
                    day,
                    start_hour: slot_start,
                    end_hour: slot_end,
                    label: format!("{}-{}", format_hour(slot_start), format_hour(slot_end)),
                });
            }
        }
        debug!(
            "Built slot grid {}-{} over {} days: {} slots",
            format_hour(start_hour),
            format_hour(end_hour),
            days.len(),
            slots.len()
        );

        Ok(Self {
            start_hour,
            end_hour,
            slot_duration,
            days,
            slots,
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    pub fn start_hour(&self) -> f64 {
        self.start_hour
    }

    pub fn end_hour(&self) -> f64 {
        self.end_hour
    }

    pub fn slot_duration(&self) -> f64 {
        self.slot_duration
    }

    pub fn slots_for_day(&self, day: Weekday) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.iter().filter(move |s| s.day == day)
    }

    /// Every day carries the same number of slots.
    pub fn slots_per_day(&self) -> usize {
        self.days
            .first()
            .map(|&day| self.slots_for_day(day).count())
            .unwrap_or(0)
    }

    /// Time labels of a single day, in order.
    pub fn time_labels(&self) -> Vec<&str> {
        match self.days.first() {
            Some(&day) => self.slots_for_day(day).map(|s| s.label.as_str()).collect(),
            None => Vec::new(),
        }
    }
}
