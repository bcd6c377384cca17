//! Sources of made-up class sizes and room capacities.
//!
//! When a request only gives resource counts, headcounts and capacities have
//! to come from somewhere. The allocator never sees this: it only reads the
//! finished [`Catalog`](crate::data::Catalog). Tests substitute
//! [`FixedFixtures`] to stay deterministic.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{DEFAULT_HEADCOUNT, DEFAULT_ROOM_CAPACITY};
use crate::error::{ScheduleError, ScheduleResult};

pub trait FixtureSource {
    /// Headcount for the class at `index` (0-based).
    fn headcount(&mut self, index: usize) -> u32;

    /// Capacity for the room at `index` (0-based).
    fn capacity(&mut self, index: usize) -> u32;
}

/// Uniform draws from inclusive ranges.
///
/// Seeded runs are reproducible; unseeded runs draw from OS entropy.
#[derive(Debug, Clone)]
pub struct RandomFixtures {
    rng: SmallRng,
    headcount_range: (u32, u32),
    capacity_range: (u32, u32),
}

impl RandomFixtures {
    pub fn new(
        seed: Option<u64>,
        headcount_range: (u32, u32),
        capacity_range: (u32, u32),
    ) -> ScheduleResult<Self> {
        check_range("headcount", headcount_range)?;
        check_range("capacity", capacity_range)?;
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Self {
            rng,
            headcount_range,
            capacity_range,
        })
    }
}

impl FixtureSource for RandomFixtures {
    fn headcount(&mut self, _index: usize) -> u32 {
        let (lo, hi) = self.headcount_range;
        self.rng.gen_range(lo..=hi)
    }

    fn capacity(&mut self, _index: usize) -> u32 {
        let (lo, hi) = self.capacity_range;
        self.rng.gen_range(lo..=hi)
    }
}

/// The same headcount and capacity every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFixtures {
    pub headcount: u32,
    pub capacity: u32,
}

impl Default for FixedFixtures {
    fn default() -> Self {
        Self {
            headcount: DEFAULT_HEADCOUNT,
            capacity: DEFAULT_ROOM_CAPACITY,
        }
    }
}

impl FixtureSource for FixedFixtures {
    fn headcount(&mut self, _index: usize) -> u32 {
        self.headcount
    }

    fn capacity(&mut self, _index: usize) -> u32 {
        self.capacity
    }
}

fn check_range(kind: &str, (lo, hi): (u32, u32)) -> ScheduleResult<()> {
    if lo == 0 || lo > hi {
        return Err(ScheduleError::InvalidCatalog(format!(
            "{kind} range must satisfy 0 < min <= max, got [{lo}, {hi}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_draws_are_reproducible() {
        let mut a = RandomFixtures::new(Some(7), (20, 35), (20, 40)).unwrap();
        let mut b = RandomFixtures::new(Some(7), (20, 35), (20, 40)).unwrap();
        let xs: Vec<u32> = (0..16).map(|i| a.headcount(i)).collect();
        let ys: Vec<u32> = (0..16).map(|i| b.headcount(i)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn draws_stay_in_range() {
        let mut fixtures = RandomFixtures::new(Some(42), (20, 35), (10, 12)).unwrap();
        for i in 0..200 {
            assert!((20..=35).contains(&fixtures.headcount(i)));
            assert!((10..=12).contains(&fixtures.capacity(i)));
        }
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut fixtures = RandomFixtures::new(None, (30, 30), (5, 5)).unwrap();
        assert_eq!(fixtures.headcount(0), 30);
        assert_eq!(fixtures.capacity(0), 5);
    }

    #[test]
    fn rejects_bad_ranges() {
        assert!(RandomFixtures::new(None, (0, 10), (20, 40)).is_err());
        assert!(RandomFixtures::new(None, (20, 35), (40, 20)).is_err());
    }

    #[test]
    fn fixed_defaults() {
        let mut fixed = FixedFixtures::default();
        assert_eq!(fixed.headcount(3), DEFAULT_HEADCOUNT);
        assert_eq!(fixed.capacity(3), DEFAULT_ROOM_CAPACITY);
    }
}
