//! Random source for die rolls and bounded integers.
//!
//! One generator is shared by every session through `SharedRandom`. Draws
//! lock the generator for the duration of a single call, so concurrent
//! sessions interleave draws instead of sharing a sequence position.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tally_value::errors::{empty_random_range, invalid_die_sides, too_many_dice};
use tally_value::EvalError;

pub use crate::shared::SharedRandom;

/// Largest number of dice a single roll may draw.
pub const MAX_DICE_PER_ROLL: i64 = 100_000;

#[derive(Debug)]
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    /// A generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        RandomSource {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// A deterministic generator; the same seed replays the same rolls.
    pub fn seeded(seed: u64) -> Self {
        RandomSource {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Wrap in a shared handle.
    pub fn shared(self) -> SharedRandom {
        SharedRandom::new(self)
    }

    /// One die: uniform in `[1, sides]`.
    pub fn roll_die(&self, sides: i64) -> Result<i64, EvalError> {
        if sides < 1 {
            return Err(invalid_die_sides(sides));
        }
        let value = self.rng.lock().random_range(1..=sides);
        tracing::trace!(sides, value, "die rolled");
        Ok(value)
    }

    /// `number` dice with `sides` sides each. A negative count rolls nothing.
    pub fn roll_dice(&self, number: i64, sides: i64) -> Result<Vec<i64>, EvalError> {
        if sides < 1 {
            return Err(invalid_die_sides(sides));
        }
        if number > MAX_DICE_PER_ROLL {
            return Err(too_many_dice(number, MAX_DICE_PER_ROLL));
        }
        let count = usize::try_from(number).unwrap_or(0);
        let mut rng = self.rng.lock();
        let values: Vec<i64> = (0..count).map(|_| rng.random_range(1..=sides)).collect();
        tracing::trace!(number, sides, ?values, "dice rolled");
        Ok(values)
    }

    /// Uniform in `[0, less_than)`.
    pub fn random_int(&self, less_than: i64) -> Result<i64, EvalError> {
        self.random_int_between(0, less_than)
    }

    /// `count` values, each uniform in `[0, less_than)`.
    pub fn random_ints(&self, count: usize, less_than: i64) -> Result<Vec<i64>, EvalError> {
        self.random_ints_between(count, 0, less_than)
    }

    /// Uniform in `[min, less_than)`.
    pub fn random_int_between(&self, min: i64, less_than: i64) -> Result<i64, EvalError> {
        if min >= less_than {
            return Err(empty_random_range(min, less_than));
        }
        Ok(self.rng.lock().random_range(min..less_than))
    }

    /// `count` values, each uniform in `[min, less_than)`.
    pub fn random_ints_between(
        &self,
        count: usize,
        min: i64,
        less_than: i64,
    ) -> Result<Vec<i64>, EvalError> {
        if min >= less_than {
            return Err(empty_random_range(min, less_than));
        }
        let mut rng = self.rng.lock();
        Ok((0..count).map(|_| rng.random_range(min..less_than)).collect())
    }

    /// Shuffle `items` in place.
    pub fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut *self.rng.lock());
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_os_rng()
    }
}
