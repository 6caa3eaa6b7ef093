//! RNG oracle for reproducible combat rolls.
//!
//! Every random decision in a battle (accuracy rolls, retreat rolls, enemy
//! skill choice, NPC target choice, level-up growth, skill draws) goes through
//! an [`RngOracle`] handed to the controller. Actors never own a generator, so
//! they stay plain data.
//!
//! # Determinism
//!
//! Given the same seed, [`PcgRng`] produces the same sequence. Tests that
//! need a specific branch use [`ScriptedRng`] to queue exact values.

use std::collections::VecDeque;

use crate::config::Chance;

/// Source of random numbers for combat.
pub trait RngOracle {
    /// Generate the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform index in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u32() as usize) % bound
    }

    /// Generate a random value in range `[min, max]` inclusive.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = (max - min) as u64 + 1;
        min + (self.next_u32() as u64 % span) as u32
    }

    /// Returns true with the given probability.
    fn chance(&mut self, chance: Chance) -> bool {
        if chance.denominator == 0 {
            return false;
        }
        self.below(chance.denominator as usize) < chance.numerator as usize
    }
}

impl<R: RngOracle + ?Sized> RngOracle for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// Picks one element uniformly at random.
pub fn pick<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: RngOracle + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    items.get(rng.below(items.len()))
}

/// Draws `count` distinct indices from `0..len` (partial Fisher-Yates).
///
/// When `count >= len` every index is returned, in shuffled order.
pub fn sample_indices<R>(rng: &mut R, len: usize, count: usize) -> Vec<usize>
where
    R: RngOracle + ?Sized,
{
    let mut indices: Vec<usize> = (0..len).collect();
    let take = count.min(len);
    for i in 0..take {
        let j = i + rng.below(len - i);
        indices.swap(i, j);
    }
    indices.truncate(take);
    indices
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a seed.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self {
            state: seed.wrapping_add(Self::INCREMENT),
        };
        rng.state = Self::pcg_step(rng.state);
        rng
    }

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

/// Replays queued values, then falls back to a seeded [`PcgRng`].
///
/// Useful for forcing a branch: `0` always hits, always wins a retreat roll
/// and always picks the first candidate, while `u32::MAX` always misses.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    queued: VecDeque<u32>,
    fallback: PcgRng,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queued: values.into_iter().collect(),
            fallback: PcgRng::seeded(0),
        }
    }

    /// Appends more values to the queue.
    pub fn push(&mut self, value: u32) {
        self.queued.push_back(value);
    }

    /// Number of queued values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.queued.len()
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.queued
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_u32())
    }
}
