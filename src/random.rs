//! Seeded random source threaded through every randomized operation.
//!
//! Only [`RandomSource::int`] and [`RandomSource::float`] have to be implemented.
//! Everything else is built on them, so two sources that agree on those two
//! draw sequences agree on every derived draw as well.

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform integer in `min..=max`.
    fn int(&mut self, min: i64, max: i64) -> i64;

    /// Uniform float in `min..max`.
    fn float(&mut self, min: f64, max: f64) -> f64;

    /// `true` with probability `p`.
    fn bool(&mut self, p: f64) -> bool {
        if p >= 1.0 {
            return true;
        }
        if p <= 0.0 {
            return false;
        }
        self.float(0.0, 1.0) < p
    }

    fn index(&mut self, len: usize) -> usize {
        self.int(0, len as i64 - 1) as usize
    }

    fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    /// Pick an item with probability proportional to its weight.
    /// Non-positive weights are never picked.
    fn weighted_choice<'a, T>(&mut self, items: &'a [(T, f64)]) -> Option<&'a T> {
        let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }
        let mut point = self.float(0.0, total);
        for (item, weight) in items.iter().filter(|(_, w)| *w > 0.0) {
            if point < *weight {
                return Some(item);
            }
            point -= weight;
        }
        // float rounding can leave a sliver past the last bucket
        items.iter().rev().find(|(_, w)| *w > 0.0).map(|(item, _)| item)
    }

    /// Fisher-Yates, back to front.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.int(0, i as i64) as usize;
            items.swap(i, j);
        }
    }

    /// `k` distinct items in random order. Returns everything, shuffled, if `k >= items.len()`.
    fn subset<T: Clone>(&mut self, items: &[T], k: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        self.shuffle(&mut pool);
        pool.truncate(k);
        pool
    }
}

/// [`RandomSource`] backed by a seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn float(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }
}
