//! Injectable randomness for draws, events, and random gains.
//!
//! Game logic never touches a concrete RNG; it asks a [`RandomSource`] for
//! uniform indices, unit rolls, and shuffle orders. Production play uses
//! [`CountingRng`] streams derived from one user seed, tests substitute
//! [`ScriptedRandom`] or any seeded `RngCore`.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;
use std::collections::VecDeque;
use std::fmt;

use crate::constants::{STREAM_DRAW, STREAM_EVENT, STREAM_GAIN};

/// Source of uniform randomness consumed by the draw and delta logic.
pub trait RandomSource: fmt::Debug {
    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Uniform roll in `[0, 1)`.
    fn roll_unit(&mut self) -> f64;

    /// Uniformly shuffled permutation of `0..len`.
    fn shuffled_indices(&mut self, len: usize) -> Vec<usize>;

    /// Number of draws taken from the underlying generator, when tracked.
    fn draws(&self) -> u64 {
        0
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    #[must_use]
    pub fn from_seed_u64(seed: u64) -> Self {
        Self::wrap(SmallRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Wrap an arbitrary generator, e.g. `rand::rngs::mock::StepRng` in tests.
    #[must_use]
    pub const fn wrap(rng: R) -> Self {
        Self { rng, draws: 0 }
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

impl<R: RngCore + fmt::Debug> RandomSource for CountingRng<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.gen_range(0..len)
    }

    fn roll_unit(&mut self) -> f64 {
        self.r#gen::<f64>()
    }

    fn shuffled_indices(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(self);
        order
    }

    fn draws(&self) -> u64 {
        self.draws
    }
}

/// Deterministic source replaying queued answers.
///
/// Once a queue runs dry it falls back to index 0, a roll of `0.999` (never
/// hits a chance gain), and the identity order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    indices: VecDeque<usize>,
    rolls: VecDeque<f64>,
    orders: VecDeque<Vec<usize>>,
    draws: u64,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    #[must_use]
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: Vec<usize>) -> Self {
        self.orders.push_back(order);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.draws = self.draws.saturating_add(1);
        if len == 0 {
            return 0;
        }
        self.indices.pop_front().unwrap_or(0) % len
    }

    fn roll_unit(&mut self) -> f64 {
        self.draws = self.draws.saturating_add(1);
        self.rolls.pop_front().unwrap_or(0.999)
    }

    fn shuffled_indices(&mut self, len: usize) -> Vec<usize> {
        self.draws = self.draws.saturating_add(1);
        match self.orders.pop_front() {
            Some(order) if is_permutation(&order, len) => order,
            _ => (0..len).collect(),
        }
    }

    fn draws(&self) -> u64 {
        self.draws
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    order.iter().all(|&idx| match seen.get_mut(idx) {
        Some(slot) if !*slot => {
            *slot = true;
            true
        }
        _ => false,
    })
}

/// Bundle of RNG streams segregated by game domain.
#[derive(Debug)]
pub struct RngBundle {
    draw: Box<dyn RandomSource>,
    event: Box<dyn RandomSource>,
    gain: Box<dyn RandomSource>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            draw: Box::new(CountingRng::from_seed_u64(derive_stream_seed(
                seed,
                STREAM_DRAW,
            ))),
            event: Box::new(CountingRng::from_seed_u64(derive_stream_seed(
                seed,
                STREAM_EVENT,
            ))),
            gain: Box::new(CountingRng::from_seed_u64(derive_stream_seed(
                seed,
                STREAM_GAIN,
            ))),
        }
    }

    /// Construct the bundle from caller-supplied sources.
    #[must_use]
    pub fn from_sources(
        draw: Box<dyn RandomSource>,
        event: Box<dyn RandomSource>,
        gain: Box<dyn RandomSource>,
    ) -> Self {
        Self { draw, event, gain }
    }

    /// Card pool shuffles.
    pub fn draw(&mut self) -> &mut dyn RandomSource {
        self.draw.as_mut()
    }

    /// Daily event selection.
    pub fn event(&mut self) -> &mut dyn RandomSource {
        self.event.as_mut()
    }

    /// Rolls for chance-based gains.
    pub fn gain(&mut self) -> &mut dyn RandomSource {
        self.gain.as_mut()
    }

    /// Total draws across all streams.
    #[must_use]
    pub fn total_draws(&self) -> u64 {
        self.draw
            .draws()
            .saturating_add(self.event.draws())
            .saturating_add(self.gain.draws())
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    for (dst, src) in seed_bytes.iter_mut().zip(digest.iter()) {
        *dst = *src;
    }
    u64::from_le_bytes(seed_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn bundle_uses_domain_hmac() {
        let seed = 0xFEED_CAFE_u64;
        let mut bundle = RngBundle::from_user_seed(seed);
        let mut expected = CountingRng::from_seed_u64(derive_stream_seed(seed, STREAM_DRAW));
        assert_eq!(bundle.draw().pick_index(1_000), expected.pick_index(1_000));
        assert_eq!(bundle.total_draws(), 1);
        assert_ne!(
            derive_stream_seed(seed, STREAM_DRAW),
            derive_stream_seed(seed, STREAM_EVENT),
            "domain tags must derive distinct seeds"
        );
    }

    #[test]
    fn same_seed_replays_same_orders() {
        let mut a = RngBundle::from_user_seed(42);
        let mut b = RngBundle::from_user_seed(42);
        assert_eq!(a.draw().shuffled_indices(6), b.draw().shuffled_indices(6));
        assert_eq!(a.event().pick_index(5), b.event().pick_index(5));
    }

    #[test]
    fn counting_rng_shuffle_is_a_permutation() {
        let mut rng = CountingRng::from_seed_u64(7);
        let mut order = rng.shuffled_indices(10);
        assert!(rng.draws() > 0);
        order.sort_unstable();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn wrapped_step_rng_is_deterministic() {
        let mut rng = CountingRng::wrap(StepRng::new(0, 0));
        assert_eq!(rng.pick_index(5), 0);
        assert!(rng.roll_unit() < f64::EPSILON);
        assert_eq!(rng.pick_index(0), 0);
    }

    #[test]
    fn scripted_source_replays_and_falls_back() {
        let mut source = ScriptedRandom::new()
            .with_indices([4, 7])
            .with_rolls([0.05])
            .with_order(vec![2, 0, 1])
            .with_order(vec![0, 0, 1]);
        assert_eq!(source.pick_index(5), 4);
        assert_eq!(source.pick_index(5), 2);
        assert_eq!(source.pick_index(5), 0);
        assert!((source.roll_unit() - 0.05).abs() < f64::EPSILON);
        assert!(source.roll_unit() > 0.99);
        assert_eq!(source.shuffled_indices(3), vec![2, 0, 1]);
        assert_eq!(source.shuffled_indices(3), vec![0, 1, 2], "invalid order ignored");
        assert_eq!(source.draws(), 7);
    }
}
