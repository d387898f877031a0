//! Sources of random draws for the kernels.

use crate::Element;
use prism_core::Lanes;
use prism_rng::{RoundingContext, StreamGenerator};
use std::array;

/// Supplies one random draw per lane.
///
/// Every kernel call that rounds takes exactly one `uniform` (stochastic
/// rounding) or one `random_bits` (up-down rounding) from its source.
pub trait DrawSource {
    /// One uniform value in `[0, 1)` per lane.
    fn uniform<T: Element, const N: usize>(&mut self) -> Lanes<T, N>;

    /// 64 random bits per lane.
    fn random_bits<const N: usize>(&mut self) -> Lanes<u64, N>;
}

impl<G: StreamGenerator> DrawSource for RoundingContext<G> {
    #[inline(always)]
    fn uniform<T: Element, const N: usize>(&mut self) -> Lanes<T, N> {
        Lanes::from_array(self.uniform_lanes::<T, N>())
    }

    #[inline(always)]
    fn random_bits<const N: usize>(&mut self) -> Lanes<u64, N> {
        Lanes::from_array(self.raw_lanes::<N>())
    }
}

/// Replays a fixed cycle of raw 64-bit words.
///
/// Lane `i` of a draw takes the `i`-th next word, so a width-`N` draw
/// consumes exactly what `N` consecutive width-1 draws would.
#[derive(Clone, Debug)]
pub struct ReplayDraws {
    words: Vec<u64>,
    next: usize,
    draws: u64,
}

impl ReplayDraws {
    /// Cycle through `words`. An empty list replays zeros.
    #[must_use]
    pub fn new(words: impl Into<Vec<u64>>) -> Self {
        let mut words = words.into();
        if words.is_empty() {
            words.push(0);
        }
        Self {
            words,
            next: 0,
            draws: 0,
        }
    }

    /// Always draw `word`.
    #[must_use]
    pub fn constant(word: u64) -> Self {
        Self::new(vec![word])
    }

    /// Cycle through words that map back to the given fractions.
    ///
    /// Fractions that are multiples of `2^-24` replay exactly for both
    /// kinds; other values are truncated to each kind's draw precision.
    #[must_use]
    pub fn from_fractions(fractions: &[f64]) -> Self {
        Self::new(fractions.iter().map(|&z| word_for(z)).collect::<Vec<_>>())
    }

    /// Number of draw calls served.
    #[must_use]
    pub const fn draw_count(&self) -> u64 {
        self.draws
    }

    fn next_word(&mut self) -> u64 {
        let word = self.words[self.next];
        self.next = (self.next + 1) % self.words.len();
        word
    }
}

/// The raw word whose uniform mapping is `z`, for `z` in `[0, 1)`.
#[must_use]
pub fn word_for(z: f64) -> u64 {
    (z.clamp(0.0, 1.0) * 18_446_744_073_709_551_616.0) as u64
}

impl DrawSource for ReplayDraws {
    fn uniform<T: Element, const N: usize>(&mut self) -> Lanes<T, N> {
        self.draws += 1;
        Lanes::from_array(array::from_fn(|_| T::from_draw(self.next_word())))
    }

    fn random_bits<const N: usize>(&mut self) -> Lanes<u64, N> {
        self.draws += 1;
        Lanes::from_array(array::from_fn(|_| self.next_word()))
    }
}
