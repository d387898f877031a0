//! The generator abstraction shared by every stream.

use crate::splitmix::SplitMix64;

/// Floating-point kinds a raw 64-bit draw can be mapped onto.
pub trait UniformFloat: Copy {
    /// Number of high draw bits used.
    const DRAW_BITS: u32;

    /// Map the top [`DRAW_BITS`](Self::DRAW_BITS) of `draw` into `[0, 1)`.
    fn from_draw(draw: u64) -> Self;
}

impl UniformFloat for f64 {
    const DRAW_BITS: u32 = 53;

    #[inline(always)]
    fn from_draw(draw: u64) -> Self {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (draw >> 11) as f64 * SCALE
    }
}

impl UniformFloat for f32 {
    const DRAW_BITS: u32 = 24;

    #[inline(always)]
    fn from_draw(draw: u64) -> Self {
        const SCALE: f32 = 1.0 / (1u32 << 24) as f32;
        (draw >> 40) as f32 * SCALE
    }
}

/// A jumpable pseudo-random generator producing 64 bits per draw.
///
/// `jump` and `long_jump` advance the state by fixed powers of two, so
/// repeatedly applying them carves the period into non-overlapping
/// sub-streams.
pub trait StreamGenerator: Clone + std::fmt::Debug + Send + 'static {
    /// Generator name, for diagnostics.
    const NAME: &'static str;

    /// log2 of the `jump` distance.
    const JUMP_LOG2: u32;

    /// log2 of the `long_jump` distance.
    const LONG_JUMP_LOG2: u32;

    /// Seed the state from one word via SplitMix64.
    fn from_seed_u64(seed: u64) -> Self;

    /// Next 64 random bits.
    fn next_raw(&mut self) -> u64;

    /// Advance by `2^JUMP_LOG2` draws.
    fn jump(&mut self);

    /// Advance by `2^LONG_JUMP_LOG2` draws.
    fn long_jump(&mut self);

    /// Next uniform value in `[0, 1)`.
    #[inline(always)]
    fn uniform<F: UniformFloat>(&mut self) -> F {
        F::from_draw(self.next_raw())
    }

    /// The sub-stream `index` of `seed`: seeded, then long-jumped `index`
    /// times.
    #[must_use]
    fn for_stream(seed: u64, index: u64) -> Self {
        let mut generator = Self::from_seed_u64(seed);
        for _ in 0..index {
            generator.long_jump();
        }
        generator
    }
}

/// Jump a linear generator by multiplying its state with a precomputed
/// characteristic polynomial.
///
/// `state` must be the generator's whole state and `step` its transition
/// function. Setting the single bit `k` of `polynomial` advances the state
/// by exactly `k` steps.
#[inline]
pub(crate) fn jump_state<const W: usize>(
    state: &mut [u64; W],
    polynomial: &[u64],
    mut step: impl FnMut(&mut [u64; W]),
) {
    let mut acc = [0u64; W];
    for &word in polynomial {
        for bit in 0..64 {
            if word & (1u64 << bit) != 0 {
                for (a, s) in acc.iter_mut().zip(state.iter()) {
                    *a ^= *s;
                }
            }
            step(state);
        }
    }
    *state = acc;
}

/// Expand `seed` into a `W`-word state.
pub(crate) fn seed_state<const W: usize>(seed: u64) -> [u64; W] {
    SplitMix64::expand(seed)
}

/// Read a little-endian byte seed into state words, rejecting all-zero.
pub(crate) fn state_from_bytes<const W: usize>(bytes: &[u8]) -> Option<[u64; W]> {
    let mut state = [0u64; W];
    for (word, chunk) in state.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *word = u64::from_le_bytes(buf);
    }
    state.iter().any(|&w| w != 0).then_some(state)
}

/// Implement the `rand_core` traits for a [`StreamGenerator`].
macro_rules! impl_rand_core {
    ($generator:ty, $seed_bytes:literal, $words:literal) => {
        impl rand_core::RngCore for $generator {
            #[inline]
            fn next_u32(&mut self) -> u32 {
                ($crate::stream::StreamGenerator::next_raw(self) >> 32) as u32
            }

            #[inline]
            fn next_u64(&mut self) -> u64 {
                $crate::stream::StreamGenerator::next_raw(self)
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                rand_core::impls::fill_bytes_via_next(self, dest);
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
                rand_core::RngCore::fill_bytes(self, dest);
                Ok(())
            }
        }

        impl rand_core::SeedableRng for $generator {
            type Seed = [u8; $seed_bytes];

            fn from_seed(seed: Self::Seed) -> Self {
                match $crate::stream::state_from_bytes::<$words>(&seed) {
                    Some(state) => Self::from_state(state),
                    None => <Self as $crate::stream::StreamGenerator>::from_seed_u64(0),
                }
            }

            fn seed_from_u64(seed: u64) -> Self {
                <Self as $crate::stream::StreamGenerator>::from_seed_u64(seed)
            }
        }
    };
}

pub(crate) use impl_rand_core;
