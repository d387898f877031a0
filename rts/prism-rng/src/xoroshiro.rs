//! xoroshiro128++, a smaller member of the family.
//!
//! Half the state of [`Xoshiro256PlusPlus`](crate::Xoshiro256PlusPlus) and
//! a correspondingly shorter jump ladder (`2^64` / `2^96`). Suitable when
//! only a handful of threads need disjoint streams.

use crate::stream::{impl_rand_core, jump_state, seed_state, StreamGenerator};

/// xoroshiro128++: 128 bits of state, period `2^128 - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xoroshiro128PlusPlus {
    s: [u64; 2],
}

impl Xoroshiro128PlusPlus {
    /// Jump polynomial, `2^64` steps.
    pub const JUMP: [u64; 2] = [0x2bd7_a6a6_e99c_2ddc, 0x0992_ccaf_6a6f_ca05];

    /// Long-jump polynomial, `2^96` steps.
    pub const LONG_JUMP: [u64; 2] = [0x360f_d5f2_cf8d_5d99, 0x9c6e_6877_736c_46e3];

    /// Build from raw state words. Must not be all zero.
    #[must_use]
    pub const fn from_state(s: [u64; 2]) -> Self {
        Self { s }
    }

    /// The raw state words.
    #[must_use]
    pub const fn state(&self) -> [u64; 2] {
        self.s
    }

    #[inline(always)]
    fn step(s: &mut [u64; 2]) {
        let s0 = s[0];
        let s1 = s[1] ^ s0;
        s[0] = s0.rotate_left(49) ^ s1 ^ (s1 << 21);
        s[1] = s1.rotate_left(28);
    }
}

impl StreamGenerator for Xoroshiro128PlusPlus {
    const NAME: &'static str = "xoroshiro128++";
    const JUMP_LOG2: u32 = 64;
    const LONG_JUMP_LOG2: u32 = 96;

    fn from_seed_u64(seed: u64) -> Self {
        Self::from_state(seed_state(seed))
    }

    #[inline(always)]
    fn next_raw(&mut self) -> u64 {
        let result = self.s[0]
            .wrapping_add(self.s[1])
            .rotate_left(17)
            .wrapping_add(self.s[0]);
        Self::step(&mut self.s);
        result
    }

    fn jump(&mut self) {
        jump_state(&mut self.s, &Self::JUMP, Self::step);
    }

    fn long_jump(&mut self) {
        jump_state(&mut self.s, &Self::LONG_JUMP, Self::step);
    }
}

impl_rand_core!(Xoroshiro128PlusPlus, 16, 2);
