//! xoshiro256++, the engine's default generator.

use crate::stream::{impl_rand_core, jump_state, seed_state, StreamGenerator};

/// xoshiro256++: 256 bits of state, period `2^256 - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xoshiro256PlusPlus {
    s: [u64; 4],
}

impl Xoshiro256PlusPlus {
    /// Jump polynomial, `2^128` steps.
    pub const JUMP: [u64; 4] = [
        0x180e_c6d3_3cfd_0aba,
        0xd5a6_1266_f0c9_392c,
        0xa958_2618_e03f_c9aa,
        0x39ab_dc45_29b1_661c,
    ];

    /// Long-jump polynomial, `2^192` steps.
    pub const LONG_JUMP: [u64; 4] = [
        0x76e1_5d3e_fefd_cbbf,
        0xc500_4e44_1c52_2fb3,
        0x7771_0069_854e_e241,
        0x3910_9bb0_2acb_e635,
    ];

    /// Build from raw state words.
    ///
    /// The all-zero state is a fixed point; callers must not pass it.
    #[must_use]
    pub const fn from_state(s: [u64; 4]) -> Self {
        Self { s }
    }

    /// The raw state words.
    #[must_use]
    pub const fn state(&self) -> [u64; 4] {
        self.s
    }

    #[inline(always)]
    fn step(s: &mut [u64; 4]) {
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
    }

    pub(crate) fn advance_by_polynomial(&mut self, polynomial: &[u64]) {
        jump_state(&mut self.s, polynomial, Self::step);
    }
}

impl StreamGenerator for Xoshiro256PlusPlus {
    const NAME: &'static str = "xoshiro256++";
    const JUMP_LOG2: u32 = 128;
    const LONG_JUMP_LOG2: u32 = 192;

    fn from_seed_u64(seed: u64) -> Self {
        Self::from_state(seed_state(seed))
    }

    #[inline(always)]
    fn next_raw(&mut self) -> u64 {
        let result = self.s[0]
            .wrapping_add(self.s[3])
            .rotate_left(23)
            .wrapping_add(self.s[0]);
        Self::step(&mut self.s);
        result
    }

    fn jump(&mut self) {
        self.advance_by_polynomial(&Self::JUMP);
    }

    fn long_jump(&mut self) {
        self.advance_by_polynomial(&Self::LONG_JUMP);
    }
}

impl_rand_core!(Xoshiro256PlusPlus, 32, 4);
