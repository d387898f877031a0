//! SplitMix64 seed expansion.

/// SplitMix64, used only to expand one 64-bit seed into generator state.
///
/// Consecutive outputs come from distinct counter values passed through a
/// bijective mixer, so at most one word of any expanded state can be zero.
#[derive(Clone, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Golden-ratio increment.
    pub const GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

    /// Start from `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next mixed word.
    #[inline]
    pub fn next_raw(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Fill `N` state words.
    #[must_use]
    pub fn expand<const N: usize>(seed: u64) -> [u64; N] {
        let mut mixer = Self::new(seed);
        std::array::from_fn(|_| mixer.next_raw())
    }
}
