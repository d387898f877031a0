//! Per-thread rounding contexts.
//!
//! A [`RoundingContext`] owns every stream one thread draws from: one
//! scalar stream and a lane-group of [`MAX_LANES`] vector streams.
//!
//! # Stream Layout
//!
//! ```text
//!   seed ──SplitMix64──> state
//!     │
//!     ├─ long_jump × t ──> thread t base ─────────> scalar stream
//!     │                       ├─ jump × 1 ────────> lane 0
//!     │                       ├─ jump × 2 ────────> lane 1
//!     │                       └─ jump × 16 ───────> lane 15
//!     └─ long_jump × (t+1) ─> thread t+1 base ...
//! ```
//!
//! Jumps are far shorter than long jumps, so every stream of every thread
//! is disjoint from every other.
//!
//! Width-1 draws come from the scalar stream; wider draws take one value
//! from each of the first `N` lanes.

use crate::stream::{StreamGenerator, UniformFloat};
use crate::xoshiro::Xoshiro256PlusPlus;
use std::array;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Widest lane-group a context can serve.
pub const MAX_LANES: usize = 16;

/// Thread-owned random streams.
#[derive(Clone, Debug)]
pub struct RoundingContext<G: StreamGenerator = Xoshiro256PlusPlus> {
    seed: u64,
    stream_index: u64,
    scalar: G,
    lanes: [G; MAX_LANES],
    draws: u64,
}

impl<G: StreamGenerator> RoundingContext<G> {
    /// Streams for `stream_index` under `seed`.
    #[must_use]
    pub fn new(seed: u64, stream_index: u64) -> Self {
        let base = G::for_stream(seed, stream_index);
        let lanes = array::from_fn(|lane| {
            let mut stream = base.clone();
            for _ in 0..=lane {
                stream.jump();
            }
            stream
        });
        Self {
            seed,
            stream_index,
            scalar: base,
            lanes,
            draws: 0,
        }
    }

    /// A context for the calling thread.
    ///
    /// Takes the next process-wide stream index. The seed is the configured
    /// override, or clock entropy mixed with the index.
    #[must_use]
    pub fn for_current_thread() -> Self {
        let stream_index = NEXT_STREAM_INDEX.fetch_add(1, Ordering::Relaxed);
        let config = prism_config::global_config();
        let seed = config.seed.unwrap_or_else(|| entropy_seed(stream_index));
        debug!(
            generator = G::NAME,
            seed,
            stream_index,
            fixed_seed = config.seed.is_some(),
            "created rounding context"
        );
        Self::new(seed, stream_index)
    }

    /// Restart every stream from `seed`, keeping the stream index.
    pub fn reseed(&mut self, seed: u64) {
        debug!(seed, stream_index = self.stream_index, "reseeding rounding context");
        *self = Self::new(seed, self.stream_index);
    }

    /// The seed the streams were derived from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// This context's sub-stream index.
    #[must_use]
    pub const fn stream_index(&self) -> u64 {
        self.stream_index
    }

    /// Number of draw calls served so far (one per lane-group draw).
    #[must_use]
    pub const fn draw_count(&self) -> u64 {
        self.draws
    }

    /// The scalar stream.
    pub fn scalar_stream(&mut self) -> &mut G {
        &mut self.scalar
    }

    /// Vector lane `lane`'s stream.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= MAX_LANES`.
    pub fn lane_stream(&mut self, lane: usize) -> &mut G {
        &mut self.lanes[lane]
    }

    /// One uniform draw per lane.
    #[inline]
    pub fn uniform_lanes<F: UniformFloat, const N: usize>(&mut self) -> [F; N] {
        const { assert!(N >= 1 && N <= MAX_LANES, "unsupported lane count") };
        self.draws += 1;
        if N == 1 {
            return [self.scalar.uniform(); N];
        }
        array::from_fn(|lane| self.lanes[lane].uniform())
    }

    /// 64 random bits per lane.
    #[inline]
    pub fn raw_lanes<const N: usize>(&mut self) -> [u64; N] {
        const { assert!(N >= 1 && N <= MAX_LANES, "unsupported lane count") };
        self.draws += 1;
        if N == 1 {
            return [self.scalar.next_raw(); N];
        }
        array::from_fn(|lane| self.lanes[lane].next_raw())
    }
}

fn entropy_seed(stream_index: u64) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    nanos ^ stream_index.wrapping_mul(crate::SplitMix64::GAMMA)
}

// ---------------------------------------------------------------------------
// Thread slot
// ---------------------------------------------------------------------------

static NEXT_STREAM_INDEX: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static THREAD_CONTEXT: RefCell<Option<RoundingContext>> = const { RefCell::new(None) };
}

/// Run `f` with the calling thread's context, creating it on first use.
///
/// # Panics
///
/// Panics if called re-entrantly from inside `f`.
pub fn with_thread_context<R>(f: impl FnOnce(&mut RoundingContext) -> R) -> R {
    THREAD_CONTEXT.with(|slot| {
        let mut slot = slot.borrow_mut();
        f(slot.get_or_insert_with(RoundingContext::for_current_thread))
    })
}

/// Replace the calling thread's context, returning the previous one.
pub fn install_thread_context(context: RoundingContext) -> Option<RoundingContext> {
    THREAD_CONTEXT.with(|slot| slot.borrow_mut().replace(context))
}

/// Remove the calling thread's context; the next use creates a fresh one.
pub fn take_thread_context() -> Option<RoundingContext> {
    THREAD_CONTEXT.with(|slot| slot.borrow_mut().take())
}

/// Reseed the calling thread's context.
pub fn reseed_thread_context(seed: u64) {
    with_thread_context(|context| context.reseed(seed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Xoroshiro128PlusPlus;

    #[test]
    fn test_same_seed_and_index_replays() {
        let mut a = RoundingContext::<Xoshiro256PlusPlus>::new(42, 3);
        let mut b = RoundingContext::<Xoshiro256PlusPlus>::new(42, 3);
        for _ in 0..10 {
            assert_eq!(a.raw_lanes::<8>(), b.raw_lanes::<8>());
            assert_eq!(a.uniform_lanes::<f64, 1>(), b.uniform_lanes::<f64, 1>());
        }
    }

    #[test]
    fn test_indices_give_different_streams() {
        let mut a = RoundingContext::<Xoshiro256PlusPlus>::new(42, 0);
        let mut b = RoundingContext::<Xoshiro256PlusPlus>::new(42, 1);
        assert_ne!(a.raw_lanes::<4>(), b.raw_lanes::<4>());
        assert_ne!(a.raw_lanes::<1>(), b.raw_lanes::<1>());
    }

    #[test]
    fn test_lane_layout() {
        let mut context = RoundingContext::<Xoshiro256PlusPlus>::new(7, 1);
        let mut base = Xoshiro256PlusPlus::for_stream(7, 1);
        assert_eq!(context.scalar_stream().clone(), base);

        base.jump();
        assert_eq!(context.lane_stream(0).clone(), base);
        base.jump();
        assert_eq!(context.lane_stream(1).clone(), base);
    }

    #[test]
    fn test_width_one_uses_scalar_stream() {
        let mut context = RoundingContext::<Xoshiro256PlusPlus>::new(9, 0);
        let mut scalar = context.scalar_stream().clone();
        let mut lane0 = context.lane_stream(0).clone();

        let [x] = context.raw_lanes::<1>();
        assert_eq!(x, scalar.next_raw());

        let lanes = context.raw_lanes::<2>();
        assert_eq!(lanes[0], lane0.next_raw());
    }

    #[test]
    fn test_draw_count() {
        let mut context = RoundingContext::<Xoroshiro128PlusPlus>::new(1, 0);
        assert_eq!(context.draw_count(), 0);
        let _ = context.uniform_lanes::<f32, 16>();
        let _ = context.raw_lanes::<1>();
        assert_eq!(context.draw_count(), 2);
    }

    #[test]
    fn test_reseed_keeps_index() {
        let mut context = RoundingContext::<Xoshiro256PlusPlus>::new(1, 5);
        let _ = context.raw_lanes::<4>();
        context.reseed(2);
        assert_eq!(context.seed(), 2);
        assert_eq!(context.stream_index(), 5);
        assert_eq!(context.draw_count(), 0);

        let mut fresh = RoundingContext::<Xoshiro256PlusPlus>::new(2, 5);
        assert_eq!(context.raw_lanes::<4>(), fresh.raw_lanes::<4>());
    }

    #[test]
    fn test_thread_slot_install_and_take() {
        let previous = install_thread_context(RoundingContext::new(1234, 77));
        let (seed, index) = with_thread_context(|c| (c.seed(), c.stream_index()));
        assert_eq!((seed, index), (1234, 77));

        reseed_thread_context(99);
        assert_eq!(with_thread_context(|c| c.seed()), 99);

        let taken = take_thread_context();
        assert_eq!(taken.map(|c| c.stream_index()), Some(77));
        if let Some(previous) = previous {
            install_thread_context(previous);
        }
    }

    #[test]
    fn test_threads_get_distinct_indices() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| with_thread_context(|c| c.stream_index())))
            .collect();
        let mut indices: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 4);
    }
}
