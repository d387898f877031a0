//! Random streams for the PRISM rounding engine.
//!
//! Every rounded operation consumes exactly one draw per lane from a
//! stream owned by the calling thread. This crate provides the generators
//! and the thread-scoped [`RoundingContext`] that owns them.
//!
//! - **Generators**: [`Xoshiro256PlusPlus`] (default) and
//!   [`Xoroshiro128PlusPlus`], both seeded through [`SplitMix64`] and both
//!   jumpable, behind the [`StreamGenerator`] trait. They also implement
//!   `rand_core::RngCore` and `SeedableRng`.
//! - **Contexts**: [`RoundingContext`] derives disjoint scalar and
//!   per-lane streams from a `(seed, stream_index)` pair. Each thread
//!   lazily gets its own through [`with_thread_context`]; tests install a
//!   deterministic one with [`install_thread_context`].
//!
//! # Example
//!
//! ```
//! use prism_rng::{RoundingContext, Xoshiro256PlusPlus};
//!
//! let mut context = RoundingContext::<Xoshiro256PlusPlus>::new(42, 0);
//! let z: [f64; 4] = context.uniform_lanes();
//! assert!(z.iter().all(|&x| (0.0..1.0).contains(&x)));
//! ```

#![warn(missing_docs)]

mod context;
mod splitmix;
mod stream;
mod xoroshiro;
mod xoshiro;

pub use context::{
    install_thread_context, reseed_thread_context, take_thread_context, with_thread_context,
    RoundingContext, MAX_LANES,
};
pub use splitmix::SplitMix64;
pub use stream::{StreamGenerator, UniformFloat};
pub use xoroshiro::Xoroshiro128PlusPlus;
pub use xoshiro::Xoshiro256PlusPlus;
