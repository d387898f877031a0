//! Rounded arithmetic kernels for PRISM.
//!
//! Each kernel takes its operands as [`Lanes<T, N>`](prism_core::Lanes)
//! and a [`DrawSource`], and is written once for every lane type and
//! width. The dispatch layer decides which width and target each call
//! runs at; nothing in this crate knows about ISAs.
//!
//! # Overview
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`sr`] | stochastic rounding: `add`, `sub`, `mul`, `div`, `sqrt`, `fma` |
//! | [`ud`] | up-down rounding of the same six operations |
//! | [`ops`] | [`Kernel`] identities for the dispatch layer |
//! | [`draw`] | [`DrawSource`] and the replayable [`ReplayDraws`] |
//!
//! # Draw Discipline
//!
//! A kernel call draws at most once per lane. When no lane holds eligible
//! operands it returns the hardware result without drawing at all, so
//! NaN-heavy inputs do not advance the streams.
//!
//! # Example
//!
//! ```
//! use prism_core::Lanes;
//! use prism_kernels::{sr, ReplayDraws};
//!
//! let mut draws = ReplayDraws::from_fractions(&[0.5]);
//! let sum = sr::add(Lanes::<f64, 2>::splat(1.0), Lanes::splat(2.0), &mut draws);
//! assert_eq!(sum.to_array(), [3.0, 3.0]);
//! ```

#![warn(missing_docs)]

pub mod draw;
pub mod ops;
pub mod sr;
pub mod ud;

pub use draw::{word_for, DrawSource, ReplayDraws};
pub use ops::{Kernel, Mode, Op};

use prism_core::FloatFormat;
use prism_rng::UniformFloat;

/// A lane type the kernels accept: a supported float format that random
/// draws can be mapped onto.
pub trait Element: FloatFormat + UniformFloat {}

impl<T: FloatFormat + UniformFloat> Element for T {}
