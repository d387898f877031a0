//! PRISM core arithmetic primitives.
//!
//! Bit-exact building blocks shared by every rounding kernel:
//!
//! - [`format`]: binary32/binary64 layout constants and bit-level helpers
//!   (`exponent`, `pow2`, `is_number`)
//! - [`lanes`]: the width-generic [`Lanes<T, N>`](lanes::Lanes) vector all
//!   algorithms are written against
//! - [`eft`]: error-free transforms (`twosum`, `twoprod`, `twofma`)
//! - [`round`]: the stochastic (`sr_round`) and up-down (`ud_round`)
//!   rounding decisions
//!
//! # Architecture
//!
//! ```text
//!   format ──> lanes ──> eft ──┐
//!                 │            v
//!                 └───────> round
//! ```
//!
//! Nothing here draws random numbers: callers pass the uniform draws or
//! random bits in, which keeps every function pure and makes scalar and
//! vector paths replayable against each other.

#![warn(missing_docs)]

pub mod eft;
pub mod format;
pub mod lanes;
pub mod round;

pub use eft::{twofma, twoprod, twosum, ErrorPair};
pub use format::{FloatFormat, FloatKind, FormatDescriptor};
pub use lanes::{Lanes, Mask};
pub use round::{sr_round, ud_round};
