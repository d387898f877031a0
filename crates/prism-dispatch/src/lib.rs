//! Width and ISA dispatch for PRISM rounded arithmetic.
//!
//! This crate turns the width-generic kernels of `prism-kernels` into
//! concrete entry points and decides which instruction set they run on.
//!
//! # Overview
//!
//! ```text
//!   sr::scalar::addf32 ──────────────────────────┐
//!   sr::vector::addf32x4_static ── Binding ──────┤
//!   sr::vector::addf32x4_dynamic ─┐              ├──> kernel<T, N>
//!   sr::array::addf32 ────────────┴─ Dispatcher ─┘    (per-ISA copy)
//! ```
//!
//! - [`Isa`] and [`CpuFeatures`]: the CPU is probed once and the widest
//!   supported target selected, optionally capped by `PRISM_ISA`.
//! - [`Dispatcher`]: a handle on one supported target that runs a
//!   [`Kernel`](prism_kernels::Kernel) over vectors or slices.
//! - [`sr`] and [`ud`]: the generated entry points, for both float kinds
//!   and widths 1, 2, 4, 8 and 16.
//!
//! Every target computes bit-identical results; the choice only affects
//! speed.

#![warn(missing_docs)]

#[macro_use]
mod catalog;
mod dispatcher;
mod entry;
mod error;
mod isa;
mod runner;

pub use dispatcher::{Binding, Dispatcher};
pub use entry::{sr, ud};
pub use error::{DispatchError, DispatchResult};
pub use isa::{current_isa, CpuFeatures, Isa, LaneShape};
