//! Kernel identities.
//!
//! Every `(mode, op)` pair is a zero-sized type implementing [`Kernel`],
//! so the dispatch layer can monomorphise one loop per kernel, lane type
//! and width without function pointers.

use crate::draw::DrawSource;
use crate::Element;
use prism_core::Lanes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounding mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Stochastic rounding.
    Sr,
    /// Up-down rounding.
    Ud,
}

impl Mode {
    /// Both modes.
    pub const ALL: [Mode; 2] = [Mode::Sr, Mode::Ud];

    /// Lowercase name used in entry-point paths.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Sr => "sr",
            Mode::Ud => "ud",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arithmetic operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `sqrt(a)`
    Sqrt,
    /// `a * b + c`
    Fma,
}

impl Op {
    /// Every operation.
    pub const ALL: [Op; 6] = [Op::Add, Op::Sub, Op::Mul, Op::Div, Op::Sqrt, Op::Fma];

    /// Lowercase name used in entry-point paths.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::Sqrt => "sqrt",
            Op::Fma => "fma",
        }
    }

    /// Number of operands.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Op::Sqrt => 1,
            Op::Add | Op::Sub | Op::Mul | Op::Div => 2,
            Op::Fma => 3,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rounded operation, generic over lane type and width.
pub trait Kernel: Copy + Default + Send + Sync + 'static {
    /// Rounding mode.
    const MODE: Mode;
    /// Operation.
    const OP: Op;

    /// Apply to the first [`Op::arity`] operands; the rest are ignored.
    fn apply<T: Element, const N: usize, D: DrawSource>(
        args: [Lanes<T, N>; 3],
        draws: &mut D,
    ) -> Lanes<T, N>;
}

macro_rules! kernels {
    ($mode:ident, $Mode:ident) => {
        kernels!(@one $mode, $Mode, Add, add, |[a, b, _]| (a, b));
        kernels!(@one $mode, $Mode, Sub, sub, |[a, b, _]| (a, b));
        kernels!(@one $mode, $Mode, Mul, mul, |[a, b, _]| (a, b));
        kernels!(@one $mode, $Mode, Div, div, |[a, b, _]| (a, b));
        kernels!(@one $mode, $Mode, Sqrt, sqrt, |[a, _, _]| (a));
        kernels!(@one $mode, $Mode, Fma, fma, |[a, b, c]| (a, b, c));
    };
    (@one $mode:ident, $Mode:ident, $Op:ident, $fn:ident, |[$x:tt, $y:tt, $z:tt]| ($($arg:ident),+)) => {
        #[doc = concat!("`", stringify!($mode), "::", stringify!($fn), "`")]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $Op;

        impl Kernel for $Op {
            const MODE: Mode = Mode::$Mode;
            const OP: Op = Op::$Op;

            #[inline(always)]
            fn apply<T: Element, const N: usize, D: DrawSource>(
                [$x, $y, $z]: [Lanes<T, N>; 3],
                draws: &mut D,
            ) -> Lanes<T, N> {
                crate::$mode::$fn($($arg,)+ draws)
            }
        }
    };
}

/// Stochastic-rounding kernels.
pub mod sr {
    use super::{DrawSource, Element, Kernel, Lanes, Mode, Op};

    kernels!(sr, Sr);
}

/// Up-down rounding kernels.
pub mod ud {
    use super::{DrawSource, Element, Kernel, Lanes, Mode, Op};

    kernels!(ud, Ud);
}
