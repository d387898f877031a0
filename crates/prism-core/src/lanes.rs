//! Width-generic lane vectors.
//!
//! [`Lanes<T, N>`] is the "vector of N lanes of kind T" every kernel is
//! written against. Scalars are `Lanes<T, 1>`; SIMD shapes are the same type
//! with a wider `N`, so the rounding algorithms exist exactly once.
//!
//! All operations are lane-wise and branch-free. Conditionals are
//! expressed as a [`Mask`] followed by [`Mask::select`], which the
//! optimiser lowers to blend instructions on targets that have them.
//!
//! # Example
//!
//! ```
//! use prism_core::lanes::Lanes;
//!
//! let a = Lanes::from_array([1.0f32, -2.0, 3.0, -4.0]);
//! let b = Lanes::splat(1.0f32);
//! let negative = a.lt(Lanes::splat(0.0));
//! let c = negative.select(b, a + b);
//! assert_eq!(c.to_array(), [2.0, 1.0, 4.0, 1.0]);
//! ```

use crate::format::{self, FloatFormat};
use std::array;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

// ============================================================
// Lanes<T, N>
// ============================================================

/// N lanes of `T`.
#[derive(Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Lanes<T, const N: usize> {
    lanes: [T; N],
}

impl<T: Copy, const N: usize> Lanes<T, N> {
    /// Number of lanes.
    pub const LANES: usize = N;

    /// Wrap an array.
    #[inline(always)]
    #[must_use]
    pub const fn from_array(lanes: [T; N]) -> Self {
        Self { lanes }
    }

    /// Broadcast one value to every lane.
    #[inline(always)]
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self { lanes: [value; N] }
    }

    /// Load the first `N` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than `N`.
    #[inline(always)]
    #[must_use]
    pub fn load(slice: &[T]) -> Self {
        Self {
            lanes: array::from_fn(|i| slice[i]),
        }
    }

    /// Store into the first `N` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than `N`.
    #[inline(always)]
    pub fn store(self, slice: &mut [T]) {
        slice[..N].copy_from_slice(&self.lanes);
    }

    /// Read one lane.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= N`.
    #[inline(always)]
    #[must_use]
    pub fn get(self, lane: usize) -> T {
        self.lanes[lane]
    }

    /// The lanes as an array.
    #[inline(always)]
    #[must_use]
    pub const fn to_array(self) -> [T; N] {
        self.lanes
    }

    /// Borrow the lanes.
    #[inline(always)]
    #[must_use]
    pub const fn as_slice(&self) -> &[T] {
        &self.lanes
    }

    /// Mutably borrow the lanes.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.lanes
    }

    /// Apply `f` to every lane.
    #[inline(always)]
    #[must_use]
    pub fn map<U: Copy>(self, mut f: impl FnMut(T) -> U) -> Lanes<U, N> {
        Lanes {
            lanes: array::from_fn(|i| f(self.lanes[i])),
        }
    }

    /// Combine two vectors lane by lane.
    #[inline(always)]
    #[must_use]
    pub fn zip_map<U: Copy, R: Copy>(
        self,
        other: Lanes<U, N>,
        mut f: impl FnMut(T, U) -> R,
    ) -> Lanes<R, N> {
        Lanes {
            lanes: array::from_fn(|i| f(self.lanes[i], other.lanes[i])),
        }
    }

    /// Build a mask from a lane predicate.
    #[inline(always)]
    #[must_use]
    pub fn test(self, mut pred: impl FnMut(T) -> bool) -> Mask<N> {
        Mask(array::from_fn(|i| pred(self.lanes[i])))
    }

    /// Build a mask from a predicate over two vectors.
    #[inline(always)]
    #[must_use]
    pub fn test_with(self, other: Self, mut pred: impl FnMut(T, T) -> bool) -> Mask<N> {
        Mask(array::from_fn(|i| pred(self.lanes[i], other.lanes[i])))
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Lanes<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.lanes.iter()).finish()
    }
}

impl<T: Copy + Default, const N: usize> Default for Lanes<T, N> {
    fn default() -> Self {
        Self::splat(T::default())
    }
}

impl<T: Copy, const N: usize> From<[T; N]> for Lanes<T, N> {
    fn from(lanes: [T; N]) -> Self {
        Self::from_array(lanes)
    }
}

// ------------------------------------------------------------
// Floating-point lanes
// ------------------------------------------------------------

impl<T: FloatFormat, const N: usize> Lanes<T, N> {
    /// Lane-wise `|x|`.
    #[inline(always)]
    #[must_use]
    pub fn abs(self) -> Self {
        self.map(T::abs)
    }

    /// Lane-wise square root.
    #[inline(always)]
    #[must_use]
    pub fn sqrt(self) -> Self {
        self.map(T::sqrt)
    }

    /// Lane-wise `self * a + b`, rounded once.
    #[inline(always)]
    #[must_use]
    pub fn mul_add(self, a: Self, b: Self) -> Self {
        Self {
            lanes: array::from_fn(|i| self.lanes[i].mul_add(a.lanes[i], b.lanes[i])),
        }
    }

    /// Lane-wise `self < other`.
    #[inline(always)]
    #[must_use]
    pub fn lt(self, other: Self) -> Mask<N> {
        self.test_with(other, |a, b| a < b)
    }

    /// Lane-wise `self >= other`.
    #[inline(always)]
    #[must_use]
    pub fn ge(self, other: Self) -> Mask<N> {
        self.test_with(other, |a, b| a >= b)
    }

    /// Lane-wise `self == other` (IEEE equality).
    #[inline(always)]
    #[must_use]
    pub fn eq_lanes(self, other: Self) -> Mask<N> {
        self.test_with(other, |a, b| a == b)
    }

    /// Lanes holding a finite non-zero value.
    #[inline(always)]
    #[must_use]
    pub fn is_number(self) -> Mask<N> {
        self.test(format::is_number)
    }

    /// Lanes holding neither Inf nor NaN.
    #[inline(always)]
    #[must_use]
    pub fn is_finite(self) -> Mask<N> {
        self.test(format::is_finite)
    }

    /// Lane-wise unbiased exponent (see [`format::exponent`]).
    #[inline(always)]
    #[must_use]
    pub fn exponent(self) -> Lanes<i32, N> {
        self.map(format::exponent)
    }

    /// Lane-wise `2^n` (see [`format::pow2`]).
    #[inline(always)]
    #[must_use]
    pub fn pow2(n: Lanes<i32, N>) -> Self {
        n.map(format::pow2)
    }

    /// Lane-wise encodings, zero-extended.
    #[inline(always)]
    #[must_use]
    pub fn to_raw(self) -> Lanes<u64, N> {
        self.map(T::to_raw)
    }

    /// Rebuild lanes from their encodings.
    #[inline(always)]
    #[must_use]
    pub fn from_raw(raw: Lanes<u64, N>) -> Self {
        raw.map(T::from_raw)
    }

    /// Bitwise lane equality, distinguishing `-0.0` and NaN payloads.
    #[must_use]
    pub fn bits_eq(self, other: Self) -> bool {
        self.to_raw() == other.to_raw()
    }
}

macro_rules! impl_lane_binop {
    ($($trait:ident :: $method:ident),*) => {
        $(
            impl<T: FloatFormat, const N: usize> $trait for Lanes<T, N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    Self {
                        lanes: array::from_fn(|i| self.lanes[i].$method(rhs.lanes[i])),
                    }
                }
            }
        )*
    };
}

impl_lane_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl<T: FloatFormat, const N: usize> Neg for Lanes<T, N> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self.map(|x| -x)
    }
}

// ============================================================
// Mask<N>
// ============================================================

/// One boolean per lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mask<const N: usize>([bool; N]);

impl<const N: usize> Mask<N> {
    /// Every lane set to `value`.
    #[inline(always)]
    #[must_use]
    pub const fn splat(value: bool) -> Self {
        Self([value; N])
    }

    /// Wrap an array of lane flags.
    #[inline(always)]
    #[must_use]
    pub const fn from_array(flags: [bool; N]) -> Self {
        Self(flags)
    }

    /// The lane flags.
    #[inline(always)]
    #[must_use]
    pub const fn to_array(self) -> [bool; N] {
        self.0
    }

    /// True if any lane is set.
    #[inline(always)]
    #[must_use]
    pub fn any(self) -> bool {
        self.0.iter().any(|&b| b)
    }

    /// True if every lane is set.
    #[inline(always)]
    #[must_use]
    pub fn all(self) -> bool {
        self.0.iter().all(|&b| b)
    }

    /// True if no lane is set.
    #[inline(always)]
    #[must_use]
    pub fn none(self) -> bool {
        !self.any()
    }

    /// Number of set lanes.
    #[must_use]
    pub fn count(self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// Per lane, `if_true` where set, `if_false` elsewhere.
    #[inline(always)]
    #[must_use]
    pub fn select<T: Copy>(self, if_true: Lanes<T, N>, if_false: Lanes<T, N>) -> Lanes<T, N> {
        Lanes {
            lanes: array::from_fn(|i| {
                if self.0[i] {
                    if_true.lanes[i]
                } else {
                    if_false.lanes[i]
                }
            }),
        }
    }
}

macro_rules! impl_mask_op {
    ($($trait:ident :: $method:ident => $op:tt),*) => {
        $(
            impl<const N: usize> $trait for Mask<N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    Self(array::from_fn(|i| self.0[i] $op rhs.0[i]))
                }
            }
        )*
    };
}

impl_mask_op!(BitAnd::bitand => &, BitOr::bitor => |, BitXor::bitxor => ^);

impl<const N: usize> Not for Mask<N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(self.0.map(|b| !b))
    }
}
