//! Binary floating-point format descriptors.
//!
//! Every other component of the engine reads its bit-layout constants from
//! a [`FormatDescriptor`], reached through the [`FloatFormat`] trait that is
//! implemented for `f32` (binary32) and `f64` (binary64).
//!
//! # Bit Layout
//!
//! ```text
//!  binary32:  s | eeeeeeee    | mmmmmmmmmmmmmmmmmmmmmmm
//!             1 |     8       |          23
//!
//!  binary64:  s | eeeeeeeeeee | mmmm...mmmm
//!             1 |     11      |     52
//! ```
//!
//! All reinterpretation between a float and its encoding goes through the
//! total `to_bits` / `from_bits` casts, widened to `u64` so the integer
//! algebra below is written once for both kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// The numeric kind of a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatKind {
    /// IEEE754 binary32 (`f32`).
    F32,
    /// IEEE754 binary64 (`f64`).
    F64,
}

impl FloatKind {
    /// The suffix used in entry-point names (`f32` / `f64`).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Storage width in bytes.
    #[must_use]
    pub const fn size_bytes(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// The format descriptor for this kind.
    #[must_use]
    pub const fn format(self) -> FormatDescriptor {
        match self {
            Self::F32 => FormatDescriptor::BINARY32,
            Self::F64 => FormatDescriptor::BINARY64,
        }
    }
}

impl fmt::Display for FloatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Bit-layout constants of one binary interchange format.
///
/// Masks are stored zero-extended to `u64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FormatDescriptor {
    /// Human-readable format name.
    pub name: &'static str,
    /// Total storage width in bits.
    pub storage_bits: u32,
    /// Explicitly stored mantissa bits (M).
    pub mantissa_bits: u32,
    /// Width of the biased exponent field.
    pub exponent_bits: u32,
    /// Exponent bias (B).
    pub bias: i32,
    /// Smallest normal exponent.
    pub min_exponent: i32,
    /// Largest finite exponent.
    pub max_exponent: i32,
    /// Mask selecting the sign bit.
    pub sign_mask: u64,
    /// Mask selecting the biased exponent field.
    pub exponent_mask: u64,
    /// Mask selecting the stored mantissa.
    pub mantissa_mask: u64,
    /// Exponent pattern shared by every Inf and NaN encoding.
    pub inf_nan_mask: u64,
}

impl FormatDescriptor {
    /// IEEE754 binary32.
    pub const BINARY32: Self = Self::new("binary32", 32, 23);

    /// IEEE754 binary64.
    pub const BINARY64: Self = Self::new("binary64", 64, 52);

    /// Derive every constant from the storage and mantissa widths.
    #[must_use]
    pub const fn new(name: &'static str, storage_bits: u32, mantissa_bits: u32) -> Self {
        let exponent_bits = storage_bits - 1 - mantissa_bits;
        let bias = (1i32 << (exponent_bits - 1)) - 1;
        let exponent_mask = ((1u64 << exponent_bits) - 1) << mantissa_bits;
        Self {
            name,
            storage_bits,
            mantissa_bits,
            exponent_bits,
            bias,
            min_exponent: 1 - bias,
            max_exponent: bias,
            sign_mask: 1u64 << (storage_bits - 1),
            exponent_mask,
            mantissa_mask: (1u64 << mantissa_bits) - 1,
            inf_nan_mask: exponent_mask,
        }
    }

    /// Mask covering the whole encoding except the sign.
    #[must_use]
    pub const fn magnitude_mask(&self) -> u64 {
        self.exponent_mask | self.mantissa_mask
    }

    /// Exponent of the smallest positive subnormal, `emin - M`.
    #[must_use]
    pub const fn min_subnormal_exponent(&self) -> i32 {
        self.min_exponent - self.mantissa_bits as i32
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A hardware binary floating-point kind the engine can round.
///
/// Sealed: implemented for `f32` and `f64` only.
pub trait FloatFormat:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + sealed::Sealed
{
    /// Layout constants.
    const FORMAT: FormatDescriptor;
    /// Lane kind tag.
    const KIND: FloatKind;
    /// `0.0`
    const ZERO: Self;
    /// `1.0`
    const ONE: Self;
    /// `2.0`
    const TWO: Self;
    /// `1 - 2^-M`, the multiplier that maps `|x|` to (an approximation of)
    /// its predecessor.
    const PREDECESSOR_SCALE: Self;

    /// The encoding, zero-extended to 64 bits.
    fn to_raw(self) -> u64;
    /// Rebuild a value from the low `storage_bits` of `raw`.
    fn from_raw(raw: u64) -> Self;
    /// Absolute value.
    fn abs(self) -> Self;
    /// Correctly rounded square root.
    fn sqrt(self) -> Self;
    /// `self * a + b` with a single rounding.
    fn mul_add(self, a: Self, b: Self) -> Self;
}

macro_rules! impl_float_format {
    ($ty:ty, $bits:ty, $kind:ident, $format:ident) => {
        impl FloatFormat for $ty {
            const FORMAT: FormatDescriptor = FormatDescriptor::$format;
            const KIND: FloatKind = FloatKind::$kind;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const TWO: Self = 2.0;
            const PREDECESSOR_SCALE: Self = 1.0 - <$ty>::EPSILON;

            #[inline(always)]
            fn to_raw(self) -> u64 {
                u64::from(self.to_bits())
            }

            #[inline(always)]
            fn from_raw(raw: u64) -> Self {
                <$ty>::from_bits(raw as $bits)
            }

            #[inline(always)]
            fn abs(self) -> Self {
                <$ty>::abs(self)
            }

            #[inline(always)]
            fn sqrt(self) -> Self {
                <$ty>::sqrt(self)
            }

            #[inline(always)]
            fn mul_add(self, a: Self, b: Self) -> Self {
                <$ty>::mul_add(self, a, b)
            }
        }
    };
}

impl_float_format!(f32, u32, F32, BINARY32);
impl_float_format!(f64, u64, F64, BINARY64);

// ---------------------------------------------------------------------------
// Bit-level helpers
// ---------------------------------------------------------------------------

/// Unbiased exponent of `x`.
///
/// Returns 0 for `±0`, and the minimum normal exponent for subnormals (the
/// binade whose spacing they share). Inf and NaN report `emax + 1`.
#[inline(always)]
#[must_use]
pub fn exponent<T: FloatFormat>(x: T) -> i32 {
    let f = T::FORMAT;
    let raw = x.to_raw();
    if raw & f.magnitude_mask() == 0 {
        return 0;
    }
    let biased = ((raw & f.exponent_mask) >> f.mantissa_bits) as i32;
    if biased == 0 {
        f.min_exponent
    } else {
        biased - f.bias
    }
}

/// `2^n`, exact over the whole subnormal range.
///
/// Underflows to `+0` below `2^(emin - M)` and overflows to `+Inf` above
/// `2^emax`.
#[inline(always)]
#[must_use]
pub fn pow2<T: FloatFormat>(n: i32) -> T {
    let f = T::FORMAT;
    let raw = if n > f.max_exponent {
        f.inf_nan_mask
    } else if n >= f.min_exponent {
        ((n + f.bias) as u64) << f.mantissa_bits
    } else if n >= f.min_subnormal_exponent() {
        1u64 << (n - f.min_subnormal_exponent())
    } else {
        0
    };
    T::from_raw(raw)
}

/// `|x| * (1 - 2^-M)`.
///
/// Lands in the binade just below `|x|` exactly when `|x|` is a power of
/// two, which is all the rounding kernel needs from it. At the smallest
/// subnormals the product rounds back to `|x|`.
#[inline(always)]
#[must_use]
pub fn predecessor_abs<T: FloatFormat>(x: T) -> T {
    x.abs() * T::PREDECESSOR_SCALE
}

/// True when `x` is finite and non-zero.
///
/// A pure bitmask test; never a floating comparison.
#[inline(always)]
#[must_use]
pub fn is_number<T: FloatFormat>(x: T) -> bool {
    let f = T::FORMAT;
    let raw = x.to_raw();
    raw & f.magnitude_mask() != 0 && raw & f.inf_nan_mask != f.inf_nan_mask
}

/// True when `x` is neither Inf nor NaN.
#[inline(always)]
#[must_use]
pub fn is_finite<T: FloatFormat>(x: T) -> bool {
    let f = T::FORMAT;
    x.to_raw() & f.inf_nan_mask != f.inf_nan_mask
}

/// Unit in the last place of `x`, `2^(exponent(x) - M)`.
#[inline]
#[must_use]
pub fn ulp<T: FloatFormat>(x: T) -> T {
    let e = if is_number(x) {
        exponent(x)
    } else {
        T::FORMAT.min_exponent
    };
    pow2(e - T::FORMAT.mantissa_bits as i32)
}
