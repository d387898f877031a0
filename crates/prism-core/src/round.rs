//! Rounding decisions.
//!
//! Both functions are pure: the caller supplies the random input, so the
//! same decision can be replayed exactly in tests and across lane widths.
//!
//! # Stochastic rounding
//!
//! Given the residual `tau` of an exact operation, [`sr_round`] returns
//! either 0 or one ULP of `sigma` towards the exact result:
//!
//! ```text
//!            sigma            sigma + tau           sigma + ulp
//!   ...--------|-----------------x--------------------|--------...
//!              |<------ tau ---->|                    |
//!              |<---------------- ulp --------------->|
//!
//!   P(round to sigma + ulp) = tau / ulp
//! ```
//!
//! When `tau` points at the binade below `sigma` (opposite signs and
//! `|sigma|` a power of two) the ULP is taken in that lower binade.
//!
//! # Up-down rounding
//!
//! [`ud_round`] moves the encoding of the value one step up or down,
//! chosen by one random bit, with no regard to the residual.

use crate::format::FloatFormat;
use crate::lanes::Lanes;

/// Stochastic-rounding correction for `sigma + tau`.
///
/// `z` holds one uniform draw in `[0, 1)` per lane. Returns 0 in lanes
/// where `tau == 0` or `sigma` is not finite, otherwise `±ulp` with
/// probability `|tau| / ulp` and 0 with the complementary probability.
#[inline(always)]
#[must_use]
pub fn sr_round<T: FloatFormat, const N: usize>(
    sigma: Lanes<T, N>,
    tau: Lanes<T, N>,
    z: Lanes<T, N>,
) -> Lanes<T, N> {
    let zero = Lanes::splat(T::ZERO);
    let tau_negative = tau.lt(zero);
    let sigma_negative = sigma.lt(zero);

    let predecessor = sigma.abs() * Lanes::splat(T::PREDECESSOR_SCALE);
    let eta = (tau_negative ^ sigma_negative).select(predecessor.exponent(), sigma.exponent());

    let mantissa_bits = T::FORMAT.mantissa_bits as i32;
    let magnitude = Lanes::pow2(eta.map(|e| e - mantissa_bits));
    let ulp = tau_negative.select(-magnitude, magnitude);

    let round_away = (tau + ulp * z).abs().ge(magnitude);
    let exact = tau.eq_lanes(zero) | !sigma.is_finite();
    (round_away & !exact).select(ulp, zero)
}

/// Up-down rounding of `a`.
///
/// In lanes holding a finite non-zero value, the encoding is incremented
/// when the low bit of the matching `bits` lane is set and decremented
/// otherwise. Zero, Inf and NaN lanes pass through unchanged.
#[inline(always)]
#[must_use]
pub fn ud_round<T: FloatFormat, const N: usize>(a: Lanes<T, N>, bits: Lanes<u64, N>) -> Lanes<T, N> {
    let stepped = a.to_raw().zip_map(bits, |raw, r| {
        if r & 1 == 1 {
            raw.wrapping_add(1)
        } else {
            raw.wrapping_sub(1)
        }
    });
    a.is_number().select(Lanes::from_raw(stepped), a)
}
