//! Stochastic-rounding kernels.
//!
//! Each kernel computes the round-to-nearest result `sigma` and its
//! residual `tau`, then adds the [`sr_round`] correction. Lanes whose
//! operands are zero, Inf or NaN keep the plain hardware result; when no
//! lane qualifies the kernel returns without drawing.

use crate::draw::DrawSource;
use crate::Element;
use prism_core::{sr_round, twofma, twoprod, twosum, ErrorPair, Lanes, Mask};
use tracing::trace;

#[inline(always)]
fn round<T: Element, const N: usize, D: DrawSource>(
    op: &'static str,
    eligible: Mask<N>,
    pair: ErrorPair<Lanes<T, N>>,
    draws: &mut D,
) -> Lanes<T, N> {
    let ErrorPair { sigma, tau } = pair;
    let z = draws.uniform::<T, N>();
    let result = eligible.select(sigma + sr_round(sigma, tau, z), sigma);
    trace!(op, kind = %T::KIND, lanes = N, ?sigma, ?tau, ?z, ?result, "sr");
    result
}

/// `a + b`
#[inline(always)]
pub fn add<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    let eligible = a.is_number() & b.is_number();
    if eligible.none() {
        return a + b;
    }
    round("add", eligible, twosum(a, b), draws)
}

/// `a - b`, rounded as `a + (-b)`.
#[inline(always)]
pub fn sub<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    add(a, -b, draws)
}

/// `a * b`
#[inline(always)]
pub fn mul<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    let eligible = a.is_number() & b.is_number();
    if eligible.none() {
        return a * b;
    }
    round("mul", eligible, twoprod(a, b), draws)
}

/// `a / b`
///
/// The residual `fma(-sigma, b, a) / b` carries one extra rounding from
/// its own division.
#[inline(always)]
pub fn div<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    let sigma = a / b;
    let eligible = a.is_number() & b.is_number();
    if eligible.none() {
        return sigma;
    }
    let tau = (-sigma).mul_add(b, a) / b;
    round("div", eligible, ErrorPair { sigma, tau }, draws)
}

/// `sqrt(a)`
///
/// Negative inputs produce NaN and are left unrounded.
#[inline(always)]
pub fn sqrt<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    let sigma = a.sqrt();
    let eligible = a.is_number();
    if eligible.none() {
        return sigma;
    }
    let tau = (-sigma).mul_add(sigma, a) / (sigma * Lanes::splat(T::TWO));
    round("sqrt", eligible, ErrorPair { sigma, tau }, draws)
}

/// `a * b + c`
///
/// A zero addend still rounds: the product alone may be inexact.
#[inline(always)]
pub fn fma<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    c: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    let eligible = a.is_number() & b.is_number() & c.is_finite();
    if eligible.none() {
        return a.mul_add(b, c);
    }
    round("fma", eligible, twofma(a, b, c), draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::ReplayDraws;

    fn one<T: Element>(x: T) -> Lanes<T, 1> {
        Lanes::splat(x)
    }

    #[test]
    fn test_exact_sum_is_unchanged() {
        let mut draws = ReplayDraws::from_fractions(&[0.0, 0.5, 0.99]);
        for _ in 0..3 {
            assert_eq!(add(one(1.5f64), one(2.25), &mut draws).get(0), 3.75);
        }
    }

    #[test]
    fn test_add_rounds_by_threshold() {
        // 1 + 2^-25 in binary32: tau / ulp = 1/4
        let b = 2f32.powi(-25);
        let mut low = ReplayDraws::from_fractions(&[0.5]);
        let mut high = ReplayDraws::from_fractions(&[0.75]);
        assert_eq!(add(one(1.0f32), one(b), &mut low).get(0), 1.0);
        assert_eq!(add(one(1.0f32), one(b), &mut high).get(0), 1.0 + f32::EPSILON);
    }

    #[test]
    fn test_sub_matches_add_of_negation() {
        let mut a_draws = ReplayDraws::from_fractions(&[0.3, 0.8]);
        let mut b_draws = a_draws.clone();
        for _ in 0..2 {
            let x = sub(one(1.0f64), one(1e-20), &mut a_draws);
            let y = add(one(1.0f64), one(-1e-20), &mut b_draws);
            assert!(x.bits_eq(y));
        }
    }

    #[test]
    fn test_sub_crossing_power_of_two() {
        // 1 - 2^-30 lies in [1 - 2^-24, 1): round to either neighbour.
        let mut down = ReplayDraws::from_fractions(&[0.999]);
        let mut stay = ReplayDraws::from_fractions(&[0.0]);
        let eps = 2f32.powi(-30);
        assert_eq!(sub(one(1.0f32), one(eps), &mut down).get(0), 1.0 - 2f32.powi(-24));
        assert_eq!(sub(one(1.0f32), one(eps), &mut stay).get(0), 1.0);
    }

    #[test]
    fn test_mul_rounds_inexact_product() {
        // x * x = 1 + 2^-29 + 2^-60: residual is 2^-8 of an ULP.
        let x = 1.0 + 2f64.powi(-30);
        let mut high = ReplayDraws::from_fractions(&[0.999]);
        let mut low = ReplayDraws::from_fractions(&[0.0]);
        let hw = x * x;
        assert_eq!(mul(one(x), one(x), &mut low).get(0), hw);
        assert_eq!(mul(one(x), one(x), &mut high).get(0), hw + f64::EPSILON);
    }

    #[test]
    fn test_div_residual() {
        let mut high = ReplayDraws::from_fractions(&[0.999]);
        let mut low = ReplayDraws::from_fractions(&[0.0]);
        let q = 1.0f32 / 3.0;
        let up = div(one(1.0f32), one(3.0), &mut high).get(0);
        let down = div(one(1.0f32), one(3.0), &mut low).get(0);
        assert_eq!(down, q);
        assert_ne!(up, q);
        assert!((f64::from(up) - 1.0 / 3.0).abs() < 2.0 * f64::from(f32::EPSILON));
    }

    #[test]
    fn test_sqrt_exact_and_negative() {
        let mut draws = ReplayDraws::from_fractions(&[0.999]);
        assert_eq!(sqrt(one(16.0f64), &mut draws).get(0), 4.0);
        assert!(sqrt(one(-4.0f64), &mut draws).get(0).is_nan());
        assert_eq!(sqrt(one(0.0f64), &mut draws).get(0), 0.0);
    }

    #[test]
    fn test_sqrt_inexact_brackets_true_root() {
        let mut draws = ReplayDraws::from_fractions(&[0.0, 0.999]);
        let a = sqrt(one(2.0f32), &mut draws).get(0);
        let b = sqrt(one(2.0f32), &mut draws).get(0);
        let lo = a.min(b);
        let hi = a.max(b);
        assert!(f64::from(lo) <= 2f64.sqrt() && 2f64.sqrt() <= f64::from(hi));
    }

    #[test]
    fn test_fma_with_zero_addend_rounds_product() {
        let x = 1.0 + 2f64.powi(-30);
        let mut high = ReplayDraws::from_fractions(&[0.999]);
        assert_eq!(fma(one(x), one(x), one(0.0), &mut high).get(0), x * x + f64::EPSILON);
    }

    #[test]
    fn test_special_values_do_not_draw() {
        let mut draws = ReplayDraws::constant(0);
        assert!(add(one(f32::NAN), one(1.0), &mut draws).get(0).is_nan());
        assert_eq!(mul(one(0.0f64), one(3.0), &mut draws).get(0), 0.0);
        assert_eq!(div(one(1.0f64), one(0.0), &mut draws).get(0), f64::INFINITY);
        assert_eq!(sqrt(one(f32::INFINITY), &mut draws).get(0), f32::INFINITY);
        assert!(fma(one(1.0f32), one(1.0), one(f32::NAN), &mut draws).get(0).is_nan());
        assert_eq!(draws.draw_count(), 0);
    }

    #[test]
    fn test_overflow_saturates() {
        let big = 2f32.powi(127);
        let mut draws = ReplayDraws::from_fractions(&[0.999]);
        assert_eq!(add(one(big), one(big), &mut draws).get(0), f32::INFINITY);
        assert_eq!(mul(one(f64::MAX), one(2.0), &mut draws).get(0), f64::INFINITY);
    }

    #[test]
    fn test_mixed_lanes_draw_once() {
        let a = Lanes::from_array([1.0f64, f64::NAN, 0.0, 1.0]);
        let b = Lanes::splat(2f64.powi(-60));
        let mut draws = ReplayDraws::from_fractions(&[0.999]);
        let r = add(a, b, &mut draws);
        assert_eq!(draws.draw_count(), 1);
        assert_eq!(r.get(0), 1.0 + f64::EPSILON);
        assert!(r.get(1).is_nan());
        assert_eq!(r.get(2), 2f64.powi(-60));
        assert_eq!(r.get(3), 1.0 + f64::EPSILON);
    }
}
