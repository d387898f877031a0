//! Error-free transforms.
//!
//! Each transform returns an [`ErrorPair`] `(sigma, tau)`: `sigma` is the
//! hardware round-to-nearest result and `tau` the residual, so that
//! `sigma + tau` is the exact result whenever no overflow occurs.

use crate::format::FloatFormat;
use crate::lanes::Lanes;

/// A rounded result and its residual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorPair<V> {
    /// Round-to-nearest result.
    pub sigma: V,
    /// Exact residual.
    pub tau: V,
}

/// Exact sum `a + b = sigma + tau`.
///
/// Operands are ordered by magnitude first, so `twosum(a, b)` and
/// `twosum(b, a)` are bitwise identical.
#[inline(always)]
#[must_use]
pub fn twosum<T: FloatFormat, const N: usize>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
) -> ErrorPair<Lanes<T, N>> {
    let swap = a.abs().lt(b.abs());
    let (a, b) = (swap.select(b, a), swap.select(a, b));
    let sigma = a + b;
    let z = sigma - a;
    let tau = (a - (sigma - z)) + (b - z);
    ErrorPair { sigma, tau }
}

/// Exact product `a * b = sigma + tau`.
///
/// `mul_add` is a single-rounding operation on every target: hardware FMA
/// where available, the software exact-product routine otherwise.
#[inline(always)]
#[must_use]
pub fn twoprod<T: FloatFormat, const N: usize>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
) -> ErrorPair<Lanes<T, N>> {
    let sigma = a * b;
    let tau = a.mul_add(b, -sigma);
    ErrorPair { sigma, tau }
}

/// Residual of a fused multiply-add, `a * b + c = sigma + tau`.
///
/// `sigma` is the single-rounding `fma(a, b, c)`; `tau` is its error,
/// itself rounded to nearest (Boldo-Muller `ErrFmaNearest`).
#[inline(always)]
#[must_use]
pub fn twofma<T: FloatFormat, const N: usize>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    c: Lanes<T, N>,
) -> ErrorPair<Lanes<T, N>> {
    let r1 = a.mul_add(b, c);
    let product = twoprod(a, b);
    let alpha = twosum(c, product.tau);
    let beta = twosum(product.sigma, alpha.sigma);
    let gamma = (beta.sigma - r1) + beta.tau;
    ErrorPair {
        sigma: r1,
        tau: gamma + alpha.tau,
    }
}
