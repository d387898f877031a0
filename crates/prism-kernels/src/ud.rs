//! Up-down rounding kernels.
//!
//! The hardware result is moved one encoding step up or down at random,
//! ignoring the residual. Only finite non-zero results of eligible
//! operands move.

use crate::draw::DrawSource;
use crate::Element;
use prism_core::{ud_round, Lanes, Mask};
use tracing::trace;

#[inline(always)]
fn finish<T: Element, const N: usize, D: DrawSource>(
    op: &'static str,
    eligible: Mask<N>,
    value: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    let eligible = eligible & value.is_number();
    if eligible.none() {
        return value;
    }
    let bits = draws.random_bits::<N>();
    let result = eligible.select(ud_round(value, bits), value);
    trace!(op, kind = %T::KIND, lanes = N, ?value, ?bits, ?result, "ud");
    result
}

/// `a + b`
#[inline(always)]
pub fn add<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    finish("add", a.is_number() & b.is_number(), a + b, draws)
}

/// `a - b`
#[inline(always)]
pub fn sub<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    finish("sub", a.is_number() & b.is_number(), a - b, draws)
}

/// `a * b`
#[inline(always)]
pub fn mul<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    finish("mul", a.is_number() & b.is_number(), a * b, draws)
}

/// `a / b`
#[inline(always)]
pub fn div<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    finish("div", a.is_number() & b.is_number(), a / b, draws)
}

/// `sqrt(a)`
#[inline(always)]
pub fn sqrt<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    finish("sqrt", a.is_number(), a.sqrt(), draws)
}

/// `a * b + c`, fused.
#[inline(always)]
pub fn fma<T: Element, const N: usize, D: DrawSource>(
    a: Lanes<T, N>,
    b: Lanes<T, N>,
    c: Lanes<T, N>,
    draws: &mut D,
) -> Lanes<T, N> {
    let eligible = a.is_number() & b.is_number() & c.is_finite();
    finish("fma", eligible, a.mul_add(b, c), draws)
}
