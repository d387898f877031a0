//! Per-ISA instantiation of the kernels.
//!
//! The portable loops below are `#[inline(always)]`, so each
//! `#[target_feature]` wrapper gets its own copy of the loop and of the
//! kernel, compiled for that ISA. Every copy performs the same IEEE
//! operations in the same order and is therefore bit-identical to the
//! portable one.

use crate::isa::Isa;
use prism_core::{FloatKind, Lanes};
use prism_kernels::{DrawSource, Element, Kernel};

/// Three operand columns; operations of lower arity repeat the first.
pub(crate) type Operands<'a, T> = [&'a [T]; 3];

/// Elements every operand column and the output have in common.
#[inline(always)]
pub(crate) fn common_len<T, K: Kernel>(args: &Operands<'_, T>, out: &[T]) -> usize {
    args[..K::OP.arity()]
        .iter()
        .map(|column| column.len())
        .fold(out.len(), usize::min)
}

#[inline(always)]
fn chunks<T: Element, K: Kernel, const N: usize, D: DrawSource>(
    args: Operands<'_, T>,
    out: &mut [T],
    mut start: usize,
    end: usize,
    draws: &mut D,
) -> usize {
    while start + N <= end {
        let lanes = args.map(|column| Lanes::<T, N>::load(&column[start..]));
        K::apply(lanes, draws).store(&mut out[start..]);
        start += N;
    }
    start
}

/// Full `N`-lane chunks, then the remainder one element at a time.
#[inline(always)]
pub(crate) fn portable_array<T: Element, K: Kernel, const N: usize, D: DrawSource>(
    args: Operands<'_, T>,
    out: &mut [T],
    draws: &mut D,
) -> usize {
    let len = common_len::<T, K>(&args, out);
    let done = chunks::<T, K, N, D>(args, out, 0, len, draws);
    if N > 1 {
        chunks::<T, K, 1, D>(args, out, done, len, draws);
    }
    len
}

macro_rules! isa_runners {
    ($($(#[$cfg:meta])* $module:ident => $features:literal;)*) => {$(
        $(#[$cfg])*
        mod $module {
            use super::*;

            /// # Safety
            ///
            #[doc = concat!("The CPU must support `", $features, "`.")]
            #[target_feature(enable = $features)]
            pub(super) unsafe fn array<T: Element, K: Kernel, const N: usize, D: DrawSource>(
                args: Operands<'_, T>,
                out: &mut [T],
                draws: &mut D,
            ) -> usize {
                portable_array::<T, K, N, D>(args, out, draws)
            }

            /// # Safety
            ///
            #[doc = concat!("The CPU must support `", $features, "`.")]
            #[target_feature(enable = $features)]
            pub(super) unsafe fn vector<T: Element, K: Kernel, const N: usize, D: DrawSource>(
                args: [Lanes<T, N>; 3],
                draws: &mut D,
            ) -> Lanes<T, N> {
                K::apply(args, draws)
            }
        }
    )*};
}

isa_runners! {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    sse4 => "sse4.2";
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    avx2 => "avx,avx2,fma";
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    avx512 => "avx512f,avx2,fma";
    #[cfg(target_arch = "aarch64")]
    neon => "neon";
}

/// Run `K` over the operand columns at `isa`'s native width.
///
/// # Safety
///
/// `isa` must be available on the running CPU.
pub(crate) unsafe fn run_array<T: Element, K: Kernel, D: DrawSource>(
    isa: Isa,
    args: Operands<'_, T>,
    out: &mut [T],
    draws: &mut D,
) -> usize {
    match (isa, T::KIND) {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (Isa::Avx512, FloatKind::F32) => avx512::array::<T, K, 16, D>(args, out, draws),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (Isa::Avx512, FloatKind::F64) => avx512::array::<T, K, 8, D>(args, out, draws),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (Isa::Avx2, FloatKind::F32) => avx2::array::<T, K, 8, D>(args, out, draws),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (Isa::Avx2, FloatKind::F64) => avx2::array::<T, K, 4, D>(args, out, draws),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (Isa::Sse4, FloatKind::F32) => sse4::array::<T, K, 4, D>(args, out, draws),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (Isa::Sse4, FloatKind::F64) => sse4::array::<T, K, 2, D>(args, out, draws),
        #[cfg(target_arch = "aarch64")]
        (Isa::Neon, FloatKind::F32) => neon::array::<T, K, 4, D>(args, out, draws),
        #[cfg(target_arch = "aarch64")]
        (Isa::Neon, FloatKind::F64) => neon::array::<T, K, 2, D>(args, out, draws),
        _ => portable_array::<T, K, 1, D>(args, out, draws),
    }
}

/// Run `K` once on an `N`-lane vector compiled for `isa`.
///
/// # Safety
///
/// `isa` must be available on the running CPU.
pub(crate) unsafe fn run_vector<T: Element, K: Kernel, const N: usize, D: DrawSource>(
    isa: Isa,
    args: [Lanes<T, N>; 3],
    draws: &mut D,
) -> Lanes<T, N> {
    match isa {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Isa::Avx512 => avx512::vector::<T, K, N, D>(args, draws),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Isa::Avx2 => avx2::vector::<T, K, N, D>(args, draws),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Isa::Sse4 => sse4::vector::<T, K, N, D>(args, draws),
        #[cfg(target_arch = "aarch64")]
        Isa::Neon => neon::vector::<T, K, N, D>(args, draws),
        _ => K::apply(args, draws),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_kernels::ops::{sr, ud};
    use prism_kernels::ReplayDraws;

    #[test]
    fn test_common_len_ignores_unused_columns() {
        let a = [1.0f64; 5];
        let long = [1.0f64; 9];
        let out = [0.0f64; 7];
        assert_eq!(common_len::<f64, sr::Sqrt>(&[&a, &[], &[]], &out), 5);
        assert_eq!(common_len::<f64, sr::Add>(&[&long, &a, &long], &out), 5);
        assert_eq!(common_len::<f64, sr::Fma>(&[&long, &long, &long], &out), 7);
    }

    #[test]
    fn test_portable_array_covers_remainder() {
        let a: Vec<f32> = (1..=11).map(|x| x as f32).collect();
        let b = vec![0.5f32; 11];
        let mut out = vec![0.0f32; 11];
        let mut draws = ReplayDraws::constant(0);
        let len = portable_array::<f32, sr::Add, 4, _>([&a, &b, &a], &mut out, &mut draws);
        assert_eq!(len, 11);
        for (x, r) in a.iter().zip(&out) {
            assert_eq!(*r, x + 0.5);
        }
        // Two chunks of four, then three single elements.
        assert_eq!(draws.draw_count(), 5);
    }

    #[test]
    fn test_every_available_isa_matches_portable() {
        let a: Vec<f64> = (0..37).map(|i| 1.0 + f64::from(i) / 7.0).collect();
        let b: Vec<f64> = (0..37).map(|i| 3.0 + f64::from(i) / 11.0).collect();
        let words: Vec<u64> = (0..64u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)).collect();

        let mut expected = vec![0.0; 37];
        portable_array::<f64, ud::Div, 1, _>([&a, &b, &a], &mut expected, &mut ReplayDraws::new(words.clone()));

        for isa in Isa::ALL.into_iter().filter(|isa| isa.is_available()) {
            let mut out = vec![0.0; 37];
            // SAFETY: filtered on availability.
            unsafe {
                run_array::<f64, ud::Div, _>(isa, [&a, &b, &a], &mut out, &mut ReplayDraws::new(words.clone()));
            }
            let same = out.iter().zip(&expected).all(|(x, y)| x.to_bits() == y.to_bits());
            assert!(same, "{isa} diverged from portable");
        }
    }
}
