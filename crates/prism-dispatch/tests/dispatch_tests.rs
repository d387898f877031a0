//! Entry-point and dispatch tests
//!
//! - Every supported target produces bit-identical results
//! - Static and dynamic vector forms agree
//! - Array forms handle remainders and mismatched lengths
//! - Scalar forms draw from the thread's context

use prism_core::Lanes;
use prism_dispatch::{current_isa, sr, ud, Dispatcher, Isa};
use prism_kernels::ops;
use prism_kernels::{Kernel, ReplayDraws};
use prism_rng::{install_thread_context, with_thread_context, RoundingContext};

fn seeded(seed: u64) {
    install_thread_context(RoundingContext::new(seed, 0));
}

fn draw_count() -> u64 {
    with_thread_context(|context| context.draw_count())
}

// ============================================================
// Targets
// ============================================================

mod target_tests {
    use super::*;

    fn vectors_agree<K: Kernel, const N: usize>() {
        let a = Lanes::<f64, N>::from_array(std::array::from_fn(|i| 1.0 + i as f64 / 3.0));
        let b = Lanes::<f64, N>::from_array(std::array::from_fn(|i| 7.0 - i as f64 / 5.0));
        let c = Lanes::<f64, N>::splat(0.1);
        let words: Vec<u64> = (1..=16u64).map(|i| i.wrapping_mul(0xD1B5_4A32_D192_ED03)).collect();

        let reference = Dispatcher::scalar()
            .apply_vector::<f64, K, N, _>([a, b, c], &mut ReplayDraws::new(words.clone()));
        for dispatcher in Dispatcher::available() {
            let result =
                dispatcher.apply_vector::<f64, K, N, _>([a, b, c], &mut ReplayDraws::new(words.clone()));
            assert!(result.bits_eq(reference), "{} {}{} x{N}", dispatcher.isa(), K::MODE, K::OP);
        }
    }

    #[test]
    fn test_every_target_is_bit_identical() {
        vectors_agree::<ops::sr::Add, 1>();
        vectors_agree::<ops::sr::Div, 2>();
        vectors_agree::<ops::sr::Fma, 4>();
        vectors_agree::<ops::sr::Sqrt, 8>();
        vectors_agree::<ops::sr::Mul, 16>();
        vectors_agree::<ops::ud::Sub, 4>();
        vectors_agree::<ops::ud::Fma, 16>();
    }

    #[test]
    fn test_selected_target_is_supported() {
        let isa = current_isa();
        assert!(isa.is_available());
        assert_eq!(Dispatcher::current().isa(), isa);
        assert!(Dispatcher::new(isa).is_ok());
    }

    #[test]
    fn test_arrays_agree_across_targets() {
        let a: Vec<f32> = (0..1000).map(|i| 1.0 + i as f32 * 0.001).collect();
        let b: Vec<f32> = (0..1000).map(|i| 0.3 + i as f32 * 0.0007).collect();
        let words: Vec<u64> = (0..97u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0xABCD).collect();

        let mut reference = vec![0.0f32; 1000];
        Dispatcher::scalar()
            .apply_array::<f32, ops::sr::Mul, _>(&[&a, &b], &mut reference, &mut ReplayDraws::new(words.clone()))
            .unwrap();
        for dispatcher in Dispatcher::available().filter(|d| d.isa() != Isa::Scalar) {
            let mut out = vec![0.0f32; 1000];
            dispatcher
                .apply_array::<f32, ops::sr::Mul, _>(&[&a, &b], &mut out, &mut ReplayDraws::new(words.clone()))
                .unwrap();
            assert!(
                out.iter().zip(&reference).all(|(x, y)| x.to_bits() == y.to_bits()),
                "{} diverged",
                dispatcher.isa()
            );
        }
    }
}

// ============================================================
// Entry points
// ============================================================

mod entry_tests {
    use super::*;

    #[test]
    fn test_scalar_entry_points() {
        seeded(1);
        assert_eq!(sr::scalar::addf32(1.5, 2.25), 3.75);
        assert_eq!(sr::scalar::subf64(1.5, 2.25), -0.75);
        assert_eq!(sr::scalar::mulf32(1.5, 2.0), 3.0);
        assert_eq!(sr::scalar::divf64(3.0, 2.0), 1.5);
        assert_eq!(sr::scalar::sqrtf32(16.0), 4.0);
        assert_eq!(sr::scalar::fmaf64(2.0, 3.0, 1.0), 7.0);
        let moved = ud::scalar::addf64(1.0, 2.0);
        assert_ne!(moved, 3.0);
        assert_eq!(moved.to_bits().abs_diff(3.0f64.to_bits()), 1);
    }

    #[test]
    fn test_scalar_nan_draws_nothing() {
        seeded(2);
        assert!(sr::scalar::addf64(f64::NAN, 1.0).is_nan());
        assert!(ud::scalar::fmaf32(1.0, 2.0, f32::INFINITY).is_infinite());
        assert_eq!(draw_count(), 0);
        let _ = sr::scalar::addf64(1.0, 1e-30);
        assert_eq!(draw_count(), 1);
    }

    #[test]
    fn test_scalar_scenario_frequency() {
        seeded(3);
        let trials = 40_000u32;
        let up = 1.25f32 + 2f32.powi(-23);
        let ups = (0..trials)
            .filter(|_| sr::scalar::addf32(1.25, 2f32.powi(-25)) == up)
            .count() as f64;
        let expected = f64::from(trials) * 0.25;
        let sd = (f64::from(trials) * 0.25 * 0.75).sqrt();
        assert!((ups - expected).abs() < 5.0 * sd, "ups = {ups}");
    }

    #[test]
    fn test_seeded_runs_replay() {
        let run = || {
            seeded(42);
            (0..100)
                .map(|i| sr::scalar::divf64(1.0, f64::from(i) + 3.0).to_bits())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_static_and_dynamic_agree() {
        let a = Lanes::<f32, 8>::from_array(std::array::from_fn(|i| 1.0 / (i as f32 + 3.0)));
        let b = Lanes::<f32, 8>::splat(0.7);

        seeded(9);
        let bound = sr::vector::mulf32x8_static(a, b);
        seeded(9);
        let mut dispatched = Lanes::splat(0.0);
        sr::vector::mulf32x8_dynamic(a, b, &mut dispatched);
        assert!(bound.bits_eq(dispatched));

        seeded(10);
        let wide = ud::vector::fmaf64x16_static(Lanes::splat(1.0), Lanes::splat(2.0), Lanes::splat(0.5));
        seeded(10);
        let mut wide_dispatched = Lanes::splat(0.0);
        ud::vector::fmaf64x16_dynamic(
            Lanes::splat(1.0),
            Lanes::splat(2.0),
            Lanes::splat(0.5),
            &mut wide_dispatched,
        );
        assert!(wide.bits_eq(wide_dispatched));
    }

    #[test]
    fn test_vector_widths() {
        seeded(4);
        assert_eq!(sr::vector::addf64x1_static(Lanes::splat(1.0), Lanes::splat(2.0)).to_array(), [3.0]);
        assert_eq!(sr::vector::sqrtf32x2_static(Lanes::splat(9.0)).to_array(), [3.0; 2]);
        assert_eq!(sr::vector::subf32x16_static(Lanes::splat(1.0), Lanes::splat(0.5)).to_array(), [0.5; 16]);
        let mut out = Lanes::splat(0.0);
        sr::vector::divf64x4_dynamic(Lanes::splat(1.0), Lanes::splat(4.0), &mut out);
        assert_eq!(out.to_array(), [0.25; 4]);
    }

    #[test]
    fn test_array_remainder_and_prefix() {
        seeded(5);
        let a: Vec<f64> = (0..23).map(f64::from).collect();
        let b = vec![0.5f64; 20];
        let mut out = vec![-1.0f64; 25];
        assert_eq!(sr::array::addf64(&a, &b, &mut out), 20);
        for i in 0..20 {
            assert_eq!(out[i], f64::from(i as u32) + 0.5);
        }
        assert!(out[20..].iter().all(|&x| x == -1.0));
    }

    #[test]
    fn test_array_unary_and_ternary() {
        seeded(6);
        let a = [4.0f32, 9.0, 16.0, 25.0, 36.0, 49.0, 64.0];
        let mut roots = [0.0f32; 7];
        assert_eq!(sr::array::sqrtf32(&a, &mut roots), 7);
        assert_eq!(roots, [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let mut fused = [0.0f32; 7];
        assert_eq!(sr::array::fmaf32(&roots, &roots, &a, &mut fused), 7);
        for (r, x) in fused.iter().zip(&a) {
            assert_eq!(*r, 2.0 * x);
        }
    }

    #[test]
    fn test_empty_array() {
        let mut out: [f64; 0] = [];
        assert_eq!(ud::array::mulf64(&[], &[], &mut out), 0);
    }
}
