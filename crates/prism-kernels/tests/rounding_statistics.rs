//! Statistical behaviour of the rounding kernels
//!
//! Every test draws from a fixed-seed context and checks observed
//! frequencies against a normal-approximation binomial bound of five
//! standard deviations.

use prism_core::Lanes;
use prism_kernels::{sr, ud};
use prism_rng::{RoundingContext, Xoroshiro128PlusPlus, Xoshiro256PlusPlus};

fn context(seed: u64) -> RoundingContext<Xoshiro256PlusPlus> {
    RoundingContext::new(seed, 0)
}

fn one<T: prism_kernels::Element>(x: T) -> Lanes<T, 1> {
    Lanes::splat(x)
}

/// Assert that `hits` out of `trials` is consistent with probability `p`.
fn assert_binomial(hits: u64, trials: u64, p: f64) {
    let n = trials as f64;
    let sd = (n * p * (1.0 - p)).sqrt();
    let expected = n * p;
    assert!(
        (hits as f64 - expected).abs() <= 5.0 * sd + 1.0,
        "observed {hits}/{trials}, expected {expected:.1} ± {sd:.1}"
    );
}

// ============================================================
// Stochastic rounding
// ============================================================

mod sr_tests {
    use super::*;

    #[test]
    fn test_scenario_exact_ulp_addend() {
        let mut ctx = context(1);
        let b = 2f32.powi(-23);
        for _ in 0..1000 {
            assert_eq!(sr::add(one(1.25f32), one(b), &mut ctx).get(0), 1.25 + b);
        }
    }

    #[test]
    fn test_scenario_up_frequency_halves_per_bit() {
        let ulp = 2f32.powi(-23);
        for i in 1..=6 {
            let b = 2f32.powi(-(23 + i));
            let mut ctx = context(100 + i as u64);
            let trials = 40_000;
            let mut ups = 0;
            for _ in 0..trials {
                let r = sr::add(one(1.25f32), one(b), &mut ctx).get(0);
                if r == 1.25 + ulp {
                    ups += 1;
                } else {
                    assert_eq!(r, 1.25);
                }
            }
            assert_binomial(ups, trials, 2f64.powi(-i));
        }
    }

    #[test]
    fn test_add_mean_converges_to_exact_sum() {
        // 1 + 0.625 ulp: rounds to nearest (1 + ulp), tau = -0.375 ulp.
        let ulp = 2f32.powi(-23);
        let b = 2f32.powi(-24) + 2f32.powi(-26);
        let mut ctx = context(7);
        let trials = 100_000u64;
        let mut ups = 0;
        let mut sum = 0.0f64;
        for _ in 0..trials {
            let r = sr::add(one(1.0f32), one(b), &mut ctx).get(0);
            if r == 1.0 + ulp {
                ups += 1;
            }
            sum += f64::from(r) - 1.0;
        }
        assert_binomial(ups, trials, 0.625);
        let mean = sum / trials as f64;
        assert!((mean - f64::from(b)).abs() < 0.01 * f64::from(ulp), "mean = {mean:e}");
    }

    #[test]
    fn test_mul_frequency_matches_residual() {
        // (1 + 2^-12)^2 = 1 + 2^-11 + 2^-24: a tie, residual is half an ULP.
        let x = 1.0f32 + 2f32.powi(-12);
        let hw = x * x;
        let mut ctx = context(11);
        let trials = 40_000;
        let ups = (0..trials)
            .filter(|_| sr::mul(one(x), one(x), &mut ctx).get(0) != hw)
            .count() as u64;
        assert_binomial(ups, trials, 0.5);
    }

    #[test]
    fn test_vector_lanes_are_independent() {
        let ulp = 2f64.powi(-52);
        let mut ctx = context(3);
        let trials = 20_000;
        let mut ups = [0u64; 8];
        for _ in 0..trials {
            let r = sr::add(Lanes::<f64, 8>::splat(1.0), Lanes::splat(ulp / 4.0), &mut ctx);
            for (lane, up) in ups.iter_mut().enumerate() {
                if r.get(lane) != 1.0 {
                    *up += 1;
                }
            }
        }
        for up in ups {
            assert_binomial(up, trials, 0.25);
        }
    }

    #[test]
    fn test_nan_operand_draws_nothing() {
        let mut ctx = context(5);
        let r = sr::add(one(f64::NAN), one(1.0), &mut ctx);
        assert!(r.get(0).is_nan());
        assert_eq!(ctx.draw_count(), 0);
    }

    #[test]
    fn test_overflow_to_infinity() {
        let mut ctx = context(5);
        let big = 2f32.powi(127);
        for _ in 0..100 {
            assert_eq!(sr::add(one(big), one(big), &mut ctx).get(0), f32::INFINITY);
        }
    }

    #[test]
    fn test_alternate_generator() {
        let mut ctx = RoundingContext::<Xoroshiro128PlusPlus>::new(9, 0);
        let b = 2f32.powi(-25);
        let trials = 40_000;
        let ups = (0..trials)
            .filter(|_| sr::add(one(1.0f32), one(b), &mut ctx).get(0) != 1.0)
            .count() as u64;
        assert_binomial(ups, trials, 0.25);
    }
}

// ============================================================
// Up-down rounding
// ============================================================

mod ud_tests {
    use super::*;

    #[test]
    fn test_up_and_down_are_equally_likely() {
        let mut ctx = context(21);
        let trials = 40_000;
        let ups = (0..trials)
            .filter(|_| ud::add(one(1.0f64), one(2.0), &mut ctx).get(0) > 3.0)
            .count() as u64;
        assert_binomial(ups, trials, 0.5);
    }

    #[test]
    fn test_every_lane_moves_by_one_encoding() {
        let mut ctx = context(22);
        for _ in 0..1000 {
            let r = ud::div(Lanes::<f32, 16>::splat(1.0), Lanes::splat(3.0), &mut ctx);
            let hw = (1.0f32 / 3.0).to_bits();
            for x in r.to_array() {
                assert_eq!(x.to_bits().abs_diff(hw), 1);
            }
        }
    }
}
