//! AAA fitter tests
//!
//! Covers the greedy loop scenarios: convergence on representable data,
//! degree-0 early exit, duplicate sample points, starvation and stop
//! reasons, monotone improvement with the degree cap, and input
//! validation.

use approx::assert_relative_eq;
use baryfit_core::aaa::{aaa_real, Aaa, StopReason};
use baryfit_core::FitError;
use num_complex::Complex64;

fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

fn real_samples(xs: &[f64], f: impl Fn(f64) -> f64) -> (Vec<Complex64>, Vec<Complex64>) {
    (
        xs.iter().map(|&x| c(x)).collect(),
        xs.iter().map(|&x| c(f(x))).collect(),
    )
}

#[test]
fn test_exponential_like_growth_interpolates_in_between() {
    let domain = [c(0.0), c(1.0), c(2.0), c(3.0)];
    let values = [c(1.0), c(2.0), c(4.0), c(8.0)];

    let mut fitter = Aaa::new();
    fitter.max_degree = Some(3);
    fitter.tolerance = 1e-10;
    let result = fitter.fit(&domain, &values).unwrap();

    let y = result.rational.eval_real(1.5).unwrap().re;
    assert!(y > 2.0 && y < 4.0, "r(1.5) = {y} not between the neighbors");
}

#[test]
fn test_constant_samples_converge_at_degree_zero() {
    let (z, f) = real_samples(&[0.0, 1.0, 2.0, 3.0], |_| 5.0);
    let result = Aaa::new().fit(&z, &f).unwrap();

    assert!(result.converged());
    assert_eq!(result.rational.nodes().len(), 1);
    assert_eq!(result.rational.degree(), 0);
    // the degree-0 approximant is the mean of the samples, everywhere
    assert_eq!(result.rational.eval_real(10.0).unwrap(), c(5.0));
    assert_eq!(result.rational.eval_real(-7.5).unwrap(), c(5.0));
}

#[test]
fn test_degree_zero_weighted_mean() {
    let z = [c(0.0), c(1.0)];
    let f = [c(5.0), c(5.0)];
    let result = Aaa::new().fit_weighted(&z, &f, &[10.0, 0.1]).unwrap();
    assert!(result.converged());
    assert_eq!(result.rational.eval_real(3.0).unwrap(), c(5.0));
}

#[test]
fn test_recovers_genuine_pole() {
    let (z, f) = real_samples(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], |x| 1.0 / (x - 2.5));
    let result = Aaa::new().fit(&z, &f).unwrap();

    assert!(result.converged());
    let poles = result.rational.poles().unwrap();
    assert!(
        poles.iter().any(|p| (*p - c(2.5)).norm() < 1e-6),
        "no pole near 2.5 in {poles:?}"
    );
    // the fit reproduces the function away from the pole
    assert_relative_eq!(
        result.rational.eval_real(1.25).unwrap().re,
        1.0 / (1.25 - 2.5),
        epsilon = 1e-9
    );
}

#[test]
fn test_duplicate_sample_points_are_tolerated() {
    let domain = [c(0.0), c(1.0), c(1.0), c(2.0), c(3.0)];
    let values = [c(0.0), c(1.0), c(1.0), c(4.0), c(9.0)];
    let result = Aaa::new().fit(&domain, &values).unwrap();

    let nodes = result.rational.nodes();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            assert!(nodes[i] != nodes[j], "duplicate node selected");
        }
    }
    for &x in &domain {
        assert!(result.rational.eval(x).unwrap().is_finite());
    }
}

#[test]
fn test_best_error_is_monotone_in_max_degree() {
    let xs: Vec<f64> = (0..21).map(|i| -1.0 + i as f64 / 10.0).collect();
    let (z, f) = real_samples(&xs, |x| 1.0 / (1.0 + 25.0 * x * x));

    let achieved = |degree: usize| -> f64 {
        let mut fitter = Aaa::new();
        fitter.max_degree = Some(degree);
        let r = fitter.fit(&z, &f).unwrap().rational;
        z.iter()
            .zip(&f)
            .map(|(&x, &fx)| (fx - r.eval(x).unwrap()).norm())
            .fold(0.0, f64::max)
    };

    let mut previous = f64::INFINITY;
    for degree in [1, 2, 4, 6, 8] {
        let err = achieved(degree);
        assert!(
            err <= previous,
            "error increased from {previous} to {err} at degree {degree}"
        );
        previous = err;
    }
}

#[test]
fn test_stop_reason_starved() {
    // four samples cannot feed more than two support nodes
    let domain = [c(0.0), c(1.0), c(2.0), c(3.0)];
    let values = [c(1.0), c(2.0), c(4.0), c(8.0)];
    let mut fitter = Aaa::new();
    fitter.max_degree = Some(3);
    let result = fitter.fit(&domain, &values).unwrap();
    assert_eq!(result.stop, StopReason::Starved);
    assert_eq!(result.rational.degree(), 1);
}

#[test]
fn test_stop_reason_max_degree() {
    let xs: Vec<f64> = (0..9).map(|i| -2.0 + 0.5 * i as f64).collect();
    let (z, f) = real_samples(&xs, f64::abs);
    let mut fitter = Aaa::new();
    fitter.max_degree = Some(2);
    let result = fitter.fit(&z, &f).unwrap();
    // |x| is not rational; two degrees cannot reach the tolerance
    assert_eq!(result.stop, StopReason::MaxDegree);
}

#[test]
fn test_error_history_starts_at_degree_zero() {
    let (z, f) = real_samples(&[0.0, 1.0, 2.0, 3.0], |x| x * x);
    let result = Aaa::new().fit(&z, &f).unwrap();
    // mean is 14/4 = 3.5; the worst point is x = 3 with |9 - 3.5| = 5.5
    assert_relative_eq!(result.errors[0], 5.5, epsilon = 1e-12);
    assert!(result.errors.len() > 1);
}

#[test]
fn test_insufficient_samples_for_requested_degree() {
    let (z, f) = real_samples(&[0.0, 1.0], |x| x);
    let mut fitter = Aaa::new();
    fitter.max_degree = Some(5);
    assert!(matches!(
        fitter.fit(&z, &f),
        Err(FitError::InsufficientSamples {
            samples: 2,
            degree: 5
        })
    ));
}

#[test]
fn test_mismatched_inputs() {
    assert!(matches!(
        Aaa::new().fit(&[c(0.0), c(1.0)], &[c(1.0)]),
        Err(FitError::DimensionMismatch(_))
    ));
}

#[test]
fn test_invalid_sample_weights() {
    let z = [c(0.0), c(1.0)];
    let f = [c(1.0), c(2.0)];
    assert!(matches!(
        Aaa::new().fit_weighted(&z, &f, &[1.0, 0.0]),
        Err(FitError::InvalidSampleWeights)
    ));
    assert!(matches!(
        Aaa::new().fit_weighted(&z, &f, &[1.0, f64::NAN]),
        Err(FitError::InvalidSampleWeights)
    ));
}

#[test]
fn test_unit_weights_match_unweighted_fit() {
    let xs: Vec<f64> = (0..12).map(|i| i as f64 / 11.0).collect();
    let (z, f) = real_samples(&xs, |x| (2.0 * x).exp());
    let plain = Aaa::new().fit(&z, &f).unwrap();
    let weighted = Aaa::new().fit_weighted(&z, &f, &vec![1.0; z.len()]).unwrap();
    assert_eq!(plain.rational.nodes(), weighted.rational.nodes());
    assert_eq!(plain.errors, weighted.errors);
}

#[test]
fn test_noise_floor_stops_the_iteration() {
    let xs: Vec<f64> = (0..41).map(|i| -1.0 + i as f64 / 20.0).collect();
    let (z, f) = real_samples(&xs, |x| 1.0 / (1.0 + 25.0 * x * x));
    let mut fitter = Aaa::new();
    fitter.tolerance = 0.0; // unreachable: run into the noise floor
    let result = fitter.fit(&z, &f).unwrap();
    assert!(matches!(
        result.stop,
        StopReason::Stagnation | StopReason::Starved
    ));
    let best = result
        .errors
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    assert!(best < 1e-10, "best error {best} above the noise floor");
}

#[test]
fn test_cleanup_pass_keeps_a_good_fit() {
    let (z, f) = real_samples(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], |x| 1.0 / (x - 2.5));
    let mut fitter = Aaa::new();
    fitter.cleanup_tolerance = Some(1e-12);
    let result = fitter.fit(&z, &f).unwrap();
    // the genuine pole is nowhere near a node, so nothing is removed
    assert!(result
        .rational
        .poles()
        .unwrap()
        .iter()
        .any(|p| (*p - c(2.5)).norm() < 1e-6));
}

#[test]
fn test_convenience_wrapper() {
    let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let fs: Vec<f64> = xs.iter().map(|&x| 1.0 / (x - 2.5)).collect();
    let result = aaa_real(&xs, &fs).unwrap();
    assert!(result.converged());
}
