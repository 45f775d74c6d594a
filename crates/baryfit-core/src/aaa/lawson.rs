//! Lawson reweighting toward a minimax fit
//!
//! A converged approximant tends to have its error concentrated at a few
//! sample points. Repeating the weight solve with each sample's row scaled
//! by its current error magnitude flattens the error curve toward
//! equioscillation, approximating a true minimax fit. The support node set
//! is never changed, only the weight vector.

use ndarray::Array1;
use num_complex::Complex64;

use super::constants::DEFAULT_LAWSON_ITERATIONS;
use super::fitter::loewner_matrix;
use crate::barycentric::BarycentricRational;
use crate::error::FitError;
use crate::math::linalg;

/// Outcome of the reweighting pass.
#[derive(Debug, Clone)]
pub struct LawsonResult {
    /// The refined approximant: the weight vector with the smallest
    /// maximum error seen over all iterations (never worse than the
    /// input).
    pub rational: BarycentricRational,
    /// Maximum error over the candidate samples, starting with the input
    /// approximant and then once per iteration.
    pub errors: Vec<f64>,
}

/// Refine `r` against the samples with [`DEFAULT_LAWSON_ITERATIONS`]
/// reweighting iterations.
pub fn lawson_refine(
    r: &BarycentricRational,
    domain: &[Complex64],
    values: &[Complex64],
) -> Result<LawsonResult, FitError> {
    lawson_refine_inner(r, domain, values, None, DEFAULT_LAWSON_ITERATIONS)
}

/// Refine `r` with explicit base sample weights and iteration count.
pub fn lawson_refine_weighted(
    r: &BarycentricRational,
    domain: &[Complex64],
    values: &[Complex64],
    sample_weights: &[f64],
    iterations: usize,
) -> Result<LawsonResult, FitError> {
    if sample_weights.len() != domain.len() {
        return Err(FitError::DimensionMismatch(
            "sample weights must match the sample count",
        ));
    }
    if sample_weights.iter().any(|&g| !g.is_finite() || g <= 0.0) {
        return Err(FitError::InvalidSampleWeights);
    }
    lawson_refine_inner(r, domain, values, Some(sample_weights), iterations)
}

fn lawson_refine_inner(
    r: &BarycentricRational,
    domain: &[Complex64],
    values: &[Complex64],
    sample_weights: Option<&[f64]>,
    iterations: usize,
) -> Result<LawsonResult, FitError> {
    if values.len() != domain.len() {
        return Err(FitError::DimensionMismatch(
            "domain and values must have the same length",
        ));
    }

    let nodes: Vec<Complex64> = r.nodes().to_vec();
    let node_values: Vec<Complex64> = r.values().to_vec();

    // samples sitting exactly on a node are interpolated by construction
    // and carry no least-squares information
    let candidates: Vec<usize> = (0..domain.len())
        .filter(|&i| nodes.iter().all(|&z| domain[i] != z))
        .collect();
    if candidates.len() < nodes.len() {
        return Err(FitError::InsufficientSamples {
            samples: candidates.len(),
            degree: r.degree(),
        });
    }

    let candidate_error = |r: &BarycentricRational| -> Result<f64, FitError> {
        let mut worst = 0.0f64;
        for &i in &candidates {
            let e = (values[i] - r.eval(domain[i])?).norm();
            worst = worst.max(if e.is_nan() { f64::INFINITY } else { e });
        }
        Ok(worst)
    };

    let mut best = r.clone();
    let mut best_err = candidate_error(r)?;
    let mut errors = vec![best_err];

    // Lawson weights over the candidate rows
    let mut gamma = vec![1.0f64; candidates.len()];
    let mut rows = vec![0.0f64; domain.len()];

    for _ in 0..iterations {
        for (k, &i) in candidates.iter().enumerate() {
            let base = sample_weights.map_or(1.0, |g| g[i]);
            rows[i] = base * gamma[k].sqrt();
        }
        let a = loewner_matrix(domain, values, &candidates, &nodes, &node_values, Some(&rows));
        let nv = linalg::nullspace_vector(&a)?;
        let refined = BarycentricRational::new(
            Array1::from_vec(nodes.clone()),
            Array1::from_vec(node_values.clone()),
            nv.vector,
        )?;

        let mut iter_max = 0.0f64;
        let mut point_errors = Vec::with_capacity(candidates.len());
        for &i in &candidates {
            let e = (values[i] - refined.eval(domain[i])?).norm();
            let e = if e.is_nan() { f64::INFINITY } else { e };
            point_errors.push(e);
            iter_max = iter_max.max(e);
        }
        errors.push(iter_max);
        if iter_max < best_err {
            best_err = iter_max;
            best = refined;
        }
        if iter_max == 0.0 || !iter_max.is_finite() {
            break;
        }

        for (g, e) in gamma.iter_mut().zip(&point_errors) {
            *g *= e / iter_max;
        }
        let g_max = gamma.iter().cloned().fold(0.0, f64::max);
        if g_max <= 0.0 {
            break;
        }
        for g in gamma.iter_mut() {
            *g /= g_max;
        }
    }

    Ok(LawsonResult {
        rational: best,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aaa::Aaa;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_refinement_never_worsens_the_error() {
        // |x| is not rational, so a low-degree fit leaves room to equalize
        let xs: Vec<f64> = (0..17).map(|i| -2.0 + 0.25 * i as f64).collect();
        let z: Vec<Complex64> = xs.iter().map(|&x| c(x)).collect();
        let f: Vec<Complex64> = xs.iter().map(|&x| c(x.abs())).collect();

        let mut fitter = Aaa::new();
        fitter.max_degree = Some(4);
        let fit = fitter.fit(&z, &f).unwrap();

        let refined = lawson_refine(&fit.rational, &z, &f).unwrap();
        assert!(refined.errors.len() > 1);

        let max_err = |r: &BarycentricRational| -> f64 {
            z.iter()
                .zip(&f)
                .map(|(&x, &fx)| (fx - r.eval(x).unwrap()).norm())
                .fold(0.0, f64::max)
        };
        assert!(max_err(&refined.rational) <= max_err(&fit.rational));
    }

    #[test]
    fn test_node_set_is_frozen() {
        let xs: Vec<f64> = (0..13).map(|i| i as f64 / 12.0).collect();
        let z: Vec<Complex64> = xs.iter().map(|&x| c(x)).collect();
        let f: Vec<Complex64> = xs.iter().map(|&x| c((3.0 * x).sin())).collect();

        let mut fitter = Aaa::new();
        fitter.max_degree = Some(3);
        let fit = fitter.fit(&z, &f).unwrap();

        let refined = lawson_refine(&fit.rational, &z, &f).unwrap();
        assert_eq!(refined.rational.nodes(), fit.rational.nodes());
        assert_eq!(refined.rational.values(), fit.rational.values());
    }

    #[test]
    fn test_rejects_bad_sample_weights() {
        let z = [c(0.0), c(1.0), c(2.0)];
        let f = [c(1.0), c(2.0), c(3.0)];
        let r = BarycentricRational::from_real(&[0.5], &[1.5], &[1.0]).unwrap();
        assert!(matches!(
            lawson_refine_weighted(&r, &z, &f, &[1.0, -1.0, 1.0], 5),
            Err(FitError::InvalidSampleWeights)
        ));
    }
}
