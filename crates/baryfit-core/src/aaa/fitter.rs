//! Greedy AAA fitter
//!
//! Builds an increasing-degree sequence of barycentric rational
//! approximants to the sample data, adaptively selecting the worst sample
//! point as the next support node and recomputing the weight vector by a
//! Loewner least-squares nullspace solve.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::cleanup::remove_froissart_doublets;
use super::constants::{
    DEFAULT_MAX_NODES, DEFAULT_STAGNATION_WINDOW, DEFAULT_TOLERANCE, SINGULAR_GAP_RTOL,
};
use crate::barycentric::BarycentricRational;
use crate::error::FitError;
use crate::math::linalg;

/// Why the greedy iteration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The maximum relative error dropped below the tolerance.
    Converged,
    /// The degree cap was reached.
    MaxDegree,
    /// The error failed to decrease for the configured number of
    /// consecutive iterations.
    Stagnation,
    /// Adding another node would leave the least-squares solve with fewer
    /// candidate rows than support columns.
    Starved,
}

/// Warning-level conditions observed during a fit. None of these abort the
/// iteration; they are attached to the result for the caller to inspect.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The singular-value gap of a weight solve was too small to fully
    /// trust the null vector.
    IllConditionedSolve { degree: usize, gap: f64 },
    /// The cleanup pass removed near-canceling pole/node pairs.
    FroissartDoublets { removed: usize },
}

/// A fitted rational function together with the fit history.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// The best approximant found, by minimum maximum error.
    pub rational: BarycentricRational,
    /// Maximum absolute error over the sample set after each iteration,
    /// starting with the degree-0 mean approximant.
    pub errors: Vec<f64>,
    /// Warning diagnostics accumulated during the fit.
    pub diagnostics: Vec<Diagnostic>,
    /// Why the iteration stopped.
    pub stop: StopReason,
}

impl FitResult {
    /// Whether the fit reached the requested tolerance.
    pub fn converged(&self) -> bool {
        self.stop == StopReason::Converged
    }
}

/// Configuration for the greedy fitter.
///
/// ```
/// use baryfit_core::aaa::Aaa;
/// use num_complex::Complex64;
///
/// let z: Vec<Complex64> = (0..20).map(|i| Complex64::new(i as f64 / 19.0, 0.0)).collect();
/// let f: Vec<Complex64> = z.iter().map(|&x| (x * x + 1.0).finv()).collect();
///
/// let mut fitter = Aaa::new();
/// fitter.max_degree = Some(8);
/// let result = fitter.fit(&z, &f).unwrap();
/// assert!(result.errors.last().unwrap() < &1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct Aaa {
    /// Relative stopping tolerance, scaled by the maximum sample magnitude.
    pub tolerance: f64,
    /// Hard cap on the fit degree (node count minus one). When set, the
    /// sample set must contain at least this many points.
    pub max_degree: Option<usize>,
    /// Consecutive non-improving iterations before stopping.
    pub stagnation_window: usize,
    /// When set, poles closer than this distance to a support node are
    /// removed together with that node after the fit, followed by one
    /// final weight re-solve.
    pub cleanup_tolerance: Option<f64>,
}

impl Default for Aaa {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_degree: None,
            stagnation_window: DEFAULT_STAGNATION_WINDOW,
            cleanup_tolerance: None,
        }
    }
}

impl Aaa {
    /// Create a fitter with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the samples `(domain[i], values[i])`.
    pub fn fit(&self, domain: &[Complex64], values: &[Complex64]) -> Result<FitResult, FitError> {
        self.fit_inner(domain, values, None)
    }

    /// Fit with a positive weight per sample scaling that sample's row in
    /// the least-squares problem.
    pub fn fit_weighted(
        &self,
        domain: &[Complex64],
        values: &[Complex64],
        sample_weights: &[f64],
    ) -> Result<FitResult, FitError> {
        if sample_weights.len() != domain.len() {
            return Err(FitError::DimensionMismatch(
                "sample weights must match the sample count",
            ));
        }
        if sample_weights.iter().any(|&g| !g.is_finite() || g <= 0.0) {
            return Err(FitError::InvalidSampleWeights);
        }
        self.fit_inner(domain, values, Some(sample_weights))
    }

    fn fit_inner(
        &self,
        domain: &[Complex64],
        values: &[Complex64],
        sample_weights: Option<&[f64]>,
    ) -> Result<FitResult, FitError> {
        let n = domain.len();
        if values.len() != n {
            return Err(FitError::DimensionMismatch(
                "domain and values must have the same length",
            ));
        }
        if n == 0 {
            return Err(FitError::InsufficientSamples {
                samples: 0,
                degree: self.max_degree.unwrap_or(0),
            });
        }
        if let Some(degree) = self.max_degree {
            if n < degree {
                return Err(FitError::InsufficientSamples { samples: n, degree });
            }
        }

        let f_max = values.iter().map(|f| f.norm()).fold(0.0, f64::max);
        let reltol = self.tolerance * f_max;

        // degree-0 start: the (weighted) mean of the sample values
        let mean = weighted_mean(values, sample_weights);
        let mut approx: Array1<Complex64> = Array1::from_elem(n, mean);

        let mut errors = vec![max_abs_error(values, &approx)];
        let mut diagnostics = Vec::new();

        let worst_of = |approx: &Array1<Complex64>, set: &[usize]| -> usize {
            // ties broken by first occurrence in input order
            let mut best = set[0];
            let mut best_err = abs_or_inf(values[best] - approx[best]);
            for &j in &set[1..] {
                let e = abs_or_inf(values[j] - approx[j]);
                if e > best_err {
                    best_err = e;
                    best = j;
                }
            }
            best
        };

        if errors[0] <= reltol {
            // already good enough: return a single-node representation
            let jj = worst_of(&approx, &(0..n).collect::<Vec<_>>());
            return Ok(FitResult {
                rational: single_node(domain[jj], values[jj])?,
                errors,
                diagnostics,
                stop: StopReason::Converged,
            });
        }

        let max_nodes = self
            .max_degree
            .map(|d| d + 1)
            .unwrap_or(DEFAULT_MAX_NODES)
            .min(n);

        let mut candidates: Vec<usize> = (0..n).collect();
        let mut nodes: Vec<Complex64> = Vec::new();
        let mut node_values: Vec<Complex64> = Vec::new();
        let mut snapshots: Vec<BarycentricRational> = Vec::new();

        let mut stop = StopReason::MaxDegree;
        let mut best_err = errors[0];
        let mut stale = 0usize;

        while nodes.len() < max_nodes {
            // starvation guard: after promoting one candidate, the solve
            // must keep at least as many rows as support columns
            if candidates.len() < nodes.len() + 2 {
                stop = StopReason::Starved;
                break;
            }

            let jj = worst_of(&approx, &candidates);
            nodes.push(domain[jj]);
            node_values.push(values[jj]);
            // retire the selected point and any exact duplicates of it, so
            // a physical point is never picked twice and no Loewner row
            // ever divides by zero
            candidates.retain(|&j| j != jj && domain[j] != domain[jj]);

            let a = loewner_matrix(domain, values, &candidates, &nodes, &node_values, sample_weights);
            let nv = linalg::nullspace_vector(&a)?;
            let gap = nv.relative_gap();
            if gap < SINGULAR_GAP_RTOL {
                diagnostics.push(Diagnostic::IllConditionedSolve {
                    degree: nodes.len() - 1,
                    gap,
                });
            }

            let r = BarycentricRational::new(
                Array1::from_vec(nodes.clone()),
                Array1::from_vec(node_values.clone()),
                nv.vector,
            )?;
            for (i, &x) in domain.iter().enumerate() {
                approx[i] = r.eval(x)?;
            }
            let err = max_abs_error(values, &approx);
            errors.push(err);
            snapshots.push(r);

            if err <= reltol {
                stop = StopReason::Converged;
                break;
            }
            if err >= best_err {
                stale += 1;
                if stale >= self.stagnation_window {
                    stop = StopReason::Stagnation;
                    break;
                }
            } else {
                best_err = err;
                stale = 0;
            }
        }

        // the best snapshot by minimum error wins, not necessarily the last
        let rational = match best_snapshot(snapshots, &errors[1..]) {
            Some(r) => r,
            None => {
                // loop never ran (e.g. a single sample point)
                let jj = worst_of(&approx, &(0..n).collect::<Vec<_>>());
                single_node(domain[jj], values[jj])?
            }
        };

        let rational = match self.cleanup_tolerance {
            Some(tol) => {
                let (cleaned, removed) =
                    remove_froissart_doublets(&rational, domain, values, sample_weights, tol)?;
                if removed > 0 {
                    diagnostics.push(Diagnostic::FroissartDoublets { removed });
                }
                cleaned
            }
            None => rational,
        };

        Ok(FitResult {
            rational,
            errors,
            diagnostics,
            stop,
        })
    }
}

/// Fit with default options; see [`Aaa`].
pub fn aaa(domain: &[Complex64], values: &[Complex64]) -> Result<FitResult, FitError> {
    Aaa::new().fit(domain, values)
}

/// Fit real samples with default options.
pub fn aaa_real(domain: &[f64], values: &[f64]) -> Result<FitResult, FitError> {
    let z: Vec<Complex64> = domain.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    let f: Vec<Complex64> = values.iter().map(|&y| Complex64::new(y, 0.0)).collect();
    Aaa::new().fit(&z, &f)
}

/// Loewner matrix of the linearized interpolation condition: row `i` for
/// each candidate sample, column `j` for each support node, entry
/// `gamma_i (F_i - f_j) / (Z_i - z_j)`. Its nullspace vector is the weight
/// vector minimizing the linearized residual over the candidates.
pub(crate) fn loewner_matrix(
    domain: &[Complex64],
    values: &[Complex64],
    candidates: &[usize],
    nodes: &[Complex64],
    node_values: &[Complex64],
    sample_weights: Option<&[f64]>,
) -> Array2<Complex64> {
    let mut a = Array2::<Complex64>::zeros((candidates.len(), nodes.len()));
    for (row, &i) in candidates.iter().enumerate() {
        let gamma = sample_weights.map_or(1.0, |g| g[i]);
        for (col, (&zj, &fj)) in nodes.iter().zip(node_values).enumerate() {
            a[[row, col]] = (values[i] - fj) / (domain[i] - zj) * gamma;
        }
    }
    a
}

fn weighted_mean(values: &[Complex64], sample_weights: Option<&[f64]>) -> Complex64 {
    match sample_weights {
        Some(g) => {
            let num: Complex64 = values.iter().zip(g).map(|(&f, &w)| f * w).sum();
            let den: f64 = g.iter().sum();
            num / den
        }
        None => {
            let num: Complex64 = values.iter().sum();
            num / values.len() as f64
        }
    }
}

fn single_node(z: Complex64, f: Complex64) -> Result<BarycentricRational, FitError> {
    BarycentricRational::new(
        Array1::from_vec(vec![z]),
        Array1::from_vec(vec![f]),
        Array1::from_vec(vec![Complex64::new(1.0, 0.0)]),
    )
}

fn abs_or_inf(e: Complex64) -> f64 {
    let a = e.norm();
    if a.is_nan() {
        f64::INFINITY
    } else {
        a
    }
}

fn max_abs_error(values: &[Complex64], approx: &Array1<Complex64>) -> f64 {
    values
        .iter()
        .zip(approx)
        .map(|(&f, &r)| abs_or_inf(f - r))
        .fold(0.0, f64::max)
}

fn best_snapshot(
    snapshots: Vec<BarycentricRational>,
    errors: &[f64],
) -> Option<BarycentricRational> {
    if snapshots.is_empty() {
        return None;
    }
    let mut best = 0;
    for (k, e) in errors.iter().enumerate() {
        if *e < errors[best] {
            best = k;
        }
    }
    snapshots.into_iter().nth(best)
}
