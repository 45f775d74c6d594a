//! Linear algebra operations
//!
//! This module provides a unified interface for the matrix decompositions
//! the crate needs: nullspace vectors via SVD and finite eigenvalues of a
//! matrix pencil. Currently uses nalgebra as the backend, but the API is
//! designed to allow swapping the backend without changing callers.
//!
//! The key benefit: all ndarray<->nalgebra conversions are contained here,
//! eliminating scattered conversion code throughout the codebase.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::FitError;

/// Relative threshold below which a shift-inverted eigenvalue is treated as
/// an infinite eigenvalue of the pencil and discarded.
const INFINITE_EIGENVALUE_RTOL: f64 = 1e-13;

/// Maximum Schur iterations before an eigenvalue solve is declared failed.
const SCHUR_MAX_ITER: usize = 10_000;

/// Maximum SVD iterations before a nullspace solve is declared failed.
const SVD_MAX_ITER: usize = 10_000;

/// Deterministic complex shifts tried in order by the shift-and-invert
/// eigenvalue reduction. Off-axis so that pencils with real spectra never
/// collide with a shift.
const PENCIL_SHIFTS: [(f64, f64); 3] = [(0.4241, 0.7719), (-0.6627, 0.4323), (0.1206, -0.8847)];

/// Result of a nullspace solve: the right singular vector belonging to the
/// smallest singular value, plus the singular spectrum for conditioning
/// checks.
#[derive(Debug, Clone)]
pub struct NullVector {
    pub vector: Array1<Complex64>,
    pub singular_values: Vec<f64>,
}

impl NullVector {
    /// Separation between the two smallest singular values, relative to the
    /// largest. A vanishing gap means the null direction is not uniquely
    /// determined and the vector should be treated with suspicion.
    pub fn relative_gap(&self) -> f64 {
        if self.singular_values.len() < 2 {
            return f64::INFINITY;
        }
        let mut sorted = self.singular_values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let largest = sorted[sorted.len() - 1];
        if largest <= 0.0 {
            return 0.0;
        }
        (sorted[1] - sorted[0]) / largest
    }
}

// ============================================================================
// Conversion helpers (internal)
// ============================================================================

/// Convert ndarray Array2<Complex64> to nalgebra DMatrix<Complex<f64>>
#[inline]
fn to_na_complex(a: &Array2<Complex64>) -> DMatrix<nalgebra::Complex<f64>> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| {
        nalgebra::Complex::new(a[[i, j]].re, a[[i, j]].im)
    })
}

// ============================================================================
// Nullspace vector via SVD
// ============================================================================

/// Return the right singular vector of `a` for its smallest singular value.
///
/// This is the weight vector minimizing |A w| over unit vectors, computed
/// with an SVD rather than normal equations because the matrix can be badly
/// conditioned near convergence of a fit.
///
/// Edge cases:
/// - a matrix with zero rows constrains nothing; the first canonical basis
///   vector is returned (some LAPACK implementations also reject size-0
///   inputs outright);
/// - a matrix with fewer rows than columns is padded with zero rows to
///   square, since the thin right factor would not span the nullspace.
pub fn nullspace_vector(a: &Array2<Complex64>) -> Result<NullVector, FitError> {
    let (m, n) = a.dim();
    if n == 0 {
        return Err(FitError::SolveFailed("nullspace of a matrix with no columns"));
    }
    if m == 0 {
        let mut vector = Array1::<Complex64>::zeros(n);
        vector[0] = Complex64::new(1.0, 0.0);
        return Ok(NullVector {
            vector,
            singular_values: Vec::new(),
        });
    }

    let rows = m.max(n);
    let mat = DMatrix::from_fn(rows, n, |i, j| {
        if i < m {
            nalgebra::Complex::new(a[[i, j]].re, a[[i, j]].im)
        } else {
            nalgebra::Complex::new(0.0, 0.0)
        }
    });

    let svd = mat
        .try_svd(false, true, f64::EPSILON, SVD_MAX_ITER)
        .ok_or(FitError::SolveFailed("singular value decomposition did not converge"))?;
    let v_t = svd
        .v_t
        .ok_or(FitError::SolveFailed("SVD did not produce a right factor"))?;
    let singular_values: Vec<f64> = svd.singular_values.iter().cloned().collect();

    // Do not rely on the backend's ordering of singular values.
    let mut min_idx = 0;
    for (k, sv) in singular_values.iter().enumerate() {
        if *sv < singular_values[min_idx] {
            min_idx = k;
        }
    }

    let vector = Array1::from_shape_fn(n, |j| {
        let e = v_t[(min_idx, j)];
        Complex64::new(e.re, -e.im)
    });

    Ok(NullVector {
        vector,
        singular_values,
    })
}

// ============================================================================
// Generalized eigenvalues of a pencil
// ============================================================================

/// Compute the finite generalized eigenvalues of the pencil (E, B), i.e.
/// the values `lambda` with `det(E - lambda B) = 0`, discarding infinite
/// eigenvalues caused by a singular B.
///
/// The pencil is reduced to a standard eigenvalue problem by shift and
/// invert: the eigenvalues `mu` of `(E - sigma B)^-1 B` satisfy
/// `mu = 1 / (lambda - sigma)`, so infinite eigenvalues map to `mu = 0` and
/// are dropped by a relative threshold. If a shift happens to sit on an
/// eigenvalue of the pencil, the next deterministic shift is tried.
pub fn generalized_eigenvalues(
    e: &Array2<Complex64>,
    b: &Array2<Complex64>,
) -> Result<Vec<Complex64>, FitError> {
    let (m, n) = e.dim();
    if m != n || b.dim() != (m, n) {
        return Err(FitError::DimensionMismatch(
            "pencil matrices must be square and of equal size",
        ));
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let scale = e
        .iter()
        .chain(b.iter())
        .map(|c| c.norm())
        .fold(0.0, f64::max)
        .max(1.0);
    let b_na = to_na_complex(b);

    for (re, im) in PENCIL_SHIFTS {
        let sigma = Complex64::new(re, im) * scale;
        let shifted = DMatrix::from_fn(n, n, |i, j| {
            let v = e[[i, j]] - sigma * b[[i, j]];
            nalgebra::Complex::new(v.re, v.im)
        });

        let lu = shifted.lu();
        let t = match lu.solve(&b_na) {
            Some(t) => t,
            None => continue,
        };
        if t.iter().any(|c| !c.is_finite()) {
            continue;
        }

        let schur = match t.try_schur(f64::EPSILON, SCHUR_MAX_ITER) {
            Some(s) => s,
            None => continue,
        };
        let mu = match schur.eigenvalues() {
            Some(mu) => mu,
            None => continue,
        };

        let mu_max = mu.iter().map(|c| c.norm()).fold(0.0, f64::max);
        if mu_max == 0.0 {
            return Ok(Vec::new());
        }
        let finite = mu
            .iter()
            .filter(|c| c.norm() > INFINITE_EIGENVALUE_RTOL * mu_max)
            .map(|c| {
                let m = Complex64::new(c.re, c.im);
                sigma + 1.0 / m
            })
            .collect();
        return Ok(finite);
    }

    Err(FitError::SolveFailed(
        "eigenvalue iteration did not converge for any shift",
    ))
}
