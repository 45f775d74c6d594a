//! Pole, residue, and zero extraction
//!
//! Poles and zeros are the finite generalized eigenvalues of an
//! (n+1)x(n+1) arrow pencil built from the support triple; see
//! P. W. Lawrence, "Fast Reduction of Generalized Companion Matrix Pairs
//! for Barycentric Lagrange Interpolants", SIAM J. Matrix Anal. Appl. 2013.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::core::BarycentricRational;
use crate::error::FitError;
use crate::math::linalg;

/// Relative step for the finite-difference denominator derivative used in
/// residue computation.
const RESIDUE_STEP: f64 = 1e-6;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

impl BarycentricRational {
    /// The poles of the rational function: points where the denominator
    /// vanishes. Support nodes with nonzero weight are removable
    /// singularities, not poles, and never appear in the result.
    pub fn poles(&self) -> Result<Vec<Complex64>, FitError> {
        self.ensure_nondegenerate()?;
        if self.nodes.len() < 2 {
            return Ok(Vec::new());
        }
        let ones = Array1::from_elem(self.nodes.len(), Complex64::new(1.0, 0.0));
        let (e, b) = self.arrow_pencil(&ones);
        let eigenvalues = linalg::generalized_eigenvalues(&e, &b)?;
        Ok(eigenvalues
            .into_iter()
            .filter(|lam| {
                !self
                    .nodes
                    .iter()
                    .zip(&self.weights)
                    .any(|(&z, &w)| *lam == z && w != ZERO)
            })
            .collect())
    }

    /// The zeros of the rational function: roots of the numerator, from the
    /// same pencil with the value column in place of the ones column.
    pub fn zeros(&self) -> Result<Vec<Complex64>, FitError> {
        self.ensure_nondegenerate()?;
        if self.nodes.len() < 2 {
            return Ok(Vec::new());
        }
        let (e, b) = self.arrow_pencil(&self.values);
        linalg::generalized_eigenvalues(&e, &b)
    }

    /// Poles together with their residues.
    ///
    /// Each pole of a barycentric rational function with generic weights is
    /// simple, so the residue is N(p) / D'(p); the denominator derivative
    /// is approximated by a central finite difference at a small complex
    /// displacement from the pole. The off-axis displacement direction
    /// keeps the probe points away from real nodes.
    pub fn poles_and_residues(&self) -> Result<Vec<(Complex64, Complex64)>, FitError> {
        let poles = self.poles()?;
        Ok(poles
            .into_iter()
            .map(|p| (p, self.residue_at(p)))
            .collect())
    }

    /// The residues alone, in the same order as [`BarycentricRational::poles`].
    pub fn residues(&self) -> Result<Vec<Complex64>, FitError> {
        Ok(self
            .poles_and_residues()?
            .into_iter()
            .map(|(_, res)| res)
            .collect())
    }

    fn residue_at(&self, p: Complex64) -> Complex64 {
        let numerator: Complex64 = self
            .nodes
            .iter()
            .zip(&self.values)
            .zip(&self.weights)
            .map(|((&z, &f), &w)| w * f / (p - z))
            .sum();
        let h = RESIDUE_STEP * p.norm().max(1.0);
        let step = Complex64::new(h * std::f64::consts::FRAC_1_SQRT_2, h * std::f64::consts::FRAC_1_SQRT_2);
        let d_plus = self.denominator_at(p + step);
        let d_minus = self.denominator_at(p - step);
        numerator / ((d_plus - d_minus) / (step * 2.0))
    }

    /// Companion-style pencil: an arrow matrix with the nodes on the
    /// diagonal, the weights in the first row and `col` in the first
    /// column, against a mass matrix whose first diagonal entry is zero.
    /// The zeroed entry is what pushes the two spurious eigenvalues to
    /// infinity, where the eigenvalue solve discards them.
    fn arrow_pencil(&self, col: &Array1<Complex64>) -> (Array2<Complex64>, Array2<Complex64>) {
        let m = self.nodes.len();
        let mut e = Array2::<Complex64>::zeros((m + 1, m + 1));
        let mut b = Array2::<Complex64>::zeros((m + 1, m + 1));
        for j in 0..m {
            e[[0, j + 1]] = self.weights[j];
            e[[j + 1, 0]] = col[j];
            e[[j + 1, j + 1]] = self.nodes[j];
            b[[j + 1, j + 1]] = Complex64::new(1.0, 0.0);
        }
        (e, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    /// Exactly 1/(x - 0.5): pole at 0.5 with residue 1, no zeros.
    fn simple_pole_fn() -> BarycentricRational {
        BarycentricRational::from_real(&[0.0, 1.0], &[-2.0, 2.0], &[1.0, 1.0]).unwrap()
    }

    /// Exactly r(x) = x: one zero at the origin, no finite poles.
    fn identity_fn() -> BarycentricRational {
        BarycentricRational::from_real(&[0.0, 1.0], &[0.0, 1.0], &[1.0, -1.0]).unwrap()
    }

    #[test]
    fn test_poles_of_simple_pole() {
        let poles = simple_pole_fn().poles().unwrap();
        assert_eq!(poles.len(), 1);
        assert_relative_eq!(poles[0].re, 0.5, epsilon = 1e-8);
        assert_relative_eq!(poles[0].im, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_residue_of_simple_pole() {
        let pr = simple_pole_fn().poles_and_residues().unwrap();
        assert_eq!(pr.len(), 1);
        assert_relative_eq!(pr[0].1.re, 1.0, epsilon = 1e-5);
        assert_relative_eq!(pr[0].1.im, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_identity_has_no_poles() {
        // denominator of the (1, -1) weight pair is constant
        assert!(identity_fn().poles().unwrap().is_empty());
    }

    #[test]
    fn test_zeros_of_identity() {
        let zeros = identity_fn().zeros().unwrap();
        assert_eq!(zeros.len(), 1);
        assert_relative_eq!(zeros[0].norm(), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_simple_pole_has_no_zeros() {
        assert!(simple_pole_fn().zeros().unwrap().is_empty());
    }

    #[test]
    fn test_single_node_has_empty_sets() {
        let r = BarycentricRational::from_real(&[1.0], &[3.0], &[1.0]).unwrap();
        assert!(r.poles().unwrap().is_empty());
        assert!(r.zeros().unwrap().is_empty());
        assert!(r.residues().unwrap().is_empty());
    }

    #[test]
    fn test_poles_exclude_weighted_nodes() {
        let r = BarycentricRational::from_real(
            &[0.0, 1.0, 2.0, 3.0],
            &[1.0, -1.0, 1.0, -1.0],
            &[1.0, 2.0, -1.5, 0.5],
        )
        .unwrap();
        let poles = r.poles().unwrap();
        for p in poles {
            for (&z, &w) in r.nodes().iter().zip(r.weights()) {
                if w != c(0.0) {
                    assert!(p != z);
                }
            }
        }
    }
}
