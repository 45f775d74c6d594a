//! Core BarycentricRational struct: construction, evaluation, and the
//! cheap derived queries

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::FitError;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// A rational function in barycentric representation,
///
/// ```text
///           sum_j w_j f_j / (x - z_j)
///  r(x) =  ---------------------------
///           sum_j w_j / (x - z_j)
/// ```
///
/// with support nodes `z_j`, values `f_j` and weights `w_j`. The function
/// interpolates, `r(z_j) = f_j`, at every node with nonzero weight.
///
/// The triple is immutable after construction; a new fit produces a new
/// instance. A constructed value is therefore safe for unsynchronized
/// concurrent reads.
#[derive(Debug, Clone, PartialEq)]
pub struct BarycentricRational {
    pub(crate) nodes: Array1<Complex64>,
    pub(crate) values: Array1<Complex64>,
    pub(crate) weights: Array1<Complex64>,
}

impl BarycentricRational {
    /// Build a rational function from its support triple.
    ///
    /// The three arrays must have equal, nonzero length. Zero weights are
    /// permitted (the corresponding node simply drops out of both sums),
    /// but evaluation of an all-zero weight vector is rejected.
    pub fn new(
        nodes: Array1<Complex64>,
        values: Array1<Complex64>,
        weights: Array1<Complex64>,
    ) -> Result<Self, FitError> {
        if nodes.len() != values.len() || nodes.len() != weights.len() {
            return Err(FitError::DimensionMismatch(
                "nodes, values, and weights must have the same length",
            ));
        }
        if nodes.is_empty() {
            return Err(FitError::DegenerateFit("at least one support node is required"));
        }
        Ok(Self {
            nodes,
            values,
            weights,
        })
    }

    /// Convenience constructor for real data.
    pub fn from_real(nodes: &[f64], values: &[f64], weights: &[f64]) -> Result<Self, FitError> {
        let lift = |xs: &[f64]| Array1::from_iter(xs.iter().map(|&x| Complex64::new(x, 0.0)));
        Self::new(lift(nodes), lift(values), lift(weights))
    }

    /// The support nodes.
    pub fn nodes(&self) -> &Array1<Complex64> {
        &self.nodes
    }

    /// The function values at the support nodes.
    pub fn values(&self) -> &Array1<Complex64> {
        &self.values
    }

    /// The barycentric weights.
    pub fn weights(&self) -> &Array1<Complex64> {
        &self.weights
    }

    /// The degree of the rational function: the maximum degree its
    /// numerator and denominator may have, or the node count minus one.
    pub fn degree(&self) -> usize {
        self.nodes.len() - 1
    }

    pub(crate) fn ensure_nondegenerate(&self) -> Result<(), FitError> {
        if self.weights.iter().all(|w| *w == ZERO) {
            return Err(FitError::DegenerateFit("all barycentric weights are zero"));
        }
        Ok(())
    }

    /// Evaluate the rational function at a single point.
    ///
    /// If `x` is bitwise equal to a node with nonzero weight, the stored
    /// value at that node is returned directly: the formula has a removable
    /// 0/0 singularity there. A vanishing denominator anywhere else is a
    /// genuine pole and yields IEEE infinities, not an error.
    pub fn eval(&self, x: Complex64) -> Result<Complex64, FitError> {
        self.ensure_nondegenerate()?;
        Ok(self.eval_unchecked(x))
    }

    /// Evaluate at a real point.
    pub fn eval_real(&self, x: f64) -> Result<Complex64, FitError> {
        self.eval(Complex64::new(x, 0.0))
    }

    /// Evaluate at each point of `xs`. The exact-node substitution is
    /// applied per element, independently.
    pub fn eval_many(&self, xs: &[Complex64]) -> Result<Array1<Complex64>, FitError> {
        self.ensure_nondegenerate()?;
        Ok(Array1::from_iter(xs.iter().map(|&x| self.eval_unchecked(x))))
    }

    pub(crate) fn eval_unchecked(&self, x: Complex64) -> Complex64 {
        let mut num = ZERO;
        let mut den = ZERO;
        for ((&z, &f), &w) in self.nodes.iter().zip(&self.values).zip(&self.weights) {
            if x == z {
                if w != ZERO {
                    return f;
                }
                // zero-weight node: the term vanishes identically
                continue;
            }
            let c = w / (x - z);
            num += c * f;
            den += c;
        }
        if den == ZERO {
            // a pole coincides with the evaluation point; signed per IEEE
            return Complex64::new(num.re / 0.0, num.im / 0.0);
        }
        num / den
    }

    /// The denominator sum of the barycentric quotient.
    pub(crate) fn denominator_at(&self, x: Complex64) -> Complex64 {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&z, &w)| w / (x - z))
            .sum()
    }

    /// The value at infinity, `sum(w f) / sum(w)`.
    pub fn gain(&self) -> Complex64 {
        let num: Complex64 = self.values.iter().zip(&self.weights).map(|(&f, &w)| f * w).sum();
        let den: Complex64 = self.weights.iter().sum();
        num / den
    }

    /// A new function representing the reciprocal `1 / r`.
    pub fn reciprocal(&self) -> Result<Self, FitError> {
        let values = self.values.mapv(|f| 1.0 / f);
        let weights = Array1::from_iter(
            self.weights.iter().zip(&self.values).map(|(&w, &f)| w * f),
        );
        Self::new(self.nodes.clone(), values, weights)
    }

    /// Evaluate the `k`-th derivative at `x` for `k <= 2`, using the
    /// divided-difference formulas of Schneider and Werner.
    ///
    /// Note that the result may carry significant numerical error when `x`
    /// is very close (but not equal) to a node.
    pub fn eval_deriv(&self, x: Complex64, k: usize) -> Result<Complex64, FitError> {
        match k {
            0 => return self.eval(x),
            1 | 2 => {}
            _ => return Err(FitError::Unsupported("derivatives above second order")),
        }
        self.ensure_nondegenerate()?;

        if let Some(i) = self.nodes.iter().position(|&z| z == x) {
            let wi = self.weights[i];
            if wi == ZERO {
                return Err(FitError::DegenerateFit(
                    "derivative at a node with zero weight",
                ));
            }
            let fi = self.values[i];
            let mut acc = ZERO;
            if k == 1 {
                for (j, ((&z, &f), &w)) in
                    self.nodes.iter().zip(&self.values).zip(&self.weights).enumerate()
                {
                    if j != i {
                        acc += w * (f - fi) / (z - x);
                    }
                }
                Ok(-acc / wi)
            } else {
                let d1 = self.eval_deriv(x, 1)?;
                for (j, ((&z, &f), &w)) in
                    self.nodes.iter().zip(&self.values).zip(&self.weights).enumerate()
                {
                    if j != i {
                        let dd1 = (f - fi) / (z - x);
                        acc += w * (dd1 - d1) / (z - x);
                    }
                }
                Ok(-acc / wi * 2.0)
            }
        } else {
            // divided differences with the evaluation point as a repeated node
            let rx = self.eval(x)?;
            let dd = if k == 1 {
                Array1::from_iter(
                    self.nodes
                        .iter()
                        .zip(&self.values)
                        .map(|(&z, &f)| (f - rx) / (z - x)),
                )
            } else {
                let d1 = self.eval_deriv(x, 1)?;
                Array1::from_iter(
                    self.nodes
                        .iter()
                        .zip(&self.values)
                        .map(|(&z, &f)| ((f - rx) / (z - x) - d1) / (z - x)),
                )
            };
            let q = Self {
                nodes: self.nodes.clone(),
                values: dd,
                weights: self.weights.clone(),
            };
            Ok(q.eval(x)? * k as f64)
        }
    }

    /// True degree of the numerator polynomial, via the defect criterion of
    /// Berrut and Mittelmann.
    pub fn numerator_degree(&self, tol: f64) -> usize {
        let n = self.nodes.len() - 1;
        for defect in 0..n {
            let s: Complex64 = self
                .nodes
                .iter()
                .zip(&self.values)
                .zip(&self.weights)
                .map(|((&z, &f), &w)| f * w * z.powu(defect as u32))
                .sum();
            if s.norm() > tol {
                return n - defect;
            }
        }
        0
    }

    /// True degree of the denominator polynomial.
    pub fn denominator_degree(&self, tol: f64) -> usize {
        let n = self.nodes.len() - 1;
        for defect in 0..n {
            let s: Complex64 = self
                .nodes
                .iter()
                .zip(&self.weights)
                .map(|(&z, &w)| w * z.powu(defect as u32))
                .sum();
            if s.norm() > tol {
                return n - defect;
            }
        }
        0
    }
}
