//! Froissart doublet removal
//!
//! Overfitting noisy data can produce spurious near-canceling pole/node
//! pairs. A pole lying within the cleanup tolerance of a support node
//! removes that node; a single weight re-solve over the remaining nodes
//! then rebuilds the approximant.

use ndarray::Array1;
use num_complex::Complex64;

use super::fitter::loewner_matrix;
use crate::barycentric::BarycentricRational;
use crate::error::FitError;
use crate::math::linalg;

/// Remove support nodes participating in Froissart doublets and re-solve
/// the weights once. Returns the (possibly unchanged) approximant and the
/// number of nodes removed.
///
/// The pass is a no-op when no pole sits within `tol` of a node, when
/// removal would empty the support, or when too few candidate samples
/// remain to re-solve.
pub(crate) fn remove_froissart_doublets(
    r: &BarycentricRational,
    domain: &[Complex64],
    values: &[Complex64],
    sample_weights: Option<&[f64]>,
    tol: f64,
) -> Result<(BarycentricRational, usize), FitError> {
    let poles = r.poles()?;
    let node_count = r.nodes().len();

    let mut keep = vec![true; node_count];
    for p in &poles {
        let mut nearest = 0;
        let mut nearest_dist = f64::INFINITY;
        for (j, &z) in r.nodes().iter().enumerate() {
            let d = (*p - z).norm();
            if d < nearest_dist {
                nearest_dist = d;
                nearest = j;
            }
        }
        if nearest_dist < tol {
            keep[nearest] = false;
        }
    }

    let removed = keep.iter().filter(|k| !**k).count();
    if removed == 0 || removed == node_count {
        return Ok((r.clone(), 0));
    }

    let nodes: Vec<Complex64> = r
        .nodes()
        .iter()
        .zip(&keep)
        .filter_map(|(&z, &k)| k.then_some(z))
        .collect();
    let node_values: Vec<Complex64> = r
        .values()
        .iter()
        .zip(&keep)
        .filter_map(|(&f, &k)| k.then_some(f))
        .collect();

    let candidates: Vec<usize> = (0..domain.len())
        .filter(|&i| nodes.iter().all(|&z| domain[i] != z))
        .collect();
    if candidates.len() < nodes.len() {
        return Ok((r.clone(), 0));
    }

    let a = loewner_matrix(domain, values, &candidates, &nodes, &node_values, sample_weights);
    let nv = linalg::nullspace_vector(&a)?;
    let cleaned = BarycentricRational::new(
        Array1::from_vec(nodes),
        Array1::from_vec(node_values),
        nv.vector,
    )?;
    Ok((cleaned, removed))
}
