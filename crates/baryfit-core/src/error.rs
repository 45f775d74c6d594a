//! Error types shared across the crate

use thiserror::Error;

/// Errors produced while constructing, querying, or fitting a barycentric
/// rational function.
///
/// Ill-conditioning of an individual least-squares step is deliberately not
/// an error: the greedy fitter must be able to continue through mildly
/// ill-conditioned solves, so those are reported as warning diagnostics on
/// the fit result instead (see [`crate::aaa::Diagnostic`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// The barycentric data cannot represent a function (empty support,
    /// all-zero weight vector, ...).
    #[error("degenerate barycentric data: {0}")]
    DegenerateFit(&'static str),

    /// Input arrays whose lengths must agree do not.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(&'static str),

    /// Fewer sample points than the explicitly requested degree.
    #[error("{samples} sample points cannot support a degree-{degree} fit")]
    InsufficientSamples { samples: usize, degree: usize },

    /// A sample weight was zero, negative, or not finite.
    #[error("sample weights must be finite and strictly positive")]
    InvalidSampleWeights,

    /// A decomposition did not converge; no valid weight vector exists and
    /// the fit cannot proceed.
    #[error("linear solve failed: {0}")]
    SolveFailed(&'static str),

    /// The operation is outside the implemented surface.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
