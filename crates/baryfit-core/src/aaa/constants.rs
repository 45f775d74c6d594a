//! Constants for the AAA fitter
//!
//! Centralizes the tuning parameters so they are adjusted in one place.

/// Default relative approximation tolerance, scaled by the maximum sample
/// magnitude before use.
pub const DEFAULT_TOLERANCE: f64 = 1e-13;

/// Default cap on the number of support nodes when no maximum degree is
/// requested.
pub const DEFAULT_MAX_NODES: usize = 100;

/// Consecutive non-improving iterations tolerated before the fit is
/// declared stagnant (the numerical noise floor has been reached).
pub const DEFAULT_STAGNATION_WINDOW: usize = 5;

/// Default iteration count for the Lawson reweighting pass.
pub const DEFAULT_LAWSON_ITERATIONS: usize = 10;

/// Relative singular-value gap below which a weight solve is flagged as
/// ill-conditioned.
pub const SINGULAR_GAP_RTOL: f64 = 1e-12;
