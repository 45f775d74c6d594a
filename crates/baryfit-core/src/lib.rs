//! baryfit-core: Barycentric rational approximation
//!
//! Computes compact, numerically stable rational approximations of
//! sampled real- or complex-valued functions using the barycentric
//! representation and the adaptive AAA fitting algorithm.
//!
//! ## Modules
//!
//! - `barycentric` - Rational functions in barycentric form: evaluation,
//!   poles, residues, zeros
//! - `aaa` - Greedy AAA fitter, Froissart cleanup, Lawson reweighting
//! - `math` - Linear algebra layer (SVD nullspace, pencil eigenvalues)
//! - `error` - Shared error type

pub mod aaa;
pub mod barycentric;
pub mod error;
pub mod math;

pub use aaa::{aaa, aaa_real, Aaa, FitResult};
pub use barycentric::BarycentricRational;
pub use error::FitError;
