//! Numerical support module
//!
//! Contains the linear algebra layer used by the barycentric representation
//! and the AAA fitter.

pub mod linalg;
