//! Barycentric rational function representation
//!
//! A rational function is stored as interpolation nodes, values at the
//! nodes, and one weight per node. The representation avoids explicit
//! polynomial coefficients, which is what makes it numerically robust for
//! functions with poles or steep gradients.

mod core;
mod roots;

pub use core::BarycentricRational;
