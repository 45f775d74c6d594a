//! Adaptive greedy rational approximation (AAA)
//!
//! Implements the AAA algorithm for discovering barycentric support nodes
//! and weights from sample data, plus a Froissart-doublet cleanup pass and
//! a Lawson reweighting pass toward a minimax fit.
//!
//! # References
//!
//! - Y. Nakatsukasa, O. Sète, L. N. Trefethen, "The AAA Algorithm for
//!   Rational Approximation", SIAM J. Sci. Comput. 40:3, 2018
//! - Y. Nakatsukasa, L. N. Trefethen, "An Algorithm for Real and Complex
//!   Rational Minimax Approximation", SIAM J. Sci. Comput. 42:5, 2020

mod cleanup;
pub mod constants;
mod fitter;
mod lawson;

pub use fitter::{aaa, aaa_real, Aaa, Diagnostic, FitResult, StopReason};
pub use lawson::{lawson_refine, lawson_refine_weighted, LawsonResult};
