//! Numerical utilities shared by the statistical tests and models.

pub mod ols;
pub mod optimization;
pub mod stats;

pub use ols::{ols_fit, OlsFit};
pub use optimization::{nelder_mead, numerical_hessian, NelderMeadConfig, NelderMeadResult};
pub use stats::{chi_squared_sf, normal_cdf, quantile_normal};
