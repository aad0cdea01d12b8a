//! Statistical tests: stationarity of the input series and diagnostics of
//! model residuals.
//!
//! # Example
//!
//! ```
//! use stock_forecast::validation::{adf_test, ljung_box};
//!
//! let series: Vec<f64> = (0..120)
//!     .map(|i| ((i * 37 + 11) % 101) as f64 / 50.0 - 1.0)
//!     .collect();
//! let adf = adf_test(&series, None).unwrap();
//! println!("ADF p-value: {:.4}", adf.p_value);
//!
//! let lb = ljung_box(&series, Some(10), 0);
//! println!("Ljung-Box Q: {:.2}", lb.statistic);
//! ```

pub mod stationarity;

pub use residual_tests::{jarque_bera, ljung_box, JarqueBeraResult, LjungBoxResult};
pub use stationarity::{adf_test, AdfResult, CriticalValues, DEFAULT_SIGNIFICANCE};
