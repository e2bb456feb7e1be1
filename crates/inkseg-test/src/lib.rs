//! inkseg-test - Regression test framework for inkseg
//!
//! Every `tests/*_reg.rs` file in the workspace drives a [`RegParams`]:
//! each check bumps an index, failures are collected, and
//! [`RegParams::cleanup`] reports the verdict. Three modes are
//! supported:
//!
//! - **Generate**: write golden files for later comparison
//! - **Compare**: compare results with golden files (default)
//! - **Display**: run checks without golden comparison
//!
//! # Usage
//!
//! ```ignore
//! use inkseg_test::RegParams;
//!
//! let mut rp = RegParams::new("repair");
//! rp.compare_values(1.0, filled.count() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // inkseg-test is at crates/inkseg-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
