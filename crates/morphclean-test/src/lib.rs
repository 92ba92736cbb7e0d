//! morphclean-test - Regression test framework for morphclean
//!
//! Regression tests run in one of three modes:
//!
//! - **Generate**: write golden files for later comparison
//! - **Compare**: compare results with golden files (default)
//! - **Display**: run without comparing, for visual inspection of the
//!   files left in the regout directory
//!
//! # Usage
//!
//! ```ignore
//! use morphclean_test::RegParams;
//!
//! let mut rp = RegParams::new("conncomp");
//! rp.compare_values(2.0, areas.len() as f64, 0.0);
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
    // morphclean-test is at crates/morphclean-test
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
