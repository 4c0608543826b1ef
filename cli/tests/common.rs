//! # StarX CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `starx` binary inside a temporary directory with `HOME` and
//! `XDG_CONFIG_HOME` pointed there too, so no real user or project
//! configuration leaks into the run.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// A small model whose quote for 40000 km, 1 owner, 2015 with the default
/// vehicle fields is exactly ₹90,000.00.
pub const TEST_MODEL: &str = r#"
intercept = -1900000.0
feature_names = ["Kms_driven", "Fuel_type", "Owner", "Year", "Company", "Location_2"]
coefficients  = [-0.5, 0.0, -10000.0, 1000.0, 0.0, 5000.0]
"#;

/// # Get StarX Command (`starx_cmd`)
///
/// ## Panics
/// Panics if the `starx` binary cannot be found via `Command::cargo_bin`.
pub fn starx_cmd() -> Command {
    Command::cargo_bin("starx").expect("Failed to find starx binary for testing")
}

/// `starx` running in `dir`, isolated from the real configuration.
pub fn starx_in(dir: &Path) -> Command {
    let mut cmd = starx_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `TEST_MODEL` into `dir` and returns its path.
pub fn write_test_model(dir: &Path) -> PathBuf {
    let path = dir.join("model.toml");
    fs::write(&path, TEST_MODEL).expect("Failed to write test model");
    path
}

/// The model artifact shipped with the repository.
pub fn shipped_model() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../models/linear_model.toml")
}
