//! # StarX Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout the StarX application.
//! The dialogue agent never lets these escape a conversation turn: it converts
//! them into user-facing replies. The command surfaces (`deals`, `predict`,
//! `srv`) propagate them up to `main`, which prints them and exits non-zero.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `StarxError`: A custom error enum using `thiserror` for specific error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error kinds cover:
//! - Configuration errors
//! - Conversational input that cannot be interpreted
//! - Model artifact loading and prediction failures
//! - Chat page template errors
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error kind
//! if parts.len() != 2 {
//!     return Err(StarxError::InvalidInput(format!("expected MIN-MAX, got '{}'", raw)));
//! }
//!
//! // Check for a specific kind after propagation through anyhow
//! let is_input_problem = err
//!     .downcast_ref::<StarxError>()
//!     .is_some_and(|e| matches!(e, StarxError::InvalidInput(_)));
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the StarX application.
#[derive(Error, Debug)]
pub enum StarxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input cannot be empty.")]
    EmptyInput,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model artifact '{}' is invalid: {reason}", path.display())]
    ModelArtifact { path: PathBuf, reason: String },

    #[error("Price prediction failed: {0}")]
    Prediction(String),

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = StarxError::Config("Missing setting 'foo'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'foo'"
        );

        assert_eq!(StarxError::EmptyInput.to_string(), "Input cannot be empty.");

        let artifact = StarxError::ModelArtifact {
            path: PathBuf::from("models/linear_model.toml"),
            reason: "no features".into(),
        };
        assert_eq!(
            artifact.to_string(),
            "Model artifact 'models/linear_model.toml' is invalid: no features"
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = StarxError::InvalidInput("year 'abc'".into()).into();
        assert!(err
            .downcast_ref::<StarxError>()
            .is_some_and(|e| matches!(e, StarxError::InvalidInput(_))));
    }
}
