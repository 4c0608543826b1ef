//! # Stored Price Model
//!
//! File: cli/src/common/prediction/model.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The boundary between the assistant and the pre-trained regression model.
//! Fitting is done elsewhere; this module only loads the exported artifact and
//! evaluates it.
//!
//! ## Architecture
//!
//! - `PriceModel`: anything that declares its input columns and maps a dense
//!   row to a price.
//! - `ModelSource`: something that can hand out a `PriceModel`, possibly
//!   loading it on first use.
//! - `LinearModel`: `intercept + Σ coefficient × feature`, deserialized from TOML.
//! - `CachedModel`: loads a `LinearModel` from disk on first use and keeps it
//!   for the rest of the process. A failed load is not cached.
//!
//! ## Artifact format
//!
//! ```toml
//! intercept = -1900000.0
//! feature_names = ["Kms_driven", "Fuel_type", "Owner", "Year", "Company", "Location_2"]
//! coefficients  = [-0.5, 0.0, -10000.0, 1000.0, 0.0, 5000.0]
//! ```
//!
use crate::core::error::{Result, StarxError};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// A trained model that maps a dense feature row to a price.
pub trait PriceModel: Send + Sync {
    /// Column names, in the order `predict` expects its row.
    fn feature_names(&self) -> &[String];

    fn predict(&self, row: &[f64]) -> Result<f64>;
}

/// Provides access to a `PriceModel`, loading it if necessary.
pub trait ModelSource: Send + Sync {
    fn model(&self) -> Result<&dyn PriceModel>;
}

/// # Linear Regression Model (`LinearModel`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearModel {
    intercept: f64,
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
}

impl LinearModel {
    /// Builds a model, checking that names and coefficients line up.
    pub fn new(intercept: f64, feature_names: Vec<String>, coefficients: Vec<f64>) -> Result<Self> {
        let model = Self {
            intercept,
            feature_names,
            coefficients,
        };
        model.check_shape().map_err(StarxError::Prediction)?;
        Ok(model)
    }

    /// # Load Model Artifact (`load`)
    ///
    /// Reads and validates a TOML model artifact.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for this
    /// shape, or declares mismatched/empty feature and coefficient lists.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading price model from: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
        let model: LinearModel = toml::from_str(&content)
            .with_context(|| format!("Failed to parse model artifact: {}", path.display()))?;
        model
            .check_shape()
            .map_err(|reason| StarxError::ModelArtifact {
                path: path.to_path_buf(),
                reason,
            })?;
        debug!(
            "Loaded model with {} features: {:?}",
            model.feature_names.len(),
            model.feature_names
        );
        Ok(model)
    }

    fn check_shape(&self) -> std::result::Result<(), String> {
        if self.feature_names.is_empty() {
            return Err("model declares no features".to_string());
        }
        if self.feature_names.len() != self.coefficients.len() {
            return Err(format!(
                "{} feature names but {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("intercept and coefficients must be finite".to_string());
        }
        Ok(())
    }
}

impl PriceModel for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(StarxError::Prediction(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                row.len()
            ))
            .into());
        }
        let price = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(coef, value)| coef * value)
                .sum::<f64>();
        if !price.is_finite() {
            return Err(StarxError::Prediction("model produced a non-finite price".into()).into());
        }
        Ok(price)
    }
}

/// An already-loaded model is its own source.
impl ModelSource for LinearModel {
    fn model(&self) -> Result<&dyn PriceModel> {
        Ok(self)
    }
}

/// # Lazily Loaded Model (`CachedModel`)
///
/// Load-once, read-many wrapper around a model artifact on disk.
#[derive(Debug)]
pub struct CachedModel {
    path: PathBuf,
    loaded: OnceLock<LinearModel>,
}

impl CachedModel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: OnceLock::new(),
        }
    }

    #[cfg(test)]
    fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}

impl ModelSource for CachedModel {
    fn model(&self) -> Result<&dyn PriceModel> {
        if let Some(model) = self.loaded.get() {
            return Ok(model);
        }
        let model = LinearModel::load(&self.path)?;
        // A concurrent first load may have won; either copy is identical.
        Ok(self.loaded.get_or_init(|| model))
    }
}
