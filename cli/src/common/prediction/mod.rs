//! # StarX Prediction Bridge (`common::prediction`)
//!
//! File: cli/src/common/prediction/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Translates conversational purchase details into a query against the stored
//! price model and formats the answer as a sentence.
//!
//! The user only supplies three values (kms driven, owner count, year). The
//! remaining model inputs (location, fuel type, manufacturer) are fixed
//! `VehicleDefaults` chosen by configuration, not asked of the user.
//!
//! ## Architecture
//!
//! - `mappings`: typed code tables for fuel type, owner and company.
//! - `features`: named feature encoding and reindexing onto the model's columns.
//! - `model`: the `PriceModel`/`ModelSource` boundary and the TOML-backed linear model.
//! - `PredictionBridge` (this file): field casting, encoding, prediction, formatting.
//!
//! ## Examples
//!
//! ```rust
//! let bridge = PredictionBridge::new(Arc::new(CachedModel::new("models/linear_model.toml")));
//! let price = bridge.quote_fields("40000", "1", "2015")?;
//! println!("{}", format_quote(price));
//! ```
//!
use crate::core::error::{Result, StarxError};
use std::sync::Arc;
use tracing::debug;

pub mod features;
pub mod mappings;
pub mod model;

pub use features::{FeatureRow, QuoteRequest};
pub use mappings::{Company, FuelType, OwnerType};
pub use model::{CachedModel, LinearModel, ModelSource, PriceModel};

/// Currency symbol used in quotes.
pub const CURRENCY: &str = "₹";

/// # Implicit Vehicle Fields (`VehicleDefaults`)
///
/// The model inputs the assistant fills in on the user's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleDefaults {
    pub location: u32,
    pub fuel_type: FuelType,
    pub company: Company,
}

impl Default for VehicleDefaults {
    fn default() -> Self {
        Self {
            location: 2,
            fuel_type: FuelType::Petrol,
            company: Company::Honda,
        }
    }
}

/// # Prediction Bridge (`PredictionBridge`)
#[derive(Clone)]
pub struct PredictionBridge {
    source: Arc<dyn ModelSource>,
    defaults: VehicleDefaults,
}

impl std::fmt::Debug for PredictionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionBridge")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl PredictionBridge {
    pub fn new(source: Arc<dyn ModelSource>) -> Self {
        Self::with_defaults(source, VehicleDefaults::default())
    }

    pub fn with_defaults(source: Arc<dyn ModelSource>, defaults: VehicleDefaults) -> Self {
        Self { source, defaults }
    }

    pub fn defaults(&self) -> VehicleDefaults {
        self.defaults
    }

    /// # Build Request From Chat Fields (`request_from_fields`)
    ///
    /// Casts the three user-supplied strings and combines them with the
    /// configured defaults.
    ///
    /// ## Errors
    ///
    /// `StarxError::InvalidInput` if kms driven is not a non-negative number,
    /// the owner count is not 1–3, or the year is not an integer.
    pub fn request_from_fields(
        &self,
        kms_driven: &str,
        owners: &str,
        year: &str,
    ) -> std::result::Result<QuoteRequest, StarxError> {
        let kms = kms_driven.trim();
        let kms_driven = kms
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| {
                StarxError::InvalidInput(format!("kms driven '{}' is not a distance", kms))
            })?;
        let owner = owners.parse::<OwnerType>()?;
        let year = year.trim().parse::<i32>().map_err(|_| {
            StarxError::InvalidInput(format!("year '{}' is not a whole number", year.trim()))
        })?;

        Ok(QuoteRequest {
            location: self.defaults.location,
            kms_driven,
            fuel_type: self.defaults.fuel_type,
            owner,
            year,
            company: self.defaults.company,
        })
    }

    /// Encodes `request` and reindexes it onto the model's columns.
    pub fn feature_vector(&self, request: &QuoteRequest) -> Result<(Vec<String>, Vec<f64>)> {
        let model = self.source.model()?;
        let names = model.feature_names().to_vec();
        let row = FeatureRow::encode(request).reindex(&names);
        Ok((names, row))
    }

    /// # Predict Price (`predict`)
    pub fn predict(&self, request: &QuoteRequest) -> Result<f64> {
        let model = self.source.model()?;
        let row = FeatureRow::encode(request).reindex(model.feature_names());
        debug!("Predicting price for {:?} with row {:?}", request, row);
        model.predict(&row)
    }

    /// Loads the model now rather than on the first quote.
    pub fn warm_up(&self) -> Result<()> {
        self.source.model().map(|_| ())
    }

    /// Casts the chat fields and predicts in one step.
    pub fn quote_fields(&self, kms_driven: &str, owners: &str, year: &str) -> Result<f64> {
        let request = self.request_from_fields(kms_driven, owners, year)?;
        self.predict(&request)
    }
}

/// # Format Price (`format_price`)
///
/// Currency-labelled amount with thousands separators and two decimals,
/// e.g. `₹1,234,567.89`. Negative predictions keep their sign in front.
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" is just zero.
    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", sign, CURRENCY, grouped, fraction)
}

/// The sentence the assistant answers a successful quote with.
pub fn format_quote(price: f64) -> String {
    format!(
        "This car will cost {}. Your order has been sent!",
        format_price(price)
    )
}
