//! # Feature Encoding
//!
//! File: cli/src/common/prediction/features.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns a `QuoteRequest` into the exact column layout the stored model was
//! fit against.
//!
//! The model was trained on a dummy-encoded table: numeric columns keep their
//! names (`Kms_driven`, `Fuel_type`, `Owner`, `Year`, `Company`) and the
//! location category expands into one `Location_<code>` indicator column per
//! category, with the first category dropped as the reference. Encoding a
//! single request therefore produces a *named* row, which is then reindexed
//! onto the model's declared column list: unknown columns are dropped and
//! missing columns are filled with `0.0` (which is how the reference category
//! ends up as all-zero indicators).
//!
use super::mappings::{Company, FuelType, OwnerType};
use tracing::debug;

/// # Quote Request (`QuoteRequest`)
///
/// A fully typed set of vehicle fields ready to be encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteRequest {
    pub location: u32,
    pub kms_driven: f64,
    pub fuel_type: FuelType,
    pub owner: OwnerType,
    pub year: i32,
    pub company: Company,
}

/// # Named Feature Row (`FeatureRow`)
///
/// Ordered `(column, value)` pairs before reindexing.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(String, f64)>,
}

impl FeatureRow {
    /// Encodes a request into named columns.
    pub fn encode(request: &QuoteRequest) -> Self {
        let columns = vec![
            ("Kms_driven".to_string(), request.kms_driven),
            ("Fuel_type".to_string(), f64::from(request.fuel_type.code())),
            ("Owner".to_string(), f64::from(request.owner.code())),
            ("Year".to_string(), f64::from(request.year)),
            ("Company".to_string(), f64::from(request.company.code())),
            (location_column(request.location), 1.0),
        ];
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }

    /// # Reindex (`reindex`)
    ///
    /// Produces a dense vector in the order of `feature_names`, filling columns
    /// this row does not carry with `0.0`. Columns not present in
    /// `feature_names` are dropped.
    pub fn reindex(&self, feature_names: &[String]) -> Vec<f64> {
        for (column, _) in &self.columns {
            if !feature_names.iter().any(|name| name == column) {
                debug!("Dropping feature column '{}' unknown to the model", column);
            }
        }
        feature_names
            .iter()
            .map(|name| self.get(name).unwrap_or(0.0))
            .collect()
    }
}

/// Name of the indicator column for a location category.
pub fn location_column(location: u32) -> String {
    format!("Location_{}", location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest {
            location: 2,
            kms_driven: 40_000.0,
            fuel_type: FuelType::Petrol,
            owner: OwnerType::First,
            year: 2015,
            company: Company::Honda,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn encode_produces_named_columns_in_model_order() {
        let row = FeatureRow::encode(&request());
        let columns: Vec<&str> = row.columns.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(
            columns,
            vec!["Kms_driven", "Fuel_type", "Owner", "Year", "Company", "Location_2"]
        );
        assert_eq!(row.get("Company"), Some(3.0));
        assert_eq!(row.get("Year"), Some(2015.0));
    }

    #[test]
    fn reindex_fills_missing_columns_with_zero() {
        let row = FeatureRow::encode(&request());
        let dense = row.reindex(&names(&["Year", "Location_3", "Kms_driven", "Location_2"]));
        assert_eq!(dense, vec![2015.0, 0.0, 40_000.0, 1.0]);
    }

    #[test]
    fn reindex_drops_columns_unknown_to_model() {
        let row = FeatureRow::encode(&request());
        // Location 2 is the dropped reference category for this model.
        let dense = row.reindex(&names(&["Owner", "Location_3"]));
        assert_eq!(dense, vec![1.0, 0.0]);
    }
}
