//! # StarX Listing Catalog (`common::catalog`)
//!
//! File: cli/src/common/catalog/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The static, read-only table of car listings the assistant quotes from when
//! a user asks for the best deal, the advisory price bands used to suggest
//! ranges, and the inclusive price-range lookup over the catalog.
//!
//! ## Architecture
//!
//! - `CatalogEntry`: one listing (free-text description + whole-rupee price).
//! - `Catalog`: the ordered list of listings; built once and never mutated.
//! - `PriceRange`: a caller-supplied `MIN-MAX` range, parsed from user text.
//! - `PriceBand` / `PRICE_BANDS`: contiguous advisory bands for examples and bucketing.
//!
//! ## Examples
//!
//! ```rust
//! let catalog = Catalog::builtin();
//! let range: PriceRange = "50000-100000".parse()?;
//! for entry in catalog.in_range(range) {
//!     println!("{} ({})", entry.description, entry.price);
//! }
//! ```
//!
use crate::core::error::StarxError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A single car listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub description: String,
    pub price: u64,
}

impl CatalogEntry {
    pub fn new(description: impl Into<String>, price: u64) -> Self {
        Self {
            description: description.into(),
            price,
        }
    }
}

/// The built-in listings: description and price in rupees.
const BUILTIN_LISTINGS: &[(&str, u64)] = &[
    ("Ford Ikon - 2009, 73,000 Kms driven, Price 59,000INR at Chennai", 59_000),
    ("Ford Ikon - 2008, 85,000 Kms driven, Price 69,000INR at Chennai", 69_000),
    ("Maruti Suzuki Alto - 2001, 85,000 Kms driven, Price 79,000INR at Chennai", 79_000),
    ("Tata Nano - 2011, 37,000 Kms driven, Price 89,000INR at Chennai", 89_000),
    ("Tata Indica - 2011, 67,000 Kms driven, Price 89,000INR at Chennai", 89_000),
    ("Hyundai Santro Xing - 2004, 85,000 Kms driven, Price 69,000INR at Chennai", 69_000),
    ("Maruti Suzuki Wagon R - 2007, 85,000 Kms driven, Price 69,000INR at Chennai", 69_000),
    ("Maruti Suzuki 800 - 2000, 85,000 Kms driven, Price 69,000INR at Chennai", 69_000),
    ("Hyundai Getz - 2006, 73,000 Kms driven, Price 1,19,000INR at Chennai", 119_000),
    ("Chevrolet Aveo - 2007, 63,000 Kms driven, Price 67,000INR at Chennai", 67_000),
];

/// # Listing Catalog (`Catalog`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The dealer's fixed listing table.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_LISTINGS
                .iter()
                .map(|(description, price)| CatalogEntry::new(*description, *price))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// # Price-Range Lookup (`in_range`)
    ///
    /// Returns every listing with `range.min <= price <= range.max`, in catalog
    /// order. An empty result is a normal outcome, not an error.
    pub fn in_range(&self, range: PriceRange) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| range.contains(entry.price))
            .collect()
    }

    /// Number of listings that fall into `band` (half-open, see `PriceBand::contains`).
    pub fn count_in_band(&self, band: &PriceBand) -> usize {
        self.entries
            .iter()
            .filter(|entry| band.contains(entry.price))
            .count()
    }
}

/// # Price Range (`PriceRange`)
///
/// An inclusive `[min, max]` range supplied by the user as `MIN-MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn new(min: u64, max: u64) -> Result<Self, StarxError> {
        if min > max {
            return Err(StarxError::InvalidInput(format!(
                "minimum price {} is greater than maximum price {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, price: u64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl FromStr for PriceRange {
    type Err = StarxError;

    /// Parses `"MIN-MAX"`; whitespace around either number is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(StarxError::InvalidInput(format!(
                "expected a price range like 50000-100000, got '{}'",
                s.trim()
            )));
        }
        let parse_bound = |raw: &str| {
            raw.parse::<u64>().map_err(|_| {
                StarxError::InvalidInput(format!("'{}' is not a whole number of rupees", raw))
            })
        };
        PriceRange::new(parse_bound(parts[0])?, parse_bound(parts[1])?)
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// # Price Band (`PriceBand`)
///
/// One of the advisory buckets the assistant suggests to users. Bands share
/// their edges, so for bucketing a price belongs to the band with
/// `min <= price < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBand {
    pub min: u64,
    pub max: u64,
}

/// Contiguous, non-overlapping, ascending.
pub const PRICE_BANDS: [PriceBand; 7] = [
    PriceBand { min: 0, max: 10_000 },
    PriceBand { min: 10_000, max: 50_000 },
    PriceBand { min: 50_000, max: 100_000 },
    PriceBand { min: 100_000, max: 200_000 },
    PriceBand { min: 200_000, max: 500_000 },
    PriceBand { min: 500_000, max: 1_000_000 },
    PriceBand { min: 1_000_000, max: 2_000_000 },
];

impl PriceBand {
    pub fn contains(&self, price: u64) -> bool {
        self.min <= price && price < self.max
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Formats the first `count` bands as example input, e.g. `"0-10000, 10000-50000"`.
pub fn example_ranges(count: usize) -> String {
    PRICE_BANDS
        .iter()
        .take(count)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
