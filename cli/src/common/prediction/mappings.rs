//! # Vehicle Code Tables
//!
//! File: cli/src/common/prediction/mappings.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The integer category codes the price model was fit against, as typed enums.
//! Each type exposes its code, a display label, lookup by code, and `FromStr`
//! accepting either the numeric code or the label (case-insensitive), so the
//! same values work from config files, CLI flags and chat input.
//!
//! - Fuel type: 1–7
//! - Owner: 1–3
//! - Company (manufacturer): 1–24
//!
use crate::core::error::StarxError;
use std::fmt;
use std::str::FromStr;

/// Resolves `raw` against a code/label table.
fn parse_coded<T: Copy>(
    raw: &str,
    all: &[T],
    code: impl Fn(T) -> u8,
    label: impl Fn(T) -> &'static str,
    kind: &str,
) -> Result<T, StarxError> {
    let needle = raw.trim();
    let by_code = needle
        .parse::<u8>()
        .ok()
        .and_then(|c| all.iter().copied().find(|v| code(*v) == c));
    by_code
        .or_else(|| {
            all.iter()
                .copied()
                .find(|v| label(*v).eq_ignore_ascii_case(needle))
        })
        .ok_or_else(|| StarxError::InvalidInput(format!("unknown {} '{}'", kind, needle)))
}

// ===============================
// Fuel type
// ===============================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuelType {
    Petrol,
    Diesel,
    Cng,
    Electric,
    PetrolCng,
    Lpg,
    Hybrid,
}

impl FuelType {
    pub const ALL: [FuelType; 7] = [
        FuelType::Petrol,
        FuelType::Diesel,
        FuelType::Cng,
        FuelType::Electric,
        FuelType::PetrolCng,
        FuelType::Lpg,
        FuelType::Hybrid,
    ];

    pub fn code(self) -> u8 {
        match self {
            FuelType::Petrol => 1,
            FuelType::Diesel => 2,
            FuelType::Cng => 3,
            FuelType::Electric => 4,
            FuelType::PetrolCng => 5,
            FuelType::Lpg => 6,
            FuelType::Hybrid => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Cng => "CNG",
            FuelType::Electric => "Electric",
            FuelType::PetrolCng => "Petrol + CNG",
            FuelType::Lpg => "LPG",
            FuelType::Hybrid => "Hybrid",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }
}

impl FromStr for FuelType {
    type Err = StarxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coded(s, &Self::ALL, Self::code, Self::label, "fuel type")
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===============================
// Owner
// ===============================

/// How many people have owned the car so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerType {
    First,
    Second,
    Third,
}

impl OwnerType {
    pub const ALL: [OwnerType; 3] = [OwnerType::First, OwnerType::Second, OwnerType::Third];

    pub fn code(self) -> u8 {
        match self {
            OwnerType::First => 1,
            OwnerType::Second => 2,
            OwnerType::Third => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OwnerType::First => "1st Owner",
            OwnerType::Second => "2nd Owner",
            OwnerType::Third => "3rd Owner",
        }
    }
}

impl FromStr for OwnerType {
    type Err = StarxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coded(s, &Self::ALL, Self::code, Self::label, "owner count")
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===============================
// Company
// ===============================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Company {
    Maruti,
    Hyundai,
    Honda,
    Ford,
    Tata,
    Renault,
    Mahindra,
    Toyota,
    Mg,
    Volkswagen,
    Jeep,
    Kia,
    Bmw,
    Skoda,
    Nissan,
    Audi,
    Datsun,
    Mercedes,
    Fiat,
    Volvo,
    Jaguar,
    SsangYong,
    LandRover,
    Porsche,
}

impl Company {
    /// In code order: `ALL[i].code() == i + 1`.
    pub const ALL: [Company; 24] = [
        Company::Maruti,
        Company::Hyundai,
        Company::Honda,
        Company::Ford,
        Company::Tata,
        Company::Renault,
        Company::Mahindra,
        Company::Toyota,
        Company::Mg,
        Company::Volkswagen,
        Company::Jeep,
        Company::Kia,
        Company::Bmw,
        Company::Skoda,
        Company::Nissan,
        Company::Audi,
        Company::Datsun,
        Company::Mercedes,
        Company::Fiat,
        Company::Volvo,
        Company::Jaguar,
        Company::SsangYong,
        Company::LandRover,
        Company::Porsche,
    ];

    pub fn code(self) -> u8 {
        // Discriminants follow declaration order from 0.
        self as u8 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Company::Maruti => "Maruti",
            Company::Hyundai => "Hyundai",
            Company::Honda => "Honda",
            Company::Ford => "Ford",
            Company::Tata => "Tata",
            Company::Renault => "Renault",
            Company::Mahindra => "Mahindra",
            Company::Toyota => "Toyota",
            Company::Mg => "MG",
            Company::Volkswagen => "Volkswagen",
            Company::Jeep => "Jeep",
            Company::Kia => "Kia",
            Company::Bmw => "BMW",
            Company::Skoda => "Skoda",
            Company::Nissan => "Nissan",
            Company::Audi => "Audi",
            Company::Datsun => "Datsun",
            Company::Mercedes => "Mercedes",
            Company::Fiat => "Fiat",
            Company::Volvo => "Volvo",
            Company::Jaguar => "Jaguar",
            Company::SsangYong => "SsangYong",
            Company::LandRover => "Land Rover",
            Company::Porsche => "Porsche",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code).checked_sub(1)?).copied()
    }
}

impl FromStr for Company {
    type Err = StarxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coded(s, &Self::ALL, Self::code, Self::label, "company")
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
