//! # StarX Direct Price Quote
//!
//! File: cli/src/commands/predict/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Quotes a car through the same prediction bridge the chat uses, without a
//! conversation. Unlike chat, every model input can be set explicitly; the
//! ones left out fall back to the configured vehicle defaults.
//!
//! ## Examples
//!
//! ```bash
//! starx predict --kms 40000 --owners 1 --year 2015
//! starx predict --kms 52000 --owners "2nd Owner" --year 2012 --fuel diesel --company tata
//! starx predict --kms 40000 --owners 1 --year 2015 --show-features
//! ```
//!
use crate::common::prediction::{
    format_price, CachedModel, Company, FuelType, OwnerType, PredictionBridge, QuoteRequest,
};
use crate::core::config;
use crate::core::error::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// # Predict Arguments (`PredictArgs`)
#[derive(Parser, Debug)]
#[command(about = "Predict the price of a used car")]
pub struct PredictArgs {
    /// Kilometres driven.
    #[arg(long, value_parser = parse_kms)]
    pub kms: f64,

    /// Number of owners so far (1-3, or a label such as "2nd Owner").
    #[arg(long)]
    pub owners: OwnerType,

    /// Model year.
    #[arg(long)]
    pub year: i32,

    /// Fuel type code or name. Defaults to the configured fuel type.
    #[arg(long)]
    pub fuel: Option<FuelType>,

    /// Manufacturer code or name. Defaults to the configured company.
    #[arg(long)]
    pub company: Option<Company>,

    /// Location category code. Defaults to the configured location.
    #[arg(long)]
    pub location: Option<u32>,

    /// Price model artifact to use instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Also print the encoded feature vector sent to the model.
    #[arg(long)]
    pub show_features: bool,
}

fn parse_kms(raw: &str) -> std::result::Result<f64, String> {
    let kms: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !kms.is_finite() || kms < 0.0 {
        return Err(format!("'{}' is not a non-negative distance", raw));
    }
    Ok(kms)
}

/// # Handle Predict Command (`handle_predict`)
///
/// ## Errors
///
/// Returns an error if configuration is invalid, the model artifact cannot be
/// loaded, or the model rejects the encoded row.
pub async fn handle_predict(args: PredictArgs) -> Result<()> {
    info!("Handling predict command with args: {:?}", args);
    let cfg = config::load_config()?;
    let defaults = cfg.vehicle_defaults()?;
    let model_path = args.model.clone().unwrap_or_else(|| cfg.model_path());

    let bridge = PredictionBridge::with_defaults(Arc::new(CachedModel::new(model_path)), defaults);
    let request = request_from_args(&args, &bridge);

    let stdout = std::io::stdout();
    write_quote(&bridge, &request, args.show_features, &mut stdout.lock())
}

fn request_from_args(args: &PredictArgs, bridge: &PredictionBridge) -> QuoteRequest {
    let defaults = bridge.defaults();
    QuoteRequest {
        location: args.location.unwrap_or(defaults.location),
        kms_driven: args.kms,
        fuel_type: args.fuel.unwrap_or(defaults.fuel_type),
        owner: args.owners,
        year: args.year,
        company: args.company.unwrap_or(defaults.company),
    }
}

fn write_quote<W: Write>(
    bridge: &PredictionBridge,
    request: &QuoteRequest,
    show_features: bool,
    out: &mut W,
) -> Result<()> {
    let price = bridge.predict(request)?;

    writeln!(out, "Selected features:")?;
    writeln!(out, "  Year:       {}", request.year)?;
    writeln!(out, "  Location:   {}", request.location)?;
    writeln!(out, "  Company:    {}", request.company)?;
    writeln!(out, "  Fuel type:  {}", request.fuel_type)?;
    writeln!(out, "  Kms driven: {}", request.kms_driven)?;
    writeln!(out, "  Owner type: {}", request.owner)?;

    if show_features {
        let (names, row) = bridge.feature_vector(request)?;
        writeln!(out, "Model input:")?;
        for (name, value) in names.iter().zip(&row) {
            writeln!(out, "  {:<16} {}", name, value)?;
        }
    }

    writeln!(out, "Predicted price: {}", format_price(price))?;
    Ok(())
}
