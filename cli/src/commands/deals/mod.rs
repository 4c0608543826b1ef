//! # StarX Deals Lookup
//!
//! File: cli/src/commands/deals/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! One-shot access to the catalog lookup the assistant uses in its best-deal
//! flow. With a `MIN-MAX` range it lists the matching cars; without one it
//! shows the advisory price bands and how many listings fall into each.
//!
//! ## Examples
//!
//! ```bash
//! starx deals 50000-100000
//! starx deals
//! ```
//!
use crate::common::catalog::{Catalog, PriceRange, PRICE_BANDS};
use crate::common::dialogue::agent::replies;
use crate::common::prediction::format_price;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tracing::info;

/// # Deals Arguments (`DealsArgs`)
#[derive(Parser, Debug)]
#[command(about = "List cars in a price range, or show the price bands")]
pub struct DealsArgs {
    /// Inclusive price range in rupees, e.g. `50000-100000`.
    #[arg(value_name = "MIN-MAX")]
    pub range: Option<String>,
}

/// # Handle Deals Command (`handle_deals`)
///
/// ## Errors
///
/// Returns an error if the range is not `MIN-MAX` with `MIN <= MAX`.
pub async fn handle_deals(args: DealsArgs) -> Result<()> {
    info!("Handling deals command with args: {:?}", args);
    let catalog = Catalog::builtin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.range.as_deref() {
        Some(raw) => {
            let range = raw
                .parse::<PriceRange>()
                .with_context(|| format!("Invalid price range '{}'", raw))?;
            write_matches(&catalog, range, &mut out)
        }
        None => write_bands(&catalog, &mut out),
    }
}

fn write_matches<W: Write>(catalog: &Catalog, range: PriceRange, out: &mut W) -> Result<()> {
    let matches = catalog.in_range(range);
    info!("{} listings in range {}", matches.len(), range);
    if matches.is_empty() {
        writeln!(out, "{}", replies::NO_MATCHES)?;
        return Ok(());
    }
    writeln!(out, "{}", replies::MATCHES_HEADER)?;
    for entry in matches {
        writeln!(
            out,
            " • {} ({})",
            entry.description,
            format_price(entry.price as f64)
        )?;
    }
    Ok(())
}

fn write_bands<W: Write>(catalog: &Catalog, out: &mut W) -> Result<()> {
    writeln!(out, "Price bands:")?;
    for band in PRICE_BANDS.iter() {
        let count = catalog.count_in_band(band);
        let noun = if count == 1 { "listing" } else { "listings" };
        writeln!(out, "  {:<18} {} {}", band.to_string(), count, noun)?;
    }
    Ok(())
}
