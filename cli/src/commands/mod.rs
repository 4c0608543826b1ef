//! # StarX Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the StarX CLI. Each one is
//! a different surface over the same domain logic in `common`.
//!
//! ## Command Groups
//!
//! - `chat`: interactive terminal conversation with the assistant
//! - `deals`: one-shot price-range lookup in the car catalog
//! - `predict`: one-shot price quote from the stored model
//! - `srv`: HTTP server with the web chat page and a JSON API
//!
//! Each command defines its own arguments structure and an async handler.
//!

/// Interactive terminal chat (`starx chat`).
pub mod chat;
/// Catalog lookup by price range (`starx deals`).
pub mod deals;
/// Direct price quote (`starx predict`).
pub mod predict;
/// Web chat and JSON API server (`starx srv`).
pub mod srv;
