//! # StarX Domain Modules (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The assistant's domain logic, shared by every command surface (the
//! terminal chat, the one-shot `deals`/`predict` commands and the HTTP
//! server). Nothing in here performs terminal or network I/O.
//!
//! ## Architecture
//!
//! - **`catalog`**: the static car listings, price ranges and advisory price bands.
//! - **`dialogue`**: states, greeting phrases, sessions and the `DialogueAgent`.
//! - **`prediction`**: vehicle code tables, feature encoding and the stored price model.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::catalog::{Catalog, PriceRange};
//! use crate::common::dialogue::{DialogueAgent, Session};
//! use crate::common::prediction::format_quote;
//! ```
//!

/// Static car listings and price-range lookups.
pub mod catalog;
/// The rule-based dialogue state machine.
pub mod dialogue;
/// Bridge from conversational fields to the stored price model.
pub mod prediction;
