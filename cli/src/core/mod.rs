//! # StarX Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundational pieces used by every command: configuration loading, the
//! error type, and the HTML templates for the chat page.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `error`: `StarxError` and the crate-wide `Result` alias
//! - `templating`: Tera rendering of the web chat page
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{Result, StarxError}; // For error handling
//! use crate::core::templating; // For rendering the chat page
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
