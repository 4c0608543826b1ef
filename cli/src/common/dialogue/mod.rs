//! # StarX Dialogue Module (`common::dialogue`)
//!
//! File: cli/src/common/dialogue/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The conversational core of StarX: a small finite-state dialogue handler that
//! classifies free-text input, moves between named states, and bridges
//! conversational input into catalog lookups and price predictions.
//!
//! ## Architecture
//!
//! - `state`: the `DialogueState` enum.
//! - `phrases`: the ordered greeting table and its `MatchPolicy`.
//! - `session`: the per-conversation `Session` value and its transcript.
//! - `agent`: the `DialogueAgent` transition logic and `RecoveryPolicy`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::dialogue::{DialogueAgent, Session};
//!
//! let agent = DialogueAgent::from_config(&config, None)?;
//! let mut session = Session::new();
//! let reply = agent.respond(&mut session, "I want to buy a car");
//! ```
//!
pub mod agent;
pub mod phrases;
pub mod session;
pub mod state;

pub use agent::{DialogueAgent, RecoveryPolicy};
pub use phrases::MatchPolicy;
pub use session::{Session, Speaker, Turn};
pub use state::DialogueState;
