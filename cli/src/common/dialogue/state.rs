//! # Dialogue States
//!
//! File: cli/src/common/dialogue/state.rs
//! Author: Christi Mahu
//!
//! The named modes of the dialogue machine. `Default` is both the initial
//! state and the state every completed flow returns to; there is no
//! terminal state.
//!
use serde::Serialize;
use std::fmt;

/// # Dialogue State (`DialogueState`)
///
/// Controls how the next line of user input is interpreted.
///
/// - `Default`: route by intent (best deal, buy car, greeting, fallback).
/// - `BuyCar` → `ProcessCarData`: collect kms driven, owners and year for a quote.
/// - `BestDeal` → `ProcessBestDeal`: collect a `MIN-MAX` price range for a catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    Default,
    BuyCar,
    ProcessCarData,
    BestDeal,
    ProcessBestDeal,
}

impl DialogueState {
    /// The stable snake_case name used in logs and the JSON API.
    pub fn as_str(self) -> &'static str {
        match self {
            DialogueState::Default => "default",
            DialogueState::BuyCar => "buy_car",
            DialogueState::ProcessCarData => "process_car_data",
            DialogueState::BestDeal => "best_deal",
            DialogueState::ProcessBestDeal => "process_best_deal",
        }
    }

    /// True for the states that consume structured input and then return to `Default`.
    pub fn is_terminal_step(self) -> bool {
        matches!(
            self,
            DialogueState::ProcessCarData | DialogueState::ProcessBestDeal
        )
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
