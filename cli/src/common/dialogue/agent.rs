//! # Dialogue Agent
//!
//! File: cli/src/common/dialogue/agent.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The `DialogueAgent` is the StarX assistant: a keyword-routed state machine
//! that answers greetings, walks a user through a price quote, and looks up
//! listings in a price range.
//!
//! The agent itself holds only read-only collaborators (phrase table, catalog,
//! prediction bridge) and policies. All conversation state lives in the
//! `Session` the caller passes in, so one agent can serve any number of
//! sessions.
//!
//! ## Turn handling
//!
//! Every call to `respond`:
//! 1. Records the user's raw text in the transcript.
//! 2. Computes an `Outcome` (next state + reply) from the current state and input.
//! 3. Applies the next state and records the reply.
//!
//! Failures inside a step (bad field count, unparsable range, model errors)
//! never escape: they become corrective or generic replies, and the next
//! state is decided by the `RecoveryPolicy`.
//!
//! ## Transitions
//!
//! | State               | Input                           | Next                |
//! |---------------------|---------------------------------|---------------------|
//! | `default`           | "best" and "deal"               | `best_deal`         |
//! | `default`           | "buy" and "car"                 | `buy_car`           |
//! | `default`           | greeting phrase / anything else | `default`           |
//! | `buy_car`           | anything                        | `process_car_data`  |
//! | `process_car_data`  | `kms, owners, year`             | `default`           |
//! | `best_deal`         | anything                        | `process_best_deal` |
//! | `process_best_deal` | `MIN-MAX`                       | `default`           |
//!
use super::phrases::{Greeting, GreetingTable, MatchPolicy};
use super::session::{Session, Speaker};
use super::state::DialogueState;
use crate::common::catalog::{example_ranges, Catalog, PriceRange};
use crate::common::prediction::{format_quote, CachedModel, PredictionBridge};
use crate::core::config::Config;
use crate::core::error::StarxError;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed reply texts.
pub mod replies {
    pub const BEST_DEAL_INTRO: &str =
        "I can help you find the best deal! What price range are you looking for?";
    pub const BUY_CAR_INTRO: &str =
        "Sure, I can help you buy a car! Let's get started. What is your name?";
    pub const CAR_DATA_PROMPT: &str = "I can help you buy a car! Please provide the Kms driven, number of Owners, and Year, separated by commas.";
    pub const FALLBACK: &str =
        "I'm not sure I understand that. Could you rephrase? Or ask something else!";
    pub const CAR_DATA_INVALID: &str = "Please provide exactly three values: Kms driven, Owners, and Year, separated by commas.";
    pub const PRICE_RANGE_INVALID: &str = "Please provide a valid price range (e.g., 0-10000).";
    pub const PROCESSING_ERROR: &str =
        "There was an error processing your input. Please try again.";
    pub const NO_MATCHES: &str = "Sorry, no cars match your price range.";
    pub const MATCHES_HEADER: &str = "Here are some cars in your price range:";
}

/// # Recovery Policy (`RecoveryPolicy`)
///
/// Which state the agent takes after a failure in `process_car_data` or
/// `process_best_deal`.
///
/// - `Reset`: go back to `default`; the user starts the flow again.
/// - `Retain`: stay in the processing state so the next line is another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryPolicy {
    #[default]
    Reset,
    Retain,
}

/// What the user wants while the agent is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    BestDeal,
    BuyCar,
    Greeting(&'static Greeting),
    Unknown,
}

/// # Classify Idle Input (`classify`)
///
/// Rules are checked in a fixed order: best deal, buy car, greeting phrase,
/// then fallback. Keywords are case-insensitive substrings and may appear
/// anywhere in the text.
pub fn classify(input: &str, greetings: &GreetingTable) -> Intent {
    let lowered = input.to_lowercase();
    if lowered.contains("best") && lowered.contains("deal") {
        return Intent::BestDeal;
    }
    if lowered.contains("buy") && lowered.contains("car") {
        return Intent::BuyCar;
    }
    match greetings.find(&lowered) {
        Some(greeting) => Intent::Greeting(greeting),
        None => Intent::Unknown,
    }
}

/// Result of one step of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outcome {
    next: DialogueState,
    reply: String,
}

impl Outcome {
    fn new(next: DialogueState, reply: impl Into<String>) -> Self {
        Self {
            next,
            reply: reply.into(),
        }
    }
}

/// # Dialogue Agent (`DialogueAgent`)
#[derive(Debug, Clone)]
pub struct DialogueAgent {
    name: String,
    greetings: GreetingTable,
    recovery: RecoveryPolicy,
    catalog: Catalog,
    bridge: PredictionBridge,
}

impl DialogueAgent {
    /// Creates an agent with the built-in phrase table and catalog and the
    /// default policies.
    pub fn new(bridge: PredictionBridge) -> Self {
        Self {
            name: "StarX".to_string(),
            greetings: GreetingTable::default(),
            recovery: RecoveryPolicy::default(),
            catalog: Catalog::builtin(),
            bridge,
        }
    }

    /// # Build From Configuration (`from_config`)
    ///
    /// Wires the agent from the loaded configuration: assistant name, match
    /// and recovery policies, implicit vehicle fields, and a lazily loaded
    /// model at `model_override` (if given) or the configured path.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configured fuel type or company code is out of
    /// range. A missing model file is not an error here; it surfaces on the
    /// first quote.
    pub fn from_config(
        config: &Config,
        model_override: Option<&Path>,
    ) -> crate::core::error::Result<Self> {
        let model_path = model_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.model_path());
        info!("Price model artifact: {}", model_path.display());

        let bridge = PredictionBridge::with_defaults(
            Arc::new(CachedModel::new(model_path)),
            config.vehicle_defaults()?,
        );
        Ok(Self::new(bridge)
            .with_name(config.assistant.name.clone())
            .with_match_policy(config.assistant.greeting_match)
            .with_recovery_policy(config.assistant.on_invalid_input))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.greetings = self.greetings.with_policy(policy);
        self
    }

    pub fn with_recovery_policy(mut self, policy: RecoveryPolicy) -> Self {
        self.recovery = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// # Respond To A Turn (`respond`)
    ///
    /// Records `input`, advances the session, records and returns the reply.
    /// Never fails; any problem is turned into reply text.
    pub fn respond(&self, session: &mut Session, input: &str) -> String {
        session.record(Speaker::User, input);

        let current = session.state();
        let outcome = self.step(current, input);
        if outcome.next != current {
            info!("Dialogue state {} -> {}", current, outcome.next);
        }
        session.set_state(outcome.next);

        session.record(Speaker::Assistant, outcome.reply).text.clone()
    }

    /// # Respond, Rejecting Blank Input (`try_respond`)
    ///
    /// Like `respond`, but whitespace-only input is rejected with
    /// `StarxError::EmptyInput` and nothing is recorded. Other input is
    /// recorded as given.
    pub fn try_respond(&self, session: &mut Session, input: &str) -> Result<String, StarxError> {
        if input.trim().is_empty() {
            return Err(StarxError::EmptyInput);
        }
        Ok(self.respond(session, input))
    }

    /// Loads the price model up front so the first quote does not touch disk.
    pub fn warm_up(&self) -> crate::core::error::Result<()> {
        self.bridge.warm_up()
    }

    /// Discards the conversation and starts a fresh one in `default`.
    pub fn reset(&self, session: &mut Session) {
        debug!(
            "Resetting session in state {} with {} turns",
            session.state(),
            session.transcript().len()
        );
        *session = Session::new();
    }

    fn step(&self, state: DialogueState, input: &str) -> Outcome {
        match state {
            DialogueState::Default => self.route_idle(input),
            DialogueState::BuyCar => {
                Outcome::new(DialogueState::ProcessCarData, replies::CAR_DATA_PROMPT)
            }
            DialogueState::ProcessCarData => self.process_car_data(input),
            DialogueState::BestDeal => {
                Outcome::new(DialogueState::ProcessBestDeal, best_deal_prompt())
            }
            DialogueState::ProcessBestDeal => self.process_best_deal(input),
        }
    }

    fn route_idle(&self, input: &str) -> Outcome {
        match classify(input, &self.greetings) {
            Intent::BestDeal => Outcome::new(DialogueState::BestDeal, replies::BEST_DEAL_INTRO),
            Intent::BuyCar => Outcome::new(DialogueState::BuyCar, replies::BUY_CAR_INTRO),
            Intent::Greeting(greeting) => {
                debug!("Matched greeting phrase '{}'", greeting.phrase);
                Outcome::new(DialogueState::Default, greeting.reply)
            }
            Intent::Unknown => Outcome::new(DialogueState::Default, replies::FALLBACK),
        }
    }

    fn process_car_data(&self, input: &str) -> Outcome {
        let fields: Vec<&str> = input.split(',').map(str::trim).collect();
        let [kms_driven, owners, year] = fields[..] else {
            warn!(
                "Expected 3 purchase fields, got {}: '{}'",
                fields.len(),
                input
            );
            return self.recover(DialogueState::ProcessCarData, replies::CAR_DATA_INVALID);
        };

        match self.bridge.quote_fields(kms_driven, owners, year) {
            Ok(price) => {
                info!("Quoted price {:.2} for '{}'", price, input);
                Outcome::new(DialogueState::Default, format_quote(price))
            }
            Err(e) => {
                warn!("Price prediction failed for '{}': {:#}", input, e);
                self.recover(DialogueState::ProcessCarData, replies::PROCESSING_ERROR)
            }
        }
    }

    fn process_best_deal(&self, input: &str) -> Outcome {
        let range = match input.parse::<PriceRange>() {
            Ok(range) => range,
            Err(e) => {
                warn!("Rejected price range '{}': {}", input, e);
                return self.recover(DialogueState::ProcessBestDeal, replies::PRICE_RANGE_INVALID);
            }
        };

        let matches = self.catalog.in_range(range);
        debug!("{} listings in range {}", matches.len(), range);
        let reply = if matches.is_empty() {
            replies::NO_MATCHES.to_string()
        } else {
            let mut reply = replies::MATCHES_HEADER.to_string();
            for entry in matches {
                reply.push_str("\n • ");
                reply.push_str(&entry.description);
            }
            reply
        };
        Outcome::new(DialogueState::Default, reply)
    }

    fn recover(&self, failed_in: DialogueState, reply: &str) -> Outcome {
        debug_assert!(failed_in.is_terminal_step());
        let next = match self.recovery {
            RecoveryPolicy::Reset => DialogueState::Default,
            RecoveryPolicy::Retain => failed_in,
        };
        Outcome::new(next, reply)
    }
}

/// Prompt for a price range, with examples taken from the advisory bands.
pub fn best_deal_prompt() -> String {
    format!(
        "What price range are you looking to buy cars in? Please provide a price range (e.g., {}).",
        example_ranges(2)
    )
}
