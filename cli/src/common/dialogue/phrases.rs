//! # Greeting and Courtesy Phrases
//!
//! File: cli/src/common/dialogue/phrases.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The fixed phrase table the agent answers while idle, and the policy that
//! decides which phrase wins when several are contained in the same input.
//!
//! Matching is plain case-insensitive substring containment: no tokenizing,
//! no fuzzy matching. That means short phrases also fire inside longer words
//! (`"hi"` inside `"this"`), and a short phrase can shadow a more specific one
//! declared after it (`"hey"` before `"good morning"`). `MatchPolicy` makes the
//! resolution explicit:
//!
//! - `FirstDeclared`: scan in declaration order, first hit wins.
//! - `LongestMatch`: the longest contained phrase wins, earlier declaration breaks ties.
//!
use serde::Deserialize;

/// # Greeting Match Policy (`MatchPolicy`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    #[default]
    FirstDeclared,
    LongestMatch,
}

/// A single phrase and its canned reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Greeting {
    pub phrase: &'static str,
    pub reply: &'static str,
}

const fn greeting(phrase: &'static str, reply: &'static str) -> Greeting {
    Greeting { phrase, reply }
}

/// The built-in phrase table, in declaration order. Phrases are lower-case.
pub const GREETINGS: &[Greeting] = &[
    greeting("hello", "Hi there! How can I assist you today?"),
    greeting("hi", "Hello! What can I do for you?"),
    greeting("hey", "Hey! How's it going? How can I help?"),
    greeting("hay", "Hey! How's it going? How can I help?"),
    greeting(
        "good morning",
        "Good morning! Hope you're having a great start to your day. How can I assist?",
    ),
    greeting("good evening", "Good evening! What can I do for you tonight?"),
    greeting("good afternoon", "Good afternoon! How can I be of service?"),
    greeting("howdy", "Howdy! What brings you here today?"),
    greeting("hallo", "Hallo! Wie kann ich Ihnen helfen"),
    greeting("servus", "Servus! Wia ko i Eana huifa?"),
    greeting(
        "what's up",
        "Not much, just here to help you out! What's up with you?",
    ),
    greeting("sup", "Sup! What do you need help with?"),
    greeting("hi there", "Hi there! How can I make your day easier?"),
    greeting("greetings", "Greetings! How can I be of assistance?"),
    greeting("good day", "Good day! How can I help you today?"),
    greeting("morning", "Morning! What can I assist you with?"),
    greeting("evening", "Evening! How can I be of service?"),
    greeting("afternoon", "Afternoon! Need any help?"),
    greeting(
        "thanks",
        "You're welcome! Let me know if there's anything else I can help you with.",
    ),
    greeting("thank you", "You're very welcome! Happy to help."),
    greeting("thanks a lot", "No problem at all! Glad I could assist."),
    greeting(
        "thank you so much",
        "You're most welcome! Let me know if you need more help.",
    ),
    greeting("much appreciated", "Anytime! I'm here to help."),
    greeting("thankful", "You're welcome! Always happy to assist."),
    greeting(
        "cheers",
        "Cheers! Let me know if there's anything else I can do.",
    ),
    greeting("thx", "No problem! Let me know if you need anything else."),
    greeting("thanks a ton", "You're welcome! Glad I could help."),
    greeting(
        "thanks so much",
        "You're welcome! Feel free to ask if you need anything else.",
    ),
];

/// # Greeting Table (`GreetingTable`)
///
/// An ordered phrase table paired with the policy used to resolve competing matches.
#[derive(Debug, Clone)]
pub struct GreetingTable {
    entries: &'static [Greeting],
    policy: MatchPolicy,
}

impl Default for GreetingTable {
    fn default() -> Self {
        Self::new(GREETINGS, MatchPolicy::default())
    }
}

impl GreetingTable {
    pub fn new(entries: &'static [Greeting], policy: MatchPolicy) -> Self {
        Self { entries, policy }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// # Find Greeting (`find`)
    ///
    /// Returns the phrase that answers `input` under the table's policy, or
    /// `None` when no phrase is contained in the lower-cased input.
    pub fn find(&self, input: &str) -> Option<&'static Greeting> {
        let lowered = input.to_lowercase();
        let mut hits = self
            .entries
            .iter()
            .filter(|g| lowered.contains(g.phrase));

        match self.policy {
            MatchPolicy::FirstDeclared => hits.next(),
            // Strictly-greater comparison keeps the earliest declared phrase on ties.
            MatchPolicy::LongestMatch => hits.fold(None, |best: Option<&'static Greeting>, g| {
                match best {
                    Some(b) if b.phrase.len() >= g.phrase.len() => Some(b),
                    _ => Some(g),
                }
            }),
        }
    }
}
