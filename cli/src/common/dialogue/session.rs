//! # Conversation Session
//!
//! File: cli/src/common/dialogue/session.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A `Session` is one user's conversation: the current `DialogueState` plus an
//! append-only transcript. It is a plain value owned by whoever hosts the
//! conversation (the REPL loop, the HTTP server) and is passed to the agent by
//! `&mut` on every turn.
//!
//! Invariants:
//! - Turn indices start at 1 and increase by exactly 1 per recorded turn.
//! - Turns are never edited or reordered once recorded.
//!
use super::state::DialogueState;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Short label used when printing a transcript.
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Assistant => "Bot",
        }
    }
}

/// One recorded line of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub index: u64,
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Local>,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}: {}", self.index, self.speaker.label(), self.text)
    }
}

/// # Conversation Session (`Session`)
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    state: DialogueState,
    transcript: Vec<Turn>,
    #[serde(skip)]
    next_index: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session in the `Default` state.
    pub fn new() -> Self {
        Self {
            state: DialogueState::Default,
            transcript: Vec::new(),
            next_index: 1,
        }
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub(super) fn set_state(&mut self, state: DialogueState) {
        self.state = state;
    }

    /// Appends a turn under the next index and returns it.
    pub(super) fn record(&mut self, speaker: Speaker, text: impl Into<String>) -> &Turn {
        let turn = Turn {
            index: self.next_index,
            speaker,
            text: text.into(),
            at: Local::now(),
        };
        self.next_index += 1;
        self.transcript.push(turn);
        // Just pushed, so the transcript is non-empty.
        &self.transcript[self.transcript.len() - 1]
    }
}
