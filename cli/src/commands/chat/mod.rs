//! # StarX Terminal Chat
//!
//! File: cli/src/commands/chat/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs a conversation with the assistant on stdin/stdout. Every non-blank
//! line is one turn; the assistant's reply is printed with its name in front.
//!
//! Besides normal messages the loop understands:
//! - `bye`, `quit`, `exit`: end the chat
//! - `/reset`: start a fresh conversation
//! - `/history`: print the transcript so far
//!
//! End of input also ends the chat.
//!
//! ## Examples
//!
//! ```bash
//! starx chat
//! starx chat --model ~/models/cars.toml
//! printf 'I want to buy a car\nAsha\n40000, 1, 2015\nbye\n' | starx chat
//! ```
//!
use crate::common::dialogue::{DialogueAgent, Session};
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const EXIT_WORDS: [&str; 3] = ["bye", "quit", "exit"];

/// # Chat Arguments (`ChatArgs`)
#[derive(Parser, Debug)]
#[command(about = "Chat with the assistant in the terminal")]
pub struct ChatArgs {
    /// Price model artifact to use instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,
}

/// What a single line of input asks the loop to do.
#[derive(Debug, PartialEq, Eq)]
enum ChatCommand<'a> {
    Skip,
    Quit,
    Reset,
    History,
    Message(&'a str),
}

fn parse_line(line: &str) -> ChatCommand<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatCommand::Skip;
    }
    if EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
        return ChatCommand::Quit;
    }
    match line {
        "/reset" => ChatCommand::Reset,
        "/history" => ChatCommand::History,
        _ => ChatCommand::Message(line),
    }
}

/// # Handle Chat Command (`handle_chat`)
///
/// Loads configuration, builds the agent and runs the loop on the process's
/// stdin and stdout.
///
/// ## Errors
///
/// Returns an error if configuration is invalid or the terminal cannot be
/// read or written.
pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);
    let cfg = config::load_config()?;
    let agent = DialogueAgent::from_config(&cfg, args.model.as_deref())?;

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = std::io::stdout();
    run_chat(&agent, stdin, &mut stdout.lock()).await
}

/// # Chat Loop (`run_chat`)
///
/// Drives one conversation from `input` to `out` until an exit word or end
/// of input.
pub async fn run_chat<R, W>(agent: &DialogueAgent, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session::new();
    let mut lines = input.lines();

    writeln!(out, "Chatbot for {}", agent.name())?;
    writeln!(
        out,
        "Ask me for the best deal, tell me you want to buy a car, or type 'bye' to leave."
    )?;

    loop {
        write!(out, "You: ")?;
        out.flush().context("Failed to flush stdout")?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        else {
            debug!("End of input, leaving chat");
            writeln!(out)?;
            break;
        };

        match parse_line(&line) {
            ChatCommand::Skip => continue,
            ChatCommand::Quit => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            ChatCommand::Reset => {
                agent.reset(&mut session);
                writeln!(out, "{}: Conversation reset.", agent.name())?;
            }
            ChatCommand::History => {
                if session.is_empty() {
                    writeln!(out, "(no messages yet)")?;
                }
                for turn in session.transcript() {
                    writeln!(out, "{}", turn)?;
                }
            }
            ChatCommand::Message(text) => {
                let reply = agent.respond(&mut session, text);
                writeln!(out, "{}: {}", agent.name(), reply)?;
            }
        }
    }

    info!(
        "Chat ended in state {} after {} turns",
        session.state(),
        session.transcript().len()
    );
    Ok(())
}
