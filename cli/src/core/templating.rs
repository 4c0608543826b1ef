//! # StarX Chat Page Templates
//!
//! File: cli/src/core/templating.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Renders the HTML chat page served by `starx srv` with the Tera templating
//! engine. The template is compiled into the binary, so the server needs no
//! template directory at runtime.
//!
//! ## Architecture
//!
//! 1. `chat_templates` builds a `Tera` instance holding `chat.html`. The
//!    `.html` name turns Tera's autoescaping on, so user text is safe to show.
//! 2. `ChatPage` is the serializable view of one session.
//! 3. `render_chat_page` turns a `ChatPage` into HTML.
//!
//! ## Examples
//!
//! ```rust
//! let tera = templating::chat_templates()?;
//! let page = ChatPage::new(agent.name(), &session);
//! let html = templating::render_chat_page(&tera, &page)?;
//! ```
//!
use crate::common::dialogue::{Session, Speaker};
use crate::core::error::{Result, StarxError};
use anyhow::Context;
use serde::Serialize;
use tera::Tera;
use tracing::debug;

/// Template name under which the chat page is registered.
pub const CHAT_TEMPLATE: &str = "chat.html";

const CHAT_TEMPLATE_SOURCE: &str = include_str!("../../templates/chat.html");

/// One transcript bubble on the page.
#[derive(Debug, Clone, Serialize)]
pub struct PageTurn {
    pub index: u64,
    pub label: &'static str,
    /// CSS class for the bubble (`user` or `assistant`).
    pub side: &'static str,
    pub text: String,
    pub at: String,
}

/// # Chat Page View (`ChatPage`)
///
/// Everything the template needs, detached from the live session.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPage {
    pub assistant_name: String,
    pub state: &'static str,
    pub turns: Vec<PageTurn>,
}

impl ChatPage {
    pub fn new(assistant_name: &str, session: &Session) -> Self {
        let turns = session
            .transcript()
            .iter()
            .map(|turn| PageTurn {
                index: turn.index,
                label: turn.speaker.label(),
                side: match turn.speaker {
                    Speaker::User => "user",
                    Speaker::Assistant => "assistant",
                },
                text: turn.text.clone(),
                at: turn.at.format("%H:%M:%S").to_string(),
            })
            .collect();

        Self {
            assistant_name: assistant_name.to_string(),
            state: session.state().as_str(),
            turns,
        }
    }
}

/// # Build Chat Templates (`chat_templates`)
///
/// ## Errors
///
/// Returns `StarxError::Template` if the embedded template fails to parse.
pub fn chat_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(CHAT_TEMPLATE, CHAT_TEMPLATE_SOURCE)
        .map_err(|source| StarxError::Template { source })?;
    debug!("Registered template '{}'", CHAT_TEMPLATE);
    Ok(tera)
}

/// # Render Chat Page (`render_chat_page`)
///
/// ## Errors
///
/// Returns an error if the page cannot be serialized into a Tera context or
/// the template fails to render.
pub fn render_chat_page(tera: &Tera, page: &ChatPage) -> Result<String> {
    let context = tera::Context::from_serialize(page)
        .map_err(|source| StarxError::Template { source })?;
    let html = tera
        .render(CHAT_TEMPLATE, &context)
        .map_err(|source| StarxError::Template { source })
        .with_context(|| format!("Failed to render '{}'", CHAT_TEMPLATE))?;
    Ok(html)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dialogue::DialogueAgent;
    use crate::common::prediction::{CachedModel, PredictionBridge};
    use std::sync::Arc;

    fn agent() -> DialogueAgent {
        DialogueAgent::new(PredictionBridge::new(Arc::new(CachedModel::new(
            "/nonexistent/model.toml",
        ))))
    }

    #[test]
    fn embedded_template_parses() {
        let tera = chat_templates().unwrap();
        assert!(tera.get_template_names().any(|name| name == CHAT_TEMPLATE));
    }

    #[test]
    fn empty_session_renders_form_and_reset() {
        let tera = chat_templates().unwrap();
        let page = ChatPage::new("StarX", &Session::new());
        let html = render_chat_page(&tera, &page).unwrap();

        assert!(html.contains("<title>StarX</title>"));
        assert!(html.contains("action=\"/chat\""));
        assert!(html.contains("action=\"/reset\""));
        assert!(html.contains("data-state=\"default\""));
    }

    #[test]
    fn page_carries_faq_section() {
        let tera = chat_templates().unwrap();
        let html = render_chat_page(&tera, &ChatPage::new("Nova", &Session::new())).unwrap();

        assert!(html.contains("<details class=\"faq\">"));
        assert!(html.contains("FAQs and Tips"));
        assert!(html.contains("Can Nova handle greetings?"));
    }

    #[test]
    fn transcript_is_rendered_in_order() {
        let agent = agent();
        let mut session = Session::new();
        agent.respond(&mut session, "hello");
        agent.respond(&mut session, "I want to buy a car");

        let page = ChatPage::new(agent.name(), &session);
        assert_eq!(page.turns.len(), 4);
        assert_eq!(page.turns[0].side, "user");
        assert_eq!(page.turns[1].label, "Bot");
        assert_eq!(page.state, "buy_car");

        let html = render_chat_page(&chat_templates().unwrap(), &page).unwrap();
        let first = html.find("data-index=\"1\"").unwrap();
        let third = html.find("data-index=\"3\"").unwrap();
        assert!(first < third);
        assert!(html.contains("I want to buy a car"));
    }

    #[test]
    fn user_text_is_escaped() {
        let agent = agent();
        let mut session = Session::new();
        agent.respond(&mut session, "<script>alert(1)</script>");

        let html =
            render_chat_page(&chat_templates().unwrap(), &ChatPage::new("StarX", &session)).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
