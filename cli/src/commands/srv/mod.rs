//! # StarX Web Chat Server
//!
//! File: cli/src/commands/srv/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Hosts the assistant over HTTP: an HTML chat page for browsers and a small
//! JSON API for scripts. The server holds a single conversation; every
//! request that touches it waits for the previous one to finish.
//!
//! ## Architecture
//!
//! - `config.rs`: merges CLI flags with the `[server]` configuration section
//! - `server_logic.rs`: port selection, middleware, serving and shutdown
//! - `routes.rs`: the shared `AppState` and the request handlers
//! - `utils.rs`: local network address detection for the startup banner
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the configured address (127.0.0.1:8501 by default)
//! starx srv
//!
//! # Listen on every interface, without CORS headers
//! starx srv --host 0.0.0.0 --port 9000 --no-cors
//! ```
//!
//! Server startup flow:
//! 1. Load configuration and merge CLI flags over `[server]`
//! 2. Build the dialogue agent, load its price model and the chat page templates
//! 3. Find an available port (if the requested one is in use)
//! 4. Serve until Ctrl+C or SIGTERM
//!
use crate::common::dialogue::DialogueAgent;
use crate::core::{config as app_config, templating};
use crate::core::error::Result;
use tracing::{info, warn};

pub use config::SrvArgs;

/// Merges CLI flags with the `[server]` configuration section.
pub mod config;

/// Request handlers and shared application state.
pub mod routes;

/// Contains the core Axum-based HTTP server implementation.
pub mod server_logic;

/// Network helpers for the startup banner.
pub mod utils;

/// # Handle Server Command (`handle_srv`)
///
/// The entry point for `starx srv`.
///
/// ## Errors
///
/// Returns an error if configuration is invalid, the chat templates fail to
/// load, no port can be bound, or the server fails while running.
pub async fn handle_srv(args: SrvArgs) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let app_cfg = app_config::load_config()?;
    let server_cfg = config::ServerConfig::resolve(&args, &app_cfg.server)?;
    info!("Effective server config: {:?}", server_cfg);

    let agent = DialogueAgent::from_config(&app_cfg, args.model.as_deref())?;
    // Quotes run while the session lock is held; load before serving.
    if let Err(e) = agent.warm_up() {
        warn!("Price model not loaded, quotes will fail until it exists: {:#}", e);
    }
    let templates = templating::chat_templates()?;
    let state = routes::AppState::new(agent, templates);

    server_logic::run_server(server_cfg, state).await
}
