//! # Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `starx srv` takes its address and CORS setting from the `[server]` table
//! of the StarX configuration. Flags given on the command line win over the
//! file; flags left out fall back to it.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8501
//! enable_cors = true
//! ```
//!
use crate::core::config::ServerSettings;
use crate::core::error::{Result, StarxError};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::debug;

/// # Server Arguments (`SrvArgs`)
#[derive(Parser, Debug)]
#[command(about = "Serve the web chat page and JSON API")]
pub struct SrvArgs {
    /// Network address to bind to. Use `0.0.0.0` to listen on every interface.
    /// Defaults to `[server].host` (127.0.0.1).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on; the next free port is used if it is taken.
    /// Defaults to `[server].port` (8501).
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Disables Cross-Origin Resource Sharing (CORS) headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Price model artifact to use instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,
}

/// The effective settings the server runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
}

impl ServerConfig {
    /// # Resolve Effective Settings (`resolve`)
    ///
    /// ## Errors
    ///
    /// Returns `StarxError::Config` if no host flag was given and the
    /// configured host is not an IP address.
    pub fn resolve(args: &SrvArgs, settings: &ServerSettings) -> Result<Self> {
        let host = match args.host {
            Some(host) => host,
            None => settings.host.parse().map_err(|e| {
                StarxError::Config(format!("server.host '{}' is invalid: {}", settings.host, e))
            })?,
        };
        let port = args.port.unwrap_or(settings.port);
        let enable_cors = settings.enable_cors && !args.no_cors;

        debug!(
            "Resolved server config: host={} port={} cors={}",
            host, port, enable_cors
        );
        Ok(Self {
            host,
            port,
            enable_cors,
        })
    }
}
