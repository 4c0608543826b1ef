//! # StarX Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the configuration system for StarX, handling loading,
//! merging, validation, and access to configuration data. It supports a multi-level
//! configuration approach that combines defaults, user settings, and project-specific
//! overrides.
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - Configuration is loaded from multiple sources in order of precedence
//! - The model path is expanded (e.g., `~` to home directory)
//! - Configuration is validated for correctness before use
//! - Structured data models ensure type safety
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (applied by the individual commands)
//! 2. Project-specific `.starx.toml` in current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! [assistant]
//! name = "StarX"
//! greeting_match = "longest-match"
//! on_invalid_input = "retain"
//!
//! [model]
//! path = "~/models/linear_model.toml"
//! location = 2
//! fuel_type = 1
//! company = 3
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8501
//! ```
//!
//! Loading and using configuration:
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let defaults = cfg.vehicle_defaults()?;
//! println!("Quotes assume {} / {}", defaults.fuel_type, defaults.company);
//! ```
//!
use crate::common::dialogue::{MatchPolicy, RecoveryPolicy};
use crate::common::prediction::{Company, FuelType, VehicleDefaults};
use crate::core::error::{Result, StarxError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::IpAddr;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

/// How the assistant talks and recovers.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Name shown in front of replies.
    #[serde(default = "default_assistant_name")]
    pub name: String,
    /// Resolution when several greeting phrases match.
    #[serde(default)]
    pub greeting_match: MatchPolicy,
    /// State after a failed price-range or purchase-detail step.
    #[serde(default)]
    pub on_invalid_input: RecoveryPolicy,
}

/// The stored price model and the vehicle fields the assistant fills in itself.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Path to the TOML model artifact (can use ~). Will be expanded.
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Location category code.
    #[serde(default = "default_location")]
    pub location: u32,
    /// Fuel type code (1–7).
    #[serde(default = "default_fuel_type")]
    pub fuel_type: u8,
    /// Manufacturer code (1–24).
    #[serde(default = "default_company")]
    pub company: u8,
}

/// Defaults for `starx srv`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_assistant_name() -> String {
    "StarX".to_string()
}
fn default_model_path() -> String {
    "models/linear_model.toml".to_string()
}
fn default_location() -> u32 {
    2
}
fn default_fuel_type() -> u8 {
    FuelType::Petrol.code()
}
fn default_company() -> u8 {
    Company::Honda.code()
}
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}
fn default_server_port() -> u16 {
    8501
}
fn default_enable_cors() -> bool {
    true
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            greeting_match: MatchPolicy::default(),
            on_invalid_input: RecoveryPolicy::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            location: default_location(),
            fuel_type: default_fuel_type(),
            company: default_company(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Config {
    /// The implicit vehicle fields used for chat quotes.
    pub fn vehicle_defaults(&self) -> Result<VehicleDefaults> {
        let fuel_type = FuelType::from_code(self.model.fuel_type).ok_or_else(|| {
            StarxError::Config(format!(
                "model.fuel_type must be between 1 and 7, got {}",
                self.model.fuel_type
            ))
        })?;
        let company = Company::from_code(self.model.company).ok_or_else(|| {
            StarxError::Config(format!(
                "model.company must be between 1 and 24, got {}",
                self.model.company
            ))
        })?;
        Ok(VehicleDefaults {
            location: self.model.location,
            fuel_type,
            company,
        })
    }

    /// Path of the model artifact, after `~` expansion.
    pub fn model_path(&self) -> PathBuf {
        PathBuf::from(&self.model.path)
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".starx.toml";

/// # Load Configuration (`load_config`)
///
/// Loads the user and project configuration files (both optional), merges
/// them over the built-in defaults, expands paths and validates the result.
///
/// ## Errors
///
/// Returns an error if a configuration file exists but cannot be read or
/// parsed, or if the merged configuration fails validation.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(
        user_config.unwrap_or_default(),
        project_config.unwrap_or_default(),
    );
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "StarX", "starx") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.starx.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.starx.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// One configuration file as written. Fields it leaves out fall through to
/// the next layer down.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    assistant: AssistantFile,
    #[serde(default)]
    model: ModelFile,
    #[serde(default)]
    server: ServerFile,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct AssistantFile {
    name: Option<String>,
    greeting_match: Option<MatchPolicy>,
    on_invalid_input: Option<RecoveryPolicy>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    path: Option<String>,
    location: Option<u32>,
    fuel_type: Option<u8>,
    company: Option<u8>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    host: Option<String>,
    port: Option<u16>,
    enable_cors: Option<bool>,
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let mut file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    if let Some(base) = path.parent() {
        anchor_model_path(&mut file, base);
    }
    Ok(file)
}

/// A relative `model.path` is relative to the file that names it.
fn anchor_model_path(file: &mut ConfigFile, base: &Path) {
    if let Some(model_path) = file.model.path.as_mut() {
        let expanded = PathBuf::from(shellexpand::tilde(model_path.as_str()).into_owned());
        if expanded.is_relative() {
            *model_path = base.join(expanded).to_string_lossy().into_owned();
            debug!("Resolved relative model path to {}", model_path);
        }
    }
}

/// Any value the project file sets wins over the user file, which wins over the defaults.
fn merge_configs(user: ConfigFile, project: ConfigFile) -> Config {
    let defaults = Config::default();

    let assistant = AssistantConfig {
        name: project
            .assistant
            .name
            .or(user.assistant.name)
            .unwrap_or(defaults.assistant.name),
        greeting_match: project
            .assistant
            .greeting_match
            .or(user.assistant.greeting_match)
            .unwrap_or(defaults.assistant.greeting_match),
        on_invalid_input: project
            .assistant
            .on_invalid_input
            .or(user.assistant.on_invalid_input)
            .unwrap_or(defaults.assistant.on_invalid_input),
    };

    let model = ModelConfig {
        path: project
            .model
            .path
            .or(user.model.path)
            .unwrap_or(defaults.model.path),
        location: project
            .model
            .location
            .or(user.model.location)
            .unwrap_or(defaults.model.location),
        fuel_type: project
            .model
            .fuel_type
            .or(user.model.fuel_type)
            .unwrap_or(defaults.model.fuel_type),
        company: project
            .model
            .company
            .or(user.model.company)
            .unwrap_or(defaults.model.company),
    };

    let server = ServerSettings {
        host: project
            .server
            .host
            .or(user.server.host)
            .unwrap_or(defaults.server.host),
        port: project
            .server
            .port
            .or(user.server.port)
            .unwrap_or(defaults.server.port),
        enable_cors: project
            .server
            .enable_cors
            .or(user.server.enable_cors)
            .unwrap_or(defaults.server.enable_cors),
    };

    Config {
        assistant,
        model,
        server,
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    config.model.path = shellexpand::tilde(&config.model.path).into_owned();
    debug!("Expanded model path: {}", config.model.path);
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.assistant.name.trim().is_empty() {
        return Err(anyhow!(StarxError::Config(
            "assistant.name cannot be empty.".to_string()
        )));
    }
    if config.model.path.trim().is_empty() {
        return Err(anyhow!(StarxError::Config(
            "model.path cannot be empty.".to_string()
        )));
    }
    config.vehicle_defaults()?;
    if config.server.host.parse::<IpAddr>().is_err() {
        return Err(anyhow!(StarxError::Config(format!(
            "Invalid server host '{}'. Expected an IP address.",
            config.server.host
        ))));
    }
    let model_path = config.model_path();
    if !model_path.exists() {
        // Only the chat quote and predict flows need it; they report the error per use.
        warn!(
            "Configured model artifact '{}' does not exist.",
            model_path.display()
        );
    }
    info!("Configuration validation successful.");
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [assistant]
            name = "Dealer Bot"
            greeting_match = "longest-match"

            [model]
            path = "~/models/price.toml"
            company = 13

            [server]
            port = 9000
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.assistant.name, "Dealer Bot");
        assert_eq!(config.assistant.greeting_match, MatchPolicy::LongestMatch);
        assert_eq!(config.assistant.on_invalid_input, RecoveryPolicy::Reset); // Default
        assert_eq!(config.model.path, "~/models/price.toml"); // Not yet expanded
        assert_eq!(config.model.company, 13);
        assert_eq!(config.model.fuel_type, 1); // Default
        assert_eq!(config.model.location, 2); // Default
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1"); // Default
        assert!(config.server.enable_cors); // Default
    }

    #[test]
    fn test_empty_toml_matches_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[model]\nalpha = 0.1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            model: ModelConfig {
                path: "~/price_model.toml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        expand_config_paths(&mut config).unwrap();

        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.model.path,
            home_dir.join("price_model.toml").to_string_lossy()
        );
    }

    fn file(toml_text: &str) -> ConfigFile {
        toml::from_str(toml_text).expect("Failed to parse config file")
    }

    #[test]
    fn test_merge_layers_project_over_user_over_defaults() {
        let user = file(
            r#"
            [assistant]
            name = "User Bot"
            [model]
            path = "/user/model.toml"
            company = 4
            "#,
        );
        let project = file(
            r#"
            [model]
            company = 8
            [server]
            port = 9100
            "#,
        );

        let merged = merge_configs(user, project);

        assert_eq!(merged.assistant.name, "User Bot"); // Project left unset
        assert_eq!(merged.model.path, "/user/model.toml");
        assert_eq!(merged.model.company, 8); // Project override
        assert_eq!(merged.server.port, 9100);
        assert_eq!(merged.model.location, 2); // Default
    }

    #[test]
    fn test_merge_project_value_equal_to_default_still_wins() {
        let user = file(
            r#"
            [assistant]
            on_invalid_input = "retain"
            [server]
            enable_cors = false
            "#,
        );
        let project = file(
            r#"
            [assistant]
            on_invalid_input = "reset"
            [server]
            enable_cors = true
            "#,
        );

        let merged = merge_configs(user, project);

        assert_eq!(merged.assistant.on_invalid_input, RecoveryPolicy::Reset);
        assert!(merged.server.enable_cors);
    }

    #[test]
    fn test_merge_without_project_keeps_user_values() {
        let user = file("[server]\nenable_cors = false\n");
        let merged = merge_configs(user, ConfigFile::default());
        assert!(!merged.server.enable_cors);
        assert_eq!(merged.server.port, 8501);
    }

    #[test]
    fn test_merge_of_empty_files_is_default() {
        let merged = merge_configs(ConfigFile::default(), ConfigFile::default());
        assert_eq!(merged, Config::default());
    }

    #[test]
    fn test_relative_model_path_resolves_against_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILENAME);
        fs::write(&path, "[model]\npath = \"models/price.toml\"\n").unwrap();

        let loaded = load_config_from_path(&path).unwrap();

        assert_eq!(
            loaded.model.path.as_deref().map(PathBuf::from),
            Some(dir.path().join("models/price.toml"))
        );
    }

    #[test]
    fn test_absolute_and_home_model_paths_are_left_alone() {
        let mut absolute = file("[model]\npath = \"/srv/model.toml\"\n");
        anchor_model_path(&mut absolute, Path::new("/etc/starx"));
        assert_eq!(absolute.model.path.as_deref(), Some("/srv/model.toml"));

        let mut home = file("[model]\npath = \"~/model.toml\"\n");
        anchor_model_path(&mut home, Path::new("/etc/starx"));
        assert_eq!(home.model.path.as_deref(), Some("~/model.toml"));
    }

    #[test]
    fn test_find_project_config_in_ancestor() {
        let root = tempdir().unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = find_project_config_path(&nested).unwrap();
        assert_eq!(found, root.path().join(PROJECT_CONFIG_FILENAME));
    }

    #[test]
    fn test_find_project_config_stops_at_git_root() {
        let root = tempdir().unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        let repo = root.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert!(find_project_config_path(&repo).is_none());
    }

    #[test]
    fn test_validate_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_invalid_codes() {
        let config = Config {
            model: ModelConfig {
                fuel_type: 9,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("model.fuel_type must be between 1 and 7"));

        let config = Config {
            model: ModelConfig {
                company: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_host() {
        let config = Config {
            server: ServerSettings {
                host: "localhost:80".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid server host"));
    }

    #[test]
    fn test_vehicle_defaults_from_codes() {
        let defaults = Config::default().vehicle_defaults().unwrap();
        assert_eq!(defaults.location, 2);
        assert_eq!(defaults.fuel_type, FuelType::Petrol);
        assert_eq!(defaults.company, Company::Honda);
    }

    #[test]
    fn test_load_config_from_path_reports_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[assistant\nname = ").unwrap();
        let err = load_config_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }
}
