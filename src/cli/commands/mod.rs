//! Subcommand implementations.

/// Config display command handler.
pub mod config;

/// Server command handler.
pub mod serve;

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::SettingsArgs;
use crate::config::{ConfigManager, EnvConfig, ResolveOptions, ResolvedConfig, resolve_config};

/// Loads `.env`, the config file and the environment, then merges them with
/// the CLI flags.
pub fn load_config(settings: &SettingsArgs) -> Result<ResolvedConfig> {
    match settings.env_file.as_deref() {
        Some(path) => {
            dotenvy::from_path(Path::new(path))
                .with_context(|| format!("Failed to load env file: {path}"))?;
        }
        None => {
            // ./.env is optional
            let _ = dotenvy::dotenv();
        }
    }

    let manager = match settings.config.as_deref() {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let config_file = if settings.config.is_some() {
        manager.load()?
    } else {
        manager.load_if_exists()?
    };

    let options = ResolveOptions {
        model: settings.model.clone(),
        endpoint: settings.endpoint.clone(),
        compartment: settings.compartment.clone(),
        profile: settings.profile.clone(),
        timeout_secs: settings.timeout,
        host: settings.host.clone(),
        port: settings.port,
    };

    resolve_config(&options, &EnvConfig::from_env(), &config_file)
}
