use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use super::oci_profile::{DEFAULT_PROFILE, OciProfile};
use crate::paths;
use crate::translation::{OciAuth, OciSettings};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_AUTH_TOKEN_ENV: &str = "OCI_AUTH_TOKEN";
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Settings in the `[oci]` section of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OciConfig {
    /// Model OCID or name, e.g. `cohere.command-r-plus`.
    pub model_id: Option<String>,
    /// Inference endpoint, e.g. `https://inference.generativeai.us-chicago-1.oci.oraclecloud.com`.
    pub service_endpoint: Option<String>,
    /// Compartment OCID billed for the calls.
    pub compartment_id: Option<String>,
    /// Bearer token stored directly in config (not recommended).
    pub auth_token: Option<String>,
    /// Environment variable name containing the bearer token.
    pub auth_token_env: Option<String>,
    /// OCI SDK config file used for API-key signing (default `~/.oci/config`).
    pub config_file: Option<String>,
    /// Profile within that file (default `DEFAULT`).
    pub profile: Option<String>,
    /// Timeout for one model call, in seconds.
    pub timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Settings in the `[server]` section of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/oci-translator/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub oci: OciConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Values read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub model_id: Option<String>,
    pub service_endpoint: Option<String>,
    pub compartment_id: Option<String>,
    pub oci_config_file: Option<String>,
    pub oci_profile: Option<String>,
    pub timeout_secs: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Builds from an explicit set of variables. Empty values count as unset.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        let get = |key: &str| vars.get(key).cloned();

        Self {
            model_id: get("OCI_MODEL_ID"),
            service_endpoint: get("OCI_SERVICE_ENDPOINT"),
            compartment_id: get("OCI_COMPARTMENT_ID"),
            oci_config_file: get("OCI_CONFIG_FILE"),
            oci_profile: get("OCI_CONFIG_PROFILE"),
            timeout_secs: get("OCI_TIMEOUT_SECS"),
            host: get("HOST"),
            port: get("PORT"),
            vars,
        }
    }

    /// Looks up an arbitrary variable, e.g. the one named by `auth_token_env`.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// CLI overrides. These take precedence over everything else.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub compartment: Option<String>,
    pub profile: Option<String>,
    pub timeout_secs: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// How the service authenticates to OCI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// Bearer token sent as-is.
    Token(String),
    /// API-key signing with credentials from an OCI SDK config profile.
    ApiKey { config_file: PathBuf, profile: String },
}

impl AuthConfig {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Token(_) => "bearer_token",
            Self::ApiKey { .. } => "api_key",
        }
    }
}

/// Configuration after merging CLI, environment, config file and defaults.
///
/// Built once at start-up and never changed afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_id: String,
    pub service_endpoint: String,
    pub compartment_id: String,
    pub auth: AuthConfig,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    /// IP address or hostname to bind.
    pub host: String,
    pub port: u16,
}

impl ResolvedConfig {
    /// `host:port`, with IPv6 literals bracketed.
    pub fn listen_addr(&self) -> String {
        if self.host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Builds client settings, loading the OCI profile and key for API-key auth.
    pub fn oci_settings(&self) -> Result<OciSettings> {
        let auth = match &self.auth {
            AuthConfig::Token(token) => OciAuth::Token(token.clone()),
            AuthConfig::ApiKey {
                config_file,
                profile,
            } => OciAuth::ApiKey(OciProfile::load(config_file, profile)?.signer()?),
        };

        Ok(OciSettings {
            model_id: self.model_id.clone(),
            service_endpoint: self.service_endpoint.clone(),
            compartment_id: self.compartment_id.clone(),
            auth,
            timeout: self.timeout,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }
}

/// Accepts IP literals and DNS-style hostnames such as `localhost`.
fn is_valid_host(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok()
        || (!host.is_empty()
            && host.len() <= 253
            && host.split('.').all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            }))
}

fn missing(name: &str, flag: &str, env: &str, key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Missing required configuration: '{name}'\n\n\
         Please provide it via:\n  \
         - CLI option: oci-translator {flag} <value>\n  \
         - Environment variable: {env} (a .env file is loaded at start-up)\n  \
         - Config file: [oci] {key} in ~/.config/oci-translator/config.toml"
    )
}

/// Resolves configuration by merging CLI options, environment and config file.
///
/// Priority (highest first): CLI, environment, config file, built-in defaults.
///
/// # Errors
///
/// Returns an error if a required setting is missing or a value does not parse.
pub fn resolve_config(
    options: &ResolveOptions,
    env: &EnvConfig,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let oci = &config_file.oci;

    let model_id = options
        .model
        .as_ref()
        .or(env.model_id.as_ref())
        .or(oci.model_id.as_ref())
        .cloned()
        .ok_or_else(|| missing("model_id", "--model", "OCI_MODEL_ID", "model_id"))?;

    let service_endpoint = options
        .endpoint
        .as_ref()
        .or(env.service_endpoint.as_ref())
        .or(oci.service_endpoint.as_ref())
        .cloned()
        .ok_or_else(|| {
            missing(
                "service_endpoint",
                "--endpoint",
                "OCI_SERVICE_ENDPOINT",
                "service_endpoint",
            )
        })?;

    if !service_endpoint.starts_with("http://") && !service_endpoint.starts_with("https://") {
        bail!("Invalid service endpoint '{service_endpoint}': must start with http:// or https://");
    }

    let compartment_id = options
        .compartment
        .as_ref()
        .or(env.compartment_id.as_ref())
        .or(oci.compartment_id.as_ref())
        .cloned()
        .ok_or_else(|| {
            missing(
                "compartment_id",
                "--compartment",
                "OCI_COMPARTMENT_ID",
                "compartment_id",
            )
        })?;

    // Token env var wins over a token written into the file
    let token_env = oci
        .auth_token_env
        .as_deref()
        .unwrap_or(DEFAULT_AUTH_TOKEN_ENV);
    let auth_token = env
        .var(token_env)
        .map(str::to_string)
        .or_else(|| oci.auth_token.clone());

    // Without a token, sign requests with an OCI API key
    let auth = match auth_token {
        Some(token) => AuthConfig::Token(token),
        None => {
            let config_file = match env.oci_config_file.as_ref().or(oci.config_file.as_ref()) {
                Some(path) => paths::expand_home(path),
                None => paths::oci_config_file()?,
            };
            let profile = options
                .profile
                .as_ref()
                .or(env.oci_profile.as_ref())
                .or(oci.profile.as_ref())
                .cloned()
                .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
            AuthConfig::ApiKey {
                config_file,
                profile,
            }
        }
    };

    let env_timeout = env
        .timeout_secs
        .as_deref()
        .map(|s| {
            s.parse::<u64>()
                .with_context(|| format!("OCI_TIMEOUT_SECS must be a whole number of seconds, got '{s}'"))
        })
        .transpose()?;
    let timeout_secs = options
        .timeout_secs
        .or(env_timeout)
        .or(oci.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        bail!("Timeout must be at least 1 second");
    }

    let host = options
        .host
        .as_ref()
        .or(env.host.as_ref())
        .or(config_file.server.host.as_ref())
        .map_or(DEFAULT_HOST, String::as_str)
        .to_string();
    if !is_valid_host(&host) {
        bail!("Host must be an IP address or hostname, got '{host}'");
    }

    let env_port = env
        .port
        .as_deref()
        .map(|p| {
            p.parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{p}'"))
        })
        .transpose()?;
    let port = options
        .port
        .or(env_port)
        .or(config_file.server.port)
        .unwrap_or(DEFAULT_PORT);

    Ok(ResolvedConfig {
        model_id,
        service_endpoint,
        compartment_id,
        auth,
        timeout: Duration::from_secs(timeout_secs),
        temperature: oci.temperature.unwrap_or(0.0),
        max_tokens: oci.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        host,
        port,
    })
}

/// Loads the optional configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the default location.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/oci-translator/config.toml`
    /// or `~/.config/oci-translator/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_file()?,
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        Ok(config_file)
    }

    /// Loads the file if it exists. A missing file yields the defaults; a
    /// broken one is still an error.
    pub fn load_if_exists(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}
