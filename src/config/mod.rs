mod manager;
mod oci_profile;

pub use manager::{
    AuthConfig, ConfigFile, ConfigManager, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    EnvConfig, OciConfig, ResolveOptions, ResolvedConfig, ServerConfig, resolve_config,
};
pub use oci_profile::{DEFAULT_PROFILE, OciProfile};
