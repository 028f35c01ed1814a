//! XDG-style path utilities for the configuration directory.
//!
//! Prefers XDG Base Directory conventions over OS-specific locations.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "oci-translator";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/oci-translator` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/oci-translator` otherwise
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".config").join(APP_DIR))
}

/// Returns the default config file path.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the OCI SDK config file, `~/.oci/config`.
pub fn oci_config_file() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".oci").join("config"))
}

/// Expands a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_dir_default() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };

        let dir = config_dir().unwrap();
        assert!(dir.ends_with(".config/oci-translator"));

        // Restore
        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", "/custom/config") };

        assert_eq!(
            config_dir().unwrap(),
            PathBuf::from("/custom/config/oci-translator")
        );
        assert_eq!(
            config_file().unwrap(),
            PathBuf::from("/custom/config/oci-translator/config.toml")
        );

        // Restore
        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        } else {
            unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
        }
    }

    #[test]
    fn test_oci_config_file_under_home() {
        assert!(oci_config_file().unwrap().ends_with(".oci/config"));
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~/.oci/key.pem"), home.join(".oci/key.pem"));
        assert_eq!(expand_home("/etc/oci/key.pem"), PathBuf::from("/etc/oci/key.pem"));
        assert_eq!(expand_home("keys/~/x"), PathBuf::from("keys/~/x"));
    }
}
