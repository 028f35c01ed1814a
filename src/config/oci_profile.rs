//! Reader for OCI SDK config files (`~/.oci/config`).
//!
//! The file is INI-style: `[PROFILE]` headers followed by `key=value` lines.
//! Keys missing from a named profile fall back to `[DEFAULT]`.

use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::translation::RequestSigner;

pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// API-key credentials from one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciProfile {
    pub user: String,
    pub fingerprint: String,
    pub tenancy: String,
    pub key_file: PathBuf,
}

impl OciProfile {
    /// Reads `profile` from the config file at `path`.
    pub fn load(path: &Path, profile: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read OCI config file: {}", path.display()))?;

        Self::parse(&contents, profile)
            .with_context(|| format!("Invalid OCI config file: {}", path.display()))
    }

    pub fn parse(contents: &str, profile: &str) -> Result<Self> {
        let sections = parse_sections(contents);
        let defaults = sections.get(DEFAULT_PROFILE);
        let own = sections
            .get(profile)
            .ok_or_else(|| anyhow!("Profile '{profile}' not found"))?;

        let get = |key: &str| {
            own.get(key)
                .or_else(|| defaults.and_then(|s| s.get(key)))
                .cloned()
                .ok_or_else(|| anyhow!("Profile '{profile}' is missing '{key}'"))
        };

        Ok(Self {
            user: get("user")?,
            fingerprint: get("fingerprint")?,
            tenancy: get("tenancy")?,
            key_file: paths::expand_home(&get("key_file")?),
        })
    }

    /// `{tenancy}/{user}/{fingerprint}`, the signature key id.
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }

    /// Reads the private key and builds a request signer.
    pub fn signer(&self) -> Result<RequestSigner> {
        let pem = fs::read_to_string(&self.key_file).with_context(|| {
            format!("Failed to read OCI API key: {}", self.key_file.display())
        })?;

        RequestSigner::new(self.key_id(), &pem).with_context(|| {
            format!("Failed to load OCI API key: {}", self.key_file.display())
        })
    }
}

fn parse_sections(contents: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        if let (Some(section), Some((key, value))) = (&current, line.split_once('=')) {
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    sections
}
