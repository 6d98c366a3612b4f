//! Configuration loaded from `~/.config/pmstream/config.toml`.
//!
//! Every field has a default, so a missing file is not an error. Environment
//! variables (`PMSTREAM_*`) override values from the file.
//!
//! ```toml
//! api_base = "https://streamed.su/api"
//! premium_key = "..."
//! timeout_secs = 20
//! ```

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://streamed.su/api";
pub const DEFAULT_UNLOCK_BASE: &str = "https://api.alldebrid.com/v4";
pub const DEFAULT_AGENT: &str = "pmstream";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration injected into the pipeline.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog/media API.
    pub api_base: String,
    /// Base URL of the link-unlocking API.
    pub unlock_base: String,
    /// Credential for the unlocking service. Premium links are disabled
    /// when this is absent or blank.
    pub premium_key: Option<String>,
    /// Agent identifier sent to the unlocking service.
    pub agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            unlock_base: DEFAULT_UNLOCK_BASE.to_string(),
            premium_key: None,
            agent: DEFAULT_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Keep the credential out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base", &self.api_base)
            .field("unlock_base", &self.unlock_base)
            .field("premium_key", &self.premium_key.as_ref().map(|_| "<redacted>"))
            .field("agent", &self.agent)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load from the default path, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Load from an explicit file, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::from_file(path)?.with_env(|key| std::env::var(key).ok())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Apply `PMSTREAM_*` overrides using `lookup` to read variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a number or is zero, whether
    /// it came from the environment or the file.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PMSTREAM_API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = lookup("PMSTREAM_UNLOCK_BASE") {
            self.unlock_base = v;
        }
        if let Some(v) = lookup("PMSTREAM_PREMIUM_KEY") {
            self.premium_key = Some(v);
        }
        if let Some(v) = lookup("PMSTREAM_AGENT") {
            self.agent = v;
        }
        if let Some(v) = lookup("PMSTREAM_TIMEOUT_SECS") {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("PMSTREAM_TIMEOUT_SECS is not a number: {v}"))?;
        }
        ensure!(self.timeout_secs > 0, "timeout_secs must be at least 1 second");
        Ok(self)
    }

    /// The unlocking credential, if one is usable.
    pub fn premium_key(&self) -> Option<&str> {
        self.premium_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Whether premium unlocking is enabled.
    pub fn premium_enabled(&self) -> bool {
        self.premium_key().is_some()
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pmstream")
        .join("config.toml")
}
