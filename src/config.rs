//! Configuration loading from the environment
//!
//! Nothing is persisted; every value comes from environment variables
//! with a built-in default.

use anyhow::{bail, Result};

use crate::hotkey::{self, ModifierMatch, Platform, DEFAULT_SPLIT_KEY};
use crate::provider::ProviderConfig;

/// Comma-separated scopes active at startup
pub const ENV_INITIAL_SCOPES: &str = "HOTKEYS_INITIAL_SCOPES";
/// `apple`, `other` or `auto`
pub const ENV_PLATFORM: &str = "HOTKEYS_PLATFORM";
/// `exact`, `subset` or `ignore`
pub const ENV_MODIFIER_MATCH: &str = "HOTKEYS_MODIFIER_MATCH";

/// Replay host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Scopes active when the provider starts
    pub initial_scopes: Vec<String>,

    /// Convention for resolving `mod`
    pub platform: Platform,

    /// Modifier policy applied to registrations that don't set one
    pub modifier_match: ModifierMatch,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let initial_scopes = lookup(ENV_INITIAL_SCOPES)
            .map(|raw| hotkey::split(&raw, DEFAULT_SPLIT_KEY))
            .unwrap_or_default();

        let platform = match lookup(ENV_PLATFORM).as_deref().map(str::trim) {
            None | Some("") | Some("auto") => Platform::current(),
            Some("apple") => Platform::Apple,
            Some("other") => Platform::Other,
            Some(other) => bail!("invalid {ENV_PLATFORM} value: {other:?}"),
        };

        let modifier_match = match lookup(ENV_MODIFIER_MATCH).as_deref().map(str::trim) {
            None | Some("") | Some("exact") => ModifierMatch::Exact,
            Some("subset") => ModifierMatch::Subset,
            Some("ignore") => ModifierMatch::Ignore,
            Some(other) => bail!("invalid {ENV_MODIFIER_MATCH} value: {other:?}"),
        };

        Ok(Self {
            initial_scopes,
            platform,
            modifier_match,
        })
    }

    /// Parameters for the provider this configuration drives
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            initial_scopes: self.initial_scopes.clone(),
            platform: self.platform,
        }
    }
}
