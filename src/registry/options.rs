//! Registration options

use serde::{Deserialize, Serialize};

use crate::hotkey::{MatchPolicy, ModifierMatch, DEFAULT_COMBINATION_KEY, DEFAULT_SPLIT_KEY};
use crate::scope::WILDCARD_SCOPE;

/// Options accepted when registering a hotkey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyOptions {
    /// Scopes the hotkeys belong to; empty means the wildcard
    pub scopes: Vec<String>,
    /// Separator between combinations
    pub split_key: String,
    /// Separator between tokens of one combination
    pub combination_key: String,
    pub description: Option<String>,
    /// Disabled registrations stay registered but never fire
    pub enabled: bool,
    #[serde(flatten)]
    pub policy: MatchPolicy,
}

impl Default for HotkeyOptions {
    fn default() -> Self {
        Self {
            scopes: vec![WILDCARD_SCOPE.to_string()],
            split_key: DEFAULT_SPLIT_KEY.to_string(),
            combination_key: DEFAULT_COMBINATION_KEY.to_string(),
            description: None,
            enabled: true,
            policy: MatchPolicy::default(),
        }
    }
}

impl HotkeyOptions {
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_split_key(mut self, split_key: impl Into<String>) -> Self {
        self.split_key = split_key.into();
        self
    }

    pub fn with_combination_key(mut self, combination_key: impl Into<String>) -> Self {
        self.combination_key = combination_key.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Fire on key-up and/or key-down
    pub fn on_phases(mut self, keydown: bool, keyup: bool) -> Self {
        self.policy.keydown = keydown;
        self.policy.keyup = keyup;
        self
    }

    pub fn ignore_repeat(mut self) -> Self {
        self.policy.ignore_repeat = true;
        self
    }

    pub fn with_modifier_match(mut self, modifier_match: ModifierMatch) -> Self {
        self.policy.modifier_match = modifier_match;
        self
    }

    /// Scopes with the empty-list fallback applied
    pub fn effective_scopes(&self) -> Vec<String> {
        if self.scopes.is_empty() {
            vec![WILDCARD_SCOPE.to_string()]
        } else {
            self.scopes.clone()
        }
    }
}
