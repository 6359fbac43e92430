//! Compiled hotkey descriptor

use std::fmt;

use serde::{Deserialize, Serialize};

use super::keys::Modifiers;
use crate::scope::WILDCARD_SCOPE;

/// One compiled combination string plus its metadata
///
/// Immutable once compiled; re-registering with new options produces
/// a fresh `Hotkey` rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotkey {
    /// Canonical non-modifier keys, deduplicated, in first-seen order
    pub keys: Vec<String>,
    /// Modifier flags required by this binding
    pub modifiers: Modifiers,
    /// Separator the combination was compiled with
    pub combination_key: String,
    /// Optional free text shown in help listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scopes this binding belongs to; never empty
    pub scopes: Vec<String>,
}

impl Hotkey {
    /// Replace the scopes, falling back to the wildcard when none are given
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for scope in scopes {
            let scope = scope.into();
            if !deduped.contains(&scope) {
                deduped.push(scope);
            }
        }
        if deduped.is_empty() {
            deduped.push(WILDCARD_SCOPE.to_string());
        }
        self.scopes = deduped;
        self
    }

    /// True for bindings visible regardless of the active scopes
    pub fn is_global(&self) -> bool {
        self.scopes.iter().any(|s| s == WILDCARD_SCOPE)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = self.combination_key.as_str();
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.ctrl {
            parts.push("ctrl");
        }
        if self.modifiers.shift {
            parts.push("shift");
        }
        if self.modifiers.alt {
            parts.push("alt");
        }
        if self.modifiers.meta {
            parts.push("meta");
        }
        parts.extend(self.keys.iter().map(String::as_str));
        write!(f, "{}", parts.join(sep))
    }
}
