//! Ordered set of active scopes
//!
//! Transitions:
//! - activate while `"*"` is active replaces the wildcard
//! - activate otherwise appends in activation order
//! - deactivate of the last scope falls back to `"*"`

use std::fmt;

use tracing::debug;

use super::WILDCARD_SCOPE;

/// The active scopes of one provider; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSet {
    active: Vec<String>,
}

impl ScopeSet {
    /// Create a set from the initially active scopes
    ///
    /// Duplicates are dropped; an empty list yields `["*"]`.
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut active: Vec<String> = Vec::new();
        for scope in initial {
            let scope = scope.into();
            if !active.contains(&scope) {
                active.push(scope);
            }
        }
        if active.is_empty() {
            active.push(WILDCARD_SCOPE.to_string());
        }
        Self { active }
    }

    /// Active scopes in activation order
    pub fn as_slice(&self) -> &[String] {
        &self.active
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    pub fn is_active(&self, scope: &str) -> bool {
        self.active.iter().any(|s| s == scope)
    }

    /// True if any of `scopes` is currently active
    pub fn intersects(&self, scopes: &[String]) -> bool {
        scopes.iter().any(|s| self.is_active(s))
    }

    /// Activate a scope; returns whether the set changed
    pub fn activate(&mut self, scope: &str) -> bool {
        if self.is_active(WILDCARD_SCOPE) {
            if self.active.len() == 1 && scope == WILDCARD_SCOPE {
                return false;
            }
            debug!(scope, "replacing wildcard scope");
            self.active = vec![scope.to_string()];
            return true;
        }

        if self.is_active(scope) {
            return false;
        }

        self.active.push(scope.to_string());
        true
    }

    /// Deactivate a scope; returns whether the set changed
    pub fn deactivate(&mut self, scope: &str) -> bool {
        let before = self.active.len();
        self.active.retain(|s| s != scope);

        if self.active.is_empty() {
            self.active.push(WILDCARD_SCOPE.to_string());
            // Removing the sole "*" lands back on ["*"]
            return scope != WILDCARD_SCOPE;
        }

        self.active.len() != before
    }

    /// Deactivate if active, otherwise activate
    pub fn toggle(&mut self, scope: &str) -> bool {
        if self.is_active(scope) {
            self.deactivate(scope)
        } else {
            self.activate(scope)
        }
    }
}

impl Default for ScopeSet {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.active.join(", "))
    }
}
