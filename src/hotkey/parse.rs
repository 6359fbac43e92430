//! Combination string splitting and compilation
//!
//! `"ctrl+s, mod+shift+k"` is first split into combinations on the
//! split key, then each combination is compiled into a [`Hotkey`] by
//! splitting on the combination key and classifying every token.

use super::binding::Hotkey;
use super::keys::{self, Modifiers, Platform};
use crate::scope::WILDCARD_SCOPE;

/// Separator between independent combinations
pub const DEFAULT_SPLIT_KEY: &str = ",";

/// Separator between the tokens of one combination
pub const DEFAULT_COMBINATION_KEY: &str = "+";

/// Split a multi-binding string into trimmed, non-empty combinations
pub fn split(input: &str, split_key: &str) -> Vec<String> {
    if split_key.is_empty() {
        let trimmed = input.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    input
        .split(split_key)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Compile one combination using the current platform's `mod` convention
pub fn compile(combination: &str, combination_key: &str, description: Option<&str>) -> Hotkey {
    Compiler::default().compile(combination, combination_key, description)
}

/// Hotkey compiler with an explicit platform convention
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    pub platform: Platform,
}

impl Compiler {
    /// Create a compiler for the given platform
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Compile one combination string into a [`Hotkey`]
    ///
    /// Never fails: unknown tokens become literal keys, and an empty
    /// token between separators is the separator key itself.
    pub fn compile(&self, combination: &str, combination_key: &str, description: Option<&str>) -> Hotkey {
        let mut modifiers = Modifiers::default();
        let mut keys: Vec<String> = Vec::new();

        if !combination.trim().is_empty() {
            let tokens: Vec<&str> = if combination_key.is_empty() {
                vec![combination]
            } else {
                combination.trim().split(combination_key).collect()
            };

            for token in tokens {
                let key = if token.is_empty() {
                    // "ctrl++" binds the separator itself
                    combination_key.to_string()
                } else if let Some(kind) = keys::modifier_kind(token) {
                    modifiers.set(kind, self.platform);
                    continue;
                } else {
                    keys::normalize(token)
                };

                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }

        Hotkey {
            keys,
            modifiers,
            combination_key: combination_key.to_string(),
            description: description.map(str::to_string),
            scopes: vec![WILDCARD_SCOPE.to_string()],
        }
    }

    /// Split and compile every combination of a multi-binding string
    pub fn compile_all(
        &self,
        input: &str,
        split_key: &str,
        combination_key: &str,
        description: Option<&str>,
    ) -> Vec<Hotkey> {
        split(input, split_key)
            .iter()
            .map(|combination| self.compile(combination, combination_key, description))
            .collect()
    }
}
