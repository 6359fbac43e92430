//! Key name normalization and modifier classification
//!
//! Provides the canonical spelling for raw key tokens, the set of
//! recognized modifier aliases, and a struct for tracking modifier state.

use serde::{Deserialize, Serialize};

/// Modifier aliases that contribute to flag state instead of the key set
const MODIFIER_TOKENS: &[&str] = &[
    "ctrl", "control", "shift", "alt", "option", "meta", "cmd", "command", "super", "windows",
    "mod",
];

/// A modifier key after alias resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKey {
    Ctrl,
    Shift,
    Alt,
    Meta,
    /// Platform-abstract: Meta on Apple platforms, Ctrl elsewhere
    Mod,
}

/// Platform convention used to resolve the `mod` alias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// macOS / iOS: `mod` means Command (meta)
    Apple,
    /// Everything else: `mod` means Control
    Other,
}

impl Platform {
    /// The platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            Self::Apple
        } else {
            Self::Other
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Modifier flags of a binding or of a keyboard event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Check if no modifier is set
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.shift && !self.alt && !self.meta
    }

    /// Check if every flag set in `self` is also set in `other`
    pub fn is_subset_of(&self, other: &Modifiers) -> bool {
        (!self.ctrl || other.ctrl)
            && (!self.shift || other.shift)
            && (!self.alt || other.alt)
            && (!self.meta || other.meta)
    }

    /// Set the flag for a modifier key, resolving `Mod` for the given platform
    pub fn set(&mut self, key: ModifierKey, platform: Platform) {
        match key {
            ModifierKey::Ctrl => self.ctrl = true,
            ModifierKey::Shift => self.shift = true,
            ModifierKey::Alt => self.alt = true,
            ModifierKey::Meta => self.meta = true,
            ModifierKey::Mod => match platform {
                Platform::Apple => self.meta = true,
                Platform::Other => self.ctrl = true,
            },
        }
    }
}

/// Check whether a token names a modifier (case-insensitive)
pub fn is_modifier(token: &str) -> bool {
    let token = token.trim().to_lowercase();
    MODIFIER_TOKENS.contains(&token.as_str())
}

/// Classify a modifier token; `None` for ordinary keys
pub fn modifier_kind(token: &str) -> Option<ModifierKey> {
    match token.trim().to_lowercase().as_str() {
        "ctrl" | "control" => Some(ModifierKey::Ctrl),
        "shift" => Some(ModifierKey::Shift),
        "alt" | "option" => Some(ModifierKey::Alt),
        "meta" | "cmd" | "command" | "super" | "windows" => Some(ModifierKey::Meta),
        "mod" => Some(ModifierKey::Mod),
        _ => None,
    }
}

/// Canonicalize a raw key token
///
/// Lower-cases and trims the token, then maps known aliases and
/// physical key codes to a stable name. Unknown tokens pass through
/// lower-cased; this never fails.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        // A bare space is the space key; the empty token stays empty
        return if raw.is_empty() {
            String::new()
        } else {
            "Space".to_string()
        };
    }

    let lower = trimmed.to_lowercase();
    let named = match lower.as_str() {
        "esc" | "escape" => "Escape",
        "space" | "spacebar" => "Space",
        "return" | "enter" => "Enter",
        "tab" => "Tab",
        "backspace" => "Backspace",
        "del" | "delete" => "Delete",
        "ins" | "insert" => "Insert",
        "home" => "Home",
        "end" => "End",
        "pageup" | "pgup" => "PageUp",
        "pagedown" | "pgdn" => "PageDown",
        "up" | "arrowup" => "ArrowUp",
        "down" | "arrowdown" => "ArrowDown",
        "left" | "arrowleft" => "ArrowLeft",
        "right" | "arrowright" => "ArrowRight",
        "shiftleft" | "shiftright" => "shift",
        "control" | "controlleft" | "controlright" => "ctrl",
        "option" | "altleft" | "altright" => "alt",
        "cmd" | "command" | "super" | "windows" | "os" => "meta",
        "metaleft" | "metaright" | "osleft" | "osright" => "meta",
        _ => return fold_code(lower),
    };

    named.to_string()
}

/// Fold physical key codes (`KeyA`, `Digit1`, `Numpad1`, `F5`) onto key names
fn fold_code(lower: String) -> String {
    if let Some(rest) = lower.strip_prefix("key") {
        if rest.len() == 1 && rest.chars().all(|c| c.is_ascii_alphabetic()) {
            return rest.to_string();
        }
    }

    for prefix in ["digit", "numpad"] {
        if let Some(rest) = lower.strip_prefix(prefix) {
            if rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()) {
                return rest.to_string();
            }
        }
    }

    if let Some(rest) = lower.strip_prefix('f') {
        if let Ok(n @ 1..=24) = rest.parse::<u8>() {
            return format!("F{n}");
        }
    }

    lower
}
