//! Matching keyboard events against compiled hotkeys

use serde::{Deserialize, Serialize};

use super::binding::Hotkey;
use super::keys::{self, Modifiers};

/// Whether a key went down or came up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPhase {
    #[default]
    Down,
    Up,
}

/// A keyboard event as delivered by the host input surface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    /// Raw key token; normalized before comparison
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
    /// Auto-repeat from a held key
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub phase: KeyPhase,
}

impl KeyboardEvent {
    /// A key-down event with no modifiers held
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// A key-up event with no modifiers held
    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            phase: KeyPhase::Up,
            ..Default::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.ctrl = modifiers.ctrl;
        self.shift = modifiers.shift;
        self.alt = modifiers.alt;
        self.meta = modifiers.meta;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Modifier state held during this event
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl,
            shift: self.shift,
            alt: self.alt,
            meta: self.meta,
        }
    }

    /// The event key in canonical form
    pub fn normalized_key(&self) -> String {
        keys::normalize(&self.key)
    }
}

/// How a binding's modifier flags are compared with the event's
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierMatch {
    /// Every flag must equal the event state; a plain `a` does not fire on ctrl+a
    #[default]
    Exact,
    /// Flags set on the binding must be held; extra held modifiers are allowed
    Subset,
    /// Modifiers are not checked at all
    Ignore,
}

/// Per-registration matching policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    /// Fire on key-down
    pub keydown: bool,
    /// Fire on key-up
    pub keyup: bool,
    /// Suppress auto-repeat events
    pub ignore_repeat: bool,
    pub modifier_match: ModifierMatch,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            keydown: true,
            keyup: false,
            ignore_repeat: false,
            modifier_match: ModifierMatch::Exact,
        }
    }
}

/// Check whether a single hotkey fires for an event
pub fn matches(event: &KeyboardEvent, hotkey: &Hotkey, policy: &MatchPolicy) -> bool {
    let phase_enabled = match event.phase {
        KeyPhase::Down => policy.keydown,
        KeyPhase::Up => policy.keyup,
    };
    if !phase_enabled {
        return false;
    }

    if event.repeat && policy.ignore_repeat {
        return false;
    }

    let held = event.modifiers();
    let modifiers_ok = match policy.modifier_match {
        ModifierMatch::Exact => hotkey.modifiers == held,
        ModifierMatch::Subset => hotkey.modifiers.is_subset_of(&held),
        ModifierMatch::Ignore => true,
    };
    if !modifiers_ok {
        return false;
    }

    hotkey.keys.is_empty() || hotkey.keys.contains(&event.normalized_key())
}

/// Select every hotkey that fires for an event, preserving input order
pub fn match_event<'a, I>(event: &KeyboardEvent, hotkeys: I, policy: &MatchPolicy) -> Vec<&'a Hotkey>
where
    I: IntoIterator<Item = &'a Hotkey>,
{
    hotkeys
        .into_iter()
        .filter(|hotkey| matches(event, hotkey, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::parse::compile;

    #[test]
    fn test_plain_key_matches() {
        let hotkey = compile("a", "+", None);
        assert!(matches(&KeyboardEvent::down("a"), &hotkey, &MatchPolicy::default()));
        assert!(matches(&KeyboardEvent::down("A"), &hotkey, &MatchPolicy::default()));
        assert!(matches(&KeyboardEvent::down("KeyA"), &hotkey, &MatchPolicy::default()));
        assert!(!matches(&KeyboardEvent::down("b"), &hotkey, &MatchPolicy::default()));
    }

    #[test]
    fn test_exact_modifiers() {
        let plain = compile("a", "+", None);
        let ctrl_a = KeyboardEvent::down("a").with_ctrl();
        assert!(!matches(&ctrl_a, &plain, &MatchPolicy::default()));

        let with_ctrl = compile("ctrl+a", "+", None);
        assert!(matches(&ctrl_a, &with_ctrl, &MatchPolicy::default()));
        assert!(!matches(&KeyboardEvent::down("a"), &with_ctrl, &MatchPolicy::default()));
        assert!(!matches(
            &KeyboardEvent::down("a").with_ctrl().with_shift(),
            &with_ctrl,
            &MatchPolicy::default()
        ));
    }

    #[test]
    fn test_subset_and_ignore_policies() {
        let with_ctrl = compile("ctrl+a", "+", None);
        let event = KeyboardEvent::down("a").with_ctrl().with_shift();
        let subset = MatchPolicy {
            modifier_match: ModifierMatch::Subset,
            ..Default::default()
        };
        assert!(matches(&event, &with_ctrl, &subset));
        assert!(!matches(&KeyboardEvent::down("a"), &with_ctrl, &subset));

        let ignore = MatchPolicy {
            modifier_match: ModifierMatch::Ignore,
            ..Default::default()
        };
        assert!(matches(&KeyboardEvent::down("a"), &with_ctrl, &ignore));
    }

    #[test]
    fn test_modifier_only_binding() {
        let hotkey = compile("ctrl+shift", "+", None);
        let event = KeyboardEvent::down("Shift").with_ctrl().with_shift();
        assert!(matches(&event, &hotkey, &MatchPolicy::default()));
        assert!(!matches(&KeyboardEvent::down("Shift").with_shift(), &hotkey, &MatchPolicy::default()));
    }

    #[test]
    fn test_phase() {
        let hotkey = compile("a", "+", None);
        assert!(!matches(&KeyboardEvent::up("a"), &hotkey, &MatchPolicy::default()));

        let keyup_only = MatchPolicy {
            keydown: false,
            keyup: true,
            ..Default::default()
        };
        assert!(matches(&KeyboardEvent::up("a"), &hotkey, &keyup_only));
        assert!(!matches(&KeyboardEvent::down("a"), &hotkey, &keyup_only));
    }

    #[test]
    fn test_repeat_suppression() {
        let hotkey = compile("a", "+", None);
        let event = KeyboardEvent::down("a").repeating();
        assert!(matches(&event, &hotkey, &MatchPolicy::default()));

        let no_repeat = MatchPolicy {
            ignore_repeat: true,
            ..Default::default()
        };
        assert!(!matches(&event, &hotkey, &no_repeat));
        assert!(matches(&KeyboardEvent::down("a"), &hotkey, &no_repeat));
    }

    #[test]
    fn test_literal_separator_key() {
        let hotkey = compile("ctrl++", "+", None);
        assert!(matches(&KeyboardEvent::down("+").with_ctrl(), &hotkey, &MatchPolicy::default()));
    }

    #[test]
    fn test_match_event_preserves_order() {
        let hotkeys = vec![
            compile("b", "+", None),
            compile("a", "+", Some("first a")),
            compile("ctrl+a", "+", None),
            compile("a", "+", Some("second a")),
        ];
        let matched = match_event(&KeyboardEvent::down("a"), &hotkeys, &MatchPolicy::default());
        let descriptions: Vec<_> = matched.iter().map(|h| h.description.as_deref()).collect();
        assert_eq!(descriptions, vec![Some("first a"), Some("second a")]);
    }

    #[test]
    fn test_event_deserialization_defaults() {
        let event: KeyboardEvent = serde_json::from_str(r#"{"key":"s","ctrl":true}"#).unwrap();
        assert_eq!(event.phase, KeyPhase::Down);
        assert!(event.ctrl && !event.repeat);
    }
}
