//! Events module for provider change notifications
//!
//! Every mutation of a provider's scopes or registrations, and every
//! fired hotkey, is announced as a structured event.

use serde::{Deserialize, Serialize};

use crate::registry::HotkeyId;

/// Events emitted by a provider after its state changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderEvent {
    /// A scope became active
    ScopeActivated {
        scope: String,
        /// Active scopes after the change
        active: Vec<String>,
    },

    /// A scope was deactivated
    ScopeDeactivated {
        scope: String,
        /// Active scopes after the change
        active: Vec<String>,
    },

    /// A new registration was added
    HotkeyRegistered { id: HotkeyId, count: usize },

    /// A registration's combinations or options were replaced
    HotkeyUpdated { id: HotkeyId, count: usize },

    /// A registration was removed
    HotkeyUnregistered { id: HotkeyId },

    /// A hotkey fired for a keyboard event
    HotkeyTriggered {
        id: HotkeyId,
        /// Display form of the compiled combination
        combination: String,
    },
}

impl std::fmt::Display for ProviderEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderEvent::ScopeActivated { scope, .. } => write!(f, "SCOPE_ACTIVATED ({})", scope),
            ProviderEvent::ScopeDeactivated { scope, .. } => {
                write!(f, "SCOPE_DEACTIVATED ({})", scope)
            }
            ProviderEvent::HotkeyRegistered { id, count } => {
                write!(f, "HOTKEY_REGISTERED ({} x{})", id, count)
            }
            ProviderEvent::HotkeyUpdated { id, count } => {
                write!(f, "HOTKEY_UPDATED ({} x{})", id, count)
            }
            ProviderEvent::HotkeyUnregistered { id } => write!(f, "HOTKEY_UNREGISTERED ({})", id),
            ProviderEvent::HotkeyTriggered { id, combination } => {
                write!(f, "HOTKEY_TRIGGERED ({} {})", id, combination)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ProviderEvent::ScopeActivated {
            scope: "editor".to_string(),
            active: vec!["editor".to_string()],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("scope_activated"));
        assert!(json.contains("editor"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"hotkey_unregistered","id":3}"#;
        let event: ProviderEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ProviderEvent::HotkeyUnregistered { id: HotkeyId(3) });
    }

    #[test]
    fn test_event_display() {
        let event = ProviderEvent::HotkeyTriggered {
            id: HotkeyId(1),
            combination: "ctrl+s".to_string(),
        };
        assert_eq!(event.to_string(), "HOTKEY_TRIGGERED (#1 ctrl+s)");
    }
}
