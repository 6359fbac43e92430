//! Replay message protocol definitions
//!
//! All messages are single-line JSON objects tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::hotkey::{Hotkey, KeyboardEvent, ModifierMatch};
use crate::registry::{HotkeyId, HotkeyOptions, Triggered};

/// Requests from the host to the session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Deliver a keyboard event
    Key { event: KeyboardEvent },

    /// Register combinations; omitted options use the configured defaults
    Register {
        keys: String,
        #[serde(default)]
        options: RequestOptions,
    },

    /// Replace the combinations or options of a registration
    Update {
        id: HotkeyId,
        keys: String,
        #[serde(default)]
        options: RequestOptions,
    },

    Unregister { id: HotkeyId },

    ActivateScope { scope: String },

    DeactivateScope { scope: String },

    ToggleScope { scope: String },

    /// Request a snapshot of the provider
    Status,

    /// Ping to check the session is alive
    Ping,
}

/// Registration options as sent on the wire
///
/// Every field is optional so that the session can tell an omitted
/// field from one set to its default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combination_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keydown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_repeat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_match: Option<ModifierMatch>,
}

impl RequestOptions {
    /// Fill omitted fields from the defaults; `modifier_match` falls back
    /// to the host's configured policy
    pub fn resolve(self, default_modifier_match: ModifierMatch) -> HotkeyOptions {
        let defaults = HotkeyOptions::default();
        let mut options = HotkeyOptions {
            scopes: self.scopes.unwrap_or(defaults.scopes),
            split_key: self.split_key.unwrap_or(defaults.split_key),
            combination_key: self.combination_key.unwrap_or(defaults.combination_key),
            description: self.description,
            enabled: self.enabled.unwrap_or(defaults.enabled),
            policy: defaults.policy,
        };
        options.policy.keydown = self.keydown.unwrap_or(options.policy.keydown);
        options.policy.keyup = self.keyup.unwrap_or(options.policy.keyup);
        options.policy.ignore_repeat = self.ignore_repeat.unwrap_or(options.policy.ignore_repeat);
        options.policy.modifier_match = self.modifier_match.unwrap_or(default_modifier_match);
        options
    }
}

/// Responses from the session to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Registered { id: HotkeyId },

    /// Outcome of update/unregister
    Ack { changed: bool },

    /// Active scopes after a scope request
    Scopes { active: Vec<String> },

    /// One hotkey fired for the last key event
    Triggered(Triggered),

    /// A key event was processed; `count` hotkeys fired
    Handled { count: usize },

    Status(ProviderStatus),

    Pong,

    Error { code: String, message: String },
}

/// Snapshot of a provider's observable state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub active_scopes: Vec<String>,
    /// Hotkeys visible under the active scopes
    pub hotkeys: Vec<Hotkey>,
    /// Keys currently held
    pub pressed: Vec<String>,
}

/// Errors decoding or encoding protocol lines
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed request: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtocolError {
    /// Stable code reported in error responses
    pub fn code(&self) -> &'static str {
        match self {
            ProtocolError::Malformed(_) => "malformed_request",
            ProtocolError::Encode(_) => "encode_failed",
        }
    }
}

impl From<&ProtocolError> for Response {
    fn from(err: &ProtocolError) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Parse one request line
pub fn decode_request(line: &str) -> Result<Request, ProtocolError> {
    serde_json::from_str(line.trim()).map_err(ProtocolError::Malformed)
}

/// Serialize one response as a line without the trailing newline
pub fn encode_response(response: &Response) -> Result<String, ProtocolError> {
    serde_json::to_string(response).map_err(ProtocolError::Encode)
}
