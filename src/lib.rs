//! scoped-hotkeys: scope-aware keyboard shortcut parsing and matching
//!
//! Shortcuts are declared as text (`"ctrl+s"`, `"a+b, mod+k"`), compiled
//! into [`Hotkey`] descriptors, and matched against keyboard events by a
//! [`HotkeysProvider`] that only considers bindings whose scopes are active.
//!
//! ```
//! use scoped_hotkeys::{HotkeyOptions, HotkeysProvider, KeyboardEvent};
//!
//! let mut provider = HotkeysProvider::default();
//! provider.register("ctrl+s", |_, _| println!("save"), HotkeyOptions::default().with_scopes(["editor"]));
//! assert!(provider.hotkeys().is_empty());
//!
//! provider.activate_scope("editor");
//! let fired = provider.handle_event(&KeyboardEvent::down("s").with_ctrl());
//! assert_eq!(fired.len(), 1);
//! ```

pub mod config;
pub mod events;
pub mod hotkey;
pub mod ipc;
pub mod lifecycle;
pub mod provider;
pub mod registry;
pub mod scope;

pub use events::ProviderEvent;
pub use hotkey::{compile, split, Hotkey, KeyPhase, KeyboardEvent, MatchPolicy, ModifierMatch, Modifiers, Platform};
pub use provider::{HotkeyHandle, HotkeysProvider, ProviderConfig};
pub use registry::{HotkeyId, HotkeyOptions, Triggered};
pub use scope::{ScopeSet, WILDCARD_SCOPE};
