//! Registry module: the live collection of registered hotkeys
//!
//! Each registration owns one entry holding its compiled hotkeys,
//! options and callback. The registry caches which entries are
//! visible under the current scopes.

mod options;
mod store;

pub use options::HotkeyOptions;
pub use store::{BindingRegistry, HotkeyCallback, HotkeyId, Triggered};
