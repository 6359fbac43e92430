//! Hotkey module: parsing, compiling and matching keyboard shortcuts
//!
//! Everything here is pure; no module in this tree holds state.

mod binding;
pub mod keys;
pub mod matcher;
pub mod parse;

pub use binding::Hotkey;
pub use keys::{is_modifier, normalize, ModifierKey, Modifiers, Platform};
pub use matcher::{match_event, matches, KeyPhase, KeyboardEvent, MatchPolicy, ModifierMatch};
pub use parse::{compile, split, Compiler, DEFAULT_COMBINATION_KEY, DEFAULT_SPLIT_KEY};
