//! Scope module for tracking which logical contexts are active
//!
//! A scope is a named context such as `"editor"` or `"modal"`. The
//! wildcard scope `"*"` is active whenever nothing else is.

mod set;

pub use set::ScopeSet;

/// Sentinel scope that is always visible and active by default
pub const WILDCARD_SCOPE: &str = "*";
