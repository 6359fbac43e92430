//! Binding store with a cached visible set

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::options::HotkeyOptions;
use crate::hotkey::{match_event, Hotkey, KeyboardEvent};
use crate::scope::ScopeSet;

/// Callback invoked when one of a registration's hotkeys fires
pub type HotkeyCallback = Box<dyn FnMut(&KeyboardEvent, &Hotkey) + Send + 'static>;

/// Identity of one registration; ids increase in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotkeyId(pub u64);

impl fmt::Display for HotkeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A hotkey that fired for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triggered {
    pub id: HotkeyId,
    pub hotkey: Hotkey,
}

struct Entry {
    hotkeys: Vec<Hotkey>,
    options: HotkeyOptions,
    callback: HotkeyCallback,
}

impl Entry {
    fn is_visible(&self, scopes: &ScopeSet) -> bool {
        self.options.enabled
            && self
                .hotkeys
                .iter()
                .any(|hotkey| hotkey.is_global() || scopes.intersects(&hotkey.scopes))
    }
}

/// All registered hotkeys, keyed by registration
#[derive(Default)]
pub struct BindingRegistry {
    entries: BTreeMap<HotkeyId, Entry>,
    /// Entries passing the scope filter, in registration order
    visible: Vec<HotkeyId>,
    next_id: u64,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a registration and return its id
    ///
    /// The visible set is stale until the next [`recompute`](Self::recompute).
    pub fn insert(&mut self, hotkeys: Vec<Hotkey>, options: HotkeyOptions, callback: HotkeyCallback) -> HotkeyId {
        let id = HotkeyId(self.next_id);
        self.next_id += 1;
        debug!(%id, count = hotkeys.len(), "hotkey entry inserted");
        self.entries.insert(
            id,
            Entry {
                hotkeys,
                options,
                callback,
            },
        );
        id
    }

    /// Swap the hotkeys and options of an existing registration
    ///
    /// The entry keeps its id, callback and place in firing order.
    pub fn replace(&mut self, id: HotkeyId, hotkeys: Vec<Hotkey>, options: HotkeyOptions) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.hotkeys = hotkeys;
                entry.options = options;
                debug!(%id, "hotkey entry replaced");
                true
            }
            None => false,
        }
    }

    /// Remove a registration; false if it was already gone
    pub fn remove(&mut self, id: HotkeyId) -> bool {
        let removed = self.entries.remove(&id).is_some();
        if removed {
            debug!(%id, "hotkey entry removed");
        }
        removed
    }

    pub fn contains(&self, id: HotkeyId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compiled hotkeys of one registration
    pub fn hotkeys_of(&self, id: HotkeyId) -> Option<&[Hotkey]> {
        self.entries.get(&id).map(|entry| entry.hotkeys.as_slice())
    }

    /// Rebuild the visible set against the given scopes
    pub fn recompute(&mut self, scopes: &ScopeSet) {
        self.visible = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_visible(scopes))
            .map(|(id, _)| *id)
            .collect();
        trace!(visible = self.visible.len(), total = self.entries.len(), %scopes, "visible set recomputed");
    }

    /// Ids of visible registrations in registration order
    pub fn visible_ids(&self) -> &[HotkeyId] {
        &self.visible
    }

    /// Visible hotkeys flattened in registration order
    pub fn visible_hotkeys(&self) -> Vec<&Hotkey> {
        self.visible
            .iter()
            .filter_map(|id| self.entries.get(id))
            .flat_map(|entry| entry.hotkeys.iter())
            .collect()
    }

    /// Run the matcher over visible entries and invoke callbacks
    pub fn dispatch(&mut self, event: &KeyboardEvent) -> Vec<Triggered> {
        let mut fired = Vec::new();

        for id in &self.visible {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };

            for hotkey in match_event(event, &entry.hotkeys, &entry.options.policy) {
                (entry.callback)(event, hotkey);
                fired.push(Triggered {
                    id: *id,
                    hotkey: hotkey.clone(),
                });
            }
        }

        fired
    }
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("entries", &self.entries.len())
            .field("visible", &self.visible)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::hotkey::compile;

    fn scoped(combination: &str, scopes: &[&str]) -> Vec<Hotkey> {
        vec![compile(combination, "+", None).with_scopes(scopes.iter().copied())]
    }

    fn noop() -> HotkeyCallback {
        Box::new(|_: &KeyboardEvent, _: &Hotkey| {})
    }

    #[test]
    fn test_visibility_follows_scopes() {
        let mut registry = BindingRegistry::new();
        registry.insert(scoped("a", &["foo"]), HotkeyOptions::default(), noop());

        registry.recompute(&ScopeSet::new(["foo"]));
        assert_eq!(registry.visible_hotkeys().len(), 1);

        registry.recompute(&ScopeSet::new(["bar"]));
        assert!(registry.visible_hotkeys().is_empty());

        registry.recompute(&ScopeSet::default());
        assert!(registry.visible_hotkeys().is_empty());
    }

    #[test]
    fn test_global_always_visible() {
        let mut registry = BindingRegistry::new();
        registry.insert(scoped("a", &["*"]), HotkeyOptions::default(), noop());
        registry.insert(scoped("b", &["foo", "*"]), HotkeyOptions::default(), noop());

        registry.recompute(&ScopeSet::new(["bar"]));
        assert_eq!(registry.visible_hotkeys().len(), 2);
    }

    #[test]
    fn test_replace_changes_visibility() {
        let mut registry = BindingRegistry::new();
        let id = registry.insert(scoped("a", &["foo"]), HotkeyOptions::default(), noop());
        let scopes = ScopeSet::new(["foo"]);
        registry.recompute(&scopes);
        assert_eq!(registry.visible_hotkeys().len(), 1);

        assert!(registry.replace(id, scoped("a", &["bar"]), HotkeyOptions::default()));
        assert!(registry.contains(id));
        assert_eq!(registry.hotkeys_of(id).map(|h| h[0].scopes.clone()), Some(vec!["bar".to_string()]));
        registry.recompute(&scopes);
        assert_eq!(registry.visible_hotkeys().len(), 0);
    }

    #[test]
    fn test_remove_twice() {
        let mut registry = BindingRegistry::new();
        let id = registry.insert(scoped("a", &["*"]), HotkeyOptions::default(), noop());
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_disabled_entries_hidden() {
        let mut registry = BindingRegistry::new();
        registry.insert(scoped("a", &["*"]), HotkeyOptions::default().enabled(false), noop());
        registry.recompute(&ScopeSet::default());
        assert!(registry.visible_ids().is_empty());
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = BindingRegistry::new();

        for (name, scope) in [("first", "foo"), ("second", "bar"), ("third", "baz")] {
            let log = Arc::clone(&log);
            registry.insert(
                scoped("ctrl+k", &[scope]),
                HotkeyOptions::default(),
                Box::new(move |_: &KeyboardEvent, _: &Hotkey| log.lock().unwrap().push(name)),
            );
        }

        registry.recompute(&ScopeSet::new(["foo", "bar"]));
        let fired = registry.dispatch(&KeyboardEvent::down("k").with_ctrl());

        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].id, HotkeyId(0));
        assert_eq!(fired[1].id, HotkeyId(1));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }
}
