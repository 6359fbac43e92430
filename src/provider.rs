//! Hotkeys provider: the context object tying scopes, registrations and matching together
//!
//! A provider owns one [`ScopeSet`] and one [`BindingRegistry`]. Every
//! mutation is followed by a synchronous recompute of the visible set,
//! so callers can query [`HotkeysProvider::hotkeys`] right after any call.
//! Changes are also announced on a broadcast channel for observers.

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::events::ProviderEvent;
use crate::hotkey::{self, Compiler, Hotkey, KeyPhase, KeyboardEvent, Platform, DEFAULT_SPLIT_KEY};
use crate::registry::{BindingRegistry, HotkeyId, HotkeyOptions, Triggered};
use crate::scope::ScopeSet;

/// Provider construction parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Scopes active at startup; empty means the wildcard
    pub initial_scopes: Vec<String>,
    /// Convention used to resolve `mod` in combinations
    pub platform: Platform,
}

/// Returned by [`HotkeysProvider::register`]; pass back to update or unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyHandle(HotkeyId);

impl HotkeyHandle {
    pub fn id(&self) -> HotkeyId {
        self.0
    }
}

impl From<HotkeyId> for HotkeyHandle {
    fn from(id: HotkeyId) -> Self {
        Self(id)
    }
}

/// Scope-aware hotkey registry and dispatcher
pub struct HotkeysProvider {
    scopes: ScopeSet,
    registry: BindingRegistry,
    compiler: Compiler,
    /// Keys currently held down, in press order
    pressed: Vec<String>,
    /// Channel for emitting change notifications
    event_tx: broadcast::Sender<ProviderEvent>,
}

impl HotkeysProvider {
    /// Create a provider with its own notification channel
    pub fn new(config: ProviderConfig) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self::with_events(config, event_tx)
    }

    /// Create a provider that emits notifications on an existing channel
    pub fn with_events(config: ProviderConfig, event_tx: broadcast::Sender<ProviderEvent>) -> Self {
        let scopes = ScopeSet::new(config.initial_scopes);
        info!(%scopes, platform = ?config.platform, "hotkeys provider created");

        Self {
            scopes,
            registry: BindingRegistry::new(),
            compiler: Compiler::new(config.platform),
            pressed: Vec::new(),
            event_tx,
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.event_tx.subscribe()
    }

    /// Active scopes in activation order
    pub fn active_scopes(&self) -> &[String] {
        self.scopes.as_slice()
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    /// Hotkeys visible under the active scopes, in registration order
    pub fn hotkeys(&self) -> Vec<&Hotkey> {
        self.registry.visible_hotkeys()
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn activate_scope(&mut self, scope: &str) {
        if self.scopes.activate(scope) {
            self.scope_changed(scope, true);
        }
    }

    pub fn deactivate_scope(&mut self, scope: &str) {
        if self.scopes.deactivate(scope) {
            self.scope_changed(scope, false);
        }
    }

    pub fn toggle_scope(&mut self, scope: &str) {
        if self.scopes.toggle(scope) {
            let activated = self.scopes.is_active(scope);
            self.scope_changed(scope, activated);
        }
    }

    /// Register one or more combinations with a callback
    ///
    /// `keys` may hold several combinations separated by the options'
    /// split key. An empty string registers an entry that never fires.
    pub fn register<F>(&mut self, keys: &str, callback: F, options: HotkeyOptions) -> HotkeyHandle
    where
        F: FnMut(&KeyboardEvent, &Hotkey) + Send + 'static,
    {
        let hotkeys = self.compile_entry(keys, &options);
        let count = hotkeys.len();
        let id = self.registry.insert(hotkeys, options, Box::new(callback));

        info!(%id, keys, count, "hotkey registered");
        self.emit(ProviderEvent::HotkeyRegistered { id, count });
        self.refresh();

        HotkeyHandle(id)
    }

    /// Re-register with new combinations or options, keeping firing order
    ///
    /// Returns false if the handle was already unregistered.
    pub fn update(&mut self, handle: HotkeyHandle, keys: &str, options: HotkeyOptions) -> bool {
        let hotkeys = self.compile_entry(keys, &options);
        let count = hotkeys.len();
        if !self.registry.replace(handle.0, hotkeys, options) {
            debug!(id = %handle.0, "update of unknown hotkey ignored");
            return false;
        }

        info!(id = %handle.0, keys, count, "hotkey updated");
        self.emit(ProviderEvent::HotkeyUpdated { id: handle.0, count });
        self.refresh();
        true
    }

    /// Remove a registration; a second call is a no-op returning false
    pub fn unregister(&mut self, handle: HotkeyHandle) -> bool {
        if !self.registry.remove(handle.0) {
            return false;
        }

        info!(id = %handle.0, "hotkey unregistered");
        self.emit(ProviderEvent::HotkeyUnregistered { id: handle.0 });
        self.refresh();
        true
    }

    /// Feed one keyboard event through the visible bindings
    ///
    /// Invokes the callback of every matching hotkey and returns what fired.
    pub fn handle_event(&mut self, event: &KeyboardEvent) -> Vec<Triggered> {
        self.track_pressed(event);

        let fired = self.registry.dispatch(event);
        for triggered in &fired {
            debug!(id = %triggered.id, hotkey = %triggered.hotkey, "hotkey triggered");
            self.emit(ProviderEvent::HotkeyTriggered {
                id: triggered.id,
                combination: triggered.hotkey.to_string(),
            });
        }

        fired
    }

    /// Keys currently held down, normalized, in press order
    pub fn pressed_keys(&self) -> &[String] {
        &self.pressed
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        let key = hotkey::normalize(key);
        self.pressed.iter().any(|k| *k == key)
    }

    /// True if every key of a comma-separated list is held
    pub fn is_hotkey_pressed(&self, keys: &str) -> bool {
        let keys = hotkey::split(keys, DEFAULT_SPLIT_KEY);
        !keys.is_empty() && keys.iter().all(|key| self.is_key_pressed(key))
    }

    /// Forget all held keys, e.g. after the input surface lost focus
    pub fn clear_pressed(&mut self) {
        self.pressed.clear();
    }

    fn track_pressed(&mut self, event: &KeyboardEvent) {
        let key = event.normalized_key();
        match event.phase {
            KeyPhase::Down => {
                if !key.is_empty() && !self.pressed.contains(&key) {
                    self.pressed.push(key);
                }
            }
            // macOS drops key-up events for keys released while meta is held
            KeyPhase::Up if key == "meta" => self.pressed.clear(),
            KeyPhase::Up => self.pressed.retain(|k| *k != key),
        }
    }

    fn compile_entry(&self, keys: &str, options: &HotkeyOptions) -> Vec<Hotkey> {
        let scopes = options.effective_scopes();
        self.compiler
            .compile_all(
                keys,
                &options.split_key,
                &options.combination_key,
                options.description.as_deref(),
            )
            .into_iter()
            .map(|hotkey| hotkey.with_scopes(scopes.iter().cloned()))
            .collect()
    }

    /// Announce a scope transition and refresh the visible set
    fn scope_changed(&mut self, scope: &str, activated: bool) {
        let active = self.scopes.as_slice().to_vec();
        let event = if activated {
            info!(scope, active = %self.scopes, "scope activated");
            ProviderEvent::ScopeActivated {
                scope: scope.to_string(),
                active,
            }
        } else {
            info!(scope, active = %self.scopes, "scope deactivated");
            ProviderEvent::ScopeDeactivated {
                scope: scope.to_string(),
                active,
            }
        };
        self.emit(event);
        self.refresh();
    }

    /// Recompute the visible set after a change
    fn refresh(&mut self) {
        self.registry.recompute(&self.scopes);
    }

    fn emit(&self, event: ProviderEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

impl Default for HotkeysProvider {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}
