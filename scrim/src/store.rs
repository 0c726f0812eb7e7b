//! Value ownership: controlled vs. uncontrolled stores.
//!
//! A [`ValueStore`] owns the canonical selection of one widget instance. Who
//! gets to mutate it is decided once, at construction, by [`ValueMode`]:
//!
//! - `Controlled`: an external owner holds the real state. `request` never
//!   mutates the store; it computes the next selection and emits it through
//!   the change callback, and the owner feeds the accepted value back via
//!   [`ValueStore::sync`].
//! - `Uncontrolled`: the store holds the real state. `request` mutates it,
//!   then the change callback fires as a notification.
//!
//! [`OpenState`] is the boolean analogue for open/closed disclosure state
//! (dialogs, popovers, menus) with the same ownership split.

use std::sync::{Arc, RwLock};

use crate::selection::Selection;
use crate::toggle::{TogglePolicy, toggle};

/// Callback invoked with the next selection after every accepted request.
pub type ChangeCallback = Arc<dyn Fn(&Selection) + Send + Sync>;

/// Callback invoked with the next open flag after every accepted request.
pub type OpenCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Who owns a widget's value, decided once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueMode {
    /// External state is the source of truth; the payload is its value at
    /// construction time.
    Controlled(Selection),
    /// The store is the source of truth; the payload is the initial value.
    Uncontrolled(Selection),
}

/// The canonical value of one widget instance.
///
/// Cheap to clone; clones share state. All selection changes flow through
/// [`toggle`], so the store never holds a selection its policy forbids.
pub struct ValueStore {
    policy: TogglePolicy,
    controlled: bool,
    selection: Arc<RwLock<Selection>>,
    on_change: Arc<RwLock<Option<ChangeCallback>>>,
}

impl ValueStore {
    /// Create a store with an explicit mode.
    pub fn new(policy: TogglePolicy, mode: ValueMode) -> Self {
        let (controlled, selection) = match mode {
            ValueMode::Controlled(value) => (true, value),
            ValueMode::Uncontrolled(initial) => (false, initial),
        };
        Self {
            policy,
            controlled,
            selection: Arc::new(RwLock::new(selection)),
            on_change: Arc::new(RwLock::new(None)),
        }
    }

    /// Create an uncontrolled store with an empty initial selection.
    pub fn uncontrolled(policy: TogglePolicy) -> Self {
        Self::new(policy, ValueMode::Uncontrolled(Selection::new()))
    }

    /// Create a controlled store mirroring an external value.
    pub fn controlled(policy: TogglePolicy, value: Selection) -> Self {
        Self::new(policy, ValueMode::Controlled(value))
    }

    /// Register the change callback. Replaces any previous one.
    pub fn set_on_change<F>(&self, callback: F)
    where
        F: Fn(&Selection) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.on_change.write() {
            *guard = Some(Arc::new(callback));
        }
    }

    /// Get a clone of the current selection.
    pub fn read(&self) -> Selection {
        self.selection
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Check if a value is currently selected.
    pub fn contains(&self, value: &str) -> bool {
        self.selection
            .read()
            .map(|guard| guard.contains(value))
            .unwrap_or(false)
    }

    /// The toggle policy this store applies.
    pub fn policy(&self) -> TogglePolicy {
        self.policy
    }

    /// Whether an external owner holds the real state.
    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Request a toggle of `value`.
    ///
    /// Applies the store's policy to the current selection, mutates local
    /// state only in uncontrolled mode, and emits the result through the
    /// change callback either way. Returns the computed next selection.
    pub fn request(&self, value: &str) -> Selection {
        let next = if self.controlled {
            toggle(self.read(), value, self.policy)
        } else {
            match self.selection.write() {
                Ok(mut guard) => {
                    let next = toggle(std::mem::take(&mut *guard), value, self.policy);
                    *guard = next.clone();
                    next
                }
                Err(_) => return Selection::new(),
            }
        };
        self.emit(&next);
        next
    }

    /// Request removal of one value, preserving the order of the rest.
    ///
    /// Unlike [`ValueStore::request`] under a membership-toggle policy this
    /// never adds: an absent value is a no-op and emits nothing.
    pub fn remove(&self, value: &str) -> Selection {
        let current = self.read();
        if !current.contains(value) {
            return current;
        }
        let mut next = current;
        next.remove(value);
        if !self.controlled
            && let Ok(mut guard) = self.selection.write()
        {
            *guard = next.clone();
        }
        self.emit(&next);
        next
    }

    /// Request clearing the whole selection. Always emits, so callers can
    /// treat it as "the user asked for empty" even when already empty.
    pub fn clear(&self) -> Selection {
        let next = Selection::new();
        if !self.controlled
            && let Ok(mut guard) = self.selection.write()
        {
            *guard = next.clone();
        }
        self.emit(&next);
        next
    }

    /// Feed the externally accepted value back into a controlled store.
    ///
    /// Uncontrolled stores own their state; a `sync` against one is a mode
    /// violation and is ignored with a warning.
    pub fn sync(&self, value: Selection) {
        if !self.controlled {
            log::warn!("sync on an uncontrolled value store ignored; mode is locked at construction");
            return;
        }
        if let Ok(mut guard) = self.selection.write() {
            *guard = value;
        }
    }

    fn emit(&self, next: &Selection) {
        let callback = self
            .on_change
            .read()
            .ok()
            .and_then(|guard| guard.clone());
        if let Some(callback) = callback {
            callback(next);
        }
    }
}

impl std::fmt::Debug for ValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueStore")
            .field("policy", &self.policy)
            .field("controlled", &self.controlled)
            .field("selection", &self.read())
            .finish()
    }
}

impl Clone for ValueStore {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            controlled: self.controlled,
            selection: Arc::clone(&self.selection),
            on_change: Arc::clone(&self.on_change),
        }
    }
}

/// Who owns a widget's open flag, decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Controlled(bool),
    Uncontrolled(bool),
}

/// Open/closed disclosure state with the controlled/uncontrolled split.
pub struct OpenState {
    controlled: bool,
    open: Arc<RwLock<bool>>,
    on_change: Arc<RwLock<Option<OpenCallback>>>,
}

impl OpenState {
    /// Create an open state with an explicit mode.
    pub fn new(mode: OpenMode) -> Self {
        let (controlled, open) = match mode {
            OpenMode::Controlled(open) => (true, open),
            OpenMode::Uncontrolled(initial) => (false, initial),
        };
        Self {
            controlled,
            open: Arc::new(RwLock::new(open)),
            on_change: Arc::new(RwLock::new(None)),
        }
    }

    /// Create an uncontrolled open state, initially closed.
    pub fn uncontrolled() -> Self {
        Self::new(OpenMode::Uncontrolled(false))
    }

    /// Create a controlled open state mirroring an external flag.
    pub fn controlled(open: bool) -> Self {
        Self::new(OpenMode::Controlled(open))
    }

    /// Register the open-change callback. Replaces any previous one.
    pub fn set_on_change<F>(&self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.on_change.write() {
            *guard = Some(Arc::new(callback));
        }
    }

    /// Whether the disclosure is currently open.
    pub fn is_open(&self) -> bool {
        self.open.read().map(|guard| *guard).unwrap_or(false)
    }

    /// Whether an external owner holds the real state.
    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Request a new open flag. Mutates only in uncontrolled mode; emits the
    /// requested flag through the callback either way.
    pub fn set_open(&self, open: bool) {
        if !self.controlled
            && let Ok(mut guard) = self.open.write()
        {
            *guard = open;
        }
        let callback = self
            .on_change
            .read()
            .ok()
            .and_then(|guard| guard.clone());
        if let Some(callback) = callback {
            callback(open);
        }
    }

    /// Request opening.
    pub fn open(&self) {
        self.set_open(true);
    }

    /// Request closing.
    pub fn close(&self) {
        self.set_open(false);
    }

    /// Request flipping the open flag.
    pub fn toggle(&self) {
        self.set_open(!self.is_open());
    }

    /// Feed the externally accepted flag back into a controlled state.
    pub fn sync(&self, open: bool) {
        if !self.controlled {
            log::warn!("sync on an uncontrolled open state ignored; mode is locked at construction");
            return;
        }
        if let Ok(mut guard) = self.open.write() {
            *guard = open;
        }
    }
}

impl std::fmt::Debug for OpenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenState")
            .field("controlled", &self.controlled)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Clone for OpenState {
    fn clone(&self) -> Self {
        Self {
            controlled: self.controlled,
            open: Arc::clone(&self.open),
            on_change: Arc::clone(&self.on_change),
        }
    }
}

impl Default for OpenState {
    fn default() -> Self {
        Self::uncontrolled()
    }
}
