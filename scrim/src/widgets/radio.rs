//! Radio group widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::event::{EventResult, Key};
use crate::selection::Selection;
use crate::store::{ValueMode, ValueStore};
use crate::toggle::TogglePolicy;

/// Unique identifier for a RadioGroup widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RadioGroupId(usize);

impl RadioGroupId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for RadioGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__radio_group_{}", self.0)
    }
}

/// A group of mutually exclusive options.
///
/// Selecting always replaces; a checked option can never be unchecked except
/// by checking another. A disabled group ignores every interaction.
pub struct RadioGroup {
    /// Unique identifier for this radio group instance
    id: RadioGroupId,
    /// The checked value
    store: ValueStore,
    /// Whether the whole group ignores interaction
    disabled: Arc<AtomicBool>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl RadioGroup {
    /// Create an uncontrolled radio group with nothing checked.
    pub fn new() -> Self {
        Self {
            id: RadioGroupId::new(),
            store: ValueStore::uncontrolled(TogglePolicy::Radio),
            disabled: Arc::new(AtomicBool::new(false)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the initially checked value (uncontrolled). Ignored when an
    /// external value was already supplied; the external value wins.
    pub fn with_initial(mut self, value: impl Into<String>) -> Self {
        if self.store.is_controlled() {
            log::debug!("initial value ignored; external value wins");
            return self;
        }
        self.store = ValueStore::new(
            self.store.policy(),
            ValueMode::Uncontrolled(Selection::single(value)),
        );
        self
    }

    /// Supply an external checked value, making this group controlled.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.store = ValueStore::new(
            self.store.policy(),
            ValueMode::Controlled(Selection::single(value)),
        );
        self
    }

    /// Set whether the whole group starts disabled.
    pub fn with_disabled(self, disabled: bool) -> Self {
        self.disabled.store(disabled, Ordering::SeqCst);
        self
    }

    /// Get the unique ID for this radio group.
    pub fn id(&self) -> RadioGroupId {
        self.id
    }

    /// Get the ID as a string (for host-side element binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Selection state
    // -------------------------------------------------------------------------

    /// Check an option (a radio click). No-op while the group is disabled.
    pub fn select(&self, value: &str) {
        if self.is_disabled() {
            return;
        }
        self.store.request(value);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// The checked value, if any.
    pub fn value(&self) -> Option<String> {
        self.store.read().first().map(str::to_string)
    }

    /// Whether an option is the checked one (`data-selected`).
    pub fn checked(&self, value: &str) -> bool {
        self.store.contains(value)
    }

    /// Feed the externally accepted value back into a controlled group.
    pub fn sync(&self, value: impl Into<String>) {
        self.store.sync(Selection::single(value));
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Disabled state
    // -------------------------------------------------------------------------

    /// Whether the group ignores interaction (`data-disabled`).
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// Enable or disable the whole group.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Handle a key on a focused option: Enter and Space check it.
    /// Everything is ignored while the group is disabled.
    pub fn key(&self, value: &str, key: Key) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }
        match key {
            Key::Enter | Key::Space => {
                self.select(value);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Callbacks
    // -------------------------------------------------------------------------

    /// Register the change callback: receives the checked value.
    pub fn set_on_value_change<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.store.set_on_change(move |selection| {
            callback(selection.first().unwrap_or(""));
        });
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the group state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Default for RadioGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RadioGroup {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            store: self.store.clone(),
            disabled: Arc::clone(&self.disabled),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl std::fmt::Debug for RadioGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioGroup")
            .field("id", &self.id)
            .field("value", &self.value())
            .field("disabled", &self.is_disabled())
            .finish()
    }
}
