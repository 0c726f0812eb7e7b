//! Accordion widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::event::{DataState, EventResult, Key};
use crate::selection::Selection;
use crate::store::{ValueMode, ValueStore};
use crate::toggle::TogglePolicy;

/// Unique identifier for an Accordion widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccordionId(usize);

impl AccordionId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for AccordionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__accordion_{}", self.0)
    }
}

/// A group of disclosure items identified by string values.
///
/// Single accordions keep at most one item expanded; the `collapsible` flag
/// (default true) decides whether clicking the expanded item closes it or is
/// a no-op. Multiple accordions toggle each item independently.
///
/// Items are the host's elements; the accordion only tracks which values are
/// expanded. The host toggles items through [`Accordion::toggle`] (pointer)
/// or [`Accordion::key`] (keyboard on a focused header).
pub struct Accordion {
    /// Unique identifier for this accordion instance
    id: AccordionId,
    /// Expanded item values
    store: ValueStore,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Accordion {
    /// Create a single-expansion accordion (collapsible, uncontrolled).
    pub fn single() -> Self {
        Self::with_store(ValueStore::uncontrolled(TogglePolicy::SingleCollapsible))
    }

    /// Create a multiple-expansion accordion (uncontrolled).
    pub fn multiple() -> Self {
        Self::with_store(ValueStore::uncontrolled(TogglePolicy::Multiple))
    }

    fn with_store(store: ValueStore) -> Self {
        Self {
            id: AccordionId::new(),
            store,
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set whether the expanded item of a single accordion can be collapsed
    /// by toggling it again (default true). No effect on multiple accordions.
    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        let policy = match self.store.policy() {
            TogglePolicy::SingleCollapsible | TogglePolicy::SingleNonCollapsible => {
                if collapsible {
                    TogglePolicy::SingleCollapsible
                } else {
                    TogglePolicy::SingleNonCollapsible
                }
            }
            other => {
                log::warn!("collapsible flag only applies to single accordions");
                other
            }
        };
        let mode = if self.store.is_controlled() {
            ValueMode::Controlled(self.store.read())
        } else {
            ValueMode::Uncontrolled(self.store.read())
        };
        self.store = ValueStore::new(policy, mode);
        self
    }

    /// Set the initially expanded values (uncontrolled). Ignored when an
    /// external value was already supplied; the external value wins.
    pub fn with_initial(mut self, initial: impl Into<Selection>) -> Self {
        if self.store.is_controlled() {
            log::debug!("initial value ignored; external value wins");
            return self;
        }
        self.store = ValueStore::new(self.store.policy(), ValueMode::Uncontrolled(initial.into()));
        self
    }

    /// Supply an external expanded value, making this accordion controlled:
    /// toggles are emitted through the change callback but never applied
    /// locally until the owner feeds them back via [`Accordion::sync`].
    pub fn with_value(mut self, value: impl Into<Selection>) -> Self {
        self.store = ValueStore::new(self.store.policy(), ValueMode::Controlled(value.into()));
        self
    }

    /// Get the unique ID for this accordion.
    pub fn id(&self) -> AccordionId {
        self.id
    }

    /// Get the ID as a string (for host-side element binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Expansion state
    // -------------------------------------------------------------------------

    /// Toggle an item by value (a header click).
    pub fn toggle(&self, value: &str) {
        self.store.request(value);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Whether an item is expanded.
    pub fn expanded(&self, value: &str) -> bool {
        self.store.contains(value)
    }

    /// The expanded values, in expansion order for multiple accordions.
    pub fn expanded_values(&self) -> Selection {
        self.store.read()
    }

    /// Open/closed projection for one item (`data-state`).
    pub fn data_state(&self, value: &str) -> DataState {
        DataState::from_open(self.expanded(value))
    }

    /// Whether this accordion allows several items expanded at once.
    pub fn is_multiple(&self) -> bool {
        !self.store.policy().is_single()
    }

    /// Feed the externally accepted value back into a controlled accordion.
    pub fn sync(&self, value: impl Into<Selection>) {
        self.store.sync(value.into());
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Handle a key on a focused item header: Enter and Space toggle.
    pub fn key(&self, value: &str, key: Key) -> EventResult {
        match key {
            Key::Enter | Key::Space => {
                self.toggle(value);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Callbacks
    // -------------------------------------------------------------------------

    /// Register a change callback for single accordions: receives the
    /// expanded value, or `""` when everything is collapsed.
    pub fn set_on_value_change<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.store.set_on_change(move |selection| {
            callback(selection.first().unwrap_or(""));
        });
    }

    /// Register a change callback for multiple accordions: receives the
    /// expanded values in expansion order.
    pub fn set_on_values_change<F>(&self, callback: F)
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.store.set_on_change(move |selection| {
            callback(selection.values());
        });
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the accordion state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Default for Accordion {
    fn default() -> Self {
        Self::single()
    }
}

impl Clone for Accordion {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            store: self.store.clone(),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl std::fmt::Debug for Accordion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accordion")
            .field("id", &self.id)
            .field("expanded", &self.expanded_values())
            .finish()
    }
}
