//! Tabs widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::event::{DataState, EventResult, Key};
use crate::selection::Selection;
use crate::store::{ValueMode, ValueStore};
use crate::toggle::TogglePolicy;

/// Unique identifier for a Tabs widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabsId(usize);

impl TabsId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TabsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__tabs_{}", self.0)
    }
}

/// A tab list: exactly one tab active once any has been activated.
///
/// Activating the already-active tab never deactivates it, but the change
/// callback still fires with the (unchanged) value — panels that reload on
/// activation rely on every click being announced.
pub struct Tabs {
    /// Unique identifier for this tabs instance
    id: TabsId,
    /// The active tab value
    store: ValueStore,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Tabs {
    /// Create an uncontrolled tab list with no active tab.
    pub fn new() -> Self {
        Self {
            id: TabsId::new(),
            store: ValueStore::uncontrolled(TogglePolicy::SingleNonCollapsible),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the initially active tab (uncontrolled). Ignored when an external
    /// value was already supplied; the external value wins.
    pub fn with_initial(mut self, value: impl Into<String>) -> Self {
        if self.store.is_controlled() {
            log::debug!("initial tab ignored; external value wins");
            return self;
        }
        self.store = ValueStore::new(
            self.store.policy(),
            ValueMode::Uncontrolled(Selection::single(value)),
        );
        self
    }

    /// Supply an external active tab, making this tab list controlled.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.store = ValueStore::new(
            self.store.policy(),
            ValueMode::Controlled(Selection::single(value)),
        );
        self
    }

    /// Get the unique ID for this tabs instance.
    pub fn id(&self) -> TabsId {
        self.id
    }

    /// Get the ID as a string (for host-side element binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Activate a tab (a tab button click). Re-activating the active tab
    /// keeps it active and still announces the value.
    pub fn activate(&self, value: &str) {
        self.store.request(value);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// The active tab value, if any was activated yet.
    pub fn active(&self) -> Option<String> {
        self.store.read().first().map(str::to_string)
    }

    /// Whether a tab is the active one (`data-selected`).
    pub fn selected(&self, value: &str) -> bool {
        self.store.contains(value)
    }

    /// Open/closed projection for one tab panel (`data-state`).
    pub fn data_state(&self, value: &str) -> DataState {
        DataState::from_open(self.selected(value))
    }

    /// Feed the externally accepted tab back into a controlled tab list.
    pub fn sync(&self, value: impl Into<String>) {
        self.store.sync(Selection::single(value));
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Handle a key on a focused tab button: Enter and Space activate.
    pub fn key(&self, value: &str, key: Key) -> EventResult {
        match key {
            Key::Enter | Key::Space => {
                self.activate(value);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Callbacks
    // -------------------------------------------------------------------------

    /// Register the tab-change callback: receives the active tab value.
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

    /// Check if the tabs state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Default for Tabs {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Tabs {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            store: self.store.clone(),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl std::fmt::Debug for Tabs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tabs")
            .field("id", &self.id)
            .field("active", &self.active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_activation_switches_tabs() {
        let tabs = Tabs::new().with_initial("overview");
        assert_eq!(tabs.active().as_deref(), Some("overview"));
        assert!(tabs.selected("overview"));

        tabs.activate("settings");
        assert_eq!(tabs.active().as_deref(), Some("settings"));
        assert!(!tabs.selected("overview"));
    }

    #[test]
    fn test_active_tab_never_deactivates() {
        let tabs = Tabs::new().with_initial("overview");
        tabs.activate("overview");
        assert_eq!(tabs.active().as_deref(), Some("overview"));
    }

    #[test]
    fn test_reactivation_still_announces() {
        let tabs = Tabs::new().with_initial("overview");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tabs.set_on_value_change(move |value| {
            if let Ok(mut guard) = sink.lock() {
                guard.push(value.to_string());
            }
        });

        tabs.activate("overview");
        tabs.activate("settings");
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["overview", "settings"]
        );
    }

    #[test]
    fn test_controlled_tabs_wait_for_sync() {
        let tabs = Tabs::new().with_value("overview");
        tabs.activate("settings");
        assert_eq!(tabs.active().as_deref(), Some("overview"));

        tabs.sync("settings");
        assert_eq!(tabs.active().as_deref(), Some("settings"));
    }

    #[test]
    fn test_tab_keys_activate() {
        let tabs = Tabs::new();
        assert_eq!(tabs.key("a", Key::Space), EventResult::Consumed);
        assert!(tabs.selected("a"));
        assert_eq!(tabs.key("a", Key::Escape), EventResult::Ignored);
    }
}
