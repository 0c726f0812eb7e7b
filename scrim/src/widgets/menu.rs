//! Dropdown menu widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::dismiss::{OverlayGuard, OverlayRegistration, OverlayStack};
use crate::event::{DataState, EventResult, Key};
use crate::geometry::Region;
use crate::store::{OpenMode, OpenState};

/// Unique identifier for a DropdownMenu widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropdownMenuId(usize);

impl DropdownMenuId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for DropdownMenuId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__dropdown_menu_{}", self.0)
    }
}

/// One activatable entry of a dropdown menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// The value reported on activation.
    pub value: String,
    /// The text shown.
    pub label: String,
    /// Disabled items render but cannot be activated.
    pub disabled: bool,
    /// Destructive items are styled as dangerous by the host; the engine
    /// carries the marker as plain data.
    pub destructive: bool,
}

impl MenuItem {
    /// Create an enabled, non-destructive item.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
            destructive: false,
        }
    }

    /// Set the disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Mark the item as destructive.
    pub fn with_destructive(mut self, destructive: bool) -> Self {
        self.destructive = destructive;
        self
    }
}

/// Callback invoked with the activated item's value.
pub type SelectCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Internal state for a DropdownMenu widget.
struct MenuInner {
    /// Stack entry held while open
    guard: Option<OverlayGuard>,
    /// Dismissal boundary of the floating panel
    content: Region,
    /// Dismissal boundary of the trigger button
    trigger: Option<Region>,
    /// The activatable entries
    items: Vec<MenuItem>,
}

/// An anchored menu of activatable items, registered with the
/// [`OverlayStack`] while open.
///
/// Activating an enabled item fires the select callback and closes the menu;
/// disabled items refuse activation and leave the menu open. Dismissal
/// (Escape, outside pointer) goes through the stack like any other overlay.
pub struct DropdownMenu {
    /// Unique identifier for this menu instance
    id: DropdownMenuId,
    /// The stack dismissals are coordinated through
    stack: OverlayStack,
    /// Open/closed state with the controlled/uncontrolled split
    state: OpenState,
    /// Internal state
    inner: Arc<RwLock<MenuInner>>,
    /// Activation callback
    on_select: Arc<RwLock<Option<SelectCallback>>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl DropdownMenu {
    /// Create an uncontrolled menu, initially closed, with no items.
    pub fn new(stack: &OverlayStack) -> Self {
        Self::with_state(stack, OpenState::uncontrolled())
    }

    /// Create a controlled menu mirroring an external open flag.
    pub fn controlled(stack: &OverlayStack, open: bool) -> Self {
        let menu = Self::with_state(stack, OpenState::controlled(open));
        menu.refresh_registration();
        menu
    }

    fn with_state(stack: &OverlayStack, state: OpenState) -> Self {
        Self {
            id: DropdownMenuId::new(),
            stack: stack.clone(),
            state,
            inner: Arc::new(RwLock::new(MenuInner {
                guard: None,
                content: Region::default(),
                trigger: None,
                items: Vec::new(),
            })),
            on_select: Arc::new(RwLock::new(None)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set whether an uncontrolled menu starts open. Ignored when an
    /// external flag was already supplied; the external flag wins.
    pub fn with_default_open(mut self, open: bool) -> Self {
        if self.state.is_controlled() {
            log::debug!("default open flag ignored; external flag wins");
            return self;
        }
        self.state = OpenState::new(OpenMode::Uncontrolled(open));
        self.refresh_registration();
        self
    }

    /// Set the items up front.
    pub fn with_items(self, items: Vec<MenuItem>) -> Self {
        self.set_items(items);
        self
    }

    /// Set the panel and trigger boundaries up front.
    pub fn with_boundaries(self, content: Region, trigger: Option<Region>) -> Self {
        self.set_boundaries(content, trigger);
        self
    }

    /// Get the unique ID for this menu.
    pub fn id(&self) -> DropdownMenuId {
        self.id
    }

    /// Get the ID as a string (for host-side element binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Replace the item list.
    pub fn set_items(&self, items: Vec<MenuItem>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.items = items;
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// A clone of the current items.
    pub fn items(&self) -> Vec<MenuItem> {
        self.inner
            .read()
            .map(|inner| inner.items.clone())
            .unwrap_or_default()
    }

    /// Look up one item by value.
    pub fn item(&self, value: &str) -> Option<MenuItem> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.items.iter().find(|item| item.value == value).cloned())
    }

    /// Whether an item refuses activation (`data-disabled`).
    pub fn is_item_disabled(&self, value: &str) -> bool {
        self.item(value).map(|item| item.disabled).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Open/closed state
    // -------------------------------------------------------------------------

    /// Request opening the menu.
    pub fn open(&self) {
        self.state.open();
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Request closing the menu.
    pub fn close(&self) {
        self.state.close();
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Request flipping the open flag (the trigger click).
    pub fn toggle(&self) {
        self.state.toggle();
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Open/closed projection (`data-state`).
    pub fn data_state(&self) -> DataState {
        DataState::from_open(self.is_open())
    }

    /// Feed the externally accepted flag back into a controlled menu.
    pub fn sync(&self, open: bool) {
        self.state.sync(open);
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Register the open-change callback.
    pub fn set_on_open_change<F>(&self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.state.set_on_change(callback);
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Activate an item by value (a pointer click on the item).
    ///
    /// Fires the select callback and closes the menu. Unknown values,
    /// disabled items, and activation while closed are no-ops.
    pub fn activate(&self, value: &str) -> bool {
        if !self.is_open() {
            return false;
        }
        let Some(item) = self.item(value) else {
            return false;
        };
        if item.disabled {
            return false;
        }
        let callback = self
            .on_select
            .read()
            .ok()
            .and_then(|slot| slot.clone());
        if let Some(callback) = callback {
            callback(&item.value);
        }
        self.close();
        true
    }

    /// Register the activation callback: receives the activated value.
    pub fn set_on_select<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.on_select.write() {
            *guard = Some(Arc::new(callback));
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Handle a key on a focused item: Enter and Space activate it.
    pub fn key(&self, value: &str, key: Key) -> EventResult {
        match key {
            Key::Enter | Key::Space => {
                if self.activate(value) {
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            _ => EventResult::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Dismissal boundaries
    // -------------------------------------------------------------------------

    /// Report the current panel and trigger boundaries (layout changed).
    pub fn set_boundaries(&self, content: Region, trigger: Option<Region>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.content = content;
            inner.trigger = trigger;
            if let Some(guard) = &inner.guard {
                guard.set_boundaries(content, trigger);
            }
        }
    }

    /// Reconcile the stack entry with the effective open state.
    fn refresh_registration(&self) {
        if self.state.is_open() {
            let (registered, content, trigger) = {
                let Ok(inner) = self.inner.read() else {
                    return;
                };
                let registered = inner
                    .guard
                    .as_ref()
                    .map(|guard| guard.is_active())
                    .unwrap_or(false);
                (registered, inner.content, inner.trigger)
            };
            if registered {
                return;
            }
            let mut registration = OverlayRegistration::new(content);
            if let Some(trigger) = trigger {
                registration = registration.with_trigger(trigger);
            }
            let state = self.state.clone();
            let dirty = Arc::clone(&self.dirty);
            let guard = self.stack.register(registration.on_dismiss(move |_| {
                state.set_open(false);
                dirty.store(true, Ordering::SeqCst);
            }));
            if let Ok(mut inner) = self.inner.write() {
                inner.guard = Some(guard);
            }
        } else {
            let guard = self
                .inner
                .write()
                .ok()
                .and_then(|mut inner| inner.guard.take());
            if let Some(guard) = guard {
                guard.release();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the menu state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for DropdownMenu {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            stack: self.stack.clone(),
            state: self.state.clone(),
            inner: Arc::clone(&self.inner),
            on_select: Arc::clone(&self.on_select),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl std::fmt::Debug for DropdownMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownMenu")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .field("items", &self.items().len())
            .finish()
    }
}
