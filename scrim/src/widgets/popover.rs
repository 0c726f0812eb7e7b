//! Popover widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::dismiss::{OverlayGuard, OverlayRegistration, OverlayStack};
use crate::event::DataState;
use crate::geometry::Region;
use crate::store::{OpenMode, OpenState};

/// Unique identifier for a Popover widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopoverId(usize);

impl PopoverId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for PopoverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__popover_{}", self.0)
    }
}

/// Internal state for a Popover widget.
struct PopoverInner {
    /// Stack entry held while open
    guard: Option<OverlayGuard>,
    /// Dismissal boundary of the floating panel
    content: Region,
    /// Dismissal boundary of the anchor/trigger element
    trigger: Option<Region>,
}

/// An anchored, non-modal disclosure registered with the [`OverlayStack`]
/// while open.
///
/// Unlike a dialog, a popover excludes its trigger element from "outside":
/// the pointer-down that toggles it closed must not count as an outside
/// dismissal and immediately reopen it. Both boundaries can move between
/// frames and are re-reported through [`Popover::set_boundaries`].
pub struct Popover {
    /// Unique identifier for this popover instance
    id: PopoverId,
    /// The stack dismissals are coordinated through
    stack: OverlayStack,
    /// Open/closed state with the controlled/uncontrolled split
    state: OpenState,
    /// Internal state
    inner: Arc<RwLock<PopoverInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Popover {
    /// Create an uncontrolled popover, initially closed.
    pub fn new(stack: &OverlayStack) -> Self {
        Self::with_state(stack, OpenState::uncontrolled())
    }

    /// Create a controlled popover mirroring an external open flag.
    pub fn controlled(stack: &OverlayStack, open: bool) -> Self {
        let popover = Self::with_state(stack, OpenState::controlled(open));
        popover.refresh_registration();
        popover
    }

    fn with_state(stack: &OverlayStack, state: OpenState) -> Self {
        Self {
            id: PopoverId::new(),
            stack: stack.clone(),
            state,
            inner: Arc::new(RwLock::new(PopoverInner {
                guard: None,
                content: Region::default(),
                trigger: None,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set whether an uncontrolled popover starts open. Ignored when an
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

    /// Set the panel and trigger boundaries up front.
    pub fn with_boundaries(self, content: Region, trigger: Option<Region>) -> Self {
        self.set_boundaries(content, trigger);
        self
    }

    /// Get the unique ID for this popover.
    pub fn id(&self) -> PopoverId {
        self.id
    }

    /// Get the ID as a string (for host-side element binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Open/closed state
    // -------------------------------------------------------------------------

    /// Request opening the popover.
    pub fn open(&self) {
        self.state.open();
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Request closing the popover.
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

    /// Whether the popover is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Open/closed projection (`data-state`).
    pub fn data_state(&self) -> DataState {
        DataState::from_open(self.is_open())
    }

    /// Feed the externally accepted flag back into a controlled popover.
    pub fn sync(&self, open: bool) {
        self.state.sync(open);
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Register the open-change callback: fires with the requested flag on
    /// every open/close/toggle request and on stack dismissal.
    pub fn set_on_open_change<F>(&self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.state.set_on_change(callback);
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

    /// Check if the popover state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for Popover {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            stack: self.stack.clone(),
            state: self.state.clone(),
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl std::fmt::Debug for Popover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Popover")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .finish()
    }
}
