//! Dialog widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::dismiss::{OverlayGuard, OverlayRegistration, OverlayStack};
use crate::event::DataState;
use crate::geometry::Region;
use crate::store::{OpenMode, OpenState};

/// Unique identifier for a Dialog widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(usize);

impl DialogId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__dialog_{}", self.0)
    }
}

/// Internal state for a Dialog widget.
struct DialogInner {
    /// Stack entry held while open
    guard: Option<OverlayGuard>,
    /// Dismissal boundary of the dialog panel
    content: Region,
}

/// A modal disclosure registered with the [`OverlayStack`] while open.
///
/// The whole viewport outside the content boundary is the backdrop, so any
/// backdrop pointer-down dismisses the dialog through the stack; there is no
/// trigger boundary. Escape dismissal also arrives through the stack
/// ([`OverlayStack::escape`]), which closes nested overlays before this one.
///
/// Opening is an explicit call ([`Dialog::open`], [`Dialog::toggle`]); any
/// host element can be bound to it.
pub struct Dialog {
    /// Unique identifier for this dialog instance
    id: DialogId,
    /// The stack dismissals are coordinated through
    stack: OverlayStack,
    /// Open/closed state with the controlled/uncontrolled split
    state: OpenState,
    /// Internal state
    inner: Arc<RwLock<DialogInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Dialog {
    /// Create an uncontrolled dialog, initially closed.
    pub fn new(stack: &OverlayStack) -> Self {
        Self::with_state(stack, OpenState::uncontrolled())
    }

    /// Create a controlled dialog mirroring an external open flag.
    pub fn controlled(stack: &OverlayStack, open: bool) -> Self {
        let dialog = Self::with_state(stack, OpenState::controlled(open));
        dialog.refresh_registration();
        dialog
    }

    fn with_state(stack: &OverlayStack, state: OpenState) -> Self {
        Self {
            id: DialogId::new(),
            stack: stack.clone(),
            state,
            inner: Arc::new(RwLock::new(DialogInner {
                guard: None,
                content: Region::default(),
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set whether an uncontrolled dialog starts open. Ignored when an
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

    /// Set the content boundary up front.
    pub fn with_content_boundary(self, content: Region) -> Self {
        self.set_content_boundary(content);
        self
    }

    /// Get the unique ID for this dialog.
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// Get the ID as a string (for host-side element binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Open/closed state
    // -------------------------------------------------------------------------

    /// Request opening the dialog.
    pub fn open(&self) {
        self.state.open();
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Request closing the dialog.
    pub fn close(&self) {
        self.state.close();
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Request flipping the open flag.
    pub fn toggle(&self) {
        self.state.toggle();
        self.refresh_registration();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Whether the dialog is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Open/closed projection (`data-state`).
    pub fn data_state(&self) -> DataState {
        DataState::from_open(self.is_open())
    }

    /// Feed the externally accepted flag back into a controlled dialog.
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
    // Dismissal boundary
    // -------------------------------------------------------------------------

    /// Report the dialog panel's current boundary (layout changed).
    pub fn set_content_boundary(&self, content: Region) {
        if let Ok(mut inner) = self.inner.write() {
            inner.content = content;
            if let Some(guard) = &inner.guard {
                guard.set_boundaries(content, None);
            }
        }
    }

    /// Reconcile the stack entry with the effective open state: register
    /// while open, release while closed. Safe to call redundantly; a dialog
    /// dismissed by the stack re-registers on its next open.
    fn refresh_registration(&self) {
        if self.state.is_open() {
            let (registered, content) = {
                let Ok(inner) = self.inner.read() else {
                    return;
                };
                let registered = inner
                    .guard
                    .as_ref()
                    .map(|guard| guard.is_active())
                    .unwrap_or(false);
                (registered, inner.content)
            };
            if registered {
                return;
            }
            let state = self.state.clone();
            let dirty = Arc::clone(&self.dirty);
            let guard = self.stack.register(
                OverlayRegistration::new(content).on_dismiss(move |_| {
                    state.set_open(false);
                    dirty.store(true, Ordering::SeqCst);
                }),
            );
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

    /// Check if the dialog state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for Dialog {
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

impl std::fmt::Debug for Dialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialog")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::event::EventResult;
    use crate::geometry::Point;

    fn panel() -> Region {
        Region::new(100.0, 100.0, 400.0, 300.0)
    }

    #[test]
    fn test_open_registers_close_releases() {
        let stack = OverlayStack::new();
        let dialog = Dialog::new(&stack).with_content_boundary(panel());

        dialog.open();
        assert!(dialog.is_open());
        assert_eq!(stack.len(), 1);

        dialog.close();
        assert!(!dialog.is_open());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_escape_dismisses_through_the_stack() {
        let stack = OverlayStack::new();
        let dialog = Dialog::new(&stack).with_content_boundary(panel());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        dialog.set_on_open_change(move |open| {
            if let Ok(mut guard) = sink.lock() {
                guard.push(open);
            }
        });

        dialog.open();
        assert_eq!(stack.escape(), EventResult::Consumed);
        assert!(!dialog.is_open());
        assert!(stack.is_empty());
        assert_eq!(seen.lock().unwrap().as_slice(), [true, false]);
    }

    #[test]
    fn test_backdrop_pointer_dismisses() {
        let stack = OverlayStack::new();
        let dialog = Dialog::new(&stack).with_content_boundary(panel());
        dialog.open();

        // inside the panel: stays open
        stack.pointer_down(Point::new(150.0, 150.0));
        assert!(dialog.is_open());

        // on the backdrop: dismissed
        stack.pointer_down(Point::new(10.0, 10.0));
        assert!(!dialog.is_open());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_reopen_after_dismissal_registers_again() {
        let stack = OverlayStack::new();
        let dialog = Dialog::new(&stack).with_content_boundary(panel());

        dialog.open();
        stack.escape();
        assert!(stack.is_empty());

        dialog.open();
        assert!(dialog.is_open());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_controlled_dialog_registers_only_after_sync() {
        let stack = OverlayStack::new();
        let dialog = Dialog::controlled(&stack, false).with_content_boundary(panel());

        dialog.open();
        assert!(!dialog.is_open());
        assert!(stack.is_empty());

        dialog.sync(true);
        assert!(dialog.is_open());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_default_open_registers_at_construction() {
        let stack = OverlayStack::new();
        let dialog = Dialog::new(&stack)
            .with_default_open(true)
            .with_content_boundary(panel());
        assert!(dialog.is_open());
        assert_eq!(stack.len(), 1);

        let controlled = Dialog::controlled(&stack, false).with_default_open(true);
        assert!(!controlled.is_open());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_drop_while_open_releases_entry() {
        let stack = OverlayStack::new();
        {
            let dialog = Dialog::new(&stack).with_content_boundary(panel());
            dialog.open();
            assert_eq!(stack.len(), 1);
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn test_boundary_update_moves_dismissal_hit_test() {
        let stack = OverlayStack::new();
        let dialog = Dialog::new(&stack).with_content_boundary(panel());
        dialog.open();

        dialog.set_content_boundary(Region::new(0.0, 0.0, 50.0, 50.0));
        stack.pointer_down(Point::new(150.0, 150.0));
        assert!(!dialog.is_open());
    }
}
