//! Overlay dismissal: the stack service behind outside-click and Escape.
//!
//! Overlay widgets (dialogs, popovers, menus) register themselves with an
//! [`OverlayStack`] while open and release on close. The stack owns the
//! dismissal protocol:
//!
//! - `Escape` dismisses only the most-recently-opened entry (strict LIFO).
//! - An outside pointer-down is evaluated by every open entry independently;
//!   each entry whose content and trigger boundaries both miss the point is
//!   dismissed. Sibling overlays can therefore close from a single click,
//!   while nested overlays containing the point stay open.
//!
//! The stack is an explicit service constructed once at the application root
//! and handed to each overlay widget. The host's actual event listeners are
//! modeled by [`ListenerHook`]: `attach` fires when the stack becomes
//! non-empty, `detach` when the last entry leaves, so no handler outlives the
//! last open overlay.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::event::EventResult;
use crate::geometry::{Point, Region};

/// Why an overlay was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// The Escape key, dispatched to the top of the stack.
    Escape,
    /// A pointer-down outside the entry's content and trigger boundaries.
    PointerDownOutside,
}

/// Callback invoked when the stack dismisses an entry.
pub type DismissCallback = Arc<dyn Fn(DismissReason) + Send + Sync>;

/// Host-side listener lifecycle, reference-counted by the stack.
///
/// `attach` is called exactly once when the stack goes from empty to
/// non-empty, `detach` exactly once when the last entry is removed,
/// regardless of how many overlays open and close in between.
pub trait ListenerHook: Send + Sync {
    /// The stack has its first entry; install document-level listeners.
    fn attach(&self);
    /// The stack is empty again; remove the listeners.
    fn detach(&self);
}

/// A widget's request to participate in the dismissal protocol.
#[derive(Default)]
pub struct OverlayRegistration {
    content: Region,
    trigger: Option<Region>,
    on_dismiss: Option<DismissCallback>,
}

impl OverlayRegistration {
    /// Create a registration with the overlay's content boundary.
    pub fn new(content: Region) -> Self {
        Self {
            content,
            trigger: None,
            on_dismiss: None,
        }
    }

    /// Exclude the trigger element from "outside", so the closing click on
    /// the trigger does not race a reopen.
    pub fn with_trigger(mut self, trigger: Region) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set the callback fired when the stack dismisses this entry.
    pub fn on_dismiss<F>(mut self, callback: F) -> Self
    where
        F: Fn(DismissReason) + Send + Sync + 'static,
    {
        self.on_dismiss = Some(Arc::new(callback));
        self
    }
}

struct StackEntry {
    order: u64,
    content: Region,
    trigger: Option<Region>,
    on_dismiss: Option<DismissCallback>,
}

impl StackEntry {
    /// Whether a point lands inside this entry's content or trigger.
    fn contains(&self, point: Point) -> bool {
        self.content.contains(point)
            || self.trigger.map(|t| t.contains(point)).unwrap_or(false)
    }
}

struct StackInner {
    entries: Vec<StackEntry>,
    hook: Option<Arc<dyn ListenerHook>>,
}

/// The mount-ordered stack of open overlay instances.
///
/// Cheap to clone; clones share the stack. Dismiss callbacks and hook
/// transitions are always invoked with the internal lock released, so a
/// callback may re-enter the stack (reopen an overlay, register a nested
/// one) without deadlocking.
pub struct OverlayStack {
    inner: Arc<RwLock<StackInner>>,
    next_order: Arc<AtomicU64>,
}

impl OverlayStack {
    /// Create a stack with no listener hook.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StackInner {
                entries: Vec::new(),
                hook: None,
            })),
            next_order: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a stack that drives a host listener hook.
    pub fn with_hook(hook: impl ListenerHook + 'static) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StackInner {
                entries: Vec::new(),
                hook: Some(Arc::new(hook)),
            })),
            next_order: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of currently open entries.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.entries.len())
            .unwrap_or(0)
    }

    /// Whether no overlay is open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push an overlay onto the stack.
    ///
    /// The returned guard owns exactly this entry: releasing it (explicitly
    /// or by drop) removes the entry without touching any other.
    pub fn register(&self, registration: OverlayRegistration) -> OverlayGuard {
        let order = self.next_order.fetch_add(1, Ordering::SeqCst);
        let attach = {
            match self.inner.write() {
                Ok(mut inner) => {
                    inner.entries.push(StackEntry {
                        order,
                        content: registration.content,
                        trigger: registration.trigger,
                        on_dismiss: registration.on_dismiss,
                    });
                    if inner.entries.len() == 1 {
                        inner.hook.clone()
                    } else {
                        None
                    }
                }
                Err(_) => None,
            }
        };
        if let Some(hook) = attach {
            hook.attach();
        }
        log::debug!("overlay {order} registered");
        OverlayGuard {
            stack: self.clone(),
            order,
            released: AtomicBool::new(false),
        }
    }

    /// Dispatch an Escape press: dismiss only the top entry.
    ///
    /// Returns `Consumed` when an entry was dismissed, so the host can stop
    /// the key from reaching handlers beneath the overlay.
    pub fn escape(&self) -> EventResult {
        let (victim, detach) = {
            match self.inner.write() {
                Ok(mut inner) => {
                    let victim = inner.entries.pop();
                    let detach = if victim.is_some() && inner.entries.is_empty() {
                        inner.hook.clone()
                    } else {
                        None
                    };
                    (victim, detach)
                }
                Err(_) => (None, None),
            }
        };
        let Some(victim) = victim else {
            return EventResult::Ignored;
        };
        log::debug!("overlay {} dismissed by escape", victim.order);
        if let Some(hook) = detach {
            hook.detach();
        }
        if let Some(callback) = &victim.on_dismiss {
            callback(DismissReason::Escape);
        }
        EventResult::Consumed
    }

    /// Dispatch a pointer-down: dismiss every entry the point is outside of.
    ///
    /// Each open entry evaluates the point against its own boundaries, so
    /// one click can dismiss several sibling overlays at once while leaving
    /// enclosing (nested) overlays open. Dismiss callbacks fire top-first.
    /// Returns the number of dismissed entries; the pointer event itself is
    /// never swallowed.
    pub fn pointer_down(&self, point: Point) -> usize {
        let (victims, detach) = {
            match self.inner.write() {
                Ok(mut inner) => {
                    let mut kept = Vec::with_capacity(inner.entries.len());
                    let mut victims = Vec::new();
                    for entry in inner.entries.drain(..) {
                        if entry.contains(point) {
                            kept.push(entry);
                        } else {
                            victims.push(entry);
                        }
                    }
                    inner.entries = kept;
                    let detach = if !victims.is_empty() && inner.entries.is_empty() {
                        inner.hook.clone()
                    } else {
                        None
                    };
                    (victims, detach)
                }
                Err(_) => (Vec::new(), None),
            }
        };
        if let Some(hook) = detach {
            hook.detach();
        }
        for victim in victims.iter().rev() {
            log::debug!("overlay {} dismissed by outside pointer", victim.order);
            if let Some(callback) = &victim.on_dismiss {
                callback(DismissReason::PointerDownOutside);
            }
        }
        victims.len()
    }

    /// Remove one entry by its order. Returns whether it was present.
    fn release(&self, order: u64) -> bool {
        let (removed, detach) = {
            match self.inner.write() {
                Ok(mut inner) => {
                    let before = inner.entries.len();
                    inner.entries.retain(|entry| entry.order != order);
                    let removed = inner.entries.len() != before;
                    let detach = if removed && inner.entries.is_empty() {
                        inner.hook.clone()
                    } else {
                        None
                    };
                    (removed, detach)
                }
                Err(_) => (false, None),
            }
        };
        if let Some(hook) = detach {
            hook.detach();
        }
        if removed {
            log::debug!("overlay {order} released");
        }
        removed
    }

    fn update_boundaries(&self, order: u64, content: Region, trigger: Option<Region>) {
        if let Ok(mut inner) = self.inner.write()
            && let Some(entry) = inner.entries.iter_mut().find(|entry| entry.order == order)
        {
            entry.content = content;
            entry.trigger = trigger;
        }
    }

    fn is_registered(&self, order: u64) -> bool {
        self.inner
            .read()
            .map(|inner| inner.entries.iter().any(|entry| entry.order == order))
            .unwrap_or(false)
    }
}

impl Default for OverlayStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for OverlayStack {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            next_order: Arc::clone(&self.next_order),
        }
    }
}

impl std::fmt::Debug for OverlayStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStack")
            .field("len", &self.len())
            .finish()
    }
}

/// Ownership of one stack entry.
///
/// Dropping the guard releases the entry, so an unmounted widget can never
/// leave a registration behind. Releasing after the stack already dismissed
/// the entry is a no-op.
pub struct OverlayGuard {
    stack: OverlayStack,
    order: u64,
    released: AtomicBool,
}

impl OverlayGuard {
    /// Remove this entry from the stack.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.stack.release(self.order);
        }
    }

    /// Whether this entry is still on the stack (not released, not dismissed).
    pub fn is_active(&self) -> bool {
        !self.released.load(Ordering::SeqCst) && self.stack.is_registered(self.order)
    }

    /// Update the entry's boundaries after layout moved it.
    pub fn set_boundaries(&self, content: Region, trigger: Option<Region>) {
        if !self.released.load(Ordering::SeqCst) {
            self.stack.update_boundaries(self.order, content, trigger);
        }
    }
}

impl Drop for OverlayGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for OverlayGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayGuard")
            .field("order", &self.order)
            .field("active", &self.is_active())
            .finish()
    }
}
