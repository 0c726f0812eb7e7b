//! Built-in widget state types.
//!
//! Each widget is the headless state engine for one disclosure or selection
//! component: it owns a value/open store, handles the component's keys, and
//! exposes projection accessors (`data-state`, selected/expanded/disabled
//! flags) for the host's rendering layer.
//!
//! Widgets are cheap to clone and share their state across clones, so a host
//! can hand the same instance to a trigger, a panel, and an event dispatcher.
//! Overlay widgets (dialog, popover, menu) take the application's
//! [`OverlayStack`](crate::dismiss::OverlayStack) at construction and manage
//! their own registration as they open and close.

pub mod accordion;
pub mod dialog;
pub mod menu;
pub mod popover;
pub mod radio;
pub mod tabs;

pub use accordion::Accordion;
pub use dialog::Dialog;
pub use menu::{DropdownMenu, MenuItem};
pub use popover::Popover;
pub use radio::RadioGroup;
pub use tabs::Tabs;
