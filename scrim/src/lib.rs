//! Headless state engine for disclosure and selection widgets.
//!
//! `scrim` owns the interaction logic behind accordions, tabs, radio groups,
//! dialogs, popovers, dropdown menus, and typeahead comboboxes — with no
//! rendering, styling, or DOM of its own. A host presentation layer feeds it
//! pointer and keyboard events, reads state back through projection
//! accessors, and subscribes to change callbacks.
//!
//! The building blocks compose bottom-up:
//!
//! - [`toggle`](crate::toggle) — pure selection policies (single, multiple,
//!   radio, tags) over an insertion-ordered [`Selection`](selection::Selection).
//! - [`store`] — controlled vs. uncontrolled ownership of a widget's value
//!   or open flag, locked at construction.
//! - [`dismiss`] — the overlay stack: LIFO Escape dismissal, per-boundary
//!   outside-click dismissal, ref-counted host listeners.
//! - [`search`] — debounced typeahead sessions over local options or an
//!   async provider, with stale-response fencing.
//! - [`combobox`] and [`widgets`] — the per-component engines wired from the
//!   pieces above.

pub mod combobox;
pub mod dismiss;
pub mod error;
pub mod event;
pub mod geometry;
pub mod highlight;
pub mod search;
pub mod selection;
pub mod store;
pub mod toggle;
pub mod widgets;

pub mod prelude {
    pub use crate::combobox::{Combobox, ComboboxId};
    pub use crate::dismiss::{
        DismissReason, ListenerHook, OverlayGuard, OverlayRegistration, OverlayStack,
    };
    pub use crate::error::SearchError;
    pub use crate::event::{DataState, EventResult, Key};
    pub use crate::geometry::{Point, Region};
    pub use crate::highlight::Highlight;
    pub use crate::search::{Filter, SearchSession, SuggestionItem};
    pub use crate::selection::Selection;
    pub use crate::store::{OpenMode, OpenState, ValueMode, ValueStore};
    pub use crate::toggle::{TogglePolicy, toggle};
    pub use crate::widgets::{Accordion, Dialog, DropdownMenu, MenuItem, Popover, RadioGroup, Tabs};
}
