//! Toggle policies and their pure application.
//!
//! Every selection change in the engine flows through [`toggle`]: widgets
//! turn user interaction into a requested value, `toggle` computes the next
//! selection from the current one, and the owning store applies or forwards
//! the result. Keeping this a pure function makes the subtle per-widget
//! differences (collapsible vs. not, replace vs. flip) testable in isolation.

use crate::selection::Selection;

/// The rule governing how a requested value combines with the current
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePolicy {
    /// At most one value; requesting the selected value clears the selection.
    /// Accordions with `collapsible = true`.
    SingleCollapsible,
    /// At most one value; requesting the selected value changes nothing.
    /// Tabs, non-collapsible accordions.
    SingleNonCollapsible,
    /// Unbounded membership flip. Multi-expand accordions.
    Multiple,
    /// Select-only replacement: the request always becomes the selection,
    /// regardless of what was selected before. Radio groups.
    Radio,
    /// Membership flip over an ordered sequence: append on add, remove
    /// preserving the order of the rest. Multi-select combobox tags.
    MultiTag,
}

impl TogglePolicy {
    /// Whether this policy holds at most one value.
    pub fn is_single(&self) -> bool {
        matches!(
            self,
            TogglePolicy::SingleCollapsible
                | TogglePolicy::SingleNonCollapsible
                | TogglePolicy::Radio
        )
    }
}

/// Compute the next selection for a requested value under a policy.
///
/// Pure: no side effects, no callbacks. When the policy decides the request
/// changes nothing (`SingleNonCollapsible` re-selecting the current value),
/// the input selection is returned untouched rather than rebuilt.
pub fn toggle(current: Selection, requested: &str, policy: TogglePolicy) -> Selection {
    match policy {
        TogglePolicy::SingleCollapsible => {
            if current.contains(requested) {
                Selection::new()
            } else {
                Selection::single(requested)
            }
        }
        TogglePolicy::SingleNonCollapsible => {
            if current.contains(requested) {
                current
            } else {
                Selection::single(requested)
            }
        }
        TogglePolicy::Radio => Selection::single(requested),
        TogglePolicy::Multiple | TogglePolicy::MultiTag => {
            let mut next = current;
            if !next.remove(requested) {
                next.insert(requested);
            }
            next
        }
    }
}
