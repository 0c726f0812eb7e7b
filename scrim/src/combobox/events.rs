//! Keyboard handling for the combobox input.

use std::sync::atomic::Ordering;

use crate::event::{EventResult, Key};

use super::Combobox;

impl Combobox {
    /// Handle a navigation key from the input.
    ///
    /// Only acts while the list is open and has results; everything else
    /// stays with the host's text editing (text changes come back through
    /// [`Combobox::input`]). A [`EventResult::Consumed`] return means the
    /// host must suppress its default for the key (caret movement, form
    /// submit).
    ///
    /// The highlight moves over enabled and disabled entries alike; disabled
    /// entries refuse the commit instead.
    pub fn key(&self, key: Key) -> EventResult {
        if !self.is_open() || self.session.is_empty() {
            return EventResult::Ignored;
        }
        match key {
            Key::ArrowDown => {
                let len = self.session.len();
                if let Ok(mut guard) = self.highlight.write() {
                    guard.advance(len);
                }
                self.dirty.store(true, Ordering::SeqCst);
                EventResult::Consumed
            }
            Key::ArrowUp => {
                let len = self.session.len();
                if let Ok(mut guard) = self.highlight.write() {
                    guard.retreat(len);
                }
                self.dirty.store(true, Ordering::SeqCst);
                EventResult::Consumed
            }
            Key::Enter => {
                // swallowed even with no highlight: Enter over an open list
                // must never submit the surrounding form, and free text is
                // never committed as a selection
                self.commit_highlighted();
                EventResult::Consumed
            }
            Key::Escape => {
                self.close();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }
}
