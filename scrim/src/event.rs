//! Input events and handling results.

use std::fmt;

/// A keyboard key, named after the DOM `KeyboardEvent.key` values that
/// browser hosts forward verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Space,
    Tab,
    Backspace,
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowUp => write!(f, "ArrowUp"),
            Key::ArrowDown => write!(f, "ArrowDown"),
            Key::Enter => write!(f, "Enter"),
            Key::Escape => write!(f, "Escape"),
            Key::Space => write!(f, " "),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

/// The outcome of offering an event to a handler.
///
/// `Consumed` tells the host to stop propagation and suppress its default
/// action for the event. `Ignored` leaves the event for the host to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was not handled, continue propagation.
    Ignored,
    /// Event was handled, stop propagation.
    Consumed,
}

impl EventResult {
    /// Whether the event was handled in any way.
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

/// Open/closed disclosure state, rendered by hosts as a `data-state`
/// attribute for styling hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataState {
    Open,
    Closed,
}

impl DataState {
    pub fn from_open(open: bool) -> Self {
        if open { DataState::Open } else { DataState::Closed }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DataState::Open)
    }
}

impl fmt::Display for DataState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataState::Open => write!(f, "open"),
            DataState::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_result_handled() {
        assert!(EventResult::Consumed.is_handled());
        assert!(!EventResult::Ignored.is_handled());
    }

    #[test]
    fn test_data_state_display() {
        assert_eq!(DataState::Open.to_string(), "open");
        assert_eq!(DataState::Closed.to_string(), "closed");
        assert_eq!(DataState::from_open(true), DataState::Open);
        assert_eq!(DataState::from_open(false), DataState::Closed);
    }

    #[test]
    fn test_key_display_matches_dom_names() {
        assert_eq!(Key::ArrowDown.to_string(), "ArrowDown");
        assert_eq!(Key::Escape.to_string(), "Escape");
        assert_eq!(Key::Char('a').to_string(), "a");
    }
}
