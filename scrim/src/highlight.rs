//! Keyboard highlight cursor over a suggestion list.

/// The keyboard-focused index within a results list, independent of pointer
/// hover. `None` means nothing is highlighted.
///
/// The cursor never outlives the list it pointed into: callers reset it on
/// every results mutation (new query, async results arriving, list cleared),
/// so a shrinking list can never leave the cursor out of bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
    index: Option<usize>,
}

impl Highlight {
    /// Create a cursor with nothing highlighted.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently highlighted index, if any.
    pub fn current(&self) -> Option<usize> {
        self.index
    }

    /// Whether a given list index is the highlighted one.
    pub fn is_on(&self, index: usize) -> bool {
        self.index == Some(index)
    }

    /// Move down one entry, clamped at the end of the list (no wraparound).
    /// Enters the list at 0 when nothing was highlighted. No-op on an empty
    /// list. Returns the new index.
    pub fn advance(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return self.index;
        }
        self.index = Some(match self.index {
            None => 0,
            Some(current) => (current + 1).min(len - 1),
        });
        self.index
    }

    /// Move up one entry, clamped at 0. Enters the list at 0 when nothing
    /// was highlighted. No-op on an empty list. Returns the new index.
    pub fn retreat(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return self.index;
        }
        self.index = Some(match self.index {
            None => 0,
            Some(current) => current.saturating_sub(1),
        });
        self.index
    }

    /// Point the cursor at an entry (pointer hover). Out-of-bounds indices
    /// are ignored.
    pub fn set(&mut self, index: usize, len: usize) {
        if index < len {
            self.index = Some(index);
        }
    }

    /// Clear the highlight. Called whenever the results list changes.
    pub fn reset(&mut self) {
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_enters_at_zero_and_clamps() {
        let mut cursor = Highlight::new();
        assert_eq!(cursor.advance(3), Some(0));
        assert_eq!(cursor.advance(3), Some(1));
        assert_eq!(cursor.advance(3), Some(2));
        assert_eq!(cursor.advance(3), Some(2));
    }

    #[test]
    fn test_retreat_enters_at_zero_and_clamps() {
        let mut cursor = Highlight::new();
        assert_eq!(cursor.retreat(3), Some(0));
        cursor.advance(3);
        cursor.advance(3);
        assert_eq!(cursor.retreat(3), Some(1));
        assert_eq!(cursor.retreat(3), Some(0));
        assert_eq!(cursor.retreat(3), Some(0));
    }

    #[test]
    fn test_empty_list_is_noop() {
        let mut cursor = Highlight::new();
        assert_eq!(cursor.advance(0), None);
        assert_eq!(cursor.retreat(0), None);
    }

    #[test]
    fn test_reset_clears() {
        let mut cursor = Highlight::new();
        cursor.advance(5);
        cursor.reset();
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_set_ignores_out_of_bounds() {
        let mut cursor = Highlight::new();
        cursor.set(7, 5);
        assert_eq!(cursor.current(), None);
        cursor.set(3, 5);
        assert!(cursor.is_on(3));
    }
}
