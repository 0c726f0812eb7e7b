//! Ordered selection state shared by the toggle policies and value stores.
//!
//! Selection uses string values for stability across item mutations. Values
//! are kept in insertion order so multi-select consumers (tag lists, chips)
//! render in the order the user picked them.

/// An ordered set of selected string values.
///
/// Backed by a `Vec` rather than a hash set: widget selections are small and
/// insertion order is part of the observable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    values: Vec<String>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection holding a single value.
    pub fn single(value: impl Into<String>) -> Self {
        Self {
            values: vec![value.into()],
        }
    }

    /// Create a selection from a list of values, dropping duplicates while
    /// keeping the first occurrence of each.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for value in values {
            selection.insert(value.into());
        }
        selection
    }

    /// Get the selected values in insertion order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Get the first selected value, if any.
    ///
    /// Single-select consumers read this as "the" value.
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Check if a value is selected.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Get the number of selected values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append a value if not already present.
    /// Returns whether the value was added.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            false
        } else {
            self.values.push(value);
            true
        }
    }

    /// Remove a value if present.
    /// Returns whether the value was removed.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|v| v != value);
        self.values.len() != before
    }

    /// Replace the whole selection with a single value.
    pub fn replace(&mut self, value: impl Into<String>) {
        self.values.clear();
        self.values.push(value.into());
    }

    /// Clear all selection.
    /// Returns the values that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        std::mem::take(&mut self.values)
    }

    /// Consume the selection, yielding its values in insertion order.
    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

impl From<Vec<String>> for Selection {
    fn from(values: Vec<String>) -> Self {
        Self::from_values(values)
    }
}

impl FromIterator<String> for Selection {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut sel = Selection::new();
        sel.insert("b");
        sel.insert("a");
        sel.insert("c");
        assert_eq!(sel.values(), ["b", "a", "c"]);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut sel = Selection::new();
        assert!(sel.insert("a"));
        assert!(!sel.insert("a"));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_from_values_dedups_keeping_first() {
        let sel = Selection::from_values(["x", "y", "x", "z"]);
        assert_eq!(sel.values(), ["x", "y", "z"]);
    }

    #[test]
    fn test_remove() {
        let mut sel = Selection::from_values(["a", "b", "c"]);
        assert!(sel.remove("b"));
        assert!(!sel.remove("b"));
        assert_eq!(sel.values(), ["a", "c"]);
    }

    #[test]
    fn test_replace_and_first() {
        let mut sel = Selection::from_values(["a", "b"]);
        sel.replace("c");
        assert_eq!(sel.first(), Some("c"));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_clear_returns_removed() {
        let mut sel = Selection::from_values(["a", "b"]);
        let removed = sel.clear();
        assert_eq!(removed, ["a", "b"]);
        assert!(sel.is_empty());
    }
}
