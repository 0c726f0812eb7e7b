//! Combobox: a text input paired with a keyboard-navigable suggestion list.
//!
//! Composes a [`SearchSession`] (query + results), a [`Highlight`] cursor,
//! and a [`ValueStore`] into the typeahead interaction. Two selection modes:
//!
//! - **single** — committing an option replaces the input text with the
//!   option's label, forwards its value (replace semantics), and closes the
//!   list. Free text is never committed.
//! - **multi** — committing toggles the option's value as a tag; the list
//!   stays open and the input text is left alone (tags render separately
//!   from the typed query).

mod events;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::event::DataState;
use crate::highlight::Highlight;
use crate::search::{ResultsCallback, SearchSession, SuggestionItem};
use crate::selection::Selection;
use crate::store::ValueStore;
use crate::toggle::TogglePolicy;

/// Unique identifier for a Combobox instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComboboxId(usize);

impl ComboboxId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for ComboboxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__combobox_{}", self.0)
    }
}

/// Typeahead widget state.
///
/// The host feeds text edits through [`Combobox::input`], navigation keys
/// through [`Combobox::key`], and pointer activity through
/// [`Combobox::commit`]/[`Combobox::hover`]; everything else is projection.
pub struct Combobox {
    /// Unique identifier for this combobox instance
    id: ComboboxId,
    /// Committed selection (Radio policy for single, MultiTag for multi)
    store: ValueStore,
    /// Query, debounce and results
    session: SearchSession,
    /// Whether commits toggle tags instead of replacing
    multi: bool,
    /// Keyboard highlight over the current results
    highlight: Arc<RwLock<Highlight>>,
    /// Whether the suggestion list is open
    is_open: Arc<AtomicBool>,
    /// Host hook fired after results are replaced
    on_results: Arc<RwLock<Option<ResultsCallback>>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Combobox {
    /// Create a single-select combobox with an uncontrolled value.
    pub fn single(session: SearchSession) -> Self {
        Self::new(session, ValueStore::uncontrolled(TogglePolicy::Radio))
    }

    /// Create a multi-select (tag) combobox with an uncontrolled value.
    pub fn multi(session: SearchSession) -> Self {
        Self::new(session, ValueStore::uncontrolled(TogglePolicy::MultiTag))
    }

    /// Create a combobox over an explicit store.
    ///
    /// The store's policy decides the mode: [`TogglePolicy::MultiTag`] (or
    /// `Multiple`) commits as tags, single policies commit as replacement.
    /// Use a controlled store when an external owner holds the selection.
    pub fn new(session: SearchSession, store: ValueStore) -> Self {
        let combobox = Self {
            id: ComboboxId::new(),
            multi: !store.policy().is_single(),
            store,
            session,
            highlight: Arc::new(RwLock::new(Highlight::new())),
            is_open: Arc::new(AtomicBool::new(false)),
            on_results: Arc::new(RwLock::new(None)),
            dirty: Arc::new(AtomicBool::new(false)),
        };
        combobox.session.install_dirty(Arc::clone(&combobox.dirty));
        // the combobox owns the session's results slot; hosts hook through
        // set_on_results on the combobox itself
        let highlight = Arc::clone(&combobox.highlight);
        let host = Arc::clone(&combobox.on_results);
        combobox.session.set_on_results(move |results| {
            // results changed under the cursor; nothing stays highlighted
            if let Ok(mut guard) = highlight.write() {
                guard.reset();
            }
            let callback = host.read().ok().and_then(|slot| slot.clone());
            if let Some(callback) = callback {
                callback(results);
            }
        });
        combobox
    }

    /// Get the unique ID for this combobox.
    pub fn id(&self) -> ComboboxId {
        self.id
    }

    /// Get the ID as a string (for host-side element binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    /// The underlying value store (for controlled-mode `sync` feedback or
    /// direct callback registration).
    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// The underlying search session (for hosts pushing externally produced
    /// results or reading loading/error projections). The session's results
    /// callback belongs to the combobox; use
    /// [`Combobox::set_on_results`] instead.
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Whether commits toggle tags instead of replacing the value.
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    // -------------------------------------------------------------------------
    // Text input
    // -------------------------------------------------------------------------

    /// Handle an edit of the input text (the host owns the text field and
    /// reports its new content here).
    ///
    /// Restarts the search, opens the list when the text meets the minimum
    /// length and closes it otherwise, and clears the highlight.
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        let meets = text.chars().count() >= self.session.min_chars();
        // open state first so results callbacks observe the post-edit state
        self.is_open.store(meets, Ordering::SeqCst);
        self.session.set_query(text);
        if let Ok(mut guard) = self.highlight.write() {
            guard.reset();
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// The current input text.
    pub fn query(&self) -> String {
        self.session.query()
    }

    /// Clear the input and the committed selection.
    ///
    /// Emits an empty selection through the store (single consumers see
    /// `""`, multi consumers see `[]`), cancels any pending search, and
    /// closes the list.
    pub fn clear(&self) {
        self.session.replace_query("");
        self.store.clear();
        self.close();
    }

    // -------------------------------------------------------------------------
    // List open/close state
    // -------------------------------------------------------------------------

    /// Whether the suggestion list is open.
    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    /// Handle the input gaining focus: reopens the list only when the
    /// current text already meets the minimum length.
    pub fn focus(&self) {
        if self.session.meets_min_chars() && !self.is_open.swap(true, Ordering::SeqCst) {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Close the list without committing and clear the highlight.
    pub fn close(&self) {
        self.is_open.store(false, Ordering::SeqCst);
        if let Ok(mut guard) = self.highlight.write() {
            guard.reset();
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Open/closed projection for the list container.
    pub fn data_state(&self) -> DataState {
        DataState::from_open(self.is_open())
    }

    // -------------------------------------------------------------------------
    // Commits
    // -------------------------------------------------------------------------

    /// Commit the option at a results index (pointer activation).
    ///
    /// Disabled options are a no-op. Single mode silently replaces the input
    /// text with the option label, forwards the value, and closes the list;
    /// multi mode toggles the value as a tag and keeps the list open.
    pub fn commit(&self, index: usize) -> bool {
        let Some(option) = self.session.result(index) else {
            return false;
        };
        if option.disabled {
            return false;
        }
        if self.multi {
            self.store.request(&option.value);
        } else {
            self.session.replace_query(&option.label);
            self.store.request(&option.value);
            self.close();
        }
        self.dirty.store(true, Ordering::SeqCst);
        true
    }

    /// Commit the highlighted option, if any (Enter).
    pub fn commit_highlighted(&self) -> bool {
        let highlighted = self
            .highlight
            .read()
            .map(|guard| guard.current())
            .unwrap_or(None);
        match highlighted {
            Some(index) => self.commit(index),
            None => false,
        }
    }

    /// Remove one committed tag (the chip's close button). Multi mode only;
    /// single mode ignores this with a warning.
    pub fn remove_tag(&self, value: &str) {
        if !self.multi {
            log::warn!("remove_tag on a single-select combobox ignored");
            return;
        }
        self.store.remove(value);
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Highlight
    // -------------------------------------------------------------------------

    /// The highlighted results index, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlight
            .read()
            .map(|guard| guard.current())
            .unwrap_or(None)
    }

    /// Whether a results index is highlighted (`data-highlighted`).
    pub fn is_highlighted(&self, index: usize) -> bool {
        self.highlight
            .read()
            .map(|guard| guard.is_on(index))
            .unwrap_or(false)
    }

    /// Point the highlight at an entry (pointer hover).
    pub fn hover(&self, index: usize) {
        if !self.is_open() {
            return;
        }
        if let Ok(mut guard) = self.highlight.write() {
            guard.set(index, self.session.len());
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Selection projections
    // -------------------------------------------------------------------------

    /// The committed selection.
    pub fn values(&self) -> Selection {
        self.store.read()
    }

    /// The committed value of a single-select combobox, if any.
    pub fn value(&self) -> Option<String> {
        self.store.read().first().map(str::to_string)
    }

    /// Whether a value is committed (`data-selected`).
    pub fn is_selected(&self, value: &str) -> bool {
        self.store.contains(value)
    }

    /// A clone of the current results.
    pub fn results(&self) -> Vec<SuggestionItem> {
        self.session.results()
    }

    /// Whether a provider search is in flight.
    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    // -------------------------------------------------------------------------
    // Callbacks
    // -------------------------------------------------------------------------

    /// Register a single-value change callback: receives the committed
    /// value, or `""` when the selection empties.
    pub fn set_on_value_change<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.store.set_on_change(move |selection| {
            callback(selection.first().unwrap_or(""));
        });
    }

    /// Register a multi-value change callback: receives the committed
    /// values in insertion order.
    pub fn set_on_values_change<F>(&self, callback: F)
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.store.set_on_change(move |selection| {
            callback(selection.values());
        });
    }

    /// Register a callback fired whenever the results list is replaced.
    pub fn set_on_results<F>(&self, callback: F)
    where
        F: Fn(&[SuggestionItem]) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.on_results.write() {
            *guard = Some(Arc::new(callback));
        }
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the combobox state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for Combobox {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            store: self.store.clone(),
            session: self.session.clone(),
            multi: self.multi,
            highlight: Arc::clone(&self.highlight),
            is_open: Arc::clone(&self.is_open),
            on_results: Arc::clone(&self.on_results),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl std::fmt::Debug for Combobox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combobox")
            .field("id", &self.id)
            .field("multi", &self.multi)
            .field("open", &self.is_open())
            .field("query", &self.query())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn countries() -> Vec<SuggestionItem> {
        vec![
            SuggestionItem::new("pt", "Portugal"),
            SuggestionItem::new("pl", "Poland"),
            SuggestionItem::new("py", "Paraguay"),
            SuggestionItem::new("pe", "Peru"),
            SuggestionItem::new("pa", "Panama"),
        ]
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Combobox::single(SearchSession::sync(Vec::new()));
        let b = Combobox::single(SearchSession::sync(Vec::new()));
        assert_ne!(a.id(), b.id());
        assert!(a.id_string().starts_with("__combobox_"));
    }

    #[test]
    fn test_min_chars_gates_list_opening() {
        let session = SearchSession::sync(countries()).with_min_chars(3);
        let combobox = Combobox::single(session);

        combobox.input("ab");
        assert!(!combobox.is_open());

        combobox.input("abc");
        assert!(combobox.is_open());
    }

    #[test]
    fn test_focus_reopens_only_when_min_chars_met() {
        let session = SearchSession::sync(countries()).with_min_chars(3);
        let combobox = Combobox::single(session);

        combobox.input("por");
        combobox.close();
        combobox.focus();
        assert!(combobox.is_open());

        combobox.input("po");
        assert!(!combobox.is_open());
        combobox.focus();
        assert!(!combobox.is_open());
    }

    #[test]
    fn test_results_change_drops_the_highlight() {
        let combobox = Combobox::single(SearchSession::sync(countries()));
        combobox.input("p");
        assert_eq!(combobox.session().len(), 5);
        combobox.hover(4);
        assert_eq!(combobox.highlighted(), Some(4));

        // narrower query shrinks the list under the cursor
        combobox.input("pe");
        assert_eq!(combobox.session().len(), 1);
        assert_eq!(combobox.highlighted(), None);
    }

    #[test]
    fn test_hover_respects_bounds_and_open_state() {
        let combobox = Combobox::single(SearchSession::sync(countries()));
        combobox.hover(0);
        assert_eq!(combobox.highlighted(), None);

        combobox.input("p");
        combobox.hover(99);
        assert_eq!(combobox.highlighted(), None);
        combobox.hover(2);
        assert_eq!(combobox.highlighted(), Some(2));
    }

    #[test]
    fn test_single_commit_replaces_silently_and_closes() {
        let combobox = Combobox::single(SearchSession::sync(countries()));
        let results_fired = Arc::new(AtomicUsize::new(0));
        let committed = Arc::new(Mutex::new(Vec::new()));
        {
            let counter = Arc::clone(&results_fired);
            combobox.set_on_results(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            let log = Arc::clone(&committed);
            combobox.set_on_value_change(move |value| {
                if let Ok(mut guard) = log.lock() {
                    guard.push(value.to_string());
                }
            });
        }

        combobox.input("pol");
        let after_typing = results_fired.load(Ordering::SeqCst);
        assert!(combobox.commit(0));

        assert_eq!(combobox.query(), "Poland");
        assert!(!combobox.is_open());
        assert_eq!(combobox.value().as_deref(), Some("pl"));
        // the label landing in the input must not announce a results change
        assert_eq!(results_fired.load(Ordering::SeqCst), after_typing);
        assert_eq!(committed.lock().unwrap().as_slice(), ["pl"]);
    }

    #[test]
    fn test_disabled_option_refuses_commit() {
        let options = vec![
            SuggestionItem::new("pt", "Portugal").with_disabled(true),
            SuggestionItem::new("pl", "Poland"),
        ];
        let combobox = Combobox::single(SearchSession::sync(options));
        combobox.input("p");
        assert!(!combobox.commit(0));
        assert!(combobox.values().is_empty());
        assert!(combobox.is_open());
        // out of bounds is refused the same way
        assert!(!combobox.commit(7));
    }

    #[test]
    fn test_multi_commit_keeps_list_open_and_text_intact() {
        let combobox = Combobox::multi(SearchSession::sync(countries()));
        combobox.input("p");
        assert!(combobox.commit(0));
        assert!(combobox.commit(1));

        assert!(combobox.is_open());
        assert_eq!(combobox.query(), "p");
        assert_eq!(combobox.values().values(), ["pt", "pl"]);
    }

    #[test]
    fn test_multi_commit_toggles_in_order() {
        let combobox = Combobox::multi(SearchSession::sync(countries()));
        combobox.input("p");
        combobox.commit(0); // pt
        combobox.commit(1); // pl
        combobox.commit(2); // py
        assert_eq!(combobox.values().values(), ["pt", "pl", "py"]);

        combobox.commit(0); // pt again: removed, order preserved
        assert_eq!(combobox.values().values(), ["pl", "py"]);
    }

    #[test]
    fn test_remove_tag_preserves_remaining_order() {
        let combobox = Combobox::multi(SearchSession::sync(countries()));
        combobox.input("p");
        combobox.commit(0);
        combobox.commit(1);
        combobox.commit(2);

        combobox.remove_tag("pl");
        assert_eq!(combobox.values().values(), ["pt", "py"]);
    }

    #[test]
    fn test_remove_tag_on_single_mode_is_ignored() {
        let combobox = Combobox::single(SearchSession::sync(countries()));
        combobox.input("pol");
        combobox.commit(0);
        combobox.remove_tag("pl");
        assert_eq!(combobox.value().as_deref(), Some("pl"));
    }

    #[test]
    fn test_clear_empties_text_and_selection() {
        let combobox = Combobox::single(SearchSession::sync(countries()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let log = Arc::clone(&seen);
            combobox.set_on_value_change(move |value| {
                if let Ok(mut guard) = log.lock() {
                    guard.push(value.to_string());
                }
            });
        }
        combobox.input("pol");
        combobox.commit(0);
        combobox.clear();

        assert_eq!(combobox.query(), "");
        assert!(combobox.values().is_empty());
        assert!(!combobox.is_open());
        assert_eq!(seen.lock().unwrap().as_slice(), ["pl", ""]);
    }

    #[test]
    fn test_multi_clear_emits_empty_values() {
        let combobox = Combobox::multi(SearchSession::sync(countries()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let log = Arc::clone(&seen);
            combobox.set_on_values_change(move |values| {
                if let Ok(mut guard) = log.lock() {
                    guard.push(values.to_vec());
                }
            });
        }
        combobox.input("p");
        combobox.commit(0);
        combobox.clear();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ["pt"]);
        assert!(seen[1].is_empty());
    }

    #[test]
    fn test_controlled_store_leaves_selection_to_the_owner() {
        let store = ValueStore::controlled(
            TogglePolicy::Radio,
            Selection::single("pt"),
        );
        let combobox = Combobox::new(SearchSession::sync(countries()), store);
        combobox.input("pol");
        combobox.commit(0);
        // the engine computed and emitted "pl" but the owner never fed it back
        assert_eq!(combobox.value().as_deref(), Some("pt"));
    }
}
