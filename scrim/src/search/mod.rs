//! Typeahead search sessions: debounced queries over local or remote options.
//!
//! A [`SearchSession`] owns the query text and results list of one typeahead
//! widget. It comes in two modes, fixed at construction:
//!
//! - **sync** — the full option list is supplied up front and every keystroke
//!   refilters it locally ([`Filter::Substring`] by default). No debounce, no
//!   tasks.
//! - **provider** — no local filtering; keystrokes (re)start a debounce timer
//!   and only the final keystroke after a full quiet period invokes the
//!   search provider. Responses are fenced by a generation counter so a slow
//!   response for an abandoned query can never clobber newer results.
//!
//! The debounce timer is a spawned tokio task holding only a weak reference
//! to the session, so dropping the session (widget unmount) both aborts the
//! timer and strands any response still in flight.

mod filter;

pub use filter::Filter;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::error::SearchError;

/// One entry in a suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionItem {
    /// The committed value.
    pub value: String,
    /// The text shown and matched against.
    pub label: String,
    /// Disabled items render but cannot be committed.
    pub disabled: bool,
}

impl SuggestionItem {
    /// Create an enabled suggestion.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Set the disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Async search callback: query in, suggestions (or a failure) out.
pub type SearchProvider =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<Vec<SuggestionItem>, SearchError>> + Send + Sync>;

/// Callback invoked whenever the results list is replaced.
pub type ResultsCallback = Arc<dyn Fn(&[SuggestionItem]) + Send + Sync>;

enum Mode {
    Sync {
        options: Vec<SuggestionItem>,
        filter: Filter,
    },
    Provider {
        provider: SearchProvider,
    },
}

struct SessionInner {
    query: String,
    results: Vec<SuggestionItem>,
    loading: bool,
    error: Option<SearchError>,
    mode: Mode,
    pending: Option<JoinHandle<()>>,
    on_results: Option<ResultsCallback>,
    dirty: Option<Arc<AtomicBool>>,
}

impl SessionInner {
    fn mark_dirty(&self) {
        if let Some(flag) = &self.dirty {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

/// Debounced search state for one typeahead widget.
///
/// Cheap to clone; clones share state. Timer tasks reference the session
/// weakly, so the last clone dropping cancels all pending work.
pub struct SearchSession {
    inner: Arc<RwLock<SessionInner>>,
    generation: Arc<AtomicU64>,
    min_chars: usize,
    debounce: Duration,
}

impl SearchSession {
    /// Default quiet period before a provider search fires.
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

    fn with_mode(mode: Mode) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                query: String::new(),
                results: Vec::new(),
                loading: false,
                error: None,
                mode,
                pending: None,
                on_results: None,
                dirty: None,
            })),
            generation: Arc::new(AtomicU64::new(0)),
            min_chars: 0,
            debounce: Self::DEFAULT_DEBOUNCE,
        }
    }

    /// Create a sync session over an already-loaded option list.
    ///
    /// The initial results are the whole list (empty query matches all).
    pub fn sync(options: Vec<SuggestionItem>) -> Self {
        let session = Self::with_mode(Mode::Sync {
            options,
            filter: Filter::default(),
        });
        if let Ok(mut guard) = session.inner.write() {
            let inner = &mut *guard;
            if let Mode::Sync { options, filter } = &inner.mode {
                inner.results = filter.apply("", options);
            }
        }
        session
    }

    /// Create a provider-backed session.
    ///
    /// The provider is invoked at most once per debounce window, from a
    /// spawned task, so this mode needs a tokio runtime.
    pub fn with_provider<F, Fut>(provider: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<SuggestionItem>, SearchError>> + Send + 'static,
    {
        let provider: SearchProvider = Arc::new(move |query| provider(query).boxed());
        Self::with_mode(Mode::Provider { provider })
    }

    /// Set the minimum query length (in chars) that may open the list or
    /// fire a search.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Set the debounce quiet period. Only affects provider mode.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the filtering strategy. Only affects sync mode.
    pub fn with_filter(self, filter: Filter) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            let inner = &mut *guard;
            match &mut inner.mode {
                Mode::Sync {
                    filter: stored,
                    options,
                } => {
                    *stored = filter;
                    inner.results = filter.apply(&inner.query, options);
                }
                Mode::Provider { .. } => {
                    log::warn!("filter strategy has no effect on a provider-backed session");
                }
            }
        }
        self
    }

    /// Register the callback fired whenever the results list is replaced.
    pub fn set_on_results<F>(&self, callback: F)
    where
        F: Fn(&[SuggestionItem]) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.inner.write() {
            guard.on_results = Some(Arc::new(callback));
        }
    }

    /// Install a dirty flag set after every state change.
    ///
    /// Widgets share their own flag so any session activity (results
    /// arriving from a timer task included) schedules a repaint.
    pub fn install_dirty(&self, flag: Arc<AtomicBool>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.dirty = Some(flag);
        }
    }

    /// Handle a keystroke: update the query and restart the search.
    ///
    /// Sync mode refilters immediately. Provider mode aborts any pending
    /// timer and, when the query meets `min_chars`, starts a new one; the
    /// provider only ever sees the final query of a burst.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let meets = query.chars().count() >= self.min_chars;

        let notify = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            let inner = &mut *guard;
            inner.query = query.clone();
            inner.loading = false;
            inner.error = None;
            if let Some(pending) = inner.pending.take() {
                pending.abort();
            }
            let next_results = match &inner.mode {
                Mode::Sync { options, filter } => Some(filter.apply(&query, options)),
                Mode::Provider { provider } => {
                    if meets {
                        inner.pending = Some(tokio::spawn(run_search(
                            Arc::downgrade(&self.inner),
                            Arc::clone(&self.generation),
                            generation,
                            Arc::clone(provider),
                            query,
                            self.debounce,
                        )));
                    }
                    None
                }
            };
            if let Some(results) = &next_results {
                inner.results = results.clone();
            }
            inner.mark_dirty();
            next_results
        };
        if let Some(results) = notify {
            self.notify(&results);
        }
    }

    /// Replace the query text without searching.
    ///
    /// Used when a commit writes an option label into the input: any pending
    /// timer is aborted, in-flight responses are fenced out, and no new
    /// search is scheduled. Sync mode still refilters (the list must match
    /// the text if it is reopened) but the results callback stays quiet.
    pub fn replace_query(&self, query: impl Into<String>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.inner.write() {
            let inner = &mut *guard;
            inner.query = query.into();
            inner.loading = false;
            if let Some(pending) = inner.pending.take() {
                pending.abort();
            }
            let next_results = match &inner.mode {
                Mode::Sync { options, filter } => Some(filter.apply(&inner.query, options)),
                Mode::Provider { .. } => None,
            };
            if let Some(results) = next_results {
                inner.results = results;
            }
            inner.mark_dirty();
        }
    }

    /// Apply externally produced results (hosts that own the search pipeline
    /// push here instead of using a provider). Clears loading and failure
    /// state and fires the results callback.
    pub fn set_results(&self, results: Vec<SuggestionItem>) {
        let callback = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            guard.results = results.clone();
            guard.loading = false;
            guard.error = None;
            guard.mark_dirty();
            guard.on_results.clone()
        };
        if let Some(callback) = callback {
            callback(&results);
        }
    }

    /// Replace the option list of a sync session and refilter the current
    /// query. Ignored with a warning in provider mode.
    pub fn set_options(&self, options: Vec<SuggestionItem>) {
        let notify = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            let inner = &mut *guard;
            let next_results = match &mut inner.mode {
                Mode::Sync {
                    options: stored,
                    filter,
                } => {
                    *stored = options;
                    Some(filter.apply(&inner.query, stored))
                }
                Mode::Provider { .. } => {
                    log::warn!("set_options on a provider-backed session ignored; use set_results");
                    None
                }
            };
            if let Some(results) = &next_results {
                inner.results = results.clone();
                inner.mark_dirty();
            }
            next_results
        };
        if let Some(results) = notify {
            self.notify(&results);
        }
    }

    /// The current query text.
    pub fn query(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.query.clone())
            .unwrap_or_default()
    }

    /// A clone of the current results.
    pub fn results(&self) -> Vec<SuggestionItem> {
        self.inner
            .read()
            .map(|guard| guard.results.clone())
            .unwrap_or_default()
    }

    /// The result at a list index, if in bounds.
    pub fn result(&self, index: usize) -> Option<SuggestionItem> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.results.get(index).cloned())
    }

    /// Number of current results.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.results.len())
            .unwrap_or(0)
    }

    /// Whether the results list is empty ("no results" projection).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a provider search is in flight ("loading" projection).
    pub fn is_loading(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.loading)
            .unwrap_or(false)
    }

    /// The most recent provider failure, cleared by the next keystroke or
    /// successful response.
    pub fn error(&self) -> Option<SearchError> {
        self.inner
            .read()
            .map(|guard| guard.error.clone())
            .unwrap_or(None)
    }

    /// Whether the current query is long enough to open the list.
    pub fn meets_min_chars(&self) -> bool {
        self.query().chars().count() >= self.min_chars
    }

    /// The configured minimum query length.
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// The configured debounce quiet period.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    fn notify(&self, results: &[SuggestionItem]) {
        let callback = self
            .inner
            .read()
            .ok()
            .and_then(|guard| guard.on_results.clone());
        if let Some(callback) = callback {
            callback(results);
        }
    }
}

impl Clone for SearchSession {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            generation: Arc::clone(&self.generation),
            min_chars: self.min_chars,
            debounce: self.debounce,
        }
    }
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("query", &self.query())
            .field("results", &self.len())
            .field("loading", &self.is_loading())
            .finish()
    }
}

/// The debounce-then-search task body.
///
/// Holds the session weakly: the sleep and the provider call can both
/// outlive the widget, and either upgrade failing means the session is gone
/// and the work is discarded. The generation fence drops responses for
/// queries that were superseded while the provider ran.
async fn run_search(
    inner: Weak<RwLock<SessionInner>>,
    fence: Arc<AtomicU64>,
    generation: u64,
    provider: SearchProvider,
    query: String,
    debounce: Duration,
) {
    tokio::time::sleep(debounce).await;
    if fence.load(Ordering::SeqCst) != generation {
        return;
    }
    {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        if let Ok(mut guard) = inner.write() {
            guard.loading = true;
            guard.mark_dirty();
        }
    }
    let outcome = provider(query).await;
    if fence.load(Ordering::SeqCst) != generation {
        return;
    }
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let (results, callback) = {
        let Ok(mut guard) = inner.write() else {
            return;
        };
        guard.loading = false;
        match outcome {
            Ok(results) => {
                guard.results = results.clone();
                guard.error = None;
                guard.mark_dirty();
                (Some(results), guard.on_results.clone())
            }
            Err(err) => {
                log::warn!("search provider failed: {err}");
                guard.error = Some(err);
                guard.mark_dirty();
                (None, None)
            }
        }
    };
    if let (Some(results), Some(callback)) = (results, callback) {
        callback(&results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> Vec<SuggestionItem> {
        vec![
            SuggestionItem::new("pt", "Portugal"),
            SuggestionItem::new("pl", "Poland"),
            SuggestionItem::new("es", "Spain"),
        ]
    }

    #[test]
    fn test_sync_session_filters_on_keystroke() {
        let session = SearchSession::sync(countries());
        assert_eq!(session.len(), 3);

        session.set_query("po");
        let labels: Vec<String> = session.results().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, ["Portugal", "Poland"]);

        session.set_query("pol");
        let labels: Vec<String> = session.results().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, ["Poland"]);
    }

    #[test]
    fn test_min_chars_gates_opening_not_filtering() {
        let session = SearchSession::sync(countries()).with_min_chars(3);
        session.set_query("po");
        assert!(!session.meets_min_chars());
        session.set_query("por");
        assert!(session.meets_min_chars());
        let labels: Vec<String> = session.results().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, ["Portugal"]);
    }

    #[test]
    fn test_replace_query_is_silent() {
        let session = SearchSession::sync(countries());
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        session.set_on_results(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        session.set_query("p");
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        session.replace_query("Portugal");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        // but the list matches the new text for the next open
        let labels: Vec<String> = session.results().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, ["Portugal"]);
    }

    #[test]
    fn test_set_options_refilters_current_query() {
        let session = SearchSession::sync(countries());
        session.set_query("ita");
        assert!(session.is_empty());

        let mut extended = countries();
        extended.push(SuggestionItem::new("it", "Italy"));
        session.set_options(extended);
        let labels: Vec<String> = session.results().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, ["Italy"]);
    }

    #[test]
    fn test_fuzzy_filter_opt_in() {
        let session = SearchSession::sync(vec![
            SuggestionItem::new("uk", "United Kingdom"),
            SuggestionItem::new("ua", "Ukraine"),
        ])
        .with_filter(Filter::Fuzzy);
        session.set_query("ukm");
        let labels: Vec<String> = session.results().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, ["United Kingdom"]);
    }

    #[test]
    fn test_dirty_flag_set_on_activity() {
        let session = SearchSession::sync(countries());
        let dirty = Arc::new(AtomicBool::new(false));
        session.install_dirty(Arc::clone(&dirty));

        session.set_query("p");
        assert!(dirty.load(Ordering::SeqCst));
    }
}
