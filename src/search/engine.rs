//! Query-session orchestration over the filter/sort/facet/match pipeline.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::document::FieldAccess;
use crate::error::TrawlError;
use crate::query::collector::{SearchResult, rank};
use crate::query::filter::{SearchFilter, apply_filters};
use crate::query::matcher::score_records;
use crate::query::sort::{SortDirection, sort_records};
use crate::search::facet::{SearchFacet, collect_facets};
use crate::search::remote::RemoteFetch;
use crate::search::{
    QueryObserver, ResultsObserver, SearchConfig, SearchOptions, SelectObserver,
};

/// Mutable engine state behind a single mutex.
///
/// Only the engine writes here; the pipeline stages are pure functions over
/// snapshots. The lock is never held across an await point.
struct EngineState<T> {
    query: String,
    records: Arc<Vec<T>>,
    filters: Vec<SearchFilter>,
    sort_field: Option<String>,
    sort_direction: SortDirection,
    facets: Vec<SearchFacet>,
    results: Vec<SearchResult<T>>,
    is_loading: bool,
    error: Option<TrawlError>,
    selected: Option<SearchResult<T>>,
    session: u64,
    debounce: Option<JoinHandle<()>>,
}

struct EngineShared<T> {
    state: Mutex<EngineState<T>>,
    fetcher: Option<Arc<dyn RemoteFetch<T>>>,
    searchable_fields: Vec<String>,
    facet_fields: Vec<String>,
    initial_filters: Vec<SearchFilter>,
    initial_sort: Option<(String, SortDirection)>,
    config: SearchConfig,
    on_query_change: Option<QueryObserver>,
    on_results_change: Option<ResultsObserver<T>>,
    on_result_select: Option<SelectObserver<T>>,
}

/// Search engine driving debounced, cancellation-safe query sessions.
///
/// Every search mints a monotonically increasing session id; an async
/// outcome (success or failure) is committed to engine state only while its
/// session is still the newest, so out-of-order responses can never
/// overwrite fresher results. The engine is a cheap-to-clone handle; clones
/// share state.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use trawl::{SearchEngine, SearchOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let engine = SearchEngine::new(
///     SearchOptions::new()
///         .records(vec![
///             json!({"id": 1, "name": "Hello World"}),
///             json!({"id": 2, "name": "World Cup"}),
///         ])
///         .searchable_fields(["name"]),
/// );
///
/// engine.search(Some("wor")).await;
/// assert_eq!(engine.total_results(), 2);
/// # }
/// ```
pub struct SearchEngine<T> {
    inner: Arc<EngineShared<T>>,
}

impl<T> Clone for SearchEngine<T> {
    fn clone(&self) -> Self {
        SearchEngine {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SearchEngine<T>
where
    T: FieldAccess + Clone + Send + Sync + 'static,
{
    /// Create a new engine from the given options.
    pub fn new(options: SearchOptions<T>) -> Self {
        let SearchOptions {
            records,
            fetcher,
            searchable_fields,
            facet_fields,
            initial_filters,
            initial_sort,
            config,
            on_query_change,
            on_results_change,
            on_result_select,
        } = options;

        let state = EngineState {
            query: String::new(),
            records: Arc::new(records),
            filters: initial_filters.clone(),
            sort_field: initial_sort.as_ref().map(|(field, _)| field.clone()),
            sort_direction: initial_sort
                .as_ref()
                .map(|(_, direction)| *direction)
                .unwrap_or_default(),
            facets: Vec::new(),
            results: Vec::new(),
            is_loading: false,
            error: None,
            selected: None,
            session: 0,
            debounce: None,
        };

        SearchEngine {
            inner: Arc::new(EngineShared {
                state: Mutex::new(state),
                fetcher,
                searchable_fields,
                facet_fields,
                initial_filters,
                initial_sort,
                config,
                on_query_change,
                on_results_change,
                on_result_select,
            }),
        }
    }

    /// Store the query text and, with live search on, arm the debounce timer.
    ///
    /// Each call replaces the previous timer, so only the last edit within
    /// the debounce window starts a search. Arming the timer requires a
    /// running tokio runtime. With live search disabled nothing implicit
    /// happens; call [`search`](Self::search) explicitly.
    pub fn set_query(&self, text: &str) {
        {
            let mut state = self.inner.state.lock();
            state.query = text.to_string();
            if let Some(handle) = state.debounce.take() {
                handle.abort();
            }
        }
        if let Some(observer) = &self.inner.on_query_change {
            observer(text);
        }

        let config = &self.inner.config;
        if config.live_search && text.chars().count() >= config.min_query_length {
            let weak = Arc::downgrade(&self.inner);
            let delay = config.debounce;
            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Some(inner) = weak.upgrade() {
                    SearchEngine { inner }.search(None).await;
                }
            });
            self.inner.state.lock().debounce = Some(handle);
        }
    }

    /// Run a search session for the stored query (or `query_override`).
    ///
    /// The override is used for this session only; it is not written back
    /// to the stored query text. Errors never propagate out of this method:
    /// they are recorded on the engine's [`error`](Self::error) state. A
    /// session whose async work finishes after a newer session has started
    /// commits nothing.
    pub async fn search(&self, query_override: Option<&str>) {
        let session;
        let query;
        let filters;
        let sort_field;
        let sort_direction;
        let records;
        {
            let mut state = self.inner.state.lock();
            query = query_override
                .map(str::to_string)
                .unwrap_or_else(|| state.query.clone());
            state.session += 1;
            session = state.session;

            if query.chars().count() < self.inner.config.min_query_length {
                state.results.clear();
                state.facets.clear();
                drop(state);
                debug!(session, "query below minimum length, cleared results");
                self.notify_results();
                return;
            }

            state.is_loading = true;
            state.error = None;
            filters = state.filters.clone();
            sort_field = state.sort_field.clone();
            sort_direction = state.sort_direction;
            records = Arc::clone(&state.records);
        }
        debug!(session, query = %query, "search session started");

        let batch: Arc<Vec<T>> = match &self.inner.fetcher {
            Some(fetcher) => match fetcher.fetch(&query, &filters).await {
                Ok(fetched) => Arc::new(fetched),
                Err(err) => {
                    self.fail_session(session, TrawlError::remote_fetch(err.to_string()));
                    return;
                }
            },
            None => records,
        };

        let config = &self.inner.config;
        let mut kept = apply_filters(batch.as_slice(), &filters);
        sort_records(&mut kept, sort_field.as_deref(), sort_direction);
        let facets = collect_facets(&kept, &self.inner.facet_fields);
        let (scored, match_error) = score_records(
            &kept,
            &query,
            &self.inner.searchable_fields,
            &config.fuzzy,
            config.parallel,
        );
        let results = rank(scored, config.max_results);

        let committed = {
            let mut state = self.inner.state.lock();
            if state.session != session {
                debug!(session, current = state.session, "discarding stale session");
                false
            } else {
                state.results = results;
                state.facets = facets;
                state.error = match_error;
                state.is_loading = false;
                true
            }
        };
        if committed {
            debug!(session, "search session committed");
            self.notify_results();
        }
    }

    /// Restore the engine to its configured initial state.
    ///
    /// Clears query, results, facets, selection, error and loading, restores
    /// the initial filters and sort, disarms the debounce timer, and
    /// invalidates any in-flight session.
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.lock();
            if let Some(handle) = state.debounce.take() {
                handle.abort();
            }
            state.query.clear();
            state.results.clear();
            state.facets.clear();
            state.filters = self.inner.initial_filters.clone();
            state.sort_field = self
                .inner
                .initial_sort
                .as_ref()
                .map(|(field, _)| field.clone());
            state.sort_direction = self
                .inner
                .initial_sort
                .as_ref()
                .map(|(_, direction)| *direction)
                .unwrap_or_default();
            state.selected = None;
            state.error = None;
            state.is_loading = false;
            // An in-flight session must not repopulate a reset engine.
            state.session += 1;
        }
        self.notify_results();
    }

    /// Add a filter, replacing any existing filter on the same field.
    pub fn add_filter(&self, filter: SearchFilter) {
        let mut state = self.inner.state.lock();
        state.filters.retain(|existing| existing.field != filter.field);
        state.filters.push(filter);
    }

    /// Remove the filter on the given field, if any.
    pub fn remove_filter(&self, field: &str) {
        self.inner
            .state
            .lock()
            .filters
            .retain(|existing| existing.field != field);
    }

    /// Remove all filters.
    pub fn clear_filters(&self) {
        self.inner.state.lock().filters.clear();
    }

    /// Set the sort field and direction for subsequent sessions.
    pub fn set_sort<S: Into<String>>(&self, field: S, direction: SortDirection) {
        let mut state = self.inner.state.lock();
        state.sort_field = Some(field.into());
        state.sort_direction = direction;
    }

    /// Mark a result as selected and notify the selection observer.
    pub fn select_result(&self, result: SearchResult<T>) {
        self.inner.state.lock().selected = Some(result.clone());
        if let Some(observer) = &self.inner.on_result_select {
            observer(&result);
        }
    }

    /// Clear the selected result.
    pub fn clear_selected_result(&self) {
        self.inner.state.lock().selected = None;
    }

    /// Replace the in-memory record set.
    ///
    /// Takes effect from the next search session; committed results are
    /// left untouched.
    pub fn set_records(&self, records: Vec<T>) {
        self.inner.state.lock().records = Arc::new(records);
    }

    /// The stored query text.
    pub fn query(&self) -> String {
        self.inner.state.lock().query.clone()
    }

    /// The results of the most recently committed session.
    pub fn results(&self) -> Vec<SearchResult<T>> {
        self.inner.state.lock().results.clone()
    }

    /// Whether a search session is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().is_loading
    }

    /// The error of the most recently committed session, if any.
    pub fn error(&self) -> Option<TrawlError> {
        self.inner.state.lock().error.clone()
    }

    /// Number of results in the most recently committed session.
    pub fn total_results(&self) -> usize {
        self.inner.state.lock().results.len()
    }

    /// The active filters.
    pub fn filters(&self) -> Vec<SearchFilter> {
        self.inner.state.lock().filters.clone()
    }

    /// The active sort field.
    pub fn sort_field(&self) -> Option<String> {
        self.inner.state.lock().sort_field.clone()
    }

    /// The active sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.inner.state.lock().sort_direction
    }

    /// Facets of the most recently committed session.
    pub fn facets(&self) -> Vec<SearchFacet> {
        self.inner.state.lock().facets.clone()
    }

    /// The currently selected result, if any.
    pub fn selected_result(&self) -> Option<SearchResult<T>> {
        self.inner.state.lock().selected.clone()
    }

    fn fail_session(&self, session: u64, err: TrawlError) {
        let committed = {
            let mut state = self.inner.state.lock();
            if state.session != session {
                debug!(session, current = state.session, "discarding stale failure");
                false
            } else {
                error!(session, error = %err, "search session failed");
                state.error = Some(err);
                state.results.clear();
                state.is_loading = false;
                true
            }
        };
        if committed {
            self.notify_results();
        }
    }

    fn notify_results(&self) {
        if let Some(observer) = &self.inner.on_results_change {
            let results = self.inner.state.lock().results.clone();
            observer(&results);
        }
    }
}
