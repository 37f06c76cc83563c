//! Search engine: session orchestration, facets, highlighting.

pub mod engine;
pub mod facet;
pub mod highlight;
pub mod remote;

pub use self::engine::SearchEngine;
pub use self::facet::{FacetCount, SearchFacet, collect_facets};
pub use self::highlight::{HighlightSegment, highlight, merge_ranges};
pub use self::remote::RemoteFetch;

use std::sync::Arc;
use std::time::Duration;

use crate::query::collector::SearchResult;
use crate::query::filter::SearchFilter;
use crate::query::fuzzy::FuzzyConfig;
use crate::query::sort::SortDirection;

/// Tuning knobs for search execution.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of results kept after ranking.
    pub max_results: usize,
    /// Queries shorter than this yield an empty result set without running
    /// a search.
    pub min_query_length: usize,
    /// Delay between a query edit and the live search it triggers.
    pub debounce: Duration,
    /// Whether query edits trigger searches on their own.
    pub live_search: bool,
    /// Fuzzy matching configuration.
    pub fuzzy: FuzzyConfig,
    /// Run the match stage on the rayon pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_results: 10,
            min_query_length: 1,
            debounce: Duration::from_millis(300),
            live_search: true,
            fuzzy: FuzzyConfig::default(),
            parallel: false,
        }
    }
}

pub(crate) type QueryObserver = Box<dyn Fn(&str) + Send + Sync>;
pub(crate) type ResultsObserver<T> = Box<dyn Fn(&[SearchResult<T>]) + Send + Sync>;
pub(crate) type SelectObserver<T> = Box<dyn Fn(&SearchResult<T>) + Send + Sync>;

/// Configuration a [`SearchEngine`] is built from.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use trawl::{SearchEngine, SearchOptions};
///
/// let options = SearchOptions::new()
///     .records(vec![json!({"id": 1, "name": "Hello World"})])
///     .searchable_fields(["name"])
///     .facet_fields(["name"])
///     .max_results(5);
///
/// let engine = SearchEngine::new(options);
/// assert_eq!(engine.total_results(), 0);
/// ```
pub struct SearchOptions<T> {
    pub(crate) records: Vec<T>,
    pub(crate) fetcher: Option<Arc<dyn RemoteFetch<T>>>,
    pub(crate) searchable_fields: Vec<String>,
    pub(crate) facet_fields: Vec<String>,
    pub(crate) initial_filters: Vec<SearchFilter>,
    pub(crate) initial_sort: Option<(String, SortDirection)>,
    pub(crate) config: SearchConfig,
    pub(crate) on_query_change: Option<QueryObserver>,
    pub(crate) on_results_change: Option<ResultsObserver<T>>,
    pub(crate) on_result_select: Option<SelectObserver<T>>,
}

impl<T> SearchOptions<T> {
    /// Create empty options with the default configuration.
    pub fn new() -> Self {
        SearchOptions {
            records: Vec::new(),
            fetcher: None,
            searchable_fields: Vec::new(),
            facet_fields: Vec::new(),
            initial_filters: Vec::new(),
            initial_sort: None,
            config: SearchConfig::default(),
            on_query_change: None,
            on_results_change: None,
            on_result_select: None,
        }
    }

    /// Set the in-memory record set searched when no fetcher is configured.
    pub fn records(mut self, records: Vec<T>) -> Self {
        self.records = records;
        self
    }

    /// Set the remote fetch adapter. When present, every search session
    /// fetches its record batch instead of using the in-memory set.
    pub fn fetcher(mut self, fetcher: Arc<dyn RemoteFetch<T>>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Set the fields the matcher scores against.
    pub fn searchable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fields facet counts are computed for.
    pub fn facet_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facet_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add an initial filter, also restored by `reset`.
    pub fn filter(mut self, filter: SearchFilter) -> Self {
        self.initial_filters.push(filter);
        self
    }

    /// Set the initial sort, also restored by `reset`.
    pub fn sort<S: Into<String>>(mut self, field: S, direction: SortDirection) -> Self {
        self.initial_sort = Some((field.into(), direction));
        self
    }

    /// Replace the whole search configuration.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum number of results kept after ranking.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    /// Set the minimum query length.
    pub fn min_query_length(mut self, min_query_length: usize) -> Self {
        self.config.min_query_length = min_query_length;
        self
    }

    /// Set the live-search debounce delay.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.config.debounce = debounce;
        self
    }

    /// Enable or disable live search on query edits.
    pub fn live_search(mut self, live_search: bool) -> Self {
        self.config.live_search = live_search;
        self
    }

    /// Set the fuzzy matching configuration.
    pub fn fuzzy(mut self, fuzzy: FuzzyConfig) -> Self {
        self.config.fuzzy = fuzzy;
        self
    }

    /// Observe query text changes.
    pub fn on_query_change<F>(mut self, observer: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_query_change = Some(Box::new(observer));
        self
    }

    /// Observe committed result changes.
    pub fn on_results_change<F>(mut self, observer: F) -> Self
    where
        F: Fn(&[SearchResult<T>]) + Send + Sync + 'static,
    {
        self.on_results_change = Some(Box::new(observer));
        self
    }

    /// Observe result selection.
    pub fn on_result_select<F>(mut self, observer: F) -> Self
    where
        F: Fn(&SearchResult<T>) + Send + Sync + 'static,
    {
        self.on_result_select = Some(Box::new(observer));
        self
    }
}

impl<T> Default for SearchOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}
