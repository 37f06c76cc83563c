//! # Trawl
//!
//! An embeddable search and ranking engine for interactive search UIs.
//!
//! Trawl turns a free-text query plus a record set into filtered, sorted,
//! faceted, scored, and highlight-annotated results. It is the engine half
//! of a search widget: the presentational layer subscribes to its observers
//! and renders whatever state the engine commits.
//!
//! ## Features
//!
//! - Predicate filters, stable single-field sorting and facet counts
//! - Exact and fuzzy subsequence matching with normalized scores
//! - Debounced live search with stale-session cancellation
//! - Highlight span merging that reconstructs exact substrings
//! - In-memory record sets or an async remote fetch adapter

pub mod document;
pub mod error;
pub mod query;
pub mod search;

pub use document::{FieldAccess, FieldValue, resolve_path};
pub use error::{Result, TrawlError};
pub use query::{
    FilterOperator, FuzzyConfig, MatchSpan, ResultId, ScoredRecord, SearchFilter, SearchResult,
    SortDirection, apply_filters, rank, score_records, sort_records, subsequence_score,
};
pub use search::{
    FacetCount, HighlightSegment, RemoteFetch, SearchConfig, SearchEngine, SearchFacet,
    SearchOptions, collect_facets, highlight, merge_ranges,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
