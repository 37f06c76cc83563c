//! Abstract contract for fetching records from a remote source.

use futures::future::BoxFuture;

use crate::query::filter::SearchFilter;

/// Transport-agnostic record source awaited by the search engine.
///
/// Implementations resolve a `(query, filters)` pair to a batch of records.
/// A rejection surfaces on the engine as
/// [`TrawlError::RemoteFetch`](crate::error::TrawlError::RemoteFetch); the
/// engine never retries on its own, and a response arriving after a newer
/// search session has started is discarded without effect.
///
/// # Examples
///
/// ```
/// use futures::future::BoxFuture;
/// use serde_json::{Value, json};
/// use trawl::{RemoteFetch, SearchFilter};
///
/// struct StaticSource;
///
/// impl RemoteFetch<Value> for StaticSource {
///     fn fetch<'a>(
///         &'a self,
///         query: &'a str,
///         _filters: &'a [SearchFilter],
///     ) -> BoxFuture<'a, anyhow::Result<Vec<Value>>> {
///         Box::pin(async move { Ok(vec![json!({"name": query})]) })
///     }
/// }
/// ```
pub trait RemoteFetch<T>: Send + Sync {
    /// Fetch the records for a query and its active filters.
    fn fetch<'a>(
        &'a self,
        query: &'a str,
        filters: &'a [SearchFilter],
    ) -> BoxFuture<'a, anyhow::Result<Vec<T>>>;
}
