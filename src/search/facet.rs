//! Facet aggregation over the filtered record set.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::document::FieldAccess;

/// A single facet value and the number of records carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    /// Stringified field value.
    pub value: String,
    /// Number of filtered records resolving to this value.
    pub count: u64,
}

/// Value distribution for one faceted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFacet {
    /// The field this facet belongs to.
    pub field: String,
    /// Counts in first-seen order.
    pub counts: Vec<FacetCount>,
}

/// Count facet values for each requested field.
///
/// Counts are taken over the filtered record set before any query matching,
/// so they are independent of the query text. Values are stringified and
/// accumulated in first-seen order; records that do not resolve a field are
/// left out of that field's counts.
pub fn collect_facets<T: FieldAccess>(records: &[&T], fields: &[String]) -> Vec<SearchFacet> {
    fields
        .iter()
        .map(|field| {
            let mut slots: AHashMap<String, usize> = AHashMap::new();
            let mut counts: Vec<FacetCount> = Vec::new();
            for record in records {
                let Some(value) = record.field(field) else {
                    continue;
                };
                let rendered = value.to_string();
                match slots.get(&rendered) {
                    Some(&slot) => counts[slot].count += 1,
                    None => {
                        slots.insert(rendered.clone(), counts.len());
                        counts.push(FacetCount {
                            value: rendered,
                            count: 1,
                        });
                    }
                }
            }
            SearchFacet {
                field: field.clone(),
                counts,
            }
        })
        .collect()
}
