//! Result ranking: ordering scored records and assigning result identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{FieldAccess, FieldValue};
use crate::query::matcher::{MatchSpan, ScoredRecord};

/// Identity assigned to a ranked result.
///
/// `Value` carries the record's own `id` field. `Index` is the fallback
/// position within the ranked batch; it is not stable across re-filtering
/// or re-sorting and may collide between batches, so only `Value` ids
/// should be used to track results over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultId {
    /// The record's resolved `id` field.
    Value(FieldValue),
    /// Position within the ranked batch.
    Index(usize),
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultId::Value(value) => write!(f, "{value}"),
            ResultId::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult<T> {
    /// Result identity per [`ResultId`].
    pub id: ResultId,
    /// The matched record.
    pub item: T,
    /// Relevance score in `[0, 1]`.
    pub score: f32,
    /// Highlight spans of the fields that matched.
    pub matches: Vec<MatchSpan>,
}

/// Order scored records by descending score and truncate to `max_results`.
///
/// The sort is stable, so ties keep the order produced by the filter/sort
/// pipeline. Zero scores are dropped before ranking.
pub fn rank<T>(mut scored: Vec<ScoredRecord<'_, T>>, max_results: usize) -> Vec<SearchResult<T>>
where
    T: FieldAccess + Clone,
{
    scored.retain(|record| record.score > 0.0);
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(max_results);
    scored
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            let id = match entry.record.field("id") {
                Some(value) => ResultId::Value(value),
                None => ResultId::Index(position),
            };
            SearchResult {
                id,
                item: entry.record.clone(),
                score: entry.score,
                matches: entry.matches,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn scored<'a>(records: &'a [Value], scores: &[f32]) -> Vec<ScoredRecord<'a, Value>> {
        records
            .iter()
            .zip(scores)
            .map(|(record, &score)| ScoredRecord {
                record,
                score,
                matches: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_rank_orders_by_descending_score() {
        let records = vec![
            json!({"id": "a"}),
            json!({"id": "b"}),
            json!({"id": "c"}),
        ];
        let results = rank(scored(&records, &[0.2, 0.9, 0.5]), 10);

        let ids: Vec<String> = results.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let records = vec![
            json!({"id": "first"}),
            json!({"id": "second"}),
            json!({"id": "third"}),
        ];
        let results = rank(scored(&records, &[1.0, 1.0, 1.0]), 10);

        let ids: Vec<String> = results.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_rank_truncates_to_max_results() {
        let records: Vec<Value> = (0..5).map(|i| json!({"id": i})).collect();
        let results = rank(scored(&records, &[0.1, 0.2, 0.3, 0.4, 0.5]), 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, ResultId::Value(FieldValue::Integer(4)));
    }

    #[test]
    fn test_rank_drops_zero_scores() {
        let records = vec![json!({"id": 1}), json!({"id": 2})];
        let results = rank(scored(&records, &[0.0, 0.4]), 10);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, ResultId::Value(FieldValue::Integer(2)));
    }

    #[test]
    fn test_missing_id_falls_back_to_batch_position() {
        let records = vec![json!({"name": "high"}), json!({"name": "low"})];
        let results = rank(scored(&records, &[0.3, 0.8]), 10);

        // Positions follow the ranked order, not the input order.
        assert_eq!(results[0].id, ResultId::Index(0));
        assert_eq!(results[0].item.field("name").map(|v| v.to_string()), Some("low".to_string()));
        assert_eq!(results[1].id, ResultId::Index(1));
    }
}
