//! Per-field query matching and record-level scoring.
//!
//! For every searchable field the matcher resolves the field text and runs
//! either an exact case-insensitive substring scan or the fuzzy subsequence
//! scorer. The record-level score is the maximum over its fields; records
//! with no matching field are dropped. All indices are character positions
//! into the raw field text.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::FieldAccess;
use crate::error::TrawlError;
use crate::query::fuzzy::{FuzzyConfig, subsequence_score};

/// Match locations for one field of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Field name the indices belong to.
    pub key: String,
    /// Inclusive `(start, end)` character index pairs, ascending by start.
    pub indices: Vec<(usize, usize)>,
    /// The raw field text the indices refer to.
    pub value: String,
}

/// A record together with its match score and highlight spans.
#[derive(Debug, Clone)]
pub struct ScoredRecord<'a, T> {
    /// The matched record.
    pub record: &'a T,
    /// Record-level score, the maximum over its field scores.
    pub score: f32,
    /// Spans of the fields that matched.
    pub matches: Vec<MatchSpan>,
}

/// Single-character case fold used for query/field comparison.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Locate `needle` within `haystack`, both already case-folded.
fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Score one record against the folded query characters.
fn score_fields<'a, T: FieldAccess>(
    record: &'a T,
    query: &[char],
    fields: &[String],
    fuzzy: &FuzzyConfig,
) -> Option<ScoredRecord<'a, T>> {
    let mut best = 0.0f32;
    let mut matches = Vec::new();

    for field in fields {
        let Some(value) = record.field(field) else {
            continue;
        };
        let text = value.to_string();
        let raw_chars: Vec<char> = text.chars().collect();
        let folded: Vec<char> = raw_chars.iter().map(|&c| fold_char(c)).collect();

        if fuzzy.enabled {
            let score = subsequence_score(query, &folded);
            if score > 0.0 {
                best = best.max(score);
                // The span deliberately covers the whole field text rather
                // than the individual matched characters.
                if score >= fuzzy.threshold && !raw_chars.is_empty() {
                    matches.push(MatchSpan {
                        key: field.clone(),
                        indices: vec![(0, raw_chars.len() - 1)],
                        value: text,
                    });
                }
            }
        } else if let Some(start) = find_subslice(&folded, query) {
            best = 1.0;
            matches.push(MatchSpan {
                key: field.clone(),
                indices: vec![(start, start + query.len() - 1)],
                value: text,
            });
        }
    }

    if best > 0.0 {
        Some(ScoredRecord {
            record,
            score: best,
            matches,
        })
    } else {
        None
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "record scoring panicked".to_string()
    }
}

/// Score every record against the query.
///
/// Records are scored independently; a panic while resolving or scoring one
/// record is caught, logged, and converted into a
/// [`TrawlError::MatchEvaluation`] without aborting the rest of the batch.
/// Returns the surviving scored records in input order together with the
/// first per-record error, if any. With `parallel` set the scoring runs on
/// the rayon pool.
pub fn score_records<'a, T>(
    records: &[&'a T],
    query: &str,
    fields: &[String],
    fuzzy: &FuzzyConfig,
    parallel: bool,
) -> (Vec<ScoredRecord<'a, T>>, Option<TrawlError>)
where
    T: FieldAccess + Sync,
{
    let folded_query: Vec<char> = query.chars().map(fold_char).collect();

    let score_one = |record: &&'a T| -> Result<Option<ScoredRecord<'a, T>>, TrawlError> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            score_fields(*record, &folded_query, fields, fuzzy)
        }))
        .map_err(|payload| TrawlError::match_evaluation(panic_message(payload.as_ref())))
    };

    let outcomes: Vec<Result<Option<ScoredRecord<'a, T>>, TrawlError>> = if parallel {
        records.par_iter().map(score_one).collect()
    } else {
        records.iter().map(score_one).collect()
    };

    let mut scored = Vec::new();
    let mut first_error = None;
    for outcome in outcomes {
        match outcome {
            Ok(Some(record)) => scored.push(record),
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "skipping record that failed match evaluation");
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
    }
    (scored, first_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldValue;
    use serde_json::{Value, json};

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_emits_span_and_full_score() {
        let records = vec![json!({"name": "Hello World"})];
        let refs: Vec<&Value> = records.iter().collect();

        let (scored, error) = score_records(
            &refs,
            "wor",
            &fields(&["name"]),
            &FuzzyConfig::default(),
            false,
        );

        assert!(error.is_none());
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score, 1.0);
        assert_eq!(
            scored[0].matches,
            vec![MatchSpan {
                key: "name".to_string(),
                indices: vec![(6, 8)],
                value: "Hello World".to_string(),
            }]
        );
    }

    #[test]
    fn test_exact_miss_drops_the_record() {
        let records = vec![json!({"name": "Hello"})];
        let refs: Vec<&Value> = records.iter().collect();

        let (scored, _) = score_records(
            &refs,
            "xyz",
            &fields(&["name"]),
            &FuzzyConfig::default(),
            false,
        );
        assert!(scored.is_empty());
    }

    #[test]
    fn test_absent_field_is_skipped() {
        let records = vec![json!({"title": "Hello"})];
        let refs: Vec<&Value> = records.iter().collect();

        let (scored, _) = score_records(
            &refs,
            "hello",
            &fields(&["name", "title"]),
            &FuzzyConfig::default(),
            false,
        );
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].matches[0].key, "title");
    }

    #[test]
    fn test_record_score_is_max_over_fields() {
        let records = vec![json!({"name": "held", "title": "hello"})];
        let refs: Vec<&Value> = records.iter().collect();

        let fuzzy = FuzzyConfig::new().enabled(true);
        let (scored, _) = score_records(&refs, "hello", &fields(&["name", "title"]), &fuzzy, false);

        // "hello" is not a subsequence of "held" but equals "hello".
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score, 1.0);
    }

    #[test]
    fn test_fuzzy_span_covers_whole_field_above_threshold() {
        let records = vec![json!({"name": "hello"})];
        let refs: Vec<&Value> = records.iter().collect();

        let fuzzy = FuzzyConfig::new().enabled(true).threshold(0.5);
        let (scored, _) = score_records(&refs, "hlo", &fields(&["name"]), &fuzzy, false);

        assert_eq!(scored.len(), 1);
        assert!(scored[0].score > 0.5);
        assert_eq!(scored[0].matches[0].indices, vec![(0, 4)]);
    }

    #[test]
    fn test_fuzzy_below_threshold_scores_without_span() {
        let records = vec![json!({"name": "horizontal layout"})];
        let refs: Vec<&Value> = records.iter().collect();

        let fuzzy = FuzzyConfig::new().enabled(true).threshold(0.99);
        let (scored, _) = score_records(&refs, "hot", &fields(&["name"]), &fuzzy, false);

        assert_eq!(scored.len(), 1);
        assert!(scored[0].matches.is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let records = vec![json!({"name": "HELLO World"})];
        let refs: Vec<&Value> = records.iter().collect();

        let (scored, _) = score_records(
            &refs,
            "hello w",
            &fields(&["name"]),
            &FuzzyConfig::default(),
            false,
        );
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].matches[0].indices, vec![(0, 6)]);
    }

    #[test]
    fn test_non_text_fields_are_stringified() {
        let records = vec![json!({"version": 1204})];
        let refs: Vec<&Value> = records.iter().collect();

        let (scored, _) = score_records(
            &refs,
            "204",
            &fields(&["version"]),
            &FuzzyConfig::default(),
            false,
        );
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].matches[0].indices, vec![(1, 3)]);
    }

    #[test]
    fn test_parallel_scoring_matches_serial() {
        let records: Vec<Value> = (0..64)
            .map(|i| json!({"name": format!("record number {i}")}))
            .collect();
        let refs: Vec<&Value> = records.iter().collect();
        let fields = fields(&["name"]);
        let fuzzy = FuzzyConfig::default();

        let (serial, _) = score_records(&refs, "number", &fields, &fuzzy, false);
        let (parallel, _) = score_records(&refs, "number", &fields, &fuzzy, true);

        assert_eq!(serial.len(), parallel.len());
        for (a, b) in serial.iter().zip(parallel.iter()) {
            assert_eq!(a.score, b.score);
            assert_eq!(a.matches, b.matches);
        }
    }

    #[test]
    fn test_panicking_record_is_skipped_not_fatal() {
        struct Explosive {
            armed: bool,
        }

        impl FieldAccess for Explosive {
            fn field(&self, _path: &str) -> Option<FieldValue> {
                if self.armed {
                    panic!("boom");
                }
                Some(FieldValue::Text("safe match".to_string()))
            }
        }

        let records = vec![
            Explosive { armed: false },
            Explosive { armed: true },
            Explosive { armed: false },
        ];
        let refs: Vec<&Explosive> = records.iter().collect();

        let (scored, error) = score_records(
            &refs,
            "match",
            &fields(&["any"]),
            &FuzzyConfig::default(),
            false,
        );

        assert_eq!(scored.len(), 2);
        assert_eq!(error, Some(TrawlError::match_evaluation("boom")));
    }
}
