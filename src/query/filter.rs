//! Field predicates applied as a conjunction over a record set.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{FieldAccess, FieldValue};

/// Comparison operator for a [`SearchFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Strict equality (the default).
    #[default]
    Eq,
    /// Strict inequality.
    Neq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Stringified record value contains the stringified filter value.
    Contains,
    /// Stringified record value starts with the stringified filter value.
    StartsWith,
    /// Stringified record value ends with the stringified filter value.
    EndsWith,
}

impl FilterOperator {
    /// Evaluate an ordering-based operator against a comparison result.
    fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            FilterOperator::Gt => ordering == Ordering::Greater,
            FilterOperator::Gte => ordering != Ordering::Less,
            FilterOperator::Lt => ordering == Ordering::Less,
            FilterOperator::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Field the predicate reads.
    pub field: String,
    /// Operand compared against the resolved field value.
    pub value: FieldValue,
    /// Comparison operator, [`FilterOperator::Eq`] by default.
    #[serde(default)]
    pub operator: FilterOperator,
}

impl SearchFilter {
    /// Create an equality filter on the given field.
    pub fn new<F: Into<String>, V: Into<FieldValue>>(field: F, value: V) -> Self {
        SearchFilter {
            field: field.into(),
            value: value.into(),
            operator: FilterOperator::Eq,
        }
    }

    /// Set the comparison operator.
    pub fn operator(mut self, operator: FilterOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Whether a record satisfies this predicate.
    ///
    /// A record that does not resolve the field fails the predicate:
    /// absence is never a wildcard. Ordering operators on values without a
    /// defined ordering (cross-type operands) also fail.
    pub fn matches<T: FieldAccess>(&self, record: &T) -> bool {
        let Some(resolved) = record.field(&self.field) else {
            return false;
        };
        match self.operator {
            FilterOperator::Eq => resolved == self.value,
            FilterOperator::Neq => resolved != self.value,
            FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte => {
                resolved
                    .partial_cmp(&self.value)
                    .is_some_and(|ordering| self.operator.eval_ordering(ordering))
            }
            FilterOperator::Contains => resolved.to_string().contains(&self.value.to_string()),
            FilterOperator::StartsWith => {
                resolved.to_string().starts_with(&self.value.to_string())
            }
            FilterOperator::EndsWith => resolved.to_string().ends_with(&self.value.to_string()),
        }
    }
}

/// Keep the records satisfying every filter.
///
/// Filters are ANDed; an empty filter list keeps everything. The conjunction
/// is associative, so filter order never changes the resulting subset.
pub fn apply_filters<'a, T: FieldAccess>(
    records: &'a [T],
    filters: &[SearchFilter],
) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| filters.iter().all(|filter| filter.matches(*record)))
        .collect()
}
