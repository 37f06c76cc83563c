//! Stable single-field ordering over a record set.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{FieldAccess, FieldValue};

/// Sort direction for [`sort_records`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order (the default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, SortDirection::Desc)
    }

    /// Apply this direction to a base ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare two resolved sort keys, absent values first.
///
/// An absent value sorts before any present value; the caller flips the
/// whole ordering for descending sorts, which places absent values last.
/// Present values without a defined mutual ordering compare equal, so the
/// stable sort keeps their original relative order.
fn compare_keys(a: &Option<FieldValue>, b: &Option<FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
    }
}

/// Stable sort of a record set by one field.
///
/// A missing `field` leaves the records untouched. Each record's key is
/// resolved once; equal keys preserve the original relative order.
pub fn sort_records<T: FieldAccess>(
    records: &mut Vec<&T>,
    field: Option<&str>,
    direction: SortDirection,
) {
    let Some(field) = field else {
        return;
    };
    let mut keyed: Vec<(Option<FieldValue>, &T)> = records
        .drain(..)
        .map(|record| (record.field(field), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| direction.apply(compare_keys(a, b)));
    records.extend(keyed.into_iter().map(|(_, record)| record));
}
