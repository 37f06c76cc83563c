//! Merging match indices into renderable highlight segments.

use serde::{Deserialize, Serialize};

/// One piece of a highlighted string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSegment {
    /// The exact substring this segment covers.
    pub text: String,
    /// Whether the segment is part of a match.
    pub highlighted: bool,
}

/// Merge inclusive `(start, end)` index pairs.
///
/// Pairs are sorted by start; overlapping and adjacent ranges
/// (`start <= end + 1`) collapse into one. Deterministic for a given input
/// regardless of pair order.
pub fn merge_ranges(mut pairs: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    pairs.sort_by_key(|&(start, _)| start);
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in pairs {
        match merged.last_mut() {
            Some(current) if start <= current.1.saturating_add(1) => {
                current.1 = current.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Split `text` into alternating plain and highlighted segments.
///
/// Indices are inclusive character positions; pairs reaching past the end
/// of the text are clamped and inverted pairs dropped. Concatenating the
/// returned segments' text reproduces the input exactly, with no gaps and
/// no double-covered characters.
pub fn highlight(text: &str, pairs: &[(usize, usize)]) -> Vec<HighlightSegment> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    let last = chars.len() - 1;
    let in_bounds: Vec<(usize, usize)> = pairs
        .iter()
        .filter(|&&(start, _)| start <= last)
        .map(|&(start, end)| (start, end.min(last)))
        .filter(|&(start, end)| start <= end)
        .collect();

    let mut segments = Vec::new();
    let mut cursor = 0usize;
    for (start, end) in merge_ranges(in_bounds) {
        if start > cursor {
            segments.push(HighlightSegment {
                text: chars[cursor..start].iter().collect(),
                highlighted: false,
            });
        }
        segments.push(HighlightSegment {
            text: chars[start..=end].iter().collect(),
            highlighted: true,
        });
        cursor = end + 1;
    }
    if cursor < chars.len() {
        segments.push(HighlightSegment {
            text: chars[cursor..].iter().collect(),
            highlighted: false,
        });
    }
    segments
}
