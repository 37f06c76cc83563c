//! Fuzzy subsequence scoring for approximate query matching.
//!
//! A fuzzy match requires every query character to appear in the field text
//! in order, not necessarily contiguously. The raw score rewards streaks of
//! consecutive matches and matches on word boundaries, then is normalized by
//! the field length so longer fields do not dominate.

use serde::{Deserialize, Serialize};

/// Bonus when a streak of consecutive matches starts.
const STREAK_START_BONUS: f32 = 0.25;
/// Bonus for each further consecutive match within the same streak.
const STREAK_CONTINUE_BONUS: f32 = 0.5;
/// Bonus for a match at the start of the text or right after a space.
const WORD_BOUNDARY_BONUS: f32 = 0.5;

/// Configuration for fuzzy matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    /// Whether fuzzy subsequence matching is used instead of exact
    /// substring matching.
    pub enabled: bool,
    /// Minimum normalized score for a field to contribute a highlight span.
    pub threshold: f32,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        FuzzyConfig {
            enabled: false,
            threshold: 0.6,
        }
    }
}

impl FuzzyConfig {
    /// Create a new fuzzy configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether fuzzy matching is enabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the span threshold.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Score `query` as an ordered subsequence of `text`.
///
/// Both slices must already be case-folded. Returns a normalized score in
/// `[0, 1]`; `0` means the query is not a subsequence of the text.
///
/// Scoring: `+1` per matched character, a streak bonus for consecutive
/// matches, and a word-boundary bonus for matches at index 0 or right after
/// a space. The raw sum is divided by
/// `query_len + (text_len - query_len) / 2` and clamped to `1`.
///
/// Degenerate cases: a query longer than the text scores `0`; a query of
/// exactly the text's length scores `1` on equality and `0` otherwise.
pub fn subsequence_score(query: &[char], text: &[char]) -> f32 {
    let query_len = query.len();
    let text_len = text.len();

    if query_len > text_len {
        return 0.0;
    }
    if query_len == text_len {
        return if query == text { 1.0 } else { 0.0 };
    }

    let mut raw = 0.0f32;
    let mut cursor = 0usize;
    let mut prev_match: Option<usize> = None;
    let mut in_streak = false;

    for (i, &c) in text.iter().enumerate() {
        if cursor >= query_len {
            break;
        }
        if c != query[cursor] {
            continue;
        }
        raw += 1.0;
        match prev_match {
            Some(prev) if i == prev + 1 => {
                if in_streak {
                    raw += STREAK_CONTINUE_BONUS;
                } else {
                    raw += STREAK_START_BONUS;
                    in_streak = true;
                }
            }
            _ => in_streak = false,
        }
        if i == 0 || text[i - 1] == ' ' {
            raw += WORD_BOUNDARY_BONUS;
        }
        prev_match = Some(i);
        cursor += 1;
    }

    if cursor < query_len {
        return 0.0;
    }

    let denominator = query_len as f32 + (text_len - query_len) as f32 * 0.5;
    (raw / denominator).min(1.0)
}
