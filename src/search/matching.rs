//! Case-insensitive literal matching
//!
//! Text is folded to lowercase one char at a time while remembering which
//! byte range of the original each folded char came from. Matches are found
//! in folded space and mapped back to char-aligned offsets in the original,
//! so counts, highlight spans and snippets all agree on what "a match" is.

use std::ops::Range;

/// A query folded for case-insensitive comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedQuery {
    chars: Vec<char>,
}

impl FoldedQuery {
    pub fn new(query: &str) -> Self {
        Self {
            chars: query.chars().flat_map(char::to_lowercase).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Folded view over a text
pub struct FoldedText {
    chars: Vec<char>,
    /// Byte range in the original text of the char each folded char came from
    origins: Vec<(usize, usize)>,
}

impl FoldedText {
    pub fn new(source: &str) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut origins = Vec::with_capacity(source.len());

        for (start, ch) in source.char_indices() {
            let end = start + ch.len_utf8();
            for lower in ch.to_lowercase() {
                chars.push(lower);
                origins.push((start, end));
            }
        }

        Self { chars, origins }
    }

    fn matches_at(&self, index: usize, query: &FoldedQuery) -> bool {
        let needle = &query.chars;
        self.chars.len() - index >= needle.len() && self.chars[index..index + needle.len()] == needle[..]
    }

    fn original_range(&self, index: usize, len: usize) -> Range<usize> {
        let start = self.origins[index].0;
        let end = self.origins[index + len - 1].1;
        start..end
    }

    /// Count occurrences, allowing them to overlap ("aa" occurs twice in "aaa")
    pub fn count_overlapping(&self, query: &FoldedQuery) -> usize {
        if query.is_empty() || query.chars.len() > self.chars.len() {
            return 0;
        }

        (0..=self.chars.len() - query.chars.len())
            .filter(|&i| self.matches_at(i, query))
            .count()
    }

    /// First occurrence as a byte range of the original text
    pub fn find_first(&self, query: &FoldedQuery) -> Option<Range<usize>> {
        if query.is_empty() || query.chars.len() > self.chars.len() {
            return None;
        }

        (0..=self.chars.len() - query.chars.len())
            .find(|&i| self.matches_at(i, query))
            .map(|i| self.original_range(i, query.chars.len()))
    }

    /// All non-overlapping occurrences, scanned left to right, as byte ranges
    /// of the original text
    pub fn find_all(&self, query: &FoldedQuery) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        if query.is_empty() || query.chars.len() > self.chars.len() {
            return ranges;
        }

        let last_start = self.chars.len() - query.chars.len();
        let mut i = 0;
        while i <= last_start {
            if !self.matches_at(i, query) {
                i += 1;
                continue;
            }

            let range = self.original_range(i, query.chars.len());
            i += query.chars.len();
            // A source char that folds to several chars must not be reused
            // by the next match.
            while i < self.chars.len() && self.origins[i].0 < range.end {
                i += 1;
            }
            ranges.push(range);
        }

        ranges
    }
}

/// Case-insensitive substring test
pub fn contains_ignore_case(text: &str, query: &str) -> bool {
    FoldedText::new(text)
        .find_first(&FoldedQuery::new(query))
        .is_some()
}
