//! Highlight spans for matched query text
//!
//! Highlighting never produces markup itself. It reports byte ranges into the
//! field text and leaves it to the renderer to decide what a highlight looks
//! like.

use serde::Serialize;

use super::matching::{FoldedQuery, FoldedText};

/// Byte range of a highlighted region, always on char boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

/// Text plus the regions of it that matched the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedText {
    pub text: String,
    pub spans: Vec<HighlightSpan>,
}

impl HighlightedText {
    /// Text with no highlighted regions
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn has_highlights(&self) -> bool {
        !self.spans.is_empty()
    }

    /// The highlighted substrings, in order
    #[cfg(test)]
    pub fn highlighted(&self) -> Vec<&str> {
        self.spans
            .iter()
            .map(|span| &self.text[span.start..span.end])
            .collect()
    }

    /// Wrap every span in `open`/`close` markers
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + self.spans.len() * (open.len() + close.len()));
        let mut last = 0;

        for span in &self.spans {
            out.push_str(&self.text[last..span.start]);
            out.push_str(open);
            out.push_str(&self.text[span.start..span.end]);
            out.push_str(close);
            last = span.end;
        }
        out.push_str(&self.text[last..]);

        out
    }

    /// Markdown bold highlights
    pub fn to_markdown(&self) -> String {
        self.render("**", "**")
    }
}

/// Highlight every occurrence of `query` in `text`
#[cfg(test)]
pub fn highlight(text: &str, query: &str) -> HighlightedText {
    highlight_folded(text, &FoldedQuery::new(query))
}

pub fn highlight_folded(text: &str, query: &FoldedQuery) -> HighlightedText {
    if text.is_empty() || query.is_empty() {
        return HighlightedText::plain(text);
    }

    let spans = FoldedText::new(text)
        .find_all(query)
        .into_iter()
        .map(|range| HighlightSpan {
            start: range.start,
            end: range.end,
        })
        .collect();

    HighlightedText {
        text: text.to_string(),
        spans,
    }
}
