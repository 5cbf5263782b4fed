//! Abstract snippets
//!
//! A snippet is a short excerpt of the abstract around the first match of
//! the query, measured in whitespace-delimited words. Without a match the
//! snippet is a preview of the opening words.

use serde::Serialize;

use super::highlight::{HighlightSpan, HighlightedText};
use super::matching::{FoldedQuery, FoldedText};

/// Marker for words cut from either side of a snippet
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Words kept on each side of the match
    pub context_words: usize,
    /// Words in the preview shown when the query does not occur
    pub preview_words: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            context_words: 10,
            preview_words: 20,
        }
    }
}

/// Bounded excerpt of an abstract
///
/// `body.text` already contains the ellipsis markers; the flags say which
/// ends were cut so renderers that draw their own markers can strip them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    #[serde(flatten)]
    pub body: HighlightedText,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
}

impl Snippet {
    fn empty() -> Self {
        Self {
            body: HighlightedText::plain(""),
            leading_ellipsis: false,
            trailing_ellipsis: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.body.text
    }

    pub fn to_markdown(&self) -> String {
        self.body.to_markdown()
    }
}

/// Build the snippet for `abstract_text`
#[cfg(test)]
pub fn snippet(abstract_text: &str, query: &str, options: SnippetOptions) -> Snippet {
    snippet_folded(abstract_text, &FoldedQuery::new(query), options)
}

pub fn snippet_folded(abstract_text: &str, query: &FoldedQuery, options: SnippetOptions) -> Snippet {
    match FoldedText::new(abstract_text).find_first(query) {
        Some(found) => around_match(abstract_text, found.start, found.end, options.context_words),
        None => preview(abstract_text, options.preview_words),
    }
}

fn preview(text: &str, words: usize) -> Snippet {
    let kept: Vec<&str> = text.split_whitespace().take(words).collect();
    if kept.is_empty() {
        return Snippet::empty();
    }

    let mut out = kept.join(" ");
    out.push(' ');
    out.push_str(ELLIPSIS);

    Snippet {
        body: HighlightedText::plain(out),
        leading_ellipsis: false,
        trailing_ellipsis: true,
    }
}

fn around_match(text: &str, start: usize, end: usize, context: usize) -> Snippet {
    let before = &text[..start];
    let after = &text[end..];

    let mut before_words: Vec<&str> = before.split_whitespace().collect();
    let mut after_words: Vec<&str> = after.split_whitespace().collect();

    // Fragments touching the match without whitespace belong to the match's
    // word and are kept whole rather than counted as context.
    let glued_before = if before.ends_with(|c: char| !c.is_whitespace()) {
        before_words.pop()
    } else {
        None
    };
    let glued_after = if after.starts_with(|c: char| !c.is_whitespace()) && !after_words.is_empty() {
        Some(after_words.remove(0))
    } else {
        None
    };

    let leading_ellipsis = before_words.len() > context;
    let trailing_ellipsis = after_words.len() > context;
    let kept_before = &before_words[before_words.len().saturating_sub(context)..];
    let kept_after = &after_words[..after_words.len().min(context)];

    let mut out = String::new();
    if leading_ellipsis {
        out.push_str(ELLIPSIS);
    }
    for word in kept_before {
        push_separator(&mut out);
        out.push_str(word);
    }
    push_separator(&mut out);
    if let Some(fragment) = glued_before {
        out.push_str(fragment);
    }

    let span_start = out.len();
    out.push_str(&text[start..end]);
    let span_end = out.len();

    if let Some(fragment) = glued_after {
        out.push_str(fragment);
    }
    for word in kept_after {
        out.push(' ');
        out.push_str(word);
    }
    if trailing_ellipsis {
        out.push(' ');
        out.push_str(ELLIPSIS);
    }

    Snippet {
        body: HighlightedText {
            text: out,
            spans: vec![HighlightSpan {
                start: span_start,
                end: span_end,
            }],
        },
        leading_ellipsis,
        trailing_ellipsis,
    }
}

fn push_separator(out: &mut String) {
    if !out.is_empty() {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(count: usize, needle_at: usize) -> String {
        (1..=count)
            .map(|i| {
                if i == needle_at {
                    "needle".to_string()
                } else {
                    format!("w{}", i)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_short_abstract_is_not_truncated() {
        let s = snippet("one two three four query five six", "query", SnippetOptions::default());

        assert_eq!(s.text(), "one two three four query five six");
        assert_eq!(s.body.highlighted(), vec!["query"]);
        assert!(!s.leading_ellipsis);
        assert!(!s.trailing_ellipsis);
        assert_eq!(s.to_markdown(), "one two three four **query** five six");
    }

    #[test]
    fn test_long_abstract_is_cut_on_both_sides() {
        let text = numbered_words(40, 25);
        let s = snippet(&text, "needle", SnippetOptions::default());

        let expected = format!(
            "... {} needle {} ...",
            (15..=24).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" "),
            (26..=35).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" "),
        );
        assert_eq!(s.text(), expected);
        assert!(s.leading_ellipsis);
        assert!(s.trailing_ellipsis);
        assert_eq!(s.body.highlighted(), vec!["needle"]);
    }

    #[test]
    fn test_exactly_ten_words_after_has_no_trailing_ellipsis() {
        let text = numbered_words(35, 25);
        let s = snippet(&text, "needle", SnippetOptions::default());
        assert!(s.leading_ellipsis);
        assert!(!s.trailing_ellipsis);
        assert!(s.text().ends_with("w35"));
    }

    #[test]
    fn test_match_at_start() {
        let s = snippet("Graph theory is fun", "graph", SnippetOptions::default());
        assert_eq!(s.text(), "Graph theory is fun");
        assert_eq!(s.body.spans, vec![HighlightSpan { start: 0, end: 5 }]);
    }

    #[test]
    fn test_only_first_occurrence_is_highlighted() {
        let s = snippet("graph one graph two", "graph", SnippetOptions::default());
        assert_eq!(s.body.highlighted(), vec!["graph"]);
        assert_eq!(s.body.spans[0].start, 0);
    }

    #[test]
    fn test_match_inside_word_keeps_word_whole() {
        let s = snippet("a study of subgraphs in networks", "graph", SnippetOptions::default());
        assert_eq!(s.text(), "a study of subgraphs in networks");
        assert_eq!(s.body.highlighted(), vec!["graph"]);
    }

    #[test]
    fn test_glued_fragments_do_not_count_as_context() {
        let options = SnippetOptions {
            context_words: 1,
            preview_words: 20,
        };
        let s = snippet("x y subgraphs z w", "graph", options);
        assert_eq!(s.text(), "... y subgraphs z ...");
        assert_eq!(s.body.highlighted(), vec!["graph"]);
    }

    #[test]
    fn test_multi_word_query_is_never_split() {
        let text = numbered_words(30, 0) + " deep learning " + &numbered_words(30, 0);
        let s = snippet(&text, "Deep Learning", SnippetOptions::default());
        assert_eq!(s.body.highlighted(), vec!["deep learning"]);
        assert!(s.leading_ellipsis);
        assert!(s.trailing_ellipsis);
    }

    #[test]
    fn test_no_match_gives_preview() {
        let text = numbered_words(30, 0);
        let s = snippet(&text, "absent", SnippetOptions::default());

        let expected = format!(
            "{} ...",
            (1..=20).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
        );
        assert_eq!(s.text(), expected);
        assert!(s.body.spans.is_empty());
        assert!(!s.leading_ellipsis);
        assert!(s.trailing_ellipsis);
    }

    #[test]
    fn test_empty_query_gives_preview() {
        let s = snippet("short abstract", "", SnippetOptions::default());
        assert_eq!(s.text(), "short abstract ...");
        assert!(s.body.spans.is_empty());
    }

    #[test]
    fn test_empty_abstract() {
        let s = snippet("", "graph", SnippetOptions::default());
        assert_eq!(s.text(), "");
        assert!(!s.trailing_ellipsis);
    }

    #[test]
    fn test_whitespace_is_normalized_around_match() {
        let s = snippet("one\n\ntwo   query\tthree", "query", SnippetOptions::default());
        assert_eq!(s.text(), "one two query three");
        assert_eq!(s.body.highlighted(), vec!["query"]);
    }
}
