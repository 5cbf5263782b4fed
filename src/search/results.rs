//! Ranked, annotated and paginated result sets
//!
//! Ties ranking, highlighting, snippets and paging together. A result set is
//! built once from one search response and is never patched afterwards; a
//! new response produces a new set (and with it, page 1).

use serde::Serialize;

use super::candidate::{Candidate, RankedCandidate};
use super::highlight::{highlight_folded, HighlightedText};
use super::matching::FoldedQuery;
use super::pagination::{Paginator, DEFAULT_PAGE_SIZE};
use super::ranking::rank;
use super::snippet::{snippet_folded, Snippet, SnippetOptions};

/// Knobs for turning candidates into displayable results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub page_size: usize,
    pub snippet: SnippetOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            snippet: SnippetOptions::default(),
        }
    }
}

/// A ranked candidate with its display annotations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedResult {
    #[serde(flatten)]
    pub ranked: RankedCandidate,
    pub title_highlight: HighlightedText,
    pub authors_highlight: HighlightedText,
    pub snippet: Snippet,
}

impl AnnotatedResult {
    fn build(ranked: RankedCandidate, query: &FoldedQuery, options: SnippetOptions) -> Self {
        let candidate = &ranked.candidate;
        let title_highlight = highlight_folded(&candidate.title, query);
        let authors_highlight = highlight_folded(&candidate.authors, query);
        let snippet = snippet_folded(&candidate.abstract_text, query, options);

        Self {
            ranked,
            title_highlight,
            authors_highlight,
            snippet,
        }
    }

    pub fn id(&self) -> &str {
        &self.ranked.candidate.id
    }

    pub fn relevance(&self) -> usize {
        self.ranked.relevance
    }
}

/// Everything the renderer needs for one page
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub query: &'a str,
    /// Submission this page answers
    pub generation: u64,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub show_controls: bool,
    pub results: &'a [AnnotatedResult],
}

/// The authoritative result list for one search
#[derive(Debug, Clone)]
pub struct ResultSet {
    query: String,
    generation: u64,
    results: Vec<AnnotatedResult>,
    paginator: Paginator,
}

impl ResultSet {
    /// Rank and annotate `candidates` for `query`
    ///
    /// `generation` identifies the submission this set answers.
    pub fn build(
        query: &str,
        generation: u64,
        candidates: &[Candidate],
        options: PipelineOptions,
    ) -> Self {
        let folded = FoldedQuery::new(query);
        let results: Vec<AnnotatedResult> = rank(query, candidates)
            .into_iter()
            .map(|ranked| AnnotatedResult::build(ranked, &folded, options.snippet))
            .collect();
        let paginator = Paginator::with_page_size(results.len(), options.page_size);

        Self {
            query: query.to_string(),
            generation,
            results,
            paginator,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[cfg(test)]
    pub fn results(&self) -> &[AnnotatedResult] {
        &self.results
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn paginator_mut(&mut self) -> &mut Paginator {
        &mut self.paginator
    }

    /// Results on the current page
    pub fn current_page(&self) -> &[AnnotatedResult] {
        self.paginator.slice(&self.results)
    }

    pub fn page_view(&self) -> PageView<'_> {
        PageView {
            query: &self.query,
            generation: self.generation,
            current_page: self.paginator.current_page(),
            total_pages: self.paginator.total_pages(),
            total_results: self.results.len(),
            show_controls: self.paginator.show_controls(),
            results: self.current_page(),
        }
    }
}
