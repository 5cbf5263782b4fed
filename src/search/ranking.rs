//! Relevance ranking
//!
//! Relevance is a plain count: how many times the literal query occurs,
//! case-insensitively and with overlaps, across title, authors and abstract.
//! Candidates that never mention the query are dropped. The rest are sorted
//! by count, and ties keep the order the search service returned them in.

use super::candidate::{Candidate, RankedCandidate};
use super::matching::{FoldedQuery, FoldedText};

/// Relevance of a single candidate for an already folded query
pub fn relevance(query: &FoldedQuery, candidate: &Candidate) -> usize {
    [
        candidate.title.as_str(),
        candidate.authors.as_str(),
        candidate.abstract_text.as_str(),
    ]
    .iter()
    .map(|field| FoldedText::new(field).count_overlapping(query))
    .sum()
}

/// Rank candidates for a query
///
/// Never modifies `candidates`. An empty query matches nothing and so
/// produces an empty ranking.
pub fn rank(query: &str, candidates: &[Candidate]) -> Vec<RankedCandidate> {
    let folded = FoldedQuery::new(query);
    if folded.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .filter_map(|candidate| {
            let relevance = relevance(&folded, candidate);
            (relevance > 0).then(|| RankedCandidate {
                candidate: candidate.clone(),
                relevance,
            })
        })
        .collect();

    // sort_by is stable, which is what keeps ties in service order
    ranked.sort_by(|a, b| b.relevance.cmp(&a.relevance));

    ranked
}
