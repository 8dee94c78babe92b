//! Relevance matcher - picks one video out of the search results
//!
//! A candidate whose title or description literally contains the query wins
//! over popularity. Without such a candidate the most viewed one is chosen.

use crate::video::SearchCandidate;

/// Select a candidate for `query`.
///
/// Substring matches are case-insensitive and the first match in the original
/// order is returned. Otherwise the highest `view_count` wins, with ties going
/// to the earlier candidate.
pub fn select<'a>(candidates: &'a [SearchCandidate], query: &str) -> Option<&'a SearchCandidate> {
    let needle = query.trim().to_lowercase();

    if let Some(hit) = candidates.iter().find(|c| contains_query(c, &needle)) {
        tracing::debug!(id = %hit.id, "exact query match");
        return Some(hit);
    }

    most_viewed(candidates)
}

fn contains_query(candidate: &SearchCandidate, needle: &str) -> bool {
    candidate.title.to_lowercase().contains(needle)
        || candidate.description.to_lowercase().contains(needle)
}

/// Highest `view_count`, earliest candidate on ties
pub fn most_viewed(candidates: &[SearchCandidate]) -> Option<&SearchCandidate> {
    candidates.iter().reduce(|best, c| {
        if c.view_count > best.view_count {
            c
        } else {
            best
        }
    })
}
