//! Resolving a free-text title to one search hit.

use tmdb_client::SearchHit;

/// Pick the hit a free-text title refers to.
///
/// The first hit whose title equals the query case-insensitively wins; with
/// no exact match the search's top-ranked hit is used. `None` only when there
/// are no hits at all.
pub fn resolve_title<'a>(query: &str, hits: &'a [SearchHit]) -> Option<&'a SearchHit> {
    let wanted = query.trim().to_lowercase();
    hits.iter()
        .find(|hit| hit.title.to_lowercase() == wanted)
        .or_else(|| hits.first())
}
